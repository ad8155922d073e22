//! Operations the backend process exposes to the application layer.
//!
//! Both traits are object safe so the client core can hold them as
//! `Arc<dyn AppApi>` / `Arc<dyn AccountApi>` and tests can swap in a
//! recording double.

use async_trait::async_trait;

use hoodlink_shared::{
    AppConfig, AppState, ClientProfileId, ClientProfileInfo, ClientProfileUpdateParams,
    ConnectParams, DeviceAppInfo, UserAccount, UserSettings,
};

use crate::error::Result;

/// Connection lifecycle, settings and profile catalog.
#[async_trait]
pub trait AppApi: Send + Sync {
    /// State, settings, features and the profile list in one call.
    async fn get_config(&self) -> Result<AppConfig>;

    async fn get_state(&self) -> Result<AppState>;

    async fn connect(&self, params: &ConnectParams) -> Result<()>;

    async fn disconnect(&self) -> Result<()>;

    async fn set_user_settings(&self, settings: &UserSettings) -> Result<()>;

    /// Register an access key; the backend creates a profile for it.
    async fn add_access_key(&self, access_key: &str) -> Result<ClientProfileInfo>;

    async fn delete_client_profile(&self, client_profile_id: ClientProfileId) -> Result<()>;

    async fn update_client_profile(
        &self,
        client_profile_id: ClientProfileId,
        params: &ClientProfileUpdateParams,
    ) -> Result<()>;

    async fn diagnose(&self, client_profile_id: ClientProfileId) -> Result<()>;

    async fn version_check(&self) -> Result<()>;

    async fn version_check_postpone(&self) -> Result<()>;

    async fn installed_apps(&self) -> Result<Vec<DeviceAppInfo>>;
}

/// Account and subscription service (CONNECT flavour only).
#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn sign_in(&self) -> Result<()>;

    async fn sign_out(&self) -> Result<()>;

    /// Re-sync the account-scoped state held by the backend.
    async fn refresh(&self) -> Result<()>;

    async fn get(&self) -> Result<UserAccount>;

    async fn get_access_keys(&self, subscription_id: &str) -> Result<Vec<String>>;
}
