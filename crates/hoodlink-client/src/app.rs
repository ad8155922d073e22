//! Application core: the backend handles plus settings and profile
//! maintenance.
//!
//! Every operation takes the [`AppContext`] explicitly. The connect,
//! reconcile, account and error-handling procedures live in their own
//! modules as further `impl HoodApp` blocks.

use std::sync::Arc;

use tracing::{debug, info};

use hoodlink_api::{AccountApi, ApiClientFactory, AppApi};
use hoodlink_shared::{
    AppConnectionState, ClientProfileId, ClientProfileInfo, ClientProfileUpdateParams,
    DeviceAppInfo, SessionSuppressType,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::state::AppContext;
use crate::ui::{Dialog, Navigation};

pub struct HoodApp {
    pub(crate) api: Arc<dyn AppApi>,
    pub(crate) account: Arc<dyn AccountApi>,
    pub(crate) config: ClientConfig,
}

impl HoodApp {
    pub fn new(api: Arc<dyn AppApi>, account: Arc<dyn AccountApi>, config: ClientConfig) -> Self {
        Self {
            api,
            account,
            config,
        }
    }

    /// Build the HTTP clients from `config` and load the initial context.
    pub async fn create(config: ClientConfig) -> Result<(Self, AppContext)> {
        let factory = ApiClientFactory::new(&config.api_url, config.request_timeout)?;
        info!(url = %factory.base_url(), "Connecting to backend");

        let app = Self::new(
            Arc::new(factory.create_app_client()),
            Arc::new(factory.create_account_client()),
            config,
        );
        let ctx = app.load_context().await?;
        Ok((app, ctx))
    }

    pub async fn load_context(&self) -> Result<AppContext> {
        let config = self.api.get_config().await?;
        info!(
            profiles = config.client_profile_infos.len(),
            version = %config.features.version,
            "Configuration loaded"
        );
        Ok(AppContext::new(config))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    /// Replace features, settings and the profile list with a fresh copy.
    ///
    /// Nothing in `ctx` changes unless the fetch succeeds.
    pub async fn reload_settings(&self, ctx: &mut AppContext) -> Result<()> {
        let config = self.api.get_config().await?;

        ctx.features = config.features;
        ctx.settings = config.settings;
        ctx.client_profile_infos = config.client_profile_infos;
        if ctx.client_profile_infos.is_empty() {
            ctx.settings.user_settings.default_client_profile_id = None;
        }

        debug!(
            profiles = ctx.client_profile_infos.len(),
            default = ?ctx.default_client_profile_id(),
            "Settings reloaded"
        );
        Ok(())
    }

    /// Persist the in-memory user settings.
    pub async fn save_user_settings(&self, ctx: &AppContext) -> Result<()> {
        self.api
            .set_user_settings(&ctx.settings.user_settings)
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Client profiles
    // -----------------------------------------------------------------------

    pub async fn update_client_profile(
        &self,
        ctx: &mut AppContext,
        client_profile_id: ClientProfileId,
        params: &ClientProfileUpdateParams,
    ) -> Result<()> {
        self.api
            .update_client_profile(client_profile_id, params)
            .await?;
        self.reload_settings(ctx).await
    }

    pub async fn add_access_key(
        &self,
        ctx: &mut AppContext,
        access_key: &str,
    ) -> Result<ClientProfileInfo> {
        let profile = self.api.add_access_key(access_key).await?;
        info!(profile = %profile.client_profile_id, "Access key added");
        self.reload_settings(ctx).await?;
        Ok(profile)
    }

    pub async fn delete_client_profile(
        &self,
        ctx: &mut AppContext,
        client_profile_id: ClientProfileId,
    ) -> Result<()> {
        self.api.delete_client_profile(client_profile_id).await?;
        info!(profile = %client_profile_id, "Client profile deleted");
        self.reload_settings(ctx).await
    }

    // -----------------------------------------------------------------------
    // Connection
    // -----------------------------------------------------------------------

    pub async fn disconnect(&self, ctx: &mut AppContext) -> Result<()> {
        self.api.disconnect().await?;
        info!("Disconnected");

        // Suppressing another session is over once we leave.
        if let Some(status) = &ctx.state.session_status {
            if status.suppressed_to != SessionSuppressType::None
                && status.suppressed_by == SessionSuppressType::None
            {
                ctx.ui_state.show_suppress_snackbar = false;
            }
        }
        Ok(())
    }

    pub async fn diagnose(&self, ctx: &AppContext) -> Result<()> {
        let id = ctx
            .default_client_profile_id()
            .ok_or(ClientError::EmptyDefaultClientProfile)?;
        info!(profile = %id, "Starting diagnosis");
        self.api.diagnose(id).await?;
        Ok(())
    }

    pub fn can_diagnose(&self, ctx: &AppContext) -> bool {
        ctx.state.connection_state == AppConnectionState::None || !ctx.state.has_diagnose_started
    }

    // -----------------------------------------------------------------------
    // Misc
    // -----------------------------------------------------------------------

    /// `full`: the version without its last component ("4.5.520").
    /// Otherwise the build number alone ("520").
    pub fn app_version(&self, ctx: &AppContext, full: bool) -> String {
        let version = ctx.features.version.as_str();
        if full {
            version
                .rsplit_once('.')
                .map_or("", |(head, _)| head)
                .to_string()
        } else {
            version.split('.').nth(2).unwrap_or_default().to_string()
        }
    }

    /// Open the alert dialog with `text`.
    pub fn show_message(&self, ctx: &mut AppContext, text: impl Into<String>) {
        ctx.ui_state.alert_dialog_text = Some(text.into());
        ctx.ui_state.navigate(Navigation::Dialog(Dialog::Alert));
    }

    pub async fn check_for_update(&self) -> Result<()> {
        self.api.version_check().await?;
        Ok(())
    }

    pub async fn postpone_update(&self) -> Result<()> {
        self.api.version_check_postpone().await?;
        Ok(())
    }

    pub async fn installed_apps(&self) -> Result<Vec<DeviceAppInfo>> {
        Ok(self.api.installed_apps().await?)
    }
}
