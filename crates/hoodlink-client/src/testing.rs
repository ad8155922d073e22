// Recording backend double and fixtures shared by the client tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use hoodlink_api::{AccountApi, ApiError, AppApi, Result};
use hoodlink_shared::constants::CONNECT_UI_NAME;
use hoodlink_shared::{
    AppConfig, AppFeatures, AppState, ClientProfileId, ClientProfileInfo,
    ClientProfileUpdateParams, ClientServerLocationInfo, ConnectParams, DeviceAppInfo, ErrorInfo,
    ServerLocationOptions, UserAccount, UserSettings,
};

use crate::app::HoodApp;
use crate::config::ClientConfig;
use crate::state::AppContext;

pub(crate) const TEST_TOKEN: &str = "test-token";

pub(crate) fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub(crate) fn connect_features() -> AppFeatures {
    AppFeatures {
        version: "4.5.520.0".into(),
        ui_name: Some(CONNECT_UI_NAME.into()),
        test_server_token_id: Some(TEST_TOKEN.into()),
        ..Default::default()
    }
}

pub(crate) fn options(has_premium: bool, has_free: bool) -> ServerLocationOptions {
    ServerLocationOptions {
        has_premium,
        has_free,
        ..Default::default()
    }
}

pub(crate) fn location(server_location: &str, options: ServerLocationOptions) -> ClientServerLocationInfo {
    ClientServerLocationInfo {
        server_location: server_location.into(),
        options,
        ..Default::default()
    }
}

/// A profile whose first location (if any) is the selected one.
pub(crate) fn profile(token_id: &str, locations: Vec<ClientServerLocationInfo>) -> ClientProfileInfo {
    ClientProfileInfo {
        client_profile_id: Uuid::new_v4(),
        client_profile_name: token_id.to_string(),
        token_id: token_id.to_string(),
        selected_location_info: locations.first().cloned(),
        location_infos: locations,
        is_premium_location_selected: false,
    }
}

/// Config with the CONNECT features and the given profiles, the first one
/// being the default.
pub(crate) fn config_with(profiles: Vec<ClientProfileInfo>) -> AppConfig {
    let mut config = AppConfig {
        features: connect_features(),
        client_profile_infos: profiles,
        ..Default::default()
    };
    config.settings.user_settings.default_client_profile_id =
        config.client_profile_infos.first().map(|p| p.client_profile_id);
    config.state.config_time = at(1_700_000_000);
    config
}

/// Backend double, the app core built on it and a context loaded from it.
pub(crate) fn setup(config: AppConfig) -> (Arc<MockBackend>, HoodApp, AppContext) {
    let backend = MockBackend::new(config.clone());
    let app = HoodApp::new(backend.clone(), backend.clone(), ClientConfig::default());
    (backend, app, AppContext::new(config))
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    GetConfig,
    GetState,
    Connect(ConnectParams),
    Disconnect,
    SetUserSettings(Option<ClientProfileId>),
    AddAccessKey(String),
    DeleteClientProfile(ClientProfileId),
    UpdateClientProfile(ClientProfileId),
    Diagnose(ClientProfileId),
    VersionCheck,
    VersionCheckPostpone,
    InstalledApps,
    SignIn,
    SignOut,
    Refresh,
    GetAccount,
    GetAccessKeys(String),
}

#[derive(Default)]
struct Inner {
    calls: Vec<Call>,
    config: AppConfig,
    account: UserAccount,
    access_keys: Vec<String>,
    connect_error: Option<ErrorInfo>,
    refresh_error: Option<ErrorInfo>,
    /// Upcoming `add_access_key` calls whose profile never reaches the catalog.
    unregistered_adds: usize,
}

/// Records every call and keeps a small in-memory profile catalog.
#[derive(Default)]
pub(crate) struct MockBackend {
    inner: Mutex<Inner>,
}

impl MockBackend {
    pub(crate) fn new(config: AppConfig) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner {
                config,
                ..Default::default()
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    fn record(&self, call: Call) {
        self.lock().calls.push(call);
    }

    /// Record `call` and keep the state locked for the caller.
    fn record_and_lock(&self, call: Call) -> MutexGuard<'_, Inner> {
        let mut inner = self.lock();
        inner.calls.push(call);
        inner
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| pred(c)).count()
    }

    pub(crate) fn profiles(&self) -> Vec<ClientProfileInfo> {
        self.lock().config.client_profile_infos.clone()
    }

    pub(crate) fn saved_default(&self) -> Option<ClientProfileId> {
        self.lock()
            .config
            .settings
            .user_settings
            .default_client_profile_id
    }

    pub(crate) fn set_state(&self, state: AppState) {
        self.lock().config.state = state;
    }

    pub(crate) fn set_profiles(&self, profiles: Vec<ClientProfileInfo>) {
        self.lock().config.client_profile_infos = profiles;
    }

    pub(crate) fn set_account(&self, account: UserAccount) {
        self.lock().account = account;
    }

    pub(crate) fn set_access_keys(&self, keys: &[&str]) {
        self.lock().access_keys = keys.iter().map(|k| k.to_string()).collect();
    }

    pub(crate) fn fail_connect(&self, info: ErrorInfo) {
        self.lock().connect_error = Some(info);
    }

    pub(crate) fn fail_refresh(&self, info: ErrorInfo) {
        self.lock().refresh_error = Some(info);
    }

    pub(crate) fn set_unregistered_adds(&self, n: usize) {
        self.lock().unregistered_adds = n;
    }
}

#[async_trait]
impl AppApi for MockBackend {
    async fn get_config(&self) -> Result<AppConfig> {
        Ok(self.record_and_lock(Call::GetConfig).config.clone())
    }

    async fn get_state(&self) -> Result<AppState> {
        Ok(self.record_and_lock(Call::GetState).config.state.clone())
    }

    async fn connect(&self, params: &ConnectParams) -> Result<()> {
        let inner = self.record_and_lock(Call::Connect(params.clone()));
        match &inner.connect_error {
            Some(info) => Err(ApiError::Server(info.clone())),
            None => Ok(()),
        }
    }

    async fn disconnect(&self) -> Result<()> {
        self.record(Call::Disconnect);
        Ok(())
    }

    async fn set_user_settings(&self, settings: &UserSettings) -> Result<()> {
        let mut inner = self.record_and_lock(Call::SetUserSettings(settings.default_client_profile_id));
        inner.config.settings.user_settings = settings.clone();
        Ok(())
    }

    async fn add_access_key(&self, access_key: &str) -> Result<ClientProfileInfo> {
        let mut inner = self.record_and_lock(Call::AddAccessKey(access_key.to_string()));
        let added = profile(&format!("token-{access_key}"), vec![]);
        if inner.unregistered_adds > 0 {
            inner.unregistered_adds -= 1;
        } else {
            inner.config.client_profile_infos.push(added.clone());
        }
        Ok(added)
    }

    async fn delete_client_profile(&self, client_profile_id: ClientProfileId) -> Result<()> {
        let mut inner = self.record_and_lock(Call::DeleteClientProfile(client_profile_id));
        inner
            .config
            .client_profile_infos
            .retain(|p| p.client_profile_id != client_profile_id);
        Ok(())
    }

    async fn update_client_profile(
        &self,
        client_profile_id: ClientProfileId,
        params: &ClientProfileUpdateParams,
    ) -> Result<()> {
        let mut inner = self.record_and_lock(Call::UpdateClientProfile(client_profile_id));
        if let Some(p) = inner
            .config
            .client_profile_infos
            .iter_mut()
            .find(|p| p.client_profile_id == client_profile_id)
        {
            if let Some(name) = &params.client_profile_name {
                p.client_profile_name = name.clone();
            }
            if let Some(selected) = &params.selected_location {
                p.selected_location_info = p.location(selected).cloned();
            }
        }
        Ok(())
    }

    async fn diagnose(&self, client_profile_id: ClientProfileId) -> Result<()> {
        self.record(Call::Diagnose(client_profile_id));
        Ok(())
    }

    async fn version_check(&self) -> Result<()> {
        self.record(Call::VersionCheck);
        Ok(())
    }

    async fn version_check_postpone(&self) -> Result<()> {
        self.record(Call::VersionCheckPostpone);
        Ok(())
    }

    async fn installed_apps(&self) -> Result<Vec<DeviceAppInfo>> {
        self.record(Call::InstalledApps);
        Ok(vec![DeviceAppInfo {
            app_id: "org.example.browser".into(),
            app_name: "Browser".into(),
            icon_png: None,
        }])
    }
}

#[async_trait]
impl AccountApi for MockBackend {
    async fn sign_in(&self) -> Result<()> {
        self.record(Call::SignIn);
        Ok(())
    }

    async fn sign_out(&self) -> Result<()> {
        self.record(Call::SignOut);
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        let inner = self.record_and_lock(Call::Refresh);
        match &inner.refresh_error {
            Some(info) => Err(ApiError::Server(info.clone())),
            None => Ok(()),
        }
    }

    async fn get(&self) -> Result<UserAccount> {
        Ok(self.record_and_lock(Call::GetAccount).account.clone())
    }

    async fn get_access_keys(&self, subscription_id: &str) -> Result<Vec<String>> {
        Ok(self
            .record_and_lock(Call::GetAccessKeys(subscription_id.to_string()))
            .access_keys
            .clone())
    }
}
