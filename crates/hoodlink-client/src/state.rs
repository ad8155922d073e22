//! Application context shared by the orchestrator and both reconcilers.
//!
//! [`AppContext`] is passed explicitly (`&mut`) into every operation; the
//! [`crate::SharedApp`] facade owns it behind an async mutex so that
//! procedures never interleave.

use hoodlink_shared::{
    AppConfig, AppFeatures, AppSettings, AppState, ClientProfileId, ClientProfileInfo,
};

use crate::ui::{UiState, UserState};

/// Central application state.
///
/// Holds the latest backend snapshot, the settings/features/profile list
/// loaded for that snapshot's `config_time`, and the UI/user state derived
/// from them.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    /// Latest backend snapshot. Replaced wholesale on every reconciliation.
    pub state: AppState,

    pub settings: AppSettings,

    pub features: AppFeatures,

    pub client_profile_infos: Vec<ClientProfileInfo>,

    pub ui_state: UiState,

    pub user_state: UserState,
}

impl AppContext {
    /// Build the context from the initial `get_config` answer.
    pub fn new(config: AppConfig) -> Self {
        let mut ui_state = UiState::default();
        ui_state.config_time = Some(config.state.config_time);

        Self {
            state: config.state,
            settings: config.settings,
            features: config.features,
            client_profile_infos: config.client_profile_infos,
            ui_state,
            user_state: UserState::default(),
        }
    }

    pub fn default_client_profile_id(&self) -> Option<ClientProfileId> {
        self.settings.user_settings.default_client_profile_id
    }

    pub fn client_profile(&self, id: ClientProfileId) -> Option<&ClientProfileInfo> {
        self.client_profile_infos
            .iter()
            .find(|p| p.client_profile_id == id)
    }

    /// Whether the profile is backed by the bundled free/test server token.
    pub fn is_test_server_profile(&self, profile: &ClientProfileInfo) -> bool {
        self.features.test_server_token_id.as_deref() == Some(profile.token_id.as_str())
    }

    pub fn test_server_profile(&self) -> Option<&ClientProfileInfo> {
        self.client_profile_infos
            .iter()
            .find(|p| self.is_test_server_profile(p))
    }

    /// Profiles not backed by the test server token.
    pub fn premium_client_profile_ids(&self) -> Vec<ClientProfileId> {
        self.client_profile_infos
            .iter()
            .filter(|p| !self.is_test_server_profile(p))
            .map(|p| p.client_profile_id)
            .collect()
    }

    /// Signed in on the CONNECT app with an active subscription.
    pub fn check_premium(&self) -> bool {
        self.features.is_connect_ui()
            && self
                .user_state
                .user_account
                .as_ref()
                .is_some_and(|a| a.subscription_id.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, connect_features, profile};
    use hoodlink_shared::UserAccount;

    #[test]
    fn test_new_records_config_time() {
        let mut config = AppConfig::default();
        config.state.config_time = at(1_700_000_000);
        let ctx = AppContext::new(config.clone());
        assert_eq!(ctx.ui_state.config_time, Some(config.state.config_time));
    }

    #[test]
    fn test_premium_and_test_server_split() {
        let free = profile("test-token", vec![]);
        let premium = profile("premium-token", vec![]);
        let ctx = AppContext {
            features: connect_features(),
            client_profile_infos: vec![free.clone(), premium.clone()],
            ..Default::default()
        };

        assert_eq!(
            ctx.test_server_profile().map(|p| p.client_profile_id),
            Some(free.client_profile_id)
        );
        assert_eq!(
            ctx.premium_client_profile_ids(),
            vec![premium.client_profile_id]
        );
    }

    #[test]
    fn test_without_test_token_every_profile_is_premium() {
        let ctx = AppContext {
            client_profile_infos: vec![profile("test-token", vec![])],
            ..Default::default()
        };
        assert!(ctx.test_server_profile().is_none());
        assert_eq!(ctx.premium_client_profile_ids().len(), 1);
    }

    #[test]
    fn test_check_premium() {
        let mut ctx = AppContext {
            features: connect_features(),
            ..Default::default()
        };
        assert!(!ctx.check_premium());

        ctx.user_state.user_account = Some(UserAccount {
            user_id: "u1".into(),
            subscription_id: Some("sub-1".into()),
            ..Default::default()
        });
        assert!(ctx.check_premium());

        ctx.features.ui_name = None;
        assert!(!ctx.check_premium());
    }
}
