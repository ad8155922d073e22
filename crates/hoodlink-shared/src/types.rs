use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::constants::CONNECT_UI_NAME;
use crate::error::ErrorInfo;

pub type ClientProfileId = Uuid;

// ---------------------------------------------------------------------------
// Backend state snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AppConnectionState {
    #[default]
    None,
    Initializing,
    Waiting,
    Diagnosing,
    Connecting,
    Connected,
    Disconnecting,
}

/// Why a session was pushed aside by (or pushed aside) another session on
/// the same access key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionSuppressType {
    #[default]
    None,
    YourSelf,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    #[serde(default)]
    pub suppressed_to: SessionSuppressType,
    #[serde(default)]
    pub suppressed_by: SessionSuppressType,
}

/// Descriptor of a newer published build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishInfo {
    pub version: Option<String>,
    pub package_url: Option<String>,
    pub install_page_url: Option<String>,
}

/// Backend-reported application state. Replaced wholesale on every fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub connection_state: AppConnectionState,
    pub session_status: Option<SessionStatus>,
    pub last_error: Option<ErrorInfo>,
    pub last_publish_info: Option<PublishInfo>,
    pub connect_request_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub config_time: DateTime<Utc>,
    #[serde(default)]
    pub has_diagnose_started: bool,
    /// Profile of the current (or last) connection.
    pub client_profile: Option<ClientProfileInfo>,
}

// ---------------------------------------------------------------------------
// Settings & features
// ---------------------------------------------------------------------------

/// User-editable settings. Fields this client does not model are kept in
/// `extra` so that saving never drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub default_client_profile_id: Option<ClientProfileId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub user_settings: UserSettings,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppFeatures {
    #[serde(default)]
    pub version: String,
    pub ui_name: Option<String>,
    /// Token of the bundled free/test server profile.
    pub test_server_token_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppFeatures {
    pub fn is_connect_ui(&self) -> bool {
        self.ui_name.as_deref() == Some(CONNECT_UI_NAME)
    }
}

// ---------------------------------------------------------------------------
// Client profiles
// ---------------------------------------------------------------------------

/// Access options a server location offers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerLocationOptions {
    #[serde(default)]
    pub has_free: bool,
    #[serde(default)]
    pub has_premium: bool,
    #[serde(default)]
    pub premium_by_rewarded_ad: bool,
    #[serde(default)]
    pub premium_by_trial: bool,
    #[serde(default)]
    pub premium_by_purchase: bool,
    /// Upsell copy; when set the user must see a promotion before connecting.
    pub prompt: Option<String>,
}

impl ServerLocationOptions {
    /// Premium flag forced by the location itself: `Some(true)` when it is
    /// premium-only, `Some(false)` when it is free-only, `None` when it offers
    /// both or neither.
    pub fn forced_premium(&self) -> Option<bool> {
        match (self.has_premium, self.has_free) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        }
    }

    pub fn has_prompt(&self) -> bool {
        self.prompt.as_deref().is_some_and(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientServerLocationInfo {
    pub server_location: String,
    pub country_code: Option<String>,
    pub location_name: Option<String>,
    #[serde(default)]
    pub options: ServerLocationOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfileInfo {
    pub client_profile_id: ClientProfileId,
    #[serde(default)]
    pub client_profile_name: String,
    pub token_id: String,
    #[serde(default)]
    pub location_infos: Vec<ClientServerLocationInfo>,
    pub selected_location_info: Option<ClientServerLocationInfo>,
    #[serde(default)]
    pub is_premium_location_selected: bool,
}

impl ClientProfileInfo {
    pub fn location(&self, server_location: &str) -> Option<&ClientServerLocationInfo> {
        self.location_infos
            .iter()
            .find(|l| l.server_location == server_location)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfileUpdateParams {
    pub client_profile_name: Option<String>,
    pub selected_location: Option<String>,
}

/// Everything `get_config` returns in one round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub state: AppState,
    pub settings: AppSettings,
    pub features: AppFeatures,
    #[serde(default)]
    pub client_profile_infos: Vec<ClientProfileInfo>,
}

// ---------------------------------------------------------------------------
// Connect
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectPlanId {
    #[default]
    Normal,
    PremiumByTrial,
    PremiumByRewardedAd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectParams {
    pub client_profile_id: ClientProfileId,
    pub server_location: String,
    pub is_premium_location: bool,
    pub plan_id: ConnectPlanId,
    pub is_diagnose: bool,
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub user_id: String,
    pub email: Option<String>,
    pub subscription_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAppInfo {
    pub app_id: String,
    pub app_name: String,
    pub icon_png: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(has_premium: bool, has_free: bool) -> ServerLocationOptions {
        ServerLocationOptions {
            has_premium,
            has_free,
            ..Default::default()
        }
    }

    #[test]
    fn test_forced_premium() {
        assert_eq!(options(true, false).forced_premium(), Some(true));
        assert_eq!(options(false, true).forced_premium(), Some(false));
        assert_eq!(options(true, true).forced_premium(), None);
        assert_eq!(options(false, false).forced_premium(), None);
    }

    #[test]
    fn test_empty_prompt_is_no_prompt() {
        let mut opts = options(true, false);
        assert!(!opts.has_prompt());
        opts.prompt = Some(String::new());
        assert!(!opts.has_prompt());
        opts.prompt = Some("Try premium".into());
        assert!(opts.has_prompt());
    }

    #[test]
    fn test_user_settings_keep_unknown_fields() {
        let json = r#"{"defaultClientProfileId":null,"cultureCode":"fr","useUdpChannel":true}"#;
        let settings: UserSettings = serde_json::from_str(json).unwrap();
        assert!(settings.default_client_profile_id.is_none());
        assert_eq!(settings.extra.len(), 2);

        let back = serde_json::to_value(&settings).unwrap();
        assert_eq!(back["cultureCode"], "fr");
    }

    #[test]
    fn test_parse_state_snapshot() {
        let json = r#"{
            "connectionState": "Connected",
            "sessionStatus": {"suppressedTo": "Other", "suppressedBy": "None"},
            "connectRequestTime": "2024-05-01T10:00:00Z",
            "configTime": "2024-05-01T09:00:00Z",
            "hasDiagnoseStarted": false
        }"#;
        let state: AppState = serde_json::from_str(json).unwrap();
        assert_eq!(state.connection_state, AppConnectionState::Connected);
        let status = state.session_status.unwrap();
        assert_eq!(status.suppressed_to, SessionSuppressType::Other);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_connect_ui_detection() {
        let mut features = AppFeatures::default();
        assert!(!features.is_connect_ui());
        features.ui_name = Some(CONNECT_UI_NAME.into());
        assert!(features.is_connect_ui());
    }
}
