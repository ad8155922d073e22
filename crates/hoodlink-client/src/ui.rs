//! UI-facing state: what the presentation layer should show next and what
//! the user already acknowledged.

use chrono::{DateTime, Utc};
use serde::Serialize;

use hoodlink_shared::{ClientProfileId, ServerLocationOptions, UserAccount};

/// Dialogs the core can ask the presentation layer to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialog {
    Alert,
    PublicServerHint,
}

/// Navigation intents, consumed in order by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Navigation {
    /// No usable client profile; let the user pick one.
    ProfileSelection,
    /// The profile has no selected server location.
    ServerSelection,
    /// Show the promotion view for `UiState::promote_premium_data`.
    PromotePremium,
    Dialog(Dialog),
}

/// Payload of the promotion view. Built fresh for each connect attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumPromotionRequest {
    pub client_profile_id: ClientProfileId,
    pub server_location: String,
    pub is_premium_location: bool,
    pub show_rewarded_ad: bool,
    pub show_try_premium: bool,
    pub show_go_premium: bool,
}

impl PremiumPromotionRequest {
    pub fn new(
        client_profile_id: ClientProfileId,
        server_location: &str,
        is_premium_location: bool,
        options: &ServerLocationOptions,
    ) -> Self {
        Self {
            client_profile_id,
            server_location: server_location.to_string(),
            is_premium_location,
            show_rewarded_ad: options.premium_by_rewarded_ad,
            show_try_premium: options.premium_by_trial,
            show_go_premium: options.premium_by_purchase,
        }
    }
}

/// Transient UI flags and suppress-notice acknowledgments.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Last `config_time` the settings were loaded for.
    pub config_time: Option<DateTime<Utc>>,
    pub show_update_snackbar: bool,
    pub show_suppress_snackbar: bool,
    pub user_ignore_suppress_by_time: Option<DateTime<Utc>>,
    pub user_ignore_suppress_to_time: Option<DateTime<Utc>>,
    pub alert_dialog_text: Option<String>,
    pub promote_premium_data: Option<PremiumPromotionRequest>,
    pub active_dialog: Option<Dialog>,
    navigation: Vec<Navigation>,
}

impl UiState {
    pub fn navigate(&mut self, to: Navigation) {
        tracing::debug!(?to, "Navigation requested");
        if let Navigation::Dialog(dialog) = to {
            self.active_dialog = Some(dialog);
        }
        self.navigation.push(to);
    }

    /// Hand pending navigation intents to the presentation layer.
    pub fn take_navigation(&mut self) -> Vec<Navigation> {
        std::mem::take(&mut self.navigation)
    }

    pub fn pending_navigation(&self) -> &[Navigation] {
        &self.navigation
    }

    pub fn is_dialog_active(&self, dialog: Dialog) -> bool {
        self.active_dialog == Some(dialog)
    }

    pub fn close_dialog(&mut self) {
        if self.active_dialog == Some(Dialog::Alert) {
            self.alert_dialog_text = None;
        }
        self.active_dialog = None;
    }

    /// The user closed the promotion view; the payload is discarded.
    pub fn dismiss_promotion(&mut self) -> Option<PremiumPromotionRequest> {
        self.promote_premium_data.take()
    }

    /// The user closed the suppress snackbar for this connect attempt.
    pub fn dismiss_suppress_notice(&mut self, connect_request_time: Option<DateTime<Utc>>) {
        self.user_ignore_suppress_by_time = connect_request_time;
        self.user_ignore_suppress_to_time = connect_request_time;
        self.show_suppress_snackbar = false;
    }
}

/// What the user acknowledged, plus the signed-in account.
#[derive(Debug, Clone, Default)]
pub struct UserState {
    pub user_ignore_last_error_time: Option<DateTime<Utc>>,
    pub user_account: Option<UserAccount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_navigation_marks_active_dialog() {
        let mut ui = UiState::default();
        ui.navigate(Navigation::Dialog(Dialog::PublicServerHint));
        assert!(ui.is_dialog_active(Dialog::PublicServerHint));
        assert_eq!(
            ui.take_navigation(),
            vec![Navigation::Dialog(Dialog::PublicServerHint)]
        );
        assert!(ui.pending_navigation().is_empty());
    }

    #[test]
    fn test_close_alert_clears_text() {
        let mut ui = UiState {
            alert_dialog_text: Some("boom".into()),
            ..Default::default()
        };
        ui.navigate(Navigation::Dialog(Dialog::Alert));
        ui.close_dialog();
        assert!(ui.alert_dialog_text.is_none());
        assert!(ui.active_dialog.is_none());
    }

    #[test]
    fn test_promotion_flags_come_from_options() {
        let options = ServerLocationOptions {
            premium_by_rewarded_ad: true,
            premium_by_trial: false,
            premium_by_purchase: true,
            ..Default::default()
        };
        let id = uuid::Uuid::new_v4();
        let request = PremiumPromotionRequest::new(id, "DE/*", true, &options);
        assert!(request.show_rewarded_ad);
        assert!(!request.show_try_premium);
        assert!(request.show_go_premium);
        assert_eq!(request.server_location, "DE/*");
    }

    #[test]
    fn test_navigation_payload_names() {
        let json = serde_json::to_string(&Navigation::PromotePremium).unwrap();
        assert_eq!(json, "\"promote-premium\"");

        let json = serde_json::to_string(&Navigation::Dialog(Dialog::Alert)).unwrap();
        assert_eq!(json, r#"{"dialog":"alert"}"#);
    }
}
