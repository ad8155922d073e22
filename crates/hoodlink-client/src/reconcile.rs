//! State reconciliation: pull a fresh snapshot from the backend and derive
//! the notices the user has not acknowledged yet.
//!
//! Acknowledgments are keyed by `connect_request_time`, so a new connect
//! attempt re-arms every notice.

use tracing::{debug, warn};

use hoodlink_shared::{AppConnectionState, AppState, SessionSuppressType};

use crate::app::HoodApp;
use crate::error::{ClientError, Result};
use crate::state::AppContext;
use crate::ui::UiState;

impl HoodApp {
    pub async fn reload_state(&self, ctx: &mut AppContext) -> Result<()> {
        ctx.state = self.api.get_state().await?;

        let config_time = ctx.state.config_time;
        if ctx.ui_state.config_time != Some(config_time) {
            debug!(%config_time, "Configuration changed");
            // Recorded only once the reload went through, so a failed
            // reload is retried on the next cycle.
            self.reload_settings(ctx).await?;
            ctx.ui_state.config_time = Some(config_time);
        }

        if let Some(error) = ctx.state.last_error.clone() {
            if ctx.user_state.user_ignore_last_error_time != ctx.state.connect_request_time {
                ctx.user_state.user_ignore_last_error_time = ctx.state.connect_request_time;
                warn!(error = %error, "Backend reported an error");
                self.show_error(ctx, &ClientError::from(error)).await;
            }
        }

        if ctx
            .state
            .last_publish_info
            .as_ref()
            .is_some_and(|info| info.package_url.is_some())
        {
            ctx.ui_state.show_update_snackbar = true;
        }

        update_suppress_notice(&ctx.state, &mut ctx.ui_state);
        Ok(())
    }
}

/// Raise or clear the suppress snackbar for `state`.
///
/// When the session is not suppressed either way the flag is cleared, even
/// if it was raised earlier in the same pass.
pub fn update_suppress_notice(state: &AppState, ui: &mut UiState) {
    let Some(status) = &state.session_status else {
        return;
    };

    if state.connection_state == AppConnectionState::None
        && status.suppressed_by != SessionSuppressType::None
        && ui.user_ignore_suppress_by_time != state.connect_request_time
    {
        ui.show_suppress_snackbar = true;
    }

    if state.connection_state == AppConnectionState::Connected
        && status.suppressed_to == SessionSuppressType::Other
        && ui.user_ignore_suppress_to_time != state.connect_request_time
    {
        ui.show_suppress_snackbar = true;
    }

    if status.suppressed_by == SessionSuppressType::None
        && status.suppressed_to == SessionSuppressType::None
    {
        ui.show_suppress_snackbar = false;
    }
}
