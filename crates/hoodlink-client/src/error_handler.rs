//! Turns failures into UI.
//!
//! In the CONNECT app two backend answers trigger recovery first: an
//! expired access rebuilds the subscription profiles, and a 401 without a
//! local account signs the user out.

use tracing::{error, warn};

use hoodlink_shared::constants::MSG_AUTHENTICATION_ERROR;

use crate::app::HoodApp;
use crate::error::ClientError;
use crate::state::AppContext;

impl HoodApp {
    /// Show `err` to the user, running any recovery it calls for.
    ///
    /// Recovery failures are logged; the user still gets a message.
    pub async fn show_error(&self, ctx: &mut AppContext, err: &ClientError) {
        error!(error = %err, "Operation failed");
        let connect_ui = ctx.features.is_connect_ui();

        if connect_ui && err.is_access_expired() {
            let recovered = match self.refresh_account().await {
                Ok(()) => self.process_user_account(ctx).await,
                Err(e) => Err(e),
            };
            if let Err(e) = recovered {
                warn!(error = %e, "Could not refresh the subscription after access expired");
            }
        }

        if connect_ui && err.is_unauthorized() && ctx.user_state.user_account.is_none() {
            self.show_message(ctx, MSG_AUTHENTICATION_ERROR);
            if let Err(e) = self.sign_out(ctx).await {
                warn!(error = %e, "Sign-out after authentication error failed");
            }
        } else {
            self.show_message(ctx, err.to_string());
        }
    }
}
