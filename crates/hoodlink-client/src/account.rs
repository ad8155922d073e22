//! Account reconciliation for the CONNECT app.
//!
//! The profile catalog mirrors the subscription: without one only the
//! public test server profile is kept; with one, every subscription access
//! key becomes a profile and one of them becomes the default.

use tracing::{info, warn};

use hoodlink_shared::AppConnectionState;

use crate::app::HoodApp;
use crate::error::{ClientError, Result};
use crate::state::AppContext;

impl HoodApp {
    pub async fn sign_in(&self, ctx: &mut AppContext) -> Result<()> {
        self.account.sign_in().await?;
        self.refresh_account().await?;
        self.process_user_account(ctx).await
    }

    pub async fn sign_out(&self, ctx: &mut AppContext) -> Result<()> {
        self.account.sign_out().await?;
        self.remove_premium_client_profiles(ctx).await?;
        ctx.user_state.user_account = None;
        info!("Signed out");
        Ok(())
    }

    pub async fn refresh_account(&self) -> Result<()> {
        self.account.refresh().await?;
        Ok(())
    }

    /// Rebuild the premium profiles from the account's subscription.
    ///
    /// Selecting a premium default can race the backend registering the new
    /// profiles. Each failed selection refreshes the account and starts over,
    /// up to `premium_selection_attempts` times.
    pub async fn process_user_account(&self, ctx: &mut AppContext) -> Result<()> {
        let attempts = self.config.premium_selection_attempts.max(1);

        for attempt in 1..=attempts {
            let account = self.account.get().await?;
            let subscription_id = account.subscription_id.clone();
            ctx.user_state.user_account = Some(account);

            let Some(subscription_id) = subscription_id else {
                info!("No active subscription");
                return self.remove_premium_client_profiles(ctx).await;
            };
            info!(subscription = %subscription_id, attempt, "Active subscription");

            if ctx.state.connection_state == AppConnectionState::Connected {
                self.disconnect(ctx).await?;
                ctx.state.connection_state = AppConnectionState::None;
            }
            self.remove_premium_client_profiles(ctx).await?;
            self.save_subscription_access_keys(ctx, &subscription_id)
                .await?;

            match self.set_premium_client_profile_as_default(ctx).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(attempt, error = %e, "Could not select a premium profile");
                    if attempt < attempts {
                        self.refresh_account().await?;
                    }
                }
            }
        }

        Err(ClientError::PremiumSelectionExhausted { attempts })
    }

    /// Delete every profile not backed by the test server token and make
    /// the test server profile the default. Safe to run repeatedly.
    pub async fn remove_premium_client_profiles(&self, ctx: &mut AppContext) -> Result<()> {
        for id in ctx.premium_client_profile_ids() {
            self.delete_client_profile(ctx, id).await?;
        }

        let test_server_id = ctx
            .test_server_profile()
            .map(|p| p.client_profile_id)
            .ok_or(ClientError::PublicServerProfileNotFound)?;
        ctx.settings.user_settings.default_client_profile_id = Some(test_server_id);
        self.save_user_settings(ctx).await
    }

    /// Register every access key of the subscription as a profile.
    pub async fn save_subscription_access_keys(
        &self,
        ctx: &mut AppContext,
        subscription_id: &str,
    ) -> Result<()> {
        let access_keys = self.account.get_access_keys(subscription_id).await?;
        if access_keys.is_empty() {
            return Err(ClientError::NoAccessKeys(subscription_id.to_string()));
        }

        for access_key in &access_keys {
            self.add_access_key(ctx, access_key).await?;
        }
        info!(count = access_keys.len(), "Subscription access keys saved");
        Ok(())
    }

    pub async fn set_premium_client_profile_as_default(&self, ctx: &mut AppContext) -> Result<()> {
        let premium_id = ctx
            .premium_client_profile_ids()
            .first()
            .copied()
            .ok_or(ClientError::PremiumProfileNotFound)?;

        ctx.settings.user_settings.default_client_profile_id = Some(premium_id);
        self.save_user_settings(ctx).await
    }
}
