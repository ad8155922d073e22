//! Connect orchestration.
//!
//! A connect request walks three stages, each callable on its own:
//!
//! 1. [`resolve_profile`]: which client profile to use.
//! 2. [`resolve_location`]: its selected server location and whether the
//!    connection is premium.
//! 3. [`gate_promotion`]: whether the location wants a promotion shown
//!    first.
//!
//! [`evaluate_connect_intent`] runs them against the cached profile list
//! and never touches the backend. Gaps in the profile or location redirect
//! the user instead of failing. Only the backend `connect` itself can fail.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use hoodlink_shared::constants::PUBLIC_SERVER_EXPIRE_DATE;
use hoodlink_shared::{ClientProfileId, ConnectParams, ConnectPlanId};

use crate::app::HoodApp;
use crate::error::{ClientError, Result};
use crate::state::AppContext;
use crate::ui::{Dialog, Navigation, PremiumPromotionRequest};

/// What the user asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectIntent {
    /// Connect this profile instead of the default one.
    pub client_profile_id: Option<ClientProfileId>,
    pub is_diagnose: bool,
}

impl ConnectIntent {
    pub fn diagnose() -> Self {
        Self {
            is_diagnose: true,
            ..Default::default()
        }
    }
}

/// Result of evaluating a [`ConnectIntent`] against the cached state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectDecision {
    Proceed(ConnectParams),
    /// Show the promotion first; connect later with
    /// [`HoodApp::confirm_and_connect`].
    RequiresPromotion(PremiumPromotionRequest),
    Redirect(Navigation),
}

/// What a connect call ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected(ConnectParams),
    Redirected(Navigation),
    PromotionRequired(PremiumPromotionRequest),
    /// The public server hint dialog was opened; connect again to proceed.
    PublicServerHint,
}

/// Location chosen by stage 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub server_location: String,
    pub is_premium_location: bool,
}

/// Stage 1: the default client profile.
pub fn resolve_profile(ctx: &AppContext) -> std::result::Result<ClientProfileId, Navigation> {
    ctx.default_client_profile_id()
        .ok_or(Navigation::ProfileSelection)
}

/// Stage 2: the profile's selected location and the premium flag.
///
/// The flag starts from what the user picked for the profile and is forced
/// by the location when it is premium-only or free-only.
pub fn resolve_location(
    ctx: &AppContext,
    client_profile_id: ClientProfileId,
) -> std::result::Result<ResolvedLocation, Navigation> {
    let profile = ctx
        .client_profile(client_profile_id)
        .ok_or(Navigation::ProfileSelection)?;
    let selected = profile
        .selected_location_info
        .as_ref()
        .filter(|l| !l.server_location.is_empty())
        .ok_or(Navigation::ServerSelection)?;

    let is_premium_location = selected
        .options
        .forced_premium()
        .unwrap_or(profile.is_premium_location_selected);

    Ok(ResolvedLocation {
        server_location: selected.server_location.clone(),
        is_premium_location,
    })
}

/// Stage 3: the promotion payload, when the location carries a prompt.
pub fn gate_promotion(
    ctx: &AppContext,
    client_profile_id: ClientProfileId,
    location: &ResolvedLocation,
) -> Option<PremiumPromotionRequest> {
    let options = &ctx
        .client_profile(client_profile_id)?
        .location(&location.server_location)?
        .options;
    debug!(prompt = ?options.prompt, "Promotion gate");

    options.has_prompt().then(|| {
        PremiumPromotionRequest::new(
            client_profile_id,
            &location.server_location,
            location.is_premium_location,
            options,
        )
    })
}

pub fn evaluate_connect_intent(ctx: &AppContext, intent: &ConnectIntent) -> ConnectDecision {
    let client_profile_id = match intent.client_profile_id {
        Some(id) => id,
        None => match resolve_profile(ctx) {
            Ok(id) => id,
            Err(nav) => return ConnectDecision::Redirect(nav),
        },
    };

    let location = match resolve_location(ctx, client_profile_id) {
        Ok(location) => location,
        Err(nav) => return ConnectDecision::Redirect(nav),
    };

    if let Some(request) = gate_promotion(ctx, client_profile_id, &location) {
        return ConnectDecision::RequiresPromotion(request);
    }

    ConnectDecision::Proceed(ConnectParams {
        client_profile_id,
        server_location: location.server_location,
        is_premium_location: location.is_premium_location,
        plan_id: ConnectPlanId::Normal,
        is_diagnose: intent.is_diagnose,
    })
}

impl PremiumPromotionRequest {
    /// Parameters for connecting once the promotion was dismissed.
    pub fn connect_params(&self, is_diagnose: bool) -> ConnectParams {
        ConnectParams {
            client_profile_id: self.client_profile_id,
            server_location: self.server_location.clone(),
            is_premium_location: self.is_premium_location,
            plan_id: ConnectPlanId::Normal,
            is_diagnose,
        }
    }
}

/// What to do when connecting a profile outside the CONNECT app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicServerGuard {
    Allow,
    /// The public servers are gone from this app; delete the profile.
    Migrated,
    ShowHint,
}

pub fn guard_public_server(
    ctx: &AppContext,
    client_profile_id: ClientProfileId,
    today: NaiveDate,
) -> PublicServerGuard {
    if ctx.features.is_connect_ui() {
        return PublicServerGuard::Allow;
    }
    let Some(profile) = ctx.client_profile(client_profile_id) else {
        return PublicServerGuard::Allow;
    };
    if !ctx.is_test_server_profile(profile) {
        return PublicServerGuard::Allow;
    }

    let (y, m, d) = PUBLIC_SERVER_EXPIRE_DATE;
    if NaiveDate::from_ymd_opt(y, m, d).is_some_and(|expire| today >= expire) {
        PublicServerGuard::Migrated
    } else if !ctx.ui_state.is_dialog_active(Dialog::PublicServerHint) {
        PublicServerGuard::ShowHint
    } else {
        PublicServerGuard::Allow
    }
}

impl HoodApp {
    /// Evaluate `intent` and either connect or record where the UI should
    /// go instead.
    pub async fn request_connect(
        &self,
        ctx: &mut AppContext,
        intent: &ConnectIntent,
    ) -> Result<ConnectOutcome> {
        match evaluate_connect_intent(ctx, intent) {
            ConnectDecision::Redirect(nav) => {
                info!(to = ?nav, "Connect redirected");
                ctx.ui_state.navigate(nav);
                Ok(ConnectOutcome::Redirected(nav))
            }
            ConnectDecision::RequiresPromotion(request) => {
                info!(
                    profile = %request.client_profile_id,
                    location = %request.server_location,
                    "Connect needs a promotion first"
                );
                ctx.ui_state.promote_premium_data = Some(request.clone());
                ctx.ui_state.navigate(Navigation::PromotePremium);
                Ok(ConnectOutcome::PromotionRequired(request))
            }
            ConnectDecision::Proceed(params) => self.confirm_and_connect(ctx, params).await,
        }
    }

    /// Connect with parameters the user already confirmed, for instance
    /// after closing the promotion view.
    pub async fn confirm_and_connect(
        &self,
        ctx: &mut AppContext,
        params: ConnectParams,
    ) -> Result<ConnectOutcome> {
        ctx.ui_state.dismiss_promotion();
        self.connect_on(ctx, params, Utc::now().date_naive()).await
    }

    async fn connect_on(
        &self,
        ctx: &mut AppContext,
        params: ConnectParams,
        today: NaiveDate,
    ) -> Result<ConnectOutcome> {
        match guard_public_server(ctx, params.client_profile_id, today) {
            PublicServerGuard::Allow => {}
            PublicServerGuard::Migrated => {
                self.delete_client_profile(ctx, params.client_profile_id)
                    .await?;
                return Err(ClientError::PublicServerMigrated);
            }
            PublicServerGuard::ShowHint => {
                ctx.ui_state
                    .navigate(Navigation::Dialog(Dialog::PublicServerHint));
                return Ok(ConnectOutcome::PublicServerHint);
            }
        }

        info!(
            profile = %params.client_profile_id,
            location = %params.server_location,
            premium = params.is_premium_location,
            diagnose = params.is_diagnose,
            "Connecting"
        );
        self.api.connect(&params).await?;
        Ok(ConnectOutcome::Connected(params))
    }
}
