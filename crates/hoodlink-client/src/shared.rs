//! Thread-safe facade over [`HoodApp`] and its [`AppContext`].
//!
//! Every entry point holds the context lock for its whole procedure, so a
//! connect never sees the profile list half way through an account rebuild.
//! Reconciliation triggers that arrive while one is already running are
//! dropped.

use tokio::sync::Mutex;
use tracing::debug;

use hoodlink_shared::{
    ClientProfileId, ClientProfileInfo, ClientProfileUpdateParams, ConnectParams,
};

use crate::app::HoodApp;
use crate::config::ClientConfig;
use crate::connect::{ConnectIntent, ConnectOutcome};
use crate::error::{ClientError, Result};
use crate::state::AppContext;

pub struct SharedApp {
    app: HoodApp,
    ctx: Mutex<AppContext>,
    reconcile_gate: Mutex<()>,
}

impl SharedApp {
    pub fn new(app: HoodApp, ctx: AppContext) -> Self {
        Self {
            app,
            ctx: Mutex::new(ctx),
            reconcile_gate: Mutex::new(()),
        }
    }

    pub async fn create(config: ClientConfig) -> Result<Self> {
        let (app, ctx) = HoodApp::create(config).await?;
        Ok(Self::new(app, ctx))
    }

    pub fn app(&self) -> &HoodApp {
        &self.app
    }

    /// Reload the backend state. Returns `false` when the trigger was merged
    /// into a reconciliation already in flight.
    pub async fn reconcile(&self) -> Result<bool> {
        let Ok(_gate) = self.reconcile_gate.try_lock() else {
            debug!("Reconciliation already running, trigger merged");
            return Ok(false);
        };
        let mut ctx = self.ctx.lock().await;
        self.app.reload_state(&mut ctx).await?;
        Ok(true)
    }

    pub async fn connect(&self, intent: &ConnectIntent) -> Result<ConnectOutcome> {
        let mut ctx = self.ctx.lock().await;
        self.app.request_connect(&mut ctx, intent).await
    }

    pub async fn confirm_and_connect(&self, params: ConnectParams) -> Result<ConnectOutcome> {
        let mut ctx = self.ctx.lock().await;
        self.app.confirm_and_connect(&mut ctx, params).await
    }

    pub async fn disconnect(&self) -> Result<()> {
        let mut ctx = self.ctx.lock().await;
        self.app.disconnect(&mut ctx).await
    }

    pub async fn diagnose(&self) -> Result<()> {
        let ctx = self.ctx.lock().await;
        self.app.diagnose(&ctx).await
    }

    pub async fn sign_in(&self) -> Result<()> {
        let mut ctx = self.ctx.lock().await;
        self.app.sign_in(&mut ctx).await
    }

    pub async fn sign_out(&self) -> Result<()> {
        let mut ctx = self.ctx.lock().await;
        self.app.sign_out(&mut ctx).await
    }

    pub async fn add_access_key(&self, access_key: &str) -> Result<ClientProfileInfo> {
        let mut ctx = self.ctx.lock().await;
        self.app.add_access_key(&mut ctx, access_key).await
    }

    pub async fn update_client_profile(
        &self,
        client_profile_id: ClientProfileId,
        params: &ClientProfileUpdateParams,
    ) -> Result<()> {
        let mut ctx = self.ctx.lock().await;
        self.app
            .update_client_profile(&mut ctx, client_profile_id, params)
            .await
    }

    pub async fn handle_error(&self, err: &ClientError) {
        let mut ctx = self.ctx.lock().await;
        self.app.show_error(&mut ctx, err).await;
    }

    pub async fn read<R>(&self, f: impl FnOnce(&AppContext) -> R) -> R {
        let ctx = self.ctx.lock().await;
        f(&ctx)
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut AppContext) -> R) -> R {
        let mut ctx = self.ctx.lock().await;
        f(&mut ctx)
    }
}
