//! # hoodlink
//!
//! Terminal front end for a running VPN client backend. It drives the
//! `hoodlink-client` core: connect orchestration, state reconciliation and
//! account/subscription handling. The tunnel itself lives in the backend.

mod args;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use hoodlink_client::{
    ClientConfig, ClientError, ConnectIntent, ConnectOutcome, Dialog, Navigation, SharedApp,
    UiState,
};
use hoodlink_shared::constants::APP_NAME;
use hoodlink_shared::ClientProfileUpdateParams;

use crate::args::{Args, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    hoodlink_client::init_tracing();
    info!("Starting {} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    // -----------------------------------------------------------------------
    // 2. Load configuration (flags win over env)
    // -----------------------------------------------------------------------
    let mut config = ClientConfig::from_env();
    if let Some(url) = args.api_url {
        config.api_url = url;
    }
    if let Commands::Watch {
        interval_ms: Some(ms),
    } = &args.command
    {
        config.poll_interval = Duration::from_millis((*ms).max(1));
    }
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Load the backend configuration
    // -----------------------------------------------------------------------
    let shared = SharedApp::create(config)
        .await
        .context("Could not load the backend configuration")?;

    // -----------------------------------------------------------------------
    // 4. Run the command; failures go through the app's error handler
    // -----------------------------------------------------------------------
    let mut notices = Notices::default();
    let result = run(&shared, args.command, &mut notices).await;
    if let Err(e) = &result {
        shared.handle_error(e).await;
    }
    notices.print(&shared).await;

    // The handler already put the error in front of the user.
    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn run(
    shared: &SharedApp,
    command: Commands,
    notices: &mut Notices,
) -> Result<(), ClientError> {
    match command {
        Commands::Status => {
            shared.reconcile().await?;
            let app = shared.app();
            let summary = shared
                .read(|ctx| {
                    let profile = ctx
                        .default_client_profile_id()
                        .and_then(|id| ctx.client_profile(id));
                    format!(
                        "state:    {:?}\nactive:   {}\nprofile:  {}\nlocation: {}\npremium:  {}\nversion:  {}",
                        ctx.state.connection_state,
                        ctx.state
                            .client_profile
                            .as_ref()
                            .map_or("-", |p| p.client_profile_name.as_str()),
                        profile.map_or("-", |p| p.client_profile_name.as_str()),
                        profile
                            .and_then(|p| p.selected_location_info.as_ref())
                            .map_or("-", |l| l.server_location.as_str()),
                        ctx.check_premium(),
                        app.app_version(ctx, true),
                    )
                })
                .await;
            println!("{summary}");
        }

        Commands::Profiles => {
            let lines = shared
                .read(|ctx| {
                    let default = ctx.default_client_profile_id();
                    ctx.client_profile_infos
                        .iter()
                        .map(|p| {
                            let marker = if Some(p.client_profile_id) == default { "*" } else { " " };
                            let location = p
                                .selected_location_info
                                .as_ref()
                                .map_or("-", |l| l.server_location.as_str());
                            format!(
                                "{marker} {}  {}  [{location}]",
                                p.client_profile_id, p.client_profile_name
                            )
                        })
                        .collect::<Vec<_>>()
                })
                .await;
            if lines.is_empty() {
                println!("No client profiles. Add one with `hoodlink add-key`.");
            }
            for line in lines {
                println!("{line}");
            }
        }

        Commands::AddKey { access_key } => {
            let profile = shared.add_access_key(&access_key).await?;
            println!(
                "Added profile {} ({})",
                profile.client_profile_name, profile.client_profile_id
            );
        }

        Commands::Connect {
            profile,
            location,
            diagnose,
            accept_promotion,
        } => {
            if let Some(location) = location {
                let target = match profile {
                    Some(id) => Some(id),
                    None => shared.read(|ctx| ctx.default_client_profile_id()).await,
                };
                if let Some(id) = target {
                    let params = ClientProfileUpdateParams {
                        client_profile_name: None,
                        selected_location: Some(location),
                    };
                    shared.update_client_profile(id, &params).await?;
                }
            }

            let intent = ConnectIntent {
                client_profile_id: profile,
                is_diagnose: diagnose,
            };
            let mut outcome = shared.connect(&intent).await?;
            if outcome == ConnectOutcome::PublicServerHint {
                // Printing the hint counts as showing it; the second attempt
                // goes through while it is still open.
                report_connect(&outcome);
                outcome = shared.connect(&intent).await?;
            }
            if let ConnectOutcome::PromotionRequired(request) = &outcome {
                if accept_promotion {
                    outcome = shared
                        .confirm_and_connect(request.connect_params(diagnose))
                        .await?;
                }
            }
            report_connect(&outcome);
        }

        Commands::Disconnect => {
            shared.disconnect().await?;
            println!("Disconnected");
        }

        Commands::Diagnose => {
            if !shared.read(|ctx| shared.app().can_diagnose(ctx)).await {
                println!("A diagnosis is already running");
                return Ok(());
            }
            shared.diagnose().await?;
            println!("Diagnosis started");
        }

        Commands::SignIn => {
            shared.sign_in().await?;
            println!("Signed in");
        }

        Commands::SignOut => {
            shared.sign_out().await?;
            println!("Signed out");
        }

        Commands::Watch { .. } => watch(shared, notices).await,
    }

    Ok(())
}

/// Reconcile on every tick until Ctrl+C.
async fn watch(shared: &SharedApp, notices: &mut Notices) {
    let mut interval = tokio::time::interval(shared.app().config().poll_interval);
    info!("Watching backend state, press Ctrl+C to stop");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = shared.reconcile().await {
                    warn!(error = %e, "Reconciliation failed");
                    shared.handle_error(&e).await;
                }
                notices.print(shared).await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, stopping");
                break;
            }
        }
    }
}

fn report_connect(outcome: &ConnectOutcome) {
    match outcome {
        ConnectOutcome::Connected(params) => println!(
            "Connecting to {} ({})",
            params.server_location,
            if params.is_premium_location { "premium" } else { "free" }
        ),
        ConnectOutcome::Redirected(Navigation::ProfileSelection) => {
            println!("No client profile selected. Pick one with `hoodlink connect --profile <ID>`.")
        }
        ConnectOutcome::Redirected(Navigation::ServerSelection) => {
            println!("No server location selected. Pick one with `--location`.")
        }
        ConnectOutcome::Redirected(nav) => println!("Redirected: {nav:?}"),
        ConnectOutcome::PromotionRequired(request) => {
            println!(
                "{} asks to show a promotion first (rewarded ad: {}, trial: {}, purchase: {}).",
                request.server_location,
                request.show_rewarded_ad,
                request.show_try_premium,
                request.show_go_premium
            );
            println!("Run again with --accept-promotion to connect anyway.");
        }
        ConnectOutcome::PublicServerHint => {
            println!("Note: public servers are shared and may be slow or unavailable at times.")
        }
    }
}

/// What was last printed, so that the watch loop only prints changes.
#[derive(Default)]
struct Notices {
    update: bool,
    suppress: bool,
}

const UPDATE_NOTICE: &str = "A new version is available.";
const SUPPRESS_NOTICE: &str = "Your session was taken over by another device using the same key.";

impl Notices {
    async fn print(&mut self, shared: &SharedApp) {
        let (alert, lines) = shared.update(|ctx| self.take(&mut ctx.ui_state)).await;

        if let Some(text) = alert {
            eprintln!("! {text}");
        }
        for line in lines {
            println!("{line}");
        }
    }

    /// Consume the pending alert and return the snackbar lines that changed
    /// since the last call.
    fn take(&mut self, ui: &mut UiState) -> (Option<String>, Vec<&'static str>) {
        ui.take_navigation();
        let alert = ui.alert_dialog_text.clone();
        if ui.is_dialog_active(Dialog::Alert) {
            ui.close_dialog();
        } else {
            ui.alert_dialog_text = None;
        }

        let mut lines = Vec::new();
        if ui.show_update_snackbar && !self.update {
            lines.push(UPDATE_NOTICE);
        }
        if ui.show_suppress_snackbar && !self.suppress {
            lines.push(SUPPRESS_NOTICE);
        }
        self.update = ui.show_update_snackbar;
        self.suppress = ui.show_suppress_snackbar;
        (alert, lines)
    }
}
