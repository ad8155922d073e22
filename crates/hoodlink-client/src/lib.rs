pub mod account;
pub mod app;
pub mod config;
pub mod connect;
pub mod error;
pub mod error_handler;
pub mod reconcile;
pub mod shared;
pub mod state;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

use tracing_subscriber::{fmt, EnvFilter};

pub use app::HoodApp;
pub use config::ClientConfig;
pub use connect::{evaluate_connect_intent, ConnectDecision, ConnectIntent, ConnectOutcome};
pub use error::{ClientError, Result};
pub use shared::SharedApp;
pub use state::AppContext;
pub use ui::{Dialog, Navigation, PremiumPromotionRequest, UiState, UserState};

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hoodlink_client=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
