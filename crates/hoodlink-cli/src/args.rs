//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Terminal front end for the VpnHood client backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Backend API base URL (overrides `HOODLINK_API_URL`)
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show connection state and the default profile
    Status,
    /// List client profiles
    Profiles,
    /// Register an access key as a new client profile
    AddKey {
        /// Access key, as handed out by the server operator
        access_key: String,
    },
    /// Connect with the default (or given) profile
    Connect {
        /// Connect this profile instead of the default one
        #[arg(short, long, value_name = "ID")]
        profile: Option<Uuid>,

        /// Select this server location on the profile first
        #[arg(short, long, value_name = "LOCATION")]
        location: Option<String>,

        /// Run a diagnosing connection
        #[arg(long)]
        diagnose: bool,

        /// Connect even when the location asks to show a promotion
        #[arg(long)]
        accept_promotion: bool,
    },
    /// Disconnect the current session
    Disconnect,
    /// Diagnose the default profile
    Diagnose,
    /// Sign in and load the subscription's premium servers
    SignIn,
    /// Sign out and drop premium servers
    SignOut,
    /// Keep reconciling the backend state and print notices until Ctrl+C
    Watch {
        /// Poll interval in milliseconds (overrides `HOODLINK_POLL_INTERVAL_MS`)
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connect() {
        let args = Args::parse_from([
            "hoodlink",
            "--api-url",
            "http://10.0.0.2:9090",
            "connect",
            "--location",
            "US/*",
            "--diagnose",
        ]);
        assert_eq!(args.api_url.as_deref(), Some("http://10.0.0.2:9090"));
        match args.command {
            Commands::Connect {
                profile,
                location,
                diagnose,
                accept_promotion,
            } => {
                assert!(profile.is_none());
                assert_eq!(location.as_deref(), Some("US/*"));
                assert!(diagnose);
                assert!(!accept_promotion);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_bad_profile_id() {
        let res = Args::try_parse_from(["hoodlink", "connect", "--profile", "nope"]);
        assert!(res.is_err());
    }
}
