/// Application name
pub const APP_NAME: &str = "hoodlink";

/// `ui_name` reported by the backend for the CONNECT flavour of the app
pub const CONNECT_UI_NAME: &str = "VpnHoodConnect";

/// Message the backend uses when the subscription behind a session ran out
pub const ACCESS_EXPIRED_MESSAGE: &str = "Access Expired!";

/// HTTP status the account service returns for an invalid session
pub const STATUS_UNAUTHORIZED: u16 = 401;

/// Date (UTC) from which the public test servers are only reachable from
/// the CONNECT app
pub const PUBLIC_SERVER_EXPIRE_DATE: (i32, u32, u32) = (2024, 4, 10);

/// Default backend API base URL
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:9090";

/// Default timeout for a single backend request, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Default state polling interval, in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Default number of attempts to pick a premium profile after a subscription
/// rebuild
pub const DEFAULT_PREMIUM_SELECTION_ATTEMPTS: u32 = 3;

// User-facing messages

pub const MSG_EMPTY_DEFAULT_CLIENT_PROFILE: &str = "Please select a server first.";
pub const MSG_PUBLIC_SERVER_PROFILE_NOT_FOUND: &str = "Could not find the public server profile.";
pub const MSG_PREMIUM_PROFILE_NOT_FOUND: &str = "Could not set a premium server as default.";
pub const MSG_AUTHENTICATION_ERROR: &str = "Your session has expired. Please sign in again.";
pub const MSG_PUBLIC_SERVER_MIGRATED: &str = "The VpnHood public server has been migrated to the VpnHood CONNECT app.  Please install it to use VpnHood Public Servers.";
