use hoodlink_shared::ErrorInfo;
use thiserror::Error;

/// Errors produced by backend calls.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend answered with a failure. Displays as the backend message
    /// so it can be shown to the user verbatim.
    #[error("{0}")]
    Server(ErrorInfo),

    /// Connection, timeout or protocol failure below the HTTP status.
    #[error("Network request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered 2xx with a body we could not read.
    #[error("Invalid backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Backend-reported error details, if the backend produced this error.
    pub fn info(&self) -> Option<&ErrorInfo> {
        match self {
            ApiError::Server(info) => Some(info),
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Server(info) => info.status_code,
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) => None,
        }
    }
}

impl From<ErrorInfo> for ApiError {
    fn from(info: ErrorInfo) -> Self {
        ApiError::Server(info)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;
