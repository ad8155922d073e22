use hoodlink_api::ApiError;
use hoodlink_shared::constants::{
    MSG_EMPTY_DEFAULT_CLIENT_PROFILE, MSG_PREMIUM_PROFILE_NOT_FOUND,
    MSG_PUBLIC_SERVER_MIGRATED, MSG_PUBLIC_SERVER_PROFILE_NOT_FOUND,
};
use hoodlink_shared::ErrorInfo;
use thiserror::Error;

/// Errors produced by the client core.
#[derive(Error, Debug)]
pub enum ClientError {
    /// A backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// An operation needs a default client profile and none is set.
    #[error("{}", MSG_EMPTY_DEFAULT_CLIENT_PROFILE)]
    EmptyDefaultClientProfile,

    /// The backend catalog no longer has the free/test server profile.
    #[error("{}", MSG_PUBLIC_SERVER_PROFILE_NOT_FOUND)]
    PublicServerProfileNotFound,

    /// No premium profile exists to become the default.
    #[error("{}", MSG_PREMIUM_PROFILE_NOT_FOUND)]
    PremiumProfileNotFound,

    /// The account service returned no access key for the subscription.
    #[error("Could not find any access key for this subscription id. SubscriptionId: {0}")]
    NoAccessKeys(String),

    /// Picking a premium profile kept failing after refreshing the account.
    #[error("{} (gave up after {attempts} attempts)", MSG_PREMIUM_PROFILE_NOT_FOUND)]
    PremiumSelectionExhausted { attempts: u32 },

    /// The public test servers moved to the CONNECT app.
    #[error("{}", MSG_PUBLIC_SERVER_MIGRATED)]
    PublicServerMigrated,
}

impl ClientError {
    /// Backend-reported details, when the error came from the backend.
    pub fn info(&self) -> Option<&ErrorInfo> {
        match self {
            ClientError::Api(e) => e.info(),
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Api(e) => e.status_code(),
            _ => None,
        }
    }

    pub fn is_access_expired(&self) -> bool {
        self.info().is_some_and(ErrorInfo::is_access_expired)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(hoodlink_shared::constants::STATUS_UNAUTHORIZED)
    }
}

impl From<ErrorInfo> for ClientError {
    fn from(info: ErrorInfo) -> Self {
        ClientError::Api(ApiError::Server(info))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_is_shown_verbatim() {
        let err = ClientError::from(ErrorInfo::new("Server is full"));
        assert_eq!(err.to_string(), "Server is full");
        assert!(!err.is_access_expired());
    }

    #[test]
    fn test_classification() {
        let expired = ClientError::from(ErrorInfo::new("Access Expired!"));
        assert!(expired.is_access_expired());

        let unauthorized = ClientError::from(ErrorInfo::new("nope").with_status(401));
        assert!(unauthorized.is_unauthorized());

        assert!(!ClientError::PremiumProfileNotFound.is_unauthorized());
        assert!(ClientError::PremiumProfileNotFound.info().is_none());
    }
}
