use serde::{Deserialize, Serialize};

use crate::constants::{ACCESS_EXPIRED_MESSAGE, STATUS_UNAUTHORIZED};

/// Error as reported by the backend, either as the body of a failed request
/// or as `AppState::last_error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    #[serde(default)]
    pub type_name: Option<String>,
    pub message: String,
    #[serde(default)]
    pub status_code: Option<u16>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            type_name: None,
            message: message.into(),
            status_code: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn is_access_expired(&self) -> bool {
        self.message == ACCESS_EXPIRED_MESSAGE
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code == Some(STATUS_UNAUTHORIZED)
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend_error_body() {
        let json = r#"{"typeName":"SessionException","message":"Access Expired!"}"#;
        let info: ErrorInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.type_name.as_deref(), Some("SessionException"));
        assert!(info.is_access_expired());
        assert!(!info.is_unauthorized());
    }

    #[test]
    fn test_unauthorized_status() {
        let info = ErrorInfo::new("denied").with_status(401);
        assert!(info.is_unauthorized());
        assert_eq!(info.to_string(), "denied");
    }
}
