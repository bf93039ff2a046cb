//! Client error type
//!
//! Every failure the REST layer can produce. A `401` from any endpoint is
//! always [`ClientError::Unauthorized`], whatever the operation was, so the
//! session layer can treat it uniformly.

use kithab_core::PortalError;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the backend
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network failure, timeout or TLS problem
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend rejected the token or it has expired
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The backend returned a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        /// `message` from the response body, if the backend sent one
        message: String,
    },

    /// The response body had an unexpected shape
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Building or writing the notes archive failed
    #[error("Archive error: {0}")]
    Archive(String),

    /// Local precondition, validation, IO or session failure
    #[error(transparent)]
    Portal(#[from] PortalError),
}

/// Error body the backend sends alongside a failure status
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

impl ClientError {
    /// Classify a failure status and its (possibly empty) message
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => Self::Unauthorized {
                message: message.unwrap_or_else(|| "Session expired. Please login again.".to_string()),
            },
            _ => Self::Api {
                status,
                message: message.unwrap_or_default(),
            },
        }
    }

    /// Whether the session must be torn down
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
            || matches!(self, Self::Portal(e) if e.is_session())
    }

    /// Whether this is a "not found" (404) error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Whether this is a "forbidden" (403) error
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Api { status: 403, .. })
    }

    /// Whether the failure was caught locally before any request
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Portal(e) if e.is_validation())
    }

    /// Message for a banner: the server's message when it sent one, the
    /// local message for local failures, `fallback` otherwise
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api { message, .. } if !message.is_empty() => message.clone(),
            Self::Unauthorized { .. } => "Session expired. Please login again.".to_string(),
            Self::Portal(e) => match e.field_errors().and_then(|f| f.first_message()) {
                Some(message) => message.to_string(),
                None => portal_message(e),
            },
            Self::Request(e) if e.is_timeout() => {
                "Request timed out. Please try again.".to_string()
            }
            Self::Request(e) if e.is_connect() => {
                "Unable to connect to the server. Please check your connection.".to_string()
            }
            _ => fallback.to_string(),
        }
    }
}

fn portal_message(error: &PortalError) -> String {
    match error {
        PortalError::Validation(message) | PortalError::Forbidden(message) => message.clone(),
        other => other.to_string(),
    }
}

/// Result type alias using ClientError
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_401_is_always_unauthorized() {
        let err = ClientError::from_status(401, Some("jwt expired".to_string()));
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message("Delete failed"), "Session expired. Please login again.");
    }

    #[test]
    fn test_server_message_preferred_over_fallback() {
        let err = ClientError::from_status(409, Some("Branch exists".to_string()));
        assert_eq!(err.user_message("Failed to add branch"), "Branch exists");

        let err = ClientError::from_status(500, None);
        assert_eq!(err.user_message("Failed to add branch"), "Failed to add branch");
    }

    #[test]
    fn test_local_failures_report_their_own_message() {
        let err = ClientError::from(PortalError::IncompleteSelection);
        assert!(err.is_validation());
        assert_eq!(err.user_message("Failed to fetch notes"), "Please select all fields");

        let err = ClientError::from(PortalError::validation("ID and password required"));
        assert_eq!(err.user_message("Login failed"), "ID and password required");
    }

    #[test]
    fn test_error_body_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"message":"Invalid credentials"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("Invalid credentials"));
        let body: ErrorBody = serde_json::from_str(r#"{"message":""}"#).unwrap();
        assert_eq!(body.into_message(), None);
    }
}
