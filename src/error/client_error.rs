//! Unified error type for backend operations.

use thiserror::Error;

use super::category::ErrorCategory;
use super::network::NetworkError;
use super::validation::ValidationError;

/// Error returned by every [`RagClient`](crate::client::RagClient),
/// orchestrator and registry operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Rejected before any network call.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Backend could not be reached or the connection failed.
    #[error("{0}")]
    Transport(#[from] NetworkError),

    /// Backend answered with HTTP status >= 400.
    #[error("HTTP {status}: {body}")]
    Application { status: u16, body: String },

    /// Backend answered successfully but the body could not be read.
    #[error("Unexpected response from {context}: {message}")]
    Protocol { context: String, message: String },
}

impl ClientError {
    /// Build an application error from a status and raw body text.
    pub fn application(status: u16, body: impl Into<String>) -> Self {
        ClientError::Application {
            status,
            body: body.into(),
        }
    }

    /// Build a protocol error for an undecodable response body.
    pub fn protocol(context: impl Into<String>, message: impl ToString) -> Self {
        ClientError::Protocol {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Validation(_) => ErrorCategory::User,
            ClientError::Transport(NetworkError::InvalidUrl { .. }) => ErrorCategory::Configuration,
            ClientError::Transport(_) => ErrorCategory::Network,
            ClientError::Application { status, .. } if *status >= 500 => ErrorCategory::Server,
            ClientError::Application { .. } => ErrorCategory::User,
            ClientError::Protocol { .. } => ErrorCategory::Client,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(err) => err.is_retryable(),
            other => other.category().is_retryable(),
        }
    }

    /// Message shown to the user.
    ///
    /// Application errors show the backend body verbatim, falling back to
    /// `HTTP <status>` when the body is empty.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(err) => err.to_string(),
            ClientError::Transport(err) => err.user_message(),
            ClientError::Application { status, body } => {
                if body.trim().is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.clone()
                }
            }
            ClientError::Protocol { context, message } => {
                format!("Could not read the {} response: {}", context, message)
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Validation(err) => err.error_code(),
            ClientError::Transport(err) => err.error_code(),
            ClientError::Application { .. } => "E_APP_STATUS",
            ClientError::Protocol { .. } => "E_PROTOCOL",
        }
    }

    /// True for a refused or unreachable backend.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(NetworkError::ConnectionRefused { .. })
                | ClientError::Transport(NetworkError::DnsResolutionFailed { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_surfaces_body_verbatim() {
        let err = ClientError::application(400, r#"{"error":"question must not be empty"}"#);
        assert_eq!(err.user_message(), r#"{"error":"question must not be empty"}"#);
        assert_eq!(err.category(), ErrorCategory::User);
    }

    #[test]
    fn test_application_error_empty_body_falls_back_to_status() {
        let err = ClientError::application(502, "  ");
        assert_eq!(err.user_message(), "HTTP 502");
        assert_eq!(err.category(), ErrorCategory::Server);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_validation_from_conversion() {
        let err: ClientError = ValidationError::EmptyQuestion.into();
        assert_eq!(err.category(), ErrorCategory::User);
        assert_eq!(err.user_message(), "Question must not be empty");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_unreachable_detection() {
        let err: ClientError = NetworkError::ConnectionRefused {
            url: "http://localhost:8080/api/sessions".to_string(),
            message: "refused".to_string(),
        }
        .into();
        assert!(err.is_unreachable());
        assert!(err.user_message().starts_with("Backend unreachable"));

        let err: ClientError = NetworkError::Cancelled.into();
        assert!(!err.is_unreachable());
    }

    #[test]
    fn test_protocol_error_code() {
        let err = ClientError::protocol("documents", "expected an array");
        assert_eq!(err.error_code(), "E_PROTOCOL");
        assert_eq!(err.category(), ErrorCategory::Client);
    }
}
