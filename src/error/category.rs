//! Error category classification for unified error handling.
//!
//! Categories drive how an error is presented (status bar colour, retry hint)
//! and whether retrying the same action can help.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Backend unreachable, DNS failure, timeout.
    /// Generally transient and retryable.
    Network,

    /// Backend reported a failure (HTTP 5xx).
    /// Generally transient and retryable after a delay.
    Server,

    /// Response could not be understood by the client.
    Client,

    /// Rejected input or an HTTP 4xx answer to a user request.
    /// Not retryable until the user changes something.
    User,

    /// Invalid base URL or other configuration problem.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient
    /// and the operation can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check that the backend is running and reachable",
            ErrorCategory::Server => "The backend reported a failure. Try again later",
            ErrorCategory::Client => "The backend answered with data this client cannot read",
            ErrorCategory::User => "Check your input and try again",
            ErrorCategory::Configuration => "Check the API base URL",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_retryable() {
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Server.is_retryable());
        assert!(!ErrorCategory::Client.is_retryable());
        assert!(!ErrorCategory::User.is_retryable());
        assert!(!ErrorCategory::Configuration.is_retryable());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(format!("{}", ErrorCategory::Network), "network");
        assert_eq!(format!("{}", ErrorCategory::User), "user");
    }

    #[test]
    fn test_category_recovery_hint() {
        assert!(ErrorCategory::Network.recovery_hint().contains("backend"));
        assert!(ErrorCategory::Configuration.recovery_hint().contains("URL"));
    }
}
