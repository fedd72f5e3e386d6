//! Transport-level error types.
//!
//! These errors describe failures to talk to the backend at all: refused
//! connections, DNS failures, timeouts. HTTP status errors are not transport
//! errors; see [`ClientError::Application`](super::ClientError::Application).

use std::fmt;
use std::time::Duration;

use crate::traits::HttpError;

/// Transport-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Connection to the backend was refused or could not be established.
    ConnectionRefused { url: String, message: String },

    /// DNS resolution failed.
    DnsResolutionFailed { host: String },

    /// Connect or read timeout expired.
    Timeout {
        operation: String,
        duration_secs: u64,
    },

    /// The configured base URL produced an unusable request URL.
    InvalidUrl { url: String },

    /// Request was cancelled by the user.
    Cancelled,

    /// Connection dropped or another I/O failure.
    Other { message: String },
}

impl NetworkError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionRefused { .. } => true,
            NetworkError::DnsResolutionFailed { .. } => true,
            NetworkError::Timeout { .. } => true,
            NetworkError::InvalidUrl { .. } => false,
            NetworkError::Cancelled => false,
            NetworkError::Other { .. } => true,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionRefused { url, .. } => format!(
                "Backend unreachable at {}. Start the RAG service and retry.",
                origin_of(url)
            ),
            NetworkError::DnsResolutionFailed { host } => format!(
                "Could not resolve backend host '{}'. Check the API base URL.",
                host
            ),
            NetworkError::Timeout {
                operation,
                duration_secs,
            } => format!(
                "{} timed out after {} seconds. The backend may be busy or unreachable.",
                operation, duration_secs
            ),
            NetworkError::InvalidUrl { url } => {
                format!("'{}' is not a valid backend URL.", url)
            }
            NetworkError::Cancelled => "The request was cancelled.".to_string(),
            NetworkError::Other { message } => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionRefused { .. } => "E_NET_CONN",
            NetworkError::DnsResolutionFailed { .. } => "E_NET_DNS",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::InvalidUrl { .. } => "E_NET_URL",
            NetworkError::Cancelled => "E_NET_CANCEL",
            NetworkError::Other { .. } => "E_NET_OTHER",
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionRefused { url, message } => {
                write!(f, "Connection failed to '{}': {}", url, message)
            }
            NetworkError::DnsResolutionFailed { host } => {
                write!(f, "DNS resolution failed for '{}'", host)
            }
            NetworkError::Timeout {
                operation,
                duration_secs,
            } => write!(f, "{} timed out after {} seconds", operation, duration_secs),
            NetworkError::InvalidUrl { url } => write!(f, "Invalid URL: {}", url),
            NetworkError::Cancelled => write!(f, "Request cancelled"),
            NetworkError::Other { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for NetworkError {}

/// Classify a transport failure reported by an [`HttpClient`](crate::traits::HttpClient).
///
/// `operation` and `timeout` describe the call that failed and are only used
/// to build the timeout message.
pub fn classify_http_error(
    err: &HttpError,
    url: &str,
    operation: &str,
    timeout: Duration,
) -> NetworkError {
    match err {
        HttpError::ConnectionFailed(message) => {
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                NetworkError::DnsResolutionFailed {
                    host: extract_host_from_url(url),
                }
            } else {
                NetworkError::ConnectionRefused {
                    url: url.to_string(),
                    message: message.clone(),
                }
            }
        }
        HttpError::Timeout(_) => NetworkError::Timeout {
            operation: operation.to_string(),
            duration_secs: timeout.as_secs(),
        },
        HttpError::InvalidUrl(_) => NetworkError::InvalidUrl {
            url: url.to_string(),
        },
        HttpError::Cancelled => NetworkError::Cancelled,
        HttpError::ServerError { status, message } => NetworkError::Other {
            message: format!("HTTP {}: {}", status, message),
        },
        HttpError::Io(message) | HttpError::Other(message) => NetworkError::Other {
            message: message.clone(),
        },
    }
}

/// Extract the host portion from a URL string.
fn extract_host_from_url(url: &str) -> String {
    let without_scheme = strip_scheme(url);
    without_scheme
        .split(&['/', ':'][..])
        .next()
        .unwrap_or(url)
        .to_string()
}

/// Scheme, host and port of a URL, without the path.
fn origin_of(url: &str) -> String {
    let rest = strip_scheme(url);
    let authority = rest.split('/').next().unwrap_or(rest);
    let scheme_len = url.len() - rest.len();
    format!("{}{}", &url[..scheme_len], authority)
}

fn strip_scheme(url: &str) -> &str {
    let lower = url.to_lowercase();
    if lower.starts_with("https://") {
        &url[8..]
    } else if lower.starts_with("http://") {
        &url[7..]
    } else {
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refused_connection_gets_unreachable_hint() {
        let err = classify_http_error(
            &HttpError::ConnectionFailed("tcp connect error: Connection refused".to_string()),
            "http://localhost:8080/api/documents",
            "List documents",
            Duration::from_secs(30),
        );
        assert!(matches!(err, NetworkError::ConnectionRefused { .. }));
        assert_eq!(
            err.user_message(),
            "Backend unreachable at http://localhost:8080. Start the RAG service and retry."
        );
    }

    #[test]
    fn test_dns_failure_classified() {
        let err = classify_http_error(
            &HttpError::ConnectionFailed("dns error: failed to lookup address".to_string()),
            "http://no-such-host.invalid:8080/api/sessions",
            "List sessions",
            Duration::from_secs(20),
        );
        assert_eq!(
            err,
            NetworkError::DnsResolutionFailed {
                host: "no-such-host.invalid".to_string()
            }
        );
    }

    #[test]
    fn test_timeout_carries_operation_and_duration() {
        let err = classify_http_error(
            &HttpError::Timeout("operation timed out".to_string()),
            "http://localhost:8080/api/query",
            "Query",
            Duration::from_secs(180),
        );
        assert_eq!(err.to_string(), "Query timed out after 180 seconds");
        assert_eq!(err.error_code(), "E_NET_TIMEOUT");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_cancelled_is_not_retryable() {
        let err = classify_http_error(
            &HttpError::Cancelled,
            "http://localhost:8080/api/query/stream",
            "Stream",
            Duration::from_secs(300),
        );
        assert_eq!(err, NetworkError::Cancelled);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_origin_of() {
        assert_eq!(origin_of("https://rag.example.com/api/x"), "https://rag.example.com");
        assert_eq!(origin_of("localhost:9000/api"), "localhost:9000");
    }
}
