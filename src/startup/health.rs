//! Backend connection test.

use std::time::{Duration, Instant};

use crate::client::RagClient;
use crate::error::ClientError;

/// Outcome of a connection test.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub base_url: String,
    pub elapsed: Duration,
    pub error: Option<ClientError>,
}

impl HealthReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Status line for the UI or the terminal.
    pub fn message(&self) -> String {
        match &self.error {
            None => format!(
                "Backend reachable at {} ({} ms)",
                self.base_url,
                self.elapsed.as_millis()
            ),
            Some(err) => format!("Connection test failed: {}", err.user_message()),
        }
    }
}

/// Probe the backend with `GET /documents` and the health timeout.
pub async fn check_backend(client: &RagClient) -> HealthReport {
    let started = Instant::now();
    let result = client.health_check().await;
    let report = HealthReport {
        base_url: client.base_url().to_string(),
        elapsed: started.elapsed(),
        error: result.err(),
    };
    match &report.error {
        None => tracing::info!("{}", report.message()),
        Some(err) => tracing::warn!("Connection test failed [{}]: {}", err.error_code(), err),
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MockHttpClient, MockResponse};
    use crate::startup::config::ClientConfig;
    use std::sync::Arc;

    fn client(mock: &MockHttpClient) -> RagClient {
        let config = ClientConfig::new().with_base_url("http://rag.test/api");
        RagClient::new(Arc::new(mock.clone()), &config)
    }

    #[tokio::test]
    async fn test_check_backend_ok_uses_health_timeout() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::json(200, serde_json::json!([])));

        let report = check_backend(&client(&mock)).await;
        assert!(report.is_ok());
        assert!(report.message().starts_with("Backend reachable at http://rag.test/api"));
        assert_eq!(mock.get_requests()[0].timeout, Some(Duration::from_secs(8)));
    }

    #[tokio::test]
    async fn test_check_backend_error_status() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::text(503, ""));

        let report = check_backend(&client(&mock)).await;
        assert!(!report.is_ok());
        assert_eq!(report.message(), "Connection test failed: HTTP 503");
    }
}
