//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that returns predefined
//! responses, errors or chunked byte streams, and records every request.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response, UploadFile};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET, POST, DELETE)
    pub method: String,
    /// Request URL, including any query string
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for JSON POST requests)
    pub body: Option<String>,
    /// Multipart parts as `(field, file_name)` pairs
    pub files: Vec<(String, String)>,
    /// Timeout the caller asked for (None for streaming requests)
    pub timeout: Option<Duration>,
}

impl RecordedRequest {
    /// Parse the recorded JSON body.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a complete response
    Success(Response),
    /// Fail before any response
    Error(HttpError),
    /// Return a stream of bytes that ends after the last chunk
    Stream(Vec<Bytes>),
    /// Return the chunks, then fail mid-stream
    StreamThenError(Vec<Bytes>, HttpError),
    /// Return the chunks, then never produce another item
    StreamPending(Vec<Bytes>),
}

impl MockResponse {
    /// JSON success response.
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        MockResponse::Success(Response::json_body(status, &value))
    }

    /// Plain text response without a JSON content type.
    pub fn text(status: u16, body: &str) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(body.to_string())))
    }

    /// SSE body delivered as the given chunks.
    pub fn sse_chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockResponse::Stream(
            chunks
                .into_iter()
                .map(|chunk| Bytes::from(chunk.into()))
                .collect(),
        )
    }
}

/// Mock HTTP client for testing.
///
/// Responses are keyed by method and URL. A URL without an exact match falls
/// back to the longest configured prefix for the same method, then to the
/// default response.
///
/// # Example
///
/// ```ignore
/// let client = MockHttpClient::new();
/// client.set_response(
///     "GET",
///     "http://localhost:8080/api/documents",
///     MockResponse::json(200, serde_json::json!([])),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    /// Configured responses by (method, URL)
    responses: Arc<Mutex<HashMap<(String, String), MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a response for a method and URL.
    pub fn set_response(&self, method: &str, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert((method.to_uppercase(), url.to_string()), response);
    }

    /// Set a default response for requests without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests matching a method whose URL path ends with `suffix`.
    pub fn requests_matching(&self, method: &str, suffix: &str) -> Vec<RecordedRequest> {
        self.get_requests()
            .into_iter()
            .filter(|req| req.method.eq_ignore_ascii_case(method))
            .filter(|req| {
                let path = req.url.split('?').next().unwrap_or(&req.url);
                path.ends_with(suffix)
            })
            .collect()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Clear all configured responses.
    pub fn clear_responses(&self) {
        self.responses.lock().unwrap().clear();
    }

    fn record_request(&self, request: RecordedRequest) {
        self.requests.lock().unwrap().push(request);
    }

    /// Get the response for a method and URL.
    fn get_response(&self, method: &str, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(&(method.to_string(), url.to_string())) {
            return Some(response.clone());
        }

        let prefix_match = responses
            .iter()
            .filter(|((m, pattern), _)| m == method && url.starts_with(pattern.as_str()))
            .max_by_key(|((_, pattern), _)| pattern.len())
            .map(|(_, response)| response.clone());
        if prefix_match.is_some() {
            return prefix_match;
        }

        let default = self.default_response.lock().unwrap();
        default.clone()
    }

    fn complete_response(&self, method: &str, url: &str) -> Result<Response, HttpError> {
        match self.get_response(method, url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(_) => Err(HttpError::Other(
                "Stream response on non-stream request".to_string(),
            )),
            None => Err(HttpError::Other(format!(
                "No mock response for {} {}",
                method, url
            ))),
        }
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(
        &self,
        url: &str,
        headers: &Headers,
        timeout: Duration,
    ) -> Result<Response, HttpError> {
        self.record_request(RecordedRequest {
            method: "GET".to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: None,
            files: Vec::new(),
            timeout: Some(timeout),
        });
        self.complete_response("GET", url)
    }

    async fn post(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
        timeout: Duration,
    ) -> Result<Response, HttpError> {
        self.record_request(RecordedRequest {
            method: "POST".to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: Some(body.to_string()),
            files: Vec::new(),
            timeout: Some(timeout),
        });
        self.complete_response("POST", url)
    }

    async fn delete(
        &self,
        url: &str,
        headers: &Headers,
        timeout: Duration,
    ) -> Result<Response, HttpError> {
        self.record_request(RecordedRequest {
            method: "DELETE".to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: None,
            files: Vec::new(),
            timeout: Some(timeout),
        });
        self.complete_response("DELETE", url)
    }

    async fn post_multipart(
        &self,
        url: &str,
        files: Vec<UploadFile>,
        timeout: Duration,
    ) -> Result<Response, HttpError> {
        let parts = files
            .iter()
            .map(|upload| (upload.field.clone(), upload.file_name.clone()))
            .collect();
        // Handles are released here, as the real client releases them once
        // the request is done.
        drop(files);

        self.record_request(RecordedRequest {
            method: "POST".to_string(),
            url: url.to_string(),
            headers: Headers::new(),
            body: None,
            files: parts,
            timeout: Some(timeout),
        });
        self.complete_response("POST", url)
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        use futures::StreamExt;

        self.record_request(RecordedRequest {
            method: "POST".to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: Some(body.to_string()),
            files: Vec::new(),
            timeout: None,
        });

        match self.get_response("POST", url) {
            Some(MockResponse::Stream(chunks)) => {
                Ok(Box::pin(futures::stream::iter(chunks.into_iter().map(Ok))))
            }
            Some(MockResponse::StreamThenError(chunks, err)) => {
                let items = chunks
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(err)));
                Ok(Box::pin(futures::stream::iter(items)))
            }
            Some(MockResponse::StreamPending(chunks)) => {
                let stream = futures::stream::iter(chunks.into_iter().map(Ok))
                    .chain(futures::stream::pending());
                Ok(Box::pin(stream))
            }
            Some(MockResponse::Success(response)) if response.is_error() => {
                Err(HttpError::ServerError {
                    status: response.status,
                    message: response.text_lossy(),
                })
            }
            Some(MockResponse::Success(response)) => {
                Ok(Box::pin(futures::stream::iter(vec![Ok(response.body)])))
            }
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!(
                "No mock response for POST {}",
                url
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_get_records_request() {
        let client = MockHttpClient::new();
        client.set_response(
            "GET",
            "http://api/documents",
            MockResponse::text(200, "[]"),
        );

        let response = client
            .get("http://api/documents", &Headers::new(), TIMEOUT)
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].timeout, Some(TIMEOUT));
    }

    #[tokio::test]
    async fn test_method_is_part_of_the_key() {
        let client = MockHttpClient::new();
        client.set_response("GET", "http://api/documents", MockResponse::text(200, "[]"));
        client.set_response(
            "DELETE",
            "http://api/documents",
            MockResponse::text(500, "nope"),
        );

        let get = client
            .get("http://api/documents", &Headers::new(), TIMEOUT)
            .await
            .unwrap();
        let delete = client
            .delete("http://api/documents?filename=a.pdf", &Headers::new(), TIMEOUT)
            .await
            .unwrap();
        assert_eq!(get.status, 200);
        assert_eq!(delete.status, 500);
    }

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let client = MockHttpClient::new();
        client.set_response("GET", "http://api/sessions", MockResponse::text(200, "list"));
        client.set_response("GET", "http://api/sessions/", MockResponse::text(200, "one"));

        let response = client
            .get("http://api/sessions/abc", &Headers::new(), TIMEOUT)
            .await
            .unwrap();
        assert_eq!(response.text().unwrap(), "one");
    }

    #[tokio::test]
    async fn test_missing_response_is_error() {
        let client = MockHttpClient::new();
        let result = client.get("http://api/none", &Headers::new(), TIMEOUT).await;
        assert!(matches!(result, Err(HttpError::Other(_))));
    }

    #[tokio::test]
    async fn test_post_stream_then_error() {
        let client = MockHttpClient::new();
        client.set_response(
            "POST",
            "http://api/query/stream",
            MockResponse::StreamThenError(
                vec![Bytes::from("event: token\n")],
                HttpError::Io("reset".to_string()),
            ),
        );

        let mut stream = client
            .post_stream("http://api/query/stream", "{}", &Headers::new())
            .await
            .unwrap();
        assert!(stream.next().await.unwrap().is_ok());
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_post_stream_error_status() {
        let client = MockHttpClient::new();
        client.set_response(
            "POST",
            "http://api/query/stream",
            MockResponse::text(503, "overloaded"),
        );

        let result = client
            .post_stream("http://api/query/stream", "{}", &Headers::new())
            .await;
        match result {
            Err(HttpError::ServerError { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "overloaded");
            }
            _ => panic!("Expected ServerError"),
        }
    }

    #[tokio::test]
    async fn test_multipart_records_parts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "hello").unwrap();

        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::json(200, serde_json::json!({})));

        let file = tokio::fs::File::open(&path).await.unwrap();
        client
            .post_multipart(
                "http://api/upload",
                vec![UploadFile {
                    field: "file".to_string(),
                    file_name: "a.txt".to_string(),
                    file,
                }],
                TIMEOUT,
            )
            .await
            .unwrap();

        let requests = client.get_requests();
        assert_eq!(
            requests[0].files,
            vec![("file".to_string(), "a.txt".to_string())]
        );
    }
}
