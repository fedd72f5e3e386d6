//! RAG backend API client.
//!
//! One method per backend endpoint. Every method maps failures onto
//! [`ClientError`]: status >= 400 becomes an application error carrying the
//! body, transport failures are classified into [`NetworkError`]s.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::ReqwestHttpClient;
use crate::error::{classify_http_error, ClientError, ClientResult, ValidationError};
use crate::models::{
    Document, FilterOptions, QueryRequest, QueryResponse, SessionDetail, SessionSummary,
    UploadResult,
};
use crate::sse::{decode_stream, failed_stream, EventStream};
use crate::startup::config::{ClientConfig, Timeouts};
use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response, UploadFile};

/// `Accept` header of the streaming query.
pub const SSE_ACCEPT: &str = "text/event-stream; charset=utf-8";

/// Multipart field for a single uploaded file.
pub const FIELD_SINGLE: &str = "file";

/// Multipart field for several uploaded files.
pub const FIELD_MULTI: &str = "files";

/// Client for the RAG backend REST API.
#[derive(Clone)]
pub struct RagClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
    timeouts: Timeouts,
}

impl std::fmt::Debug for RagClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagClient")
            .field("base_url", &self.base_url)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl RagClient {
    /// Create a client over any [`HttpClient`].
    pub fn new(http: Arc<dyn HttpClient>, config: &ClientConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            timeouts: config.timeouts,
        }
    }

    /// Create a client backed by reqwest with the configured connect timeout.
    pub fn with_reqwest(config: &ClientConfig) -> Self {
        let http = ReqwestHttpClient::with_connect_timeout(config.timeouts.connect);
        Self::new(Arc::new(http), config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn session_url(&self, session_id: &str) -> String {
        self.url(&format!("/sessions/{}", urlencoding::encode(session_id)))
    }

    fn map_http_error(
        &self,
        err: HttpError,
        url: &str,
        operation: &str,
        timeout: Duration,
    ) -> ClientError {
        let err = match err {
            HttpError::ServerError { status, message } => ClientError::application(status, message),
            other => ClientError::Transport(classify_http_error(&other, url, operation, timeout)),
        };
        tracing::warn!("{} failed [{}]: {}", operation, err.error_code(), err);
        err
    }

    /// Turn status >= 400 into an application error.
    fn check_status(response: Response, operation: &str) -> ClientResult<Response> {
        if response.is_error() {
            let err = ClientError::application(response.status, response.text_lossy());
            tracing::warn!("{} rejected with HTTP {}", operation, response.status);
            return Err(err);
        }
        Ok(response)
    }

    fn decode<T: DeserializeOwned>(response: &Response, context: &str) -> ClientResult<T> {
        response
            .json::<T>()
            .map_err(|e| ClientError::protocol(context, e))
    }

    async fn get(&self, path: &str, operation: &str, timeout: Duration) -> ClientResult<Response> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        let response = self
            .http
            .get(&url, &Headers::new(), timeout)
            .await
            .map_err(|e| self.map_http_error(e, &url, operation, timeout))?;
        Self::check_status(response, operation)
    }

    async fn delete(&self, url: String, operation: &str, timeout: Duration) -> ClientResult<Response> {
        tracing::debug!("DELETE {}", url);
        let response = self
            .http
            .delete(&url, &Headers::new(), timeout)
            .await
            .map_err(|e| self.map_http_error(e, &url, operation, timeout))?;
        Self::check_status(response, operation)
    }

    async fn post_json(
        &self,
        path: &str,
        body: &str,
        operation: &str,
        timeout: Duration,
    ) -> ClientResult<Response> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        let response = self
            .http
            .post(&url, body, &Headers::new(), timeout)
            .await
            .map_err(|e| self.map_http_error(e, &url, operation, timeout))?;
        Self::check_status(response, operation)
    }

    /// Connection test: `GET /documents` with the short health timeout.
    pub async fn health_check(&self) -> ClientResult<()> {
        self.get("/documents", "Connection test", self.timeouts.health)
            .await
            .map(|_| ())
    }

    /// `GET /documents`
    pub async fn list_documents(&self) -> ClientResult<Vec<Document>> {
        let response = self
            .get("/documents", "Document list", self.timeouts.documents)
            .await?;
        Self::decode(&response, "documents")
    }

    /// `DELETE /documents?filename=...`. Returns the backend's JSON result, or
    /// `{"raw": <text>}` for a non-JSON answer.
    pub async fn delete_document(&self, filename: &str) -> ClientResult<Value> {
        let url = format!(
            "{}?filename={}",
            self.url("/documents"),
            urlencoding::encode(filename)
        );
        let response = self
            .delete(url, "Document deletion", self.timeouts.delete)
            .await?;
        Ok(response.json_or_raw())
    }

    /// `GET /filters/options`
    pub async fn list_filter_options(&self) -> ClientResult<FilterOptions> {
        let response = self
            .get("/filters/options", "Filter options", self.timeouts.documents)
            .await?;
        Self::decode(&response, "filter options")
    }

    /// `POST /upload`, field `file` for one path and `files` for several.
    pub async fn upload_documents(&self, paths: &[PathBuf]) -> ClientResult<UploadResult> {
        if paths.is_empty() {
            return Err(ValidationError::NoFiles.into());
        }
        let field = if paths.len() == 1 {
            FIELD_SINGLE
        } else {
            FIELD_MULTI
        };
        self.upload("/upload", paths, field, "Upload").await
    }

    /// `POST /upload/batch`; needs at least two paths.
    pub async fn upload_batch(&self, paths: &[PathBuf]) -> ClientResult<UploadResult> {
        if paths.len() < 2 {
            return Err(ValidationError::BatchTooSmall { count: paths.len() }.into());
        }
        self.upload("/upload/batch", paths, FIELD_MULTI, "Batch upload")
            .await
    }

    async fn upload(
        &self,
        path: &str,
        paths: &[PathBuf],
        field: &str,
        operation: &str,
    ) -> ClientResult<UploadResult> {
        // Every handle is owned by the request and closed when it returns,
        // including when a later file fails to open.
        let mut files = Vec::with_capacity(paths.len());
        for file_path in paths {
            files.push(open_upload(file_path, field).await?);
        }

        let url = self.url(path);
        let timeout = self.timeouts.upload;
        tracing::info!("Uploading {} file(s) to {}", files.len(), url);
        let response = self
            .http
            .post_multipart(&url, files, timeout)
            .await
            .map_err(|e| self.map_http_error(e, &url, operation, timeout))?;
        let response = Self::check_status(response, operation)?;
        Ok(UploadResult::from_response(&response))
    }

    /// `GET /sessions`
    pub async fn list_sessions(&self) -> ClientResult<Vec<SessionSummary>> {
        let response = self
            .get("/sessions", "Session list", self.timeouts.sessions)
            .await?;
        Self::decode(&response, "sessions")
    }

    /// `POST /sessions` with `{}`. A response without `sessionId` yields a
    /// client-generated UUID.
    pub async fn create_session(&self) -> ClientResult<String> {
        let response = self
            .post_json("/sessions", "{}", "Session creation", self.timeouts.sessions)
            .await?;

        let created = response.json::<Value>().ok();
        let session_id = created
            .as_ref()
            .and_then(|v| v.get("sessionId"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .unwrap_or_else(|| {
                tracing::warn!("Session creation returned no sessionId, generating one");
                uuid::Uuid::new_v4().to_string()
            });
        Ok(session_id)
    }

    /// `GET /sessions/{id}`
    pub async fn get_session(&self, session_id: &str) -> ClientResult<SessionDetail> {
        let url = self.session_url(session_id);
        let timeout = self.timeouts.sessions;
        tracing::debug!("GET {}", url);
        let response = self
            .http
            .get(&url, &Headers::new(), timeout)
            .await
            .map_err(|e| self.map_http_error(e, &url, "Session load", timeout))?;
        let response = Self::check_status(response, "Session load")?;
        Self::decode(&response, "session")
    }

    /// `DELETE /sessions/{id}`
    pub async fn delete_session(&self, session_id: &str) -> ClientResult<()> {
        self.delete(
            self.session_url(session_id),
            "Session deletion",
            self.timeouts.sessions,
        )
        .await
        .map(|_| ())
    }

    /// `POST /query`
    pub async fn query(&self, request: &QueryRequest) -> ClientResult<QueryResponse> {
        let body = request
            .to_json()
            .map_err(|e| ClientError::protocol("query request", e))?;
        let response = self
            .post_json("/query", &body, "Query", self.timeouts.query)
            .await?;
        Self::decode(&response, "query")
    }

    /// `POST /query/stream`, returning the raw body.
    pub async fn query_stream(&self, request: &QueryRequest) -> ClientResult<ByteStream> {
        let body = request
            .to_json()
            .map_err(|e| ClientError::protocol("query request", e))?;
        let url = self.url("/query/stream");
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), SSE_ACCEPT.to_string());

        tracing::debug!("POST {} (stream)", url);
        self.http
            .post_stream(&url, &body, &headers)
            .await
            .map_err(|e| self.map_http_error(e, &url, "Stream connection", self.timeouts.connect))
    }

    /// `POST /query/stream`, decoded. A failed attempt yields a stream with a
    /// single `Error` event.
    pub async fn stream_events(&self, request: &QueryRequest) -> EventStream {
        match self.query_stream(request).await {
            Ok(bytes) => decode_stream(bytes, self.timeouts.stream_idle),
            Err(err) => failed_stream(err.user_message()),
        }
    }
}

async fn open_upload(path: &Path, field: &str) -> ClientResult<UploadFile> {
    let file = tokio::fs::File::open(path).await.map_err(|e| {
        ClientError::from(ValidationError::FileUnreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(UploadFile {
        field: field.to_string(),
        file_name,
        file,
    })
}
