//! Client configuration types.
//!
//! Configuration comes from defaults, then the environment, then CLI flags.

use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";

/// Environment variable overriding the API base URL.
pub const ENV_API_BASE: &str = "RAGDESK_API_BASE";

/// Environment variable presetting the current session id.
pub const ENV_SESSION: &str = "RAGDESK_SESSION";

/// Per-operation request timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// TCP connect timeout for every request
    pub connect: Duration,
    /// Longest silence tolerated between stream chunks
    pub stream_idle: Duration,
    /// Connection test
    pub health: Duration,
    /// Session list, create, load, delete
    pub sessions: Duration,
    /// Document list and filter options
    pub documents: Duration,
    /// Document deletion
    pub delete: Duration,
    /// Synchronous query
    pub query: Duration,
    /// Single and batch uploads
    pub upload: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            stream_idle: Duration::from_secs(300),
            health: Duration::from_secs(8),
            sessions: Duration::from_secs(20),
            documents: Duration::from_secs(30),
            delete: Duration::from_secs(60),
            query: Duration::from_secs(180),
            upload: Duration::from_secs(900),
        }
    }
}

/// Configuration for the RAG client.
///
/// Use the builder pattern to customize.
///
/// # Example
///
/// ```ignore
/// use ragdesk::startup::ClientConfig;
///
/// let config = ClientConfig::from_env()
///     .with_base_url("http://rag.internal:8080/api/")
///     .with_session_id("research");
/// assert_eq!(config.base_url, "http://rag.internal:8080/api");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API base URL without trailing slash
    pub base_url: String,
    /// Initial session id (a fresh UUID unless configured)
    pub session_id: String,
    /// Request timeouts
    pub timeouts: Timeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            session_id: uuid::Uuid::new_v4().to_string(),
            timeouts: Timeouts::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL. Surrounding whitespace and trailing slashes are
    /// removed; a blank value keeps the current URL.
    pub fn with_base_url(mut self, url: impl AsRef<str>) -> Self {
        let normalized = normalize_base_url(url.as_ref());
        if !normalized.is_empty() {
            self.base_url = normalized;
        }
        self
    }

    /// Set the initial session id. A blank value keeps the current id.
    pub fn with_session_id(mut self, id: impl AsRef<str>) -> Self {
        let id = id.as_ref().trim();
        if !id.is_empty() {
            self.session_id = id.to_string();
        }
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.connect = timeout;
        self
    }

    /// Set the stream idle timeout.
    pub fn with_stream_idle_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.stream_idle = timeout;
        self
    }

    /// Replace all timeouts.
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Create config from `RAGDESK_API_BASE` and `RAGDESK_SESSION`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(base) = lookup(ENV_API_BASE) {
            config = config.with_base_url(base);
        }
        if let Some(session) = lookup(ENV_SESSION) {
            config = config.with_session_id(session);
        }
        config
    }
}

/// Trim whitespace and strip every trailing `/`.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
