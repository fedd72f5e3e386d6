//! Startup components: configuration, logging and the connection test.
//!
//! - [`config`] - [`ClientConfig`] and per-operation [`Timeouts`]
//! - [`logging`] - file-backed tracing subscriber
//! - [`health`] - backend connection test

pub mod config;
pub mod health;
pub mod logging;

pub use config::{normalize_base_url, ClientConfig, Timeouts, DEFAULT_API_BASE};
pub use health::{check_backend, HealthReport};
pub use logging::init_logging;
