//! Error handling for the RAG desktop client.
//!
//! Every failure falls into one of four kinds:
//!
//! | Kind | Raised | Side effects |
//! |------|--------|--------------|
//! | Validation | before any request | none |
//! | Transport | connection refused, DNS, timeout | none, except an active stream still completes |
//! | Application | HTTP status >= 400 | none; body shown verbatim |
//! | Protocol | success body cannot be decoded | none |
//!
//! Malformed `meta` payloads inside a stream are not errors at all; the
//! decoder passes the raw text through instead.

mod category;
mod client_error;
mod network;
mod validation;

pub use category::ErrorCategory;
pub use client_error::ClientError;
pub use network::{classify_http_error, NetworkError};
pub use validation::ValidationError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
