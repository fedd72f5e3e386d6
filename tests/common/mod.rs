//! Common test utilities for integration tests.
//!
//! Fixtures for building clients against the mock HTTP client or a wiremock
//! server, SSE bodies and upload files.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ragdesk::adapters::MockHttpClient;
use ragdesk::client::RagClient;
use ragdesk::startup::ClientConfig;

/// Base URL used with the mock HTTP client.
pub const BASE: &str = "http://rag.test/api";

/// Absolute URL of `path` under [`BASE`].
pub fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

/// Client backed by `mock`.
pub fn mock_client(mock: &MockHttpClient) -> RagClient {
    let config = ClientConfig::new()
        .with_base_url(BASE)
        .with_session_id("test-session");
    RagClient::new(Arc::new(mock.clone()), &config)
}

/// Production client pointed at `base`.
pub fn reqwest_client(base: &str) -> RagClient {
    let config = ClientConfig::new()
        .with_base_url(base)
        .with_session_id("test-session");
    RagClient::with_reqwest(&config)
}

/// One SSE event block.
pub fn sse_event(name: &str, data: &str) -> String {
    let mut block = format!("event: {}\n", name);
    for line in data.split('\n') {
        block.push_str(&format!("data: {}\n", line));
    }
    block.push('\n');
    block
}

/// SSE body made of `events`.
pub fn sse_body(events: &[(&str, &str)]) -> String {
    events
        .iter()
        .map(|(name, data)| sse_event(name, data))
        .collect()
}

/// Write a fixture file and return its path.
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
