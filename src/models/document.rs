//! Document registry payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{deserialize_id, deserialize_nullable_string, deserialize_string_list};
use crate::traits::Response;

/// A document known to the backend, as listed by `GET /documents`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Row id assigned by the backend (string or integer on the wire)
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    /// Base file name; this is the deletion key
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub filename: String,
    /// Source path recorded at ingestion
    #[serde(default, rename = "fullPath", deserialize_with = "deserialize_nullable_string")]
    pub full_path: String,
    /// Number of indexed chunks
    #[serde(default, rename = "chunkCount")]
    pub chunk_count: u64,
}

/// Distinct filter values offered by `GET /filters/options`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default, rename = "sourceFiles", deserialize_with = "deserialize_string_list")]
    pub source_files: Vec<String>,
    #[serde(default, rename = "fileTypes", deserialize_with = "deserialize_string_list")]
    pub file_types: Vec<String>,
}

impl FilterOptions {
    pub fn is_empty(&self) -> bool {
        self.source_files.is_empty() && self.file_types.is_empty()
    }
}

/// Result of an upload call.
///
/// The backend answers with JSON for both single and batch uploads, but a
/// proxy or older server may answer with plain text; that is kept as
/// `{"raw": <text>}`.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    pub body: Value,
}

impl UploadResult {
    /// Build from a successful upload response.
    pub fn from_response(response: &Response) -> Self {
        Self {
            body: response.json_or_raw(),
        }
    }

    /// `single` or `batch`, when the server reports it.
    pub fn mode(&self) -> Option<&str> {
        self.body.get("mode").and_then(Value::as_str)
    }

    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    pub fn success_count(&self) -> Option<u64> {
        self.body.get("successCount").and_then(Value::as_u64)
    }

    pub fn failed_count(&self) -> Option<u64> {
        self.body.get("failedCount").and_then(Value::as_u64)
    }

    /// Per-file failures as `(file, error)` pairs.
    pub fn failures(&self) -> Vec<(String, String)> {
        self.body
            .get("failed")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| {
                        let field = |key: &str| {
                            item.get(key)
                                .and_then(Value::as_str)
                                .unwrap_or("unknown")
                                .to_string()
                        };
                        (field("file"), field("error"))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Raw text body, for non-JSON answers.
    pub fn raw(&self) -> Option<&str> {
        self.body.get("raw").and_then(Value::as_str)
    }

    /// One-line summary for the status bar.
    pub fn summary(&self) -> String {
        if let Some(raw) = self.raw() {
            let raw = raw.trim();
            return if raw.is_empty() {
                "Upload finished".to_string()
            } else {
                format!("Upload finished: {}", raw)
            };
        }

        let mut parts = vec![format!("Upload ({})", self.mode().unwrap_or("unknown"))];
        if let (Some(ok), Some(failed)) = (self.success_count(), self.failed_count()) {
            parts.push(format!("{} succeeded, {} failed", ok, failed));
        }
        if let Some(message) = self.message() {
            parts.push(message.to_string());
        }
        parts.join(": ")
    }
}
