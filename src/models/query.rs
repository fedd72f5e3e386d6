//! Query request and answer payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use super::{deserialize_nullable_string, deserialize_optional_id, deserialize_string_list};

/// Session id sent when the current one is blank.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Body of `POST /query` and `POST /query/stream`.
///
/// Filters are sets: serialization is sorted and duplicate-free, and an
/// empty set means no restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub question: String,
    pub session_id: String,
    #[serde(default)]
    pub source_files: BTreeSet<String>,
    #[serde(default)]
    pub file_types: BTreeSet<String>,
}

impl QueryRequest {
    /// Build a request, trimming the question and falling back to
    /// [`DEFAULT_SESSION_ID`] for a blank session id.
    ///
    /// Callers validate that the trimmed question is non-empty.
    pub fn new<S, F>(question: &str, session_id: &str, source_files: S, file_types: F) -> Self
    where
        S: IntoIterator<Item = String>,
        F: IntoIterator<Item = String>,
    {
        let session_id = session_id.trim();
        Self {
            question: question.trim().to_string(),
            session_id: if session_id.is_empty() {
                DEFAULT_SESSION_ID.to_string()
            } else {
                session_id.to_string()
            },
            source_files: source_files.into_iter().collect(),
            file_types: file_types.into_iter().collect(),
        }
    }

    /// Serialize to the JSON wire body.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A retrieved passage backing an answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Citation number; the backend may omit it
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub index: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub snippet: String,
}

impl Citation {
    /// Header line, `[index] source`, with `-` and `unknown` placeholders.
    pub fn label(&self) -> String {
        format!(
            "[{}] {}",
            self.index.as_deref().unwrap_or("-"),
            self.source.as_deref().unwrap_or("unknown")
        )
    }
}

/// Answer of `POST /query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub answer: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub sources: Vec<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub retrieved_chunks: Option<u64>,
}

/// Typed view of a `meta` stream event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamMeta {
    /// Replaces the visible citation set; absent means empty
    #[serde(default)]
    pub citations: Vec<Citation>,
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub sources: Vec<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub retrieved_chunks: Option<u64>,
    /// Undecodable payload text
    #[serde(default)]
    pub raw: Option<String>,
}

impl StreamMeta {
    /// Interpret a meta payload. Anything that is not a well-formed meta
    /// object degrades to an empty citation set.
    pub fn from_value(value: &Value) -> Self {
        match serde_json::from_value::<StreamMeta>(value.clone()) {
            Ok(meta) => meta,
            Err(e) => {
                tracing::warn!("Unexpected meta payload shape: {}", e);
                Self {
                    raw: value.get("raw").and_then(Value::as_str).map(String::from),
                    ..Self::default()
                }
            }
        }
    }
}
