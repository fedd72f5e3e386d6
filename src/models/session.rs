//! Conversation session payloads.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::deserialize_nullable_string;

/// Speaker of a turn. Any role other than `user` is shown as the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Role {
    User,
    Assistant,
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("user") {
            Role::User
        } else {
            Role::Assistant
        }
    }
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

/// One immutable exchange entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Row of `GET /sessions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub session_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub turns: u64,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl SessionSummary {
    /// Name, or the id prefix for unnamed sessions.
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => id_prefix(&self.session_id).to_string(),
        }
    }

    /// `name | id8 | N turns`
    pub fn row_label(&self) -> String {
        format!(
            "{} | {} | {} turns",
            self.display_name(),
            id_prefix(&self.session_id),
            self.turns
        )
    }

    /// `updatedAt` in local time as `YYYY-MM-DD HH:MM`; values that are not
    /// RFC 3339 are shown as sent.
    pub fn updated_label(&self) -> Option<String> {
        let raw = self.updated_at.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            Err(_) => raw.to_string(),
        })
    }
}

/// Answer of `GET /sessions/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub history: Vec<Turn>,
}

/// First eight characters of a session id.
pub fn id_prefix(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}
