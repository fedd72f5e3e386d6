//! Query lifecycle phases.

use std::fmt;

/// Phase of the most recent query.
///
/// `Idle -> Sending -> (Streaming | Completed | Failed)`, and back to `Idle`
/// on [`reset`](super::Orchestrator::reset). `Completed` and `Failed` accept a
/// new query just like `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryPhase {
    #[default]
    Idle,
    /// Request sent, nothing received yet
    Sending,
    /// Stream events are arriving
    Streaming,
    Completed,
    Failed,
}

impl QueryPhase {
    /// True while a request is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, QueryPhase::Sending | QueryPhase::Streaming)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryPhase::Idle => "idle",
            QueryPhase::Sending => "sending",
            QueryPhase::Streaming => "streaming",
            QueryPhase::Completed => "completed",
            QueryPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for QueryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
