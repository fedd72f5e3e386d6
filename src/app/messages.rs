//! AppMessage enum for async communication within the application.

use serde_json::Value;

use crate::error::ClientResult;
use crate::models::{
    Document, FilterOptions, QueryResponse, SessionDetail, SessionSummary, UploadResult,
};
use crate::orchestrator::StreamUpdate;
use crate::startup::HealthReport;

/// Messages received from async operations (stream updates and one-shot
/// request results). All of them arrive over one ordered channel and are
/// applied on the UI task.
#[derive(Debug)]
pub enum AppMessage {
    /// Progress or completion of the active stream
    Stream(StreamUpdate),
    /// Answer of a synchronous query
    SyncAnswer(ClientResult<QueryResponse>),
    /// Session list loaded
    SessionsLoaded(ClientResult<Vec<SessionSummary>>),
    /// Session created on the backend
    SessionCreated(ClientResult<String>),
    /// Session history loaded
    SessionLoaded {
        session_id: String,
        result: ClientResult<SessionDetail>,
    },
    /// Session deleted on the backend
    SessionDeleted {
        session_id: String,
        result: ClientResult<()>,
    },
    /// Document list loaded
    DocumentsLoaded(ClientResult<Vec<Document>>),
    /// Filter options loaded
    FilterOptionsLoaded(ClientResult<FilterOptions>),
    /// Upload finished
    UploadFinished(ClientResult<UploadResult>),
    /// Document deletion finished
    DocumentDeleted {
        filename: String,
        result: ClientResult<Value>,
    },
    /// Connection test finished
    HealthChecked(HealthReport),
}

impl From<StreamUpdate> for AppMessage {
    fn from(update: StreamUpdate) -> Self {
        AppMessage::Stream(update)
    }
}
