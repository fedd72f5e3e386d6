//! Type definitions for the application state.
//!
//! Contains enums and structs used for tracking UI state:
//! - [`Tab`] - Which tab is currently displayed
//! - [`Focus`] - Which panel receives keys
//! - [`Prompt`] / [`Confirm`] - Modal dialogs
//! - [`Busy`] - One-shot operations awaiting their result

/// Represents which tab is currently active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Chat,
    Documents,
}

/// Represents which UI component has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Sessions,
    SourceFiles,
    FileTypes,
    Documents,
}

impl Focus {
    /// Next focus in the `Tab` cycle of `tab`.
    pub fn next(self, tab: Tab) -> Focus {
        match tab {
            Tab::Chat => match self {
                Focus::Input => Focus::Sessions,
                Focus::Sessions => Focus::SourceFiles,
                Focus::SourceFiles => Focus::FileTypes,
                Focus::FileTypes | Focus::Documents => Focus::Input,
            },
            Tab::Documents => Focus::Documents,
        }
    }

    /// Focus a tab opens with.
    pub fn initial(tab: Tab) -> Focus {
        match tab {
            Tab::Chat => Focus::Input,
            Tab::Documents => Focus::Documents,
        }
    }
}

/// What a path prompt will do with its input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Upload,
    BatchUpload,
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            PromptKind::Upload => "Upload files (paths separated by spaces)",
            PromptKind::BatchUpload => "Batch upload (at least two paths)",
        }
    }
}

/// Text prompt dialog state
#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: super::input::InputBuffer,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: super::input::InputBuffer::new(),
        }
    }
}

/// A destructive action awaiting `y`/`n`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
    DeleteDocument(String),
    DeleteSession(String),
}

impl Confirm {
    pub fn question(&self) -> String {
        match self {
            Confirm::DeleteDocument(filename) => format!("Delete document '{}'?", filename),
            Confirm::DeleteSession(id) => format!("Delete session '{}'?", id),
        }
    }
}

/// One-shot operations that mark their trigger busy until the result arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Busy {
    SyncQuery,
    Sessions,
    SessionLoad,
    Documents,
    Filters,
    Upload,
    Delete,
    Health,
}

impl Busy {
    pub fn label(&self) -> &'static str {
        match self {
            Busy::SyncQuery => "query",
            Busy::Sessions => "sessions",
            Busy::SessionLoad => "session",
            Busy::Documents => "documents",
            Busy::Filters => "filters",
            Busy::Upload => "upload",
            Busy::Delete => "delete",
            Busy::Health => "health",
        }
    }
}

/// Status bar line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
    /// Suggested next step for a failed request
    pub hint: Option<&'static str>,
    /// Repeating the same action may succeed
    pub retryable: bool,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
            hint: None,
            retryable: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::info(text)
        }
    }
}
