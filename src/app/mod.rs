//! Application state and logic for the TUI.
//!
//! This module contains the core [`App`] struct and related types:
//! - [`Tab`] - Which tab is currently displayed
//! - [`Focus`] - Which UI component has focus
//! - [`AppMessage`] - Messages for async communication
//!
//! The app owns the [`Orchestrator`] and the [`DocumentRegistry`]. Requests
//! run on spawned tasks (see `actions`); their results come back as
//! [`AppMessage`]s and are applied in `handlers`, so all state is mutated on
//! the UI task.

mod actions;
mod handlers;
pub mod input;
mod messages;
mod types;

pub use input::InputBuffer;
pub use messages::AppMessage;
pub use types::{Busy, Confirm, Focus, Prompt, PromptKind, StatusLine, Tab};

use std::collections::HashSet;
use tokio::sync::mpsc;

use crate::client::RagClient;
use crate::orchestrator::Orchestrator;
use crate::registry::DocumentRegistry;

/// Main application state
pub struct App {
    /// Session, transcript and stream state
    pub orchestrator: Orchestrator<AppMessage>,
    /// Documents, filter options and filter selection
    pub registry: DocumentRegistry,
    /// Currently displayed tab
    pub tab: Tab,
    /// Which panel receives keys
    pub focus: Focus,
    /// Question input
    pub input: InputBuffer,
    /// Open path prompt, if any
    pub prompt: Option<Prompt>,
    /// Pending confirmation, if any
    pub confirm: Option<Confirm>,
    /// One-shot operations awaiting their result
    pub busy: HashSet<Busy>,
    /// Refreshes requested while the same refresh was in flight; each runs
    /// once more when the in-flight one lands
    pub refresh_again: HashSet<Busy>,
    /// Last status message
    pub status: Option<StatusLine>,
    /// Highlighted row in the sessions panel
    pub session_cursor: usize,
    /// Highlighted row in the source files panel
    pub source_cursor: usize,
    /// Highlighted row in the file types panel
    pub type_cursor: usize,
    /// Highlighted row in the documents table
    pub document_cursor: usize,
    /// Transcript lines scrolled up from the bottom
    pub scroll_offset: u16,
    /// Flag to track if the app should quit
    pub should_quit: bool,
    /// Whether the screen needs redrawing
    pub needs_redraw: bool,
    /// Animation counter for the busy spinner
    pub tick_count: u64,
    /// Sender for async messages
    pub message_tx: mpsc::UnboundedSender<AppMessage>,
    /// Receiver for async messages, taken by the event loop
    pub message_rx: Option<mpsc::UnboundedReceiver<AppMessage>>,
}

impl App {
    /// Create the app around `client` with `session_id` as the current
    /// session.
    pub fn new(client: RagClient, session_id: impl Into<String>) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            orchestrator: Orchestrator::new(client.clone(), session_id, message_tx.clone()),
            registry: DocumentRegistry::new(client),
            tab: Tab::default(),
            focus: Focus::default(),
            input: InputBuffer::new(),
            prompt: None,
            confirm: None,
            busy: HashSet::new(),
            refresh_again: HashSet::new(),
            status: None,
            session_cursor: 0,
            source_cursor: 0,
            type_cursor: 0,
            document_cursor: 0,
            scroll_offset: 0,
            should_quit: false,
            needs_redraw: true,
            tick_count: 0,
            message_tx,
            message_rx: Some(message_rx),
        }
    }

    pub fn client(&self) -> &RagClient {
        self.orchestrator.client()
    }

    /// Load sessions, documents and filter options.
    pub fn initialize(&mut self) {
        self.spawn_refresh_sessions();
        self.spawn_refresh_documents();
    }

    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    pub fn quit(&mut self) {
        self.orchestrator.cancel_stream();
        self.should_quit = true;
    }

    /// Advance animations. Only redraws while something is in flight.
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        if self.is_busy_any() {
            self.mark_dirty();
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.orchestrator.is_streaming()
    }

    pub fn is_busy(&self, op: Busy) -> bool {
        self.busy.contains(&op)
    }

    pub fn is_busy_any(&self) -> bool {
        self.is_streaming() || !self.busy.is_empty()
    }

    /// Send controls are disabled while a stream or a sync query runs.
    pub fn can_send(&self) -> bool {
        !self.is_streaming() && !self.is_busy(Busy::SyncQuery)
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine::info(text));
        self.mark_dirty();
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusLine::error(text));
        self.mark_dirty();
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.focus = Focus::initial(tab);
        self.mark_dirty();
    }

    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.next(self.tab);
        self.mark_dirty();
    }

    /// Source files offered by the backend, in display order.
    pub fn source_file_options(&self) -> Vec<&str> {
        self.registry
            .filter_options()
            .source_files
            .iter()
            .map(String::as_str)
            .collect()
    }

    /// File types offered by the backend, in display order.
    pub fn file_type_options(&self) -> Vec<&str> {
        self.registry
            .filter_options()
            .file_types
            .iter()
            .map(String::as_str)
            .collect()
    }

    /// Session id under the sessions cursor.
    pub fn selected_session_id(&self) -> Option<String> {
        self.orchestrator
            .sessions()
            .get(self.session_cursor)
            .map(|s| s.session_id.clone())
    }

    /// File name under the documents cursor.
    pub fn selected_document(&self) -> Option<String> {
        self.registry
            .documents()
            .get(self.document_cursor)
            .map(|d| d.filename.clone())
    }

    /// Keep every cursor inside its list after a refresh.
    fn clamp_cursors(&mut self) {
        fn clamp(cursor: &mut usize, len: usize) {
            *cursor = (*cursor).min(len.saturating_sub(1));
        }
        clamp(&mut self.session_cursor, self.orchestrator.sessions().len());
        clamp(&mut self.source_cursor, self.registry.filter_options().source_files.len());
        clamp(&mut self.type_cursor, self.registry.filter_options().file_types.len());
        clamp(&mut self.document_cursor, self.registry.documents().len());
    }
}
