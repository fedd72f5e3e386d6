//! Message and key handling for the App.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

use super::{App, AppMessage, Busy, Focus, Prompt, PromptKind, Tab};
use crate::orchestrator::{QueryPhase, StreamUpdate};

impl App {
    /// Handle an incoming async message.
    /// All message handlers mark the app as dirty since they update visible state.
    pub fn handle_message(&mut self, msg: AppMessage) {
        self.mark_dirty();
        match msg {
            AppMessage::Stream(update) => self.handle_stream_update(update),
            AppMessage::SyncAnswer(result) => {
                self.finish(Busy::SyncQuery);
                match self.orchestrator.apply_sync_result(result) {
                    Ok(()) => {
                        self.set_status("Answer received");
                        self.spawn_refresh_sessions();
                    }
                    Err(err) => self.report_error("Query failed", &err),
                }
            }
            AppMessage::SessionsLoaded(result) => {
                self.finish(Busy::Sessions);
                match result {
                    Ok(sessions) => self.orchestrator.apply_sessions(sessions),
                    Err(err) => self.report_error("Loading sessions failed", &err),
                }
                self.run_queued_refresh(Busy::Sessions);
            }
            AppMessage::SessionCreated(result) => {
                self.finish(Busy::SessionLoad);
                match result {
                    Ok(session_id) => {
                        self.orchestrator.apply_created_session(session_id.clone());
                        self.set_status(format!("New session {}", session_id));
                        self.spawn_refresh_sessions();
                    }
                    Err(err) => self.report_error("Creating session failed", &err),
                }
            }
            AppMessage::SessionLoaded { session_id, result } => {
                self.finish(Busy::SessionLoad);
                match result {
                    Ok(detail) => {
                        self.orchestrator.apply_loaded_session(&session_id, detail);
                        self.scroll_offset = 0;
                        self.set_status(format!("Loaded session {}", session_id));
                    }
                    Err(err) => self.report_error("Loading session failed", &err),
                }
            }
            AppMessage::SessionDeleted { session_id, result } => {
                self.finish(Busy::Delete);
                match result {
                    Ok(()) => {
                        self.orchestrator.apply_deleted_session(&session_id);
                        self.set_status(format!("Deleted session {}", session_id));
                        self.spawn_refresh_sessions();
                    }
                    Err(err) => self.report_error("Deleting session failed", &err),
                }
            }
            AppMessage::DocumentsLoaded(result) => {
                self.finish(Busy::Documents);
                match result {
                    Ok(documents) => self.registry.apply_documents(documents),
                    Err(err) => {
                        self.finish(Busy::Filters);
                        self.report_error("Loading documents failed", &err);
                        self.run_queued_refresh(Busy::Documents);
                    }
                }
            }
            AppMessage::FilterOptionsLoaded(result) => {
                self.finish(Busy::Filters);
                match result {
                    Ok(options) => self.registry.apply_filter_options(options),
                    Err(err) => self.report_error("Loading filters failed", &err),
                }
                // Documents and filters refresh together; rerun after both landed.
                self.run_queued_refresh(Busy::Documents);
            }
            AppMessage::UploadFinished(result) => {
                self.finish(Busy::Upload);
                match result {
                    Ok(upload) => {
                        self.set_status(upload.summary());
                        self.spawn_refresh_documents();
                    }
                    Err(err) => self.report_error("Upload failed", &err),
                }
            }
            AppMessage::DocumentDeleted { filename, result } => {
                self.finish(Busy::Delete);
                match result {
                    Ok(_) => self.set_status(format!("Deleted {}", filename)),
                    Err(err) => self.report_error(&format!("Deleting {} failed", filename), &err),
                }
                self.spawn_refresh_documents();
            }
            AppMessage::HealthChecked(report) => {
                self.finish(Busy::Health);
                if report.is_ok() {
                    self.set_status(report.message());
                } else {
                    self.set_error(report.message());
                }
            }
        }
        self.clamp_cursors();
    }

    fn handle_stream_update(&mut self, update: StreamUpdate) {
        if matches!(update, StreamUpdate::Event { .. }) {
            self.scroll_offset = 0;
        }
        if !self.orchestrator.apply_stream_update(update) {
            return;
        }
        match self.orchestrator.phase() {
            QueryPhase::Completed => self.set_status("Answer complete"),
            _ => self.set_error("Stream ended with an error"),
        }
        self.spawn_refresh_sessions();
    }

    /// Handle a bracketed paste.
    pub fn handle_paste(&mut self, text: &str) {
        if let Some(prompt) = self.prompt.as_mut() {
            prompt.input.insert_str(text);
        } else if self.tab == Tab::Chat && self.focus == Focus::Input {
            self.input.insert_str(text);
        }
        self.mark_dirty();
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.mark_dirty();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if ctrl && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }
        if self.confirm.is_some() {
            self.handle_confirm_key(key);
            return;
        }
        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }

        if ctrl {
            match key.code {
                KeyCode::Char('n') => self.create_session(),
                KeyCode::Char('l') => self.load_selected_session(),
                KeyCode::Char('d') => self.request_delete(),
                KeyCode::Char('r') => self.refresh_all(),
                KeyCode::Char('u') => self.prompt = Some(Prompt::new(PromptKind::Upload)),
                KeyCode::Char('b') => self.prompt = Some(Prompt::new(PromptKind::BatchUpload)),
                KeyCode::Char('t') => self.spawn_health_check(),
                KeyCode::Char('x') => self.clear_filters(),
                KeyCode::Char('s') => self.send_sync_query(),
                other => debug!("Unbound key Ctrl+{:?}", other),
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                if self.is_streaming() {
                    self.cancel_stream();
                } else {
                    self.status = None;
                }
            }
            KeyCode::F(1) => self.switch_tab(Tab::Chat),
            KeyCode::F(2) => self.switch_tab(Tab::Documents),
            KeyCode::Tab => self.cycle_focus(),
            KeyCode::Enter if alt => self.send_sync_query(),
            KeyCode::PageUp => self.scroll_offset = self.scroll_offset.saturating_add(5),
            KeyCode::PageDown => self.scroll_offset = self.scroll_offset.saturating_sub(5),
            _ => match self.focus {
                Focus::Input => self.handle_input_key(key),
                _ => self.handle_list_key(key),
            },
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => self.accept_confirm(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.confirm = None,
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => return self.prompt = None,
            KeyCode::Enter => return self.submit_prompt(),
            _ => {}
        }
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Char(c) => prompt.input.insert_char(c),
            KeyCode::Backspace => prompt.input.backspace(),
            KeyCode::Delete => prompt.input.delete(),
            KeyCode::Left => prompt.input.move_left(),
            KeyCode::Right => prompt.input.move_right(),
            KeyCode::Home => prompt.input.move_home(),
            KeyCode::End => prompt.input.move_end(),
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.send_stream_query(),
            KeyCode::Char(c) => self.input.insert_char(c),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            KeyCode::Up => self.scroll_offset = self.scroll_offset.saturating_add(1),
            KeyCode::Down => self.scroll_offset = self.scroll_offset.saturating_sub(1),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        let len = match self.focus {
            Focus::Sessions => self.orchestrator.sessions().len(),
            Focus::SourceFiles => self.registry.filter_options().source_files.len(),
            Focus::FileTypes => self.registry.filter_options().file_types.len(),
            Focus::Documents => self.registry.documents().len(),
            Focus::Input => {
                warn!("List key routed to input focus");
                return;
            }
        };
        let cursor = match self.focus {
            Focus::Sessions => &mut self.session_cursor,
            Focus::SourceFiles => &mut self.source_cursor,
            Focus::FileTypes => &mut self.type_cursor,
            _ => &mut self.document_cursor,
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => *cursor = cursor.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                *cursor = (*cursor + 1).min(len.saturating_sub(1))
            }
            KeyCode::Home => *cursor = 0,
            KeyCode::End => *cursor = len.saturating_sub(1),
            KeyCode::Char(' ') => self.toggle_filter_under_cursor(),
            KeyCode::Enter => match self.focus {
                Focus::Sessions => self.load_selected_session(),
                Focus::SourceFiles | Focus::FileTypes => self.toggle_filter_under_cursor(),
                _ => {}
            },
            _ => {}
        }
    }
}
