//! UI rendering for ragdesk
//!
//! Layout:
//! - Top: tab bar (Chat / Documents) and backend URL
//! - Chat tab: transcript and question input on the left; sessions,
//!   filters and citations on the right
//! - Documents tab: document table
//! - Bottom: status line with busy indicator and key hints

mod chat;
mod dialog;
mod documents;
mod panels;
mod theme;

pub use chat::{transcript_lines, wrapped_height, STREAM_CURSOR};
pub use dialog::centered_rect;
pub use panels::citation_lines;
pub use theme::*;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Tab};

/// Bordered panel whose border is highlighted when focused.
pub(crate) fn panel_block(title: &str, focused: bool) -> Block<'static> {
    let color = if focused { COLOR_FOCUS } else { COLOR_BORDER };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title.to_string())
}

/// Render the whole screen.
pub fn render(frame: &mut Frame, app: &App) {
    let [tabs, body, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_tab_bar(frame, tabs, app);
    match app.tab {
        Tab::Chat => render_chat_tab(frame, body, app),
        Tab::Documents => documents::render_documents(frame, body, app),
    }
    render_status_bar(frame, status, app);

    if let Some(prompt) = &app.prompt {
        dialog::render_prompt(frame, prompt);
    }
    if let Some(confirm) = &app.confirm {
        dialog::render_confirm(frame, confirm);
    }
}

fn render_tab_bar(frame: &mut Frame, area: Rect, app: &App) {
    let tab = |label: &'static str, active: bool| {
        if active {
            Span::styled(
                label,
                Style::default()
                    .fg(COLOR_ACCENT)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED),
            )
        } else {
            Span::styled(label, Style::default().fg(COLOR_DIM))
        }
    };
    let line = Line::from(vec![
        Span::styled(" ragdesk ", Style::default().add_modifier(Modifier::BOLD)),
        tab(" F1 Chat ", app.tab == Tab::Chat),
        Span::raw(" "),
        tab(" F2 Documents ", app.tab == Tab::Documents),
        Span::styled(
            format!("  {}", app.client().base_url()),
            Style::default().fg(COLOR_DIM),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_chat_tab(frame: &mut Frame, area: Rect, app: &App) {
    let [left, right] =
        Layout::horizontal([Constraint::Fill(3), Constraint::Fill(2)]).areas(area);
    let [transcript, input] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(left);
    let [sessions, sources, types, citations] = Layout::vertical([
        Constraint::Percentage(30),
        Constraint::Percentage(20),
        Constraint::Percentage(15),
        Constraint::Fill(1),
    ])
    .areas(right);

    chat::render_transcript(frame, transcript, app);
    chat::render_input(frame, input, app);
    panels::render_sessions(frame, sessions, app);
    panels::render_source_filters(frame, sources, app);
    panels::render_type_filters(frame, types, app);
    panels::render_citations(frame, citations, app);
}

/// Busy indicator text, e.g. `/ streaming, sessions`.
pub fn busy_indicator(app: &App) -> Option<String> {
    let mut labels: Vec<&str> = app.busy.iter().map(|b| b.label()).collect();
    labels.sort_unstable();
    if app.is_streaming() {
        labels.insert(0, "streaming");
    }
    if labels.is_empty() {
        return None;
    }
    let frame = SPINNER_FRAMES[(app.tick_count / 4) as usize % SPINNER_FRAMES.len()];
    Some(format!("{} {}", frame, labels.join(", ")))
}

fn key_hints(app: &App) -> &'static str {
    if app.is_streaming() {
        "Esc cancel  Ctrl+C quit"
    } else {
        match app.tab {
            Tab::Chat => "Enter stream  Ctrl+S sync  Tab focus  Space toggle  Ctrl+N/L/D session  Ctrl+X clear  Ctrl+T test  Ctrl+C quit",
            Tab::Documents => "Ctrl+U upload  Ctrl+B batch  Ctrl+D delete  Ctrl+R refresh  Ctrl+C quit",
        }
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    if let Some(busy) = busy_indicator(app) {
        spans.push(Span::styled(
            format!("{}  ", busy),
            Style::default().fg(COLOR_ACTIVE),
        ));
    }
    match &app.status {
        Some(status) => {
            let color = match (status.is_error, status.retryable) {
                (false, _) => COLOR_ACCENT,
                (true, true) => COLOR_RETRYABLE,
                (true, false) => COLOR_ERROR,
            };
            spans.push(Span::styled(status.text.clone(), Style::default().fg(color)));
            if let Some(hint) = status.hint {
                spans.push(Span::styled(
                    format!("  ({})", hint),
                    Style::default().fg(COLOR_DIM),
                ));
            }
        }
        None => spans.push(Span::styled(key_hints(app), Style::default().fg(COLOR_DIM))),
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockHttpClient;
    use crate::app::Busy;
    use crate::client::RagClient;
    use crate::models::{Document, FilterOptions};
    use crate::startup::ClientConfig;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn app() -> App {
        let config = ClientConfig::new().with_base_url("http://rag.test/api");
        let client = RagClient::new(Arc::new(MockHttpClient::new()), &config);
        App::new(client, "session-1")
    }

    fn screen(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..height {
            for x in 0..width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_chat_tab_renders_panels() {
        let app = app();
        let text = screen(&app, 140, 40);
        assert!(text.contains("F1 Chat"));
        assert!(text.contains("session session-1"));
        assert!(text.contains("Sessions"));
        assert!(text.contains("Source files"));
        assert!(text.contains("No citations"));
    }

    #[test]
    fn test_documents_tab_renders_rows() {
        let mut app = app();
        app.registry.apply_documents(vec![Document {
            id: "7".to_string(),
            filename: "guide.pdf".to_string(),
            full_path: "/data/guide.pdf".to_string(),
            chunk_count: 12,
        }]);
        app.switch_tab(Tab::Documents);
        let text = screen(&app, 120, 20);
        assert!(text.contains("Filename"));
        assert!(text.contains("guide.pdf"));
        assert!(text.contains("/data/guide.pdf"));
    }

    #[test]
    fn test_selected_filter_is_marked() {
        let mut app = app();
        app.registry.apply_filter_options(FilterOptions {
            source_files: vec!["a.pdf".to_string()],
            file_types: vec!["pdf".to_string()],
        });
        app.registry.selection_mut().toggle_file_type("pdf");
        let text = screen(&app, 140, 40);
        assert!(text.contains("[ ] a.pdf"));
        assert!(text.contains("[x] pdf"));
    }

    #[test]
    fn test_busy_indicator_lists_operations() {
        let mut app = app();
        assert_eq!(busy_indicator(&app), None);
        app.busy.insert(Busy::Upload);
        app.busy.insert(Busy::Documents);
        let text = busy_indicator(&app).unwrap();
        assert!(text.ends_with("documents, upload"));
    }

    #[test]
    fn test_error_status_shows_recovery_hint() {
        let mut app = app();
        app.status = Some(crate::app::StatusLine {
            hint: Some("Check that the backend is running and reachable"),
            retryable: true,
            ..crate::app::StatusLine::error("Loading sessions failed: refused")
        });
        let text = screen(&app, 140, 10);
        assert!(text.contains("Loading sessions failed: refused"));
        assert!(text.contains("(Check that the backend is running and reachable)"));
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let mut app = app();
        app.prompt = Some(crate::app::Prompt::new(crate::app::PromptKind::Upload));
        screen(&app, 20, 6);
    }
}
