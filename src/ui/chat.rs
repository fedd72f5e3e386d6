//! Chat tab: transcript and question input.

use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::panel_block;
use super::theme::{COLOR_ASSISTANT, COLOR_DIM, COLOR_ERROR, COLOR_USER};
use crate::app::{App, Focus};
use crate::models::{Role, Turn};
use crate::orchestrator::{Transcript, TranscriptEntry};

/// Cursor glyph appended to an answer that is still streaming
pub const STREAM_CURSOR: &str = "▌";

fn header(role: Role) -> Line<'static> {
    let color = match role {
        Role::User => COLOR_USER,
        Role::Assistant => COLOR_ASSISTANT,
    };
    Line::from(Span::styled(
        format!("{}:", role.label()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

fn body(text: &str) -> impl Iterator<Item = Line<'static>> + '_ {
    text.lines().map(|l| Line::from(l.to_string()))
}

fn push_turn(lines: &mut Vec<Line<'static>>, turn: &Turn) {
    lines.push(header(turn.role));
    lines.extend(body(&turn.content));
    lines.push(Line::default());
}

/// Build the transcript as styled lines, oldest first.
pub fn transcript_lines(transcript: &Transcript) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for entry in transcript.entries() {
        match entry {
            TranscriptEntry::Turn(turn) => push_turn(&mut lines, turn),
            TranscriptEntry::Streaming(text) => {
                lines.push(header(Role::Assistant));
                let mut body: Vec<Line<'static>> = body(text).collect();
                match body.last_mut() {
                    Some(last) if !text.ends_with('\n') => {
                        last.spans.push(Span::raw(STREAM_CURSOR))
                    }
                    _ => body.push(Line::from(STREAM_CURSOR)),
                }
                lines.extend(body);
                lines.push(Line::default());
            }
            TranscriptEntry::Pending { question } => {
                push_turn(&mut lines, &Turn::user(question.clone()));
                lines.push(header(Role::Assistant));
                lines.push(Line::from(Span::styled(
                    "thinking...",
                    Style::default().fg(COLOR_DIM).add_modifier(Modifier::ITALIC),
                )));
                lines.push(Line::default());
            }
            TranscriptEntry::Error(message) => {
                lines.push(Line::from(Span::styled(
                    format!("! {}", message),
                    Style::default().fg(COLOR_ERROR),
                )));
                lines.push(Line::default());
            }
        }
    }
    lines
}

/// Estimate the number of visual lines after wrapping at `width` columns.
pub fn wrapped_height(lines: &[Line], width: usize) -> usize {
    if width == 0 {
        return lines.len();
    }
    lines
        .iter()
        .map(|line| {
            let w: usize = line.spans.iter().map(|s| s.content.width()).sum();
            w.div_ceil(width).max(1)
        })
        .sum()
}

pub fn render_transcript(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(" Chat | session {} ", app.orchestrator.session_id());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_DIM))
        .title(title);
    let inner = block.inner(area);

    let lines = if app.orchestrator.transcript().is_empty() {
        vec![Line::from(Span::styled(
            "Ask a question about your documents. Enter streams, Ctrl+S waits for the full answer.",
            Style::default().fg(COLOR_DIM),
        ))]
    } else {
        transcript_lines(app.orchestrator.transcript())
    };

    let total = wrapped_height(&lines, inner.width as usize);
    let bottom = total.saturating_sub(inner.height as usize);
    let top = bottom.saturating_sub(app.scroll_offset as usize);
    let top = u16::try_from(top).unwrap_or(u16::MAX);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((top, 0));
    frame.render_widget(paragraph, area);
}

pub fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Input && app.prompt.is_none() && app.confirm.is_none();
    let title = if app.can_send() {
        " Question "
    } else {
        " Question (waiting for answer) "
    };
    let block = panel_block(title, focused);
    let inner = block.inner(area);

    // Keep the cursor visible on long input.
    let column = app.input.cursor_column() as u16;
    let skip = column.saturating_sub(inner.width.saturating_sub(1));
    let paragraph = Paragraph::new(app.input.as_str())
        .block(block)
        .scroll((0, skip));
    frame.render_widget(paragraph, area);

    if focused {
        frame.set_cursor_position(Position::new(inner.x + column - skip, inner.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_streaming_entry_shows_cursor() {
        let mut transcript = Transcript::new();
        transcript.push_turn(Turn::user("What is RAG?"));
        transcript.begin_assistant();
        transcript.append_token("Retrieval");

        let lines = text(&transcript_lines(&transcript));
        assert_eq!(
            lines,
            vec!["You:", "What is RAG?", "", "Assistant:", "Retrieval▌", ""]
        );
    }

    #[test]
    fn test_pending_entry_shows_thinking() {
        let mut transcript = Transcript::new();
        transcript.push_pending("Q");
        let lines = text(&transcript_lines(&transcript));
        assert!(lines.contains(&"thinking...".to_string()));
        assert_eq!(lines[1], "Q");
    }

    #[test]
    fn test_error_entry() {
        let mut transcript = Transcript::new();
        transcript.push_error("Stream cancelled");
        assert_eq!(text(&transcript_lines(&transcript))[0], "! Stream cancelled");
    }

    #[test]
    fn test_wrapped_height() {
        let lines = vec![Line::from("abcdefghij"), Line::default(), Line::from("abc")];
        assert_eq!(wrapped_height(&lines, 4), 3 + 1 + 1);
        assert_eq!(wrapped_height(&lines, 0), 3);
    }
}
