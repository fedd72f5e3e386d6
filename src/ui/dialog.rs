//! Modal dialogs: path prompt and confirmation.

use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use super::theme::{COLOR_ACCENT, COLOR_DIM};
use crate::app::{Confirm, Prompt};

/// Centered rectangle of `width` x `height`, clipped to `area`.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn dialog_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(COLOR_ACCENT))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().add_modifier(Modifier::BOLD),
        ))
}

pub fn render_prompt(frame: &mut Frame, prompt: &Prompt) {
    let area = centered_rect(frame.area(), 70, 5);
    frame.render_widget(Clear, area);
    let block = dialog_block(prompt.kind.title());
    let inner = block.inner(area);

    let column = prompt.input.cursor_column() as u16;
    let skip = column.saturating_sub(inner.width.saturating_sub(1));
    let lines = vec![
        Line::from(prompt.input.as_str().to_string()),
        Line::from(Span::styled(
            "Enter to upload, Esc to cancel",
            Style::default().fg(COLOR_DIM),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).block(block).scroll((0, skip)), area);
    frame.set_cursor_position(Position::new(inner.x + column - skip, inner.y));
}

pub fn render_confirm(frame: &mut Frame, confirm: &Confirm) {
    let question = confirm.question();
    let width = (question.chars().count() as u16).saturating_add(6).max(30);
    let area = centered_rect(frame.area(), width, 5);
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from(question),
        Line::from(Span::styled("y: yes   n/Esc: no", Style::default().fg(COLOR_DIM))),
    ];
    frame.render_widget(Paragraph::new(lines).block(dialog_block("Confirm")), area);
}
