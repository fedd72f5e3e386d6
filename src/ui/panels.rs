//! Side panels of the chat tab: sessions, filters, citations.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::panel_block;
use super::theme::{COLOR_ACCENT, COLOR_DIM, COLOR_SELECTED};
use crate::app::{App, Busy, Focus};
use crate::models::Citation;

fn highlight() -> Style {
    Style::default()
        .fg(COLOR_ACCENT)
        .add_modifier(Modifier::REVERSED)
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: Vec<ListItem<'static>>,
    cursor: usize,
    focused: bool,
) {
    let empty = items.is_empty();
    let list = List::new(items)
        .block(panel_block(title, focused))
        .highlight_style(highlight());
    let mut state = ListState::default();
    if focused && !empty {
        state.select(Some(cursor));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

pub fn render_sessions(frame: &mut Frame, area: Rect, app: &App) {
    let current = app.orchestrator.session_id();
    let items = app
        .orchestrator
        .sessions()
        .iter()
        .map(|s| {
            let marker = if s.session_id == current { "* " } else { "  " };
            let mut spans = vec![Span::raw(format!("{}{}", marker, s.row_label()))];
            if let Some(updated) = s.updated_label() {
                spans.push(Span::styled(
                    format!(" | {}", updated),
                    Style::default().fg(COLOR_DIM),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    let title = if app.is_busy(Busy::Sessions) {
        " Sessions (loading) "
    } else {
        " Sessions "
    };
    render_list(
        frame,
        area,
        title,
        items,
        app.session_cursor,
        app.focus == Focus::Sessions,
    );
}

fn filter_items(values: Vec<&str>, is_selected: impl Fn(&str) -> bool) -> Vec<ListItem<'static>> {
    values
        .into_iter()
        .map(|value| {
            if is_selected(value) {
                ListItem::new(Line::from(Span::styled(
                    format!("[x] {}", value),
                    Style::default().fg(COLOR_SELECTED),
                )))
            } else {
                ListItem::new(format!("[ ] {}", value))
            }
        })
        .collect()
}

pub fn render_source_filters(frame: &mut Frame, area: Rect, app: &App) {
    let selection = app.registry.selection();
    let items = filter_items(app.source_file_options(), |v| {
        selection.is_source_file_selected(v)
    });
    render_list(
        frame,
        area,
        " Source files ",
        items,
        app.source_cursor,
        app.focus == Focus::SourceFiles,
    );
}

pub fn render_type_filters(frame: &mut Frame, area: Rect, app: &App) {
    let selection = app.registry.selection();
    let items = filter_items(app.file_type_options(), |v| selection.is_file_type_selected(v));
    render_list(
        frame,
        area,
        " File types ",
        items,
        app.type_cursor,
        app.focus == Focus::FileTypes,
    );
}

/// `[index] source` followed by the snippet, one block per citation.
pub fn citation_lines(citations: &[Citation]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for citation in citations {
        lines.push(Line::from(Span::styled(
            citation.label(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        let snippet = citation.snippet.trim();
        if !snippet.is_empty() {
            lines.push(Line::from(Span::styled(
                snippet.to_string(),
                Style::default().fg(COLOR_DIM),
            )));
        }
        lines.push(Line::default());
    }
    lines
}

pub fn render_citations(frame: &mut Frame, area: Rect, app: &App) {
    let citations = app.orchestrator.citations();
    let lines = if citations.is_empty() {
        vec![Line::from(Span::styled(
            "No citations",
            Style::default().fg(COLOR_DIM),
        ))]
    } else {
        citation_lines(citations)
    };
    let title = format!(" Citations ({}) ", citations.len());
    let paragraph = Paragraph::new(lines)
        .block(panel_block(&title, false))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
