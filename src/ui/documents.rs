//! Documents tab.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Row, Table, TableState},
    Frame,
};

use super::panel_block;
use super::theme::{COLOR_ACCENT, COLOR_DIM};
use crate::app::{App, Busy, Focus};
use crate::models::Document;

const HEADER: [&str; 4] = ["ID", "Filename", "Path", "Chunks"];

fn document_row(doc: &Document) -> Row<'static> {
    Row::new(vec![
        doc.id.clone(),
        doc.filename.clone(),
        doc.full_path.clone(),
        doc.chunk_count.to_string(),
    ])
}

pub fn render_documents(frame: &mut Frame, area: Rect, app: &App) {
    let documents = app.registry.documents();
    let title = if app.is_busy(Busy::Documents) {
        " Documents (loading) ".to_string()
    } else {
        format!(" Documents ({}) ", documents.len())
    };

    let table = Table::new(
        documents.iter().map(document_row),
        [
            Constraint::Length(8),
            Constraint::Percentage(30),
            Constraint::Fill(1),
            Constraint::Length(7),
        ],
    )
    .header(
        Row::new(HEADER)
            .style(Style::default().fg(COLOR_DIM).add_modifier(Modifier::BOLD)),
    )
    .block(panel_block(&title, app.focus == Focus::Documents))
    .row_highlight_style(
        Style::default()
            .fg(COLOR_ACCENT)
            .add_modifier(Modifier::REVERSED),
    );

    let mut state = TableState::default();
    if !documents.is_empty() {
        state.select(Some(app.document_cursor));
    }
    frame.render_stateful_widget(table, area, &mut state);
}
