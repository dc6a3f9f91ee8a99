//! Device list and tabular views.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table};
use sensorlog_store::format_timestamp;

use super::{BORDER_TYPE, MUTED, PRIMARY};
use crate::tui::app::App;

fn panel(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(Style::default().fg(MUTED))
        .title(title)
}

fn header_row<'a>(titles: &[&'a str]) -> Row<'a> {
    Row::new(titles.iter().map(|t| Cell::from(*t)))
        .style(Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD))
}

fn reading_cells<'a>(device_id: i64, humidity: f64, temperature: f64, ec: f64) -> Vec<Cell<'a>> {
    vec![
        Cell::from(device_id.to_string()),
        Cell::from(format!("{:.1}", humidity)),
        Cell::from(format!("{:.1}", temperature)),
        Cell::from(format!("{:.2}", ec)),
    ]
}

/// Draw the device list panel.
pub(super) fn draw_device_list(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .devices
        .iter()
        .map(|id| ListItem::new(format!("device {}", id)))
        .collect();

    let list = List::new(items)
        .block(panel(format!(" Devices ({}) ", app.devices.len())))
        .highlight_style(Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.devices.is_empty() {
        state.select(Some(app.selected_device));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Stored rows newest first, from the current scroll position.
pub(super) fn draw_database_table(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(" Database - {} rows ", app.row_count);
    if app.rows.is_empty() {
        let empty = Paragraph::new("No readings yet.")
            .style(Style::default().fg(MUTED))
            .alignment(Alignment::Center)
            .block(panel(title));
        frame.render_widget(empty, area);
        return;
    }

    // Border and header take three lines
    let visible = area.height.saturating_sub(3) as usize;
    let rows = app
        .rows
        .iter()
        .take(visible)
        .map(|r| {
            let mut cells = reading_cells(r.device_id, r.humidity, r.temperature, r.ec);
            cells.push(Cell::from(format_timestamp(&r.timestamp)));
            Row::new(cells)
        });

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Min(19),
        ],
    )
    .header(header_row(&["Device", "Humidity", "Temperature", "EC", "Timestamp"]))
    .block(panel(title));
    frame.render_widget(table, area);
}

/// The recent window of the selected device, oldest first.
pub(super) fn draw_device_table(frame: &mut Frame, area: Rect, app: &App) {
    let Some(device_id) = app.selected_device_id() else {
        let empty = Paragraph::new("No readings yet.")
            .style(Style::default().fg(MUTED))
            .alignment(Alignment::Center)
            .block(panel(" By device ".to_string()));
        frame.render_widget(empty, area);
        return;
    };

    let rows = app.recent.iter().map(|r| {
        let mut cells = vec![Cell::from(r.id.to_string())];
        cells.extend(reading_cells(r.device_id, r.humidity, r.temperature, r.ec));
        cells.push(Cell::from(format_timestamp(&r.timestamp)));
        Row::new(cells)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Min(19),
        ],
    )
    .header(header_row(&["ID", "Device", "Humidity", "Temperature", "EC", "Timestamp"]))
    .block(panel(format!(
        " Device {} - last {} readings ",
        device_id, app.window
    )));
    frame.render_widget(table, area);
}
