//! Layout and rendering for the dashboard.
//!
//! - **Header**: title and the line source being logged
//! - **Tab bar**: Graphs, Database, By device
//! - **Main content**: device list (left) and the active tab's panel
//! - **Status bar**: ingest counters, errors and key hints

mod charts;
mod tables;

use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};

use super::app::{App, Tab};

pub(crate) const BORDER_TYPE: BorderType = BorderType::Rounded;
pub(crate) const PRIMARY: Color = Color::Cyan;
pub(crate) const MUTED: Color = Color::DarkGray;
pub(crate) const DANGER: Color = Color::Red;

/// Width of the device list sidebar.
const SIDEBAR_WIDTH: u16 = 16;

/// Draw the complete dashboard.
pub fn draw(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, main_layout[0], app);
    draw_tab_bar(frame, main_layout[1], app);

    let area = main_layout[2];
    match app.active_tab {
        Tab::Database => tables::draw_database_table(frame, area, app),
        Tab::Graphs | Tab::ByDevice => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
                .split(area);
            tables::draw_device_list(frame, columns[0], app);
            if app.active_tab == Tab::Graphs {
                charts::draw_graphs(frame, columns[1], app);
            } else {
                tables::draw_device_table(frame, columns[1], app);
            }
        }
    }

    draw_status_bar(frame, main_layout[3], app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        " Sensor Log ",
        Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
    )];
    if !app.source_label.is_empty() {
        spans.push(Span::styled(
            app.source_label.clone(),
            Style::default().fg(MUTED),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    let clock = Paragraph::new(Local::now().format("%H:%M:%S ").to_string())
        .alignment(Alignment::Right)
        .style(Style::default().fg(MUTED));
    frame.render_widget(clock, area);
}

fn draw_tab_bar(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| Line::from(format!(" {} ", tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.active_tab.index())
        .style(Style::default().fg(MUTED))
        .highlight_style(
            Style::default()
                .fg(PRIMARY)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BORDER_TYPE)
                .border_style(Style::default().fg(MUTED)),
        );
    frame.render_widget(tabs, area);
}

/// One-line summary of the ingest thread for the status bar.
pub(crate) fn ingest_status(app: &App) -> (String, Color) {
    if let Some(err) = &app.startup_error {
        return (format!("not logging: {}", err), DANGER);
    }
    let Some(stats) = &app.ingest else {
        return ("not logging".to_string(), MUTED);
    };

    let s = stats.snapshot();
    let counts = format!(
        "stored {} | skipped {} | rejected {}",
        s.stored, s.skipped, s.rejected
    );
    if stats.is_running() {
        (format!("logging | {}", counts), Color::Green)
    } else if let Some(err) = stats.last_error() {
        (format!("stopped: {} | {}", err, counts), DANGER)
    } else {
        (format!("stopped | {}", counts), MUTED)
    }
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let (ingest, color) = ingest_status(app);
    let mut spans = vec![Span::styled(format!(" {} ", ingest), Style::default().fg(color))];

    if let Some(msg) = app.current_status_message() {
        spans.push(Span::styled(format!("| {}", msg), Style::default().fg(PRIMARY)));
    } else {
        let hints = [("Tab", "tab"), ("j/k", "device"), ("r", "refresh"), ("c", "clear"), ("q", "quit")];
        spans.push(Span::styled("|", Style::default().fg(MUTED)));
        for (key, desc) in hints {
            spans.push(Span::styled(
                format!(" {}", key),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(format!(" {}", desc), Style::default().fg(MUTED)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use sensorlog_store::Store;
    use std::time::Duration;

    fn render(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app_with_data() -> App {
        let store = Store::open_in_memory().unwrap();
        store.insert(&["18", "55.2", "23.1", "1.8"]).unwrap();
        store.insert(&["18", "56.0", "23.4", "1.7"]).unwrap();
        store.insert(&["42", "40.0", "19.5", "0.9"]).unwrap();
        let mut app = App::new(store, 15, Duration::from_secs(1));
        app.refresh();
        app
    }

    #[test]
    fn test_render_graphs_tab() {
        let screen = render(&app_with_data());
        assert!(screen.contains("Graphs"));
        assert!(screen.contains("Humidity"));
        assert!(screen.contains("Temperature"));
        assert!(screen.contains("EC"));
        assert!(screen.contains("42"));
    }

    #[test]
    fn test_render_database_tab() {
        let mut app = app_with_data();
        app.next_tab();
        let screen = render(&app);
        assert!(screen.contains("40.0"));
        assert!(screen.contains("3 rows"));
    }

    #[test]
    fn test_render_by_device_tab() {
        let mut app = app_with_data();
        app.previous_tab();
        let screen = render(&app);
        assert!(screen.contains("56.0"));
        assert!(!screen.contains("40.0"));
    }

    #[test]
    fn test_render_with_nan_measurement() {
        let store = Store::open_in_memory().unwrap();
        store.insert(&["18", "55.2", "23.1", "1.8"]).unwrap();
        store.insert(&["18", "nan", "23.4", "inf"]).unwrap();
        let mut app = App::new(store, 15, Duration::from_secs(1));
        app.refresh();

        let screen = render(&app);
        assert!(screen.contains("Humidity"));

        app.previous_tab();
        let screen = render(&app);
        assert!(screen.contains("NaN"));
        assert!(screen.contains("23.4"));
    }

    #[test]
    fn test_render_empty_store() {
        let mut app = App::new(Store::open_in_memory().unwrap(), 15, Duration::from_secs(1));
        app.refresh();
        let screen = render(&app);
        assert!(screen.contains("No readings yet"));
        assert!(screen.contains("not logging"));
    }

    #[test]
    fn test_startup_error_in_status() {
        let mut app = App::new(Store::open_in_memory().unwrap(), 15, Duration::from_secs(1));
        app.startup_error = Some("no such port".to_string());
        let (text, color) = ingest_status(&app);
        assert_eq!(text, "not logging: no such port");
        assert_eq!(color, DANGER);
    }
}
