//! Humidity, temperature and EC charts for the selected device.

use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use sensorlog_store::StoredReading;

use super::{BORDER_TYPE, MUTED};
use crate::tui::app::App;

/// Timestamp layout on the x axis.
const AXIS_TIME_FORMAT: &str = "%H:%M:%S";

struct Metric {
    title: &'static str,
    color: Color,
    value: fn(&StoredReading) -> f64,
}

fn humidity(r: &StoredReading) -> f64 {
    r.humidity
}

fn temperature(r: &StoredReading) -> f64 {
    r.temperature
}

fn ec(r: &StoredReading) -> f64 {
    r.ec
}

const METRICS: [Metric; 3] = [
    Metric {
        title: "Humidity (%)",
        color: Color::Cyan,
        value: humidity,
    },
    Metric {
        title: "Temperature (°C)",
        color: Color::Yellow,
        value: temperature,
    },
    Metric {
        title: "EC (µS/cm)",
        color: Color::Magenta,
        value: ec,
    },
];

pub(super) fn draw_graphs(frame: &mut Frame, area: Rect, app: &App) {
    let Some(device_id) = app.selected_device_id() else {
        let empty = Paragraph::new("No readings yet. Waiting for data on the serial line...")
            .style(Style::default().fg(MUTED))
            .alignment(Alignment::Center)
            .block(panel(" Graphs ".to_string()));
        frame.render_widget(empty, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (metric, row) in METRICS.iter().zip(rows.iter()) {
        draw_metric_chart(frame, *row, device_id, metric, &app.recent);
    }
}

fn draw_metric_chart(
    frame: &mut Frame,
    area: Rect,
    device_id: i64,
    metric: &Metric,
    readings: &[StoredReading],
) {
    // Non-finite values stay in the tables but leave a gap in the line
    let points: Vec<(f64, f64)> = readings
        .iter()
        .enumerate()
        .map(|(i, r)| (i as f64, (metric.value)(r)))
        .filter(|(_, y)| y.is_finite())
        .collect();

    let [y_min, y_max] = value_bounds(points.iter().map(|(_, y)| *y));
    let x_max = readings.len().saturating_sub(1).max(1) as f64;

    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(metric.color))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(panel(format!(" {} - device {} ", metric.title, device_id)))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(MUTED))
                .bounds([0.0, x_max])
                .labels(time_labels(readings)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(MUTED))
                .bounds([y_min, y_max])
                .labels(vec![format!("{:.1}", y_min), format!("{:.1}", y_max)]),
        );

    frame.render_widget(chart, area);
}

fn panel(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BORDER_TYPE)
        .border_style(Style::default().fg(MUTED))
        .title(title)
}

/// Y range covering every finite value, padded so flat series stay visible.
pub(crate) fn value_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let pad = ((max - min) * 0.1).max(0.5);
    [min - pad, max + pad]
}

/// First, middle and last timestamps of the window.
pub(crate) fn time_labels(readings: &[StoredReading]) -> Vec<String> {
    let label = |r: &StoredReading| r.timestamp.format(AXIS_TIME_FORMAT).to_string();
    match readings {
        [] => Vec::new(),
        [only] => vec![label(only)],
        [first, last] => vec![label(first), label(last)],
        [first, .., last] => vec![
            label(first),
            label(&readings[readings.len() / 2]),
            label(last),
        ],
    }
}
