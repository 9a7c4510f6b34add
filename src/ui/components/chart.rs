use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
};

use crate::distribution::{DistributionPoint, Species};

pub const ACID_COLOR: Color = Color::Rgb(31, 119, 180);
pub const BASE_COLOR: Color = Color::Rgb(255, 127, 14);

const PERCENT_TICKS: [&str; 6] = ["0", "20", "40", "60", "80", "100"];

/// Owned series data for drawing the diagram in the terminal.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub acid: Vec<(f64, f64)>,
    pub base: Vec<(f64, f64)>,
    pub bounds: (f64, f64),
}

/// Render the acid/base curves with an optional vertical cursor at `cursor`.
pub fn render_distribution_chart(
    frame: &mut Frame<'_>,
    area: Rect,
    data: &ChartData,
    species: &Species,
    cursor: Option<&DistributionPoint>,
) {
    let cursor_line: Vec<(f64, f64)> = cursor
        .map(|point| vec![(point.ph, 0.0), (point.ph, 100.0)])
        .unwrap_or_default();

    let mut datasets = vec![
        Dataset::default()
            .name(species.acid.clone())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(ACID_COLOR))
            .data(&data.acid),
        Dataset::default()
            .name(species.base.clone())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(BASE_COLOR))
            .data(&data.base),
    ];
    if !cursor_line.is_empty() {
        datasets.push(
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Yellow))
                .data(&cursor_line),
        );
    }

    let (min, max) = data.bounds;
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(species.chart_title()),
        )
        .x_axis(
            Axis::default()
                .title("pH")
                .style(Style::default().fg(Color::Gray))
                .bounds([min, max])
                .labels(ph_labels(min, max)),
        )
        .y_axis(
            Axis::default()
                .title("% species")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, 100.0])
                .labels(PERCENT_TICKS.iter().map(|tick| Span::raw(*tick)).collect()),
        );
    frame.render_widget(chart, area);
}

fn ph_labels(min: f64, max: f64) -> Vec<Span<'static>> {
    let mid = (min + max) / 2.0;
    [min, (min + mid) / 2.0, mid, (mid + max) / 2.0, max]
        .iter()
        .map(|value| Span::raw(format!("{value:.1}")))
        .collect()
}
