//! Forecast chart construction.

use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType};

use crate::ui::view::ChartData;

/// Build the chart for one panel: training actuals, held-out actuals,
/// the forecast line and its interval band.
pub fn forecast_chart<'a>(data: &'a ChartData, title: &'a str, background: Color) -> Chart<'a> {
    let mut datasets = vec![
        Dataset::default()
            .name("Lower 80%")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&data.lower),
        Dataset::default()
            .name("Upper 80%")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&data.upper),
        Dataset::default()
            .name("Forecast")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&data.forecast),
        Dataset::default()
            .name("Observed")
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Green))
            .data(&data.actual_train),
    ];
    // Held-out actuals only exist when some months were not kept.
    if !data.actual_held.is_empty() {
        datasets.push(
            Dataset::default()
                .name("Held out")
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Red))
                .data(&data.actual_held),
        );
    }

    let x_labels: Vec<Span> = data.x_labels.iter().map(|l| Span::raw(l.as_str())).collect();
    let y_labels: Vec<Span> = data.y_labels.iter().map(|l| Span::raw(l.as_str())).collect();

    Chart::new(datasets)
        .block(
            Block::default()
                .title(Span::styled(
                    title,
                    Style::default().add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .style(Style::default().bg(background)),
        )
        .x_axis(
            Axis::default()
                .title("Month")
                .style(Style::default().fg(Color::Gray))
                .bounds(data.x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("ET")
                .style(Style::default().fg(Color::Gray))
                .bounds(data.y_bounds)
                .labels(y_labels),
        )
}
