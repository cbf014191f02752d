//! Backtest error table shown under each model chart.

use ratatui::layout::Constraint;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};

use crate::pipeline::{ErrorReport, Metric, MetricValue};

/// Format a metric value for display.
pub fn format_metric(value: MetricValue) -> String {
    match value {
        MetricValue::Value(v) => format!("{v:.2}"),
        MetricValue::Undefined => "undefined".to_string(),
    }
}

/// Build the six-metric table for one backtest report.
pub fn error_table(report: &ErrorReport) -> Table<'static> {
    let header = Row::new(
        Metric::ALL
            .iter()
            .map(|m| Cell::from(m.as_str().to_uppercase()))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let values = Row::new(
        Metric::ALL
            .iter()
            .map(|m| {
                let value = report.get(*m);
                let style = match value {
                    MetricValue::Value(_) => Style::default(),
                    MetricValue::Undefined => Style::default().fg(Color::DarkGray),
                };
                Cell::from(format_metric(value)).style(style)
            })
            .collect::<Vec<_>>(),
    );

    Table::new(
        vec![header, values],
        [Constraint::Ratio(1, 6); 6],
    )
    .block(Block::default().title("Backtest").borders(Borders::ALL))
}
