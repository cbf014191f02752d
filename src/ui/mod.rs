//! Terminal user interface for the forecasting dashboard.

pub mod app;
pub mod chart;
pub mod layout;
pub mod table;
pub mod view;

pub use app::{App, Background};
pub use layout::LayoutMode;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use crate::ui::chart::forecast_chart;
use crate::ui::layout::panel_layout;
use crate::ui::table::error_table;
use crate::ui::view::PanelView;

const SIDEBAR_WIDTH: u16 = 36;

/// Render the whole dashboard.
pub fn draw(frame: &mut Frame, app: &App) {
    let outer = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(frame.size());

    draw_sidebar(frame, app, outer[0]);
    draw_body(frame, app, outer[1]);
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let city = app.city();
    let series_len = app.series.as_ref().map(|s| s.len()).unwrap_or(0);

    let mut lines = vec![
        Line::from(format!("Display Mode: {}  (m)", app.layout_mode.name())),
        Line::from(format!("Background: {}  (b)", app.background.name())),
        Line::from(""),
        Line::from(vec![
            Span::raw("City: "),
            Span::styled(
                city.display_name(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  (Up/Down)"),
        ]),
        Line::from(format!(
            "  lat {:.2}  lon {:.2}",
            city.latitude, city.longitude
        )),
        Line::from(""),
        Line::from(format!(
            "Months to use for forecast: {}  (Left/Right)",
            app.keep
        )),
        Line::from(format!("Additional months to forecast: {}  ([ ])", app.extra)),
    ];

    if let Some(outcome) = &app.outcome {
        lines.push(Line::from(format!(
            "  train {}% / test {}%, horizon {}",
            outcome.plan.train_percent, outcome.plan.test_percent, outcome.plan.horizon
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "Source Data [{}]  (s)",
        if app.show_source { "-" } else { "+" }
    )));
    if app.show_source {
        if let Some(series) = &app.series {
            lines.push(Line::from(format!("  {series_len} monthly rows")));
            for (ts, value) in series
                .timestamps()
                .iter()
                .zip(series.values())
                .take(12)
            {
                lines.push(Line::from(format!(
                    "  {}  {value:.2}",
                    ts.format("%Y-%m")
                )));
            }
            if series_len > 12 {
                lines.push(Line::from("  ..."));
            }
        }
    }

    if let Some(status) = &app.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "q: quit",
        Style::default().fg(Color::DarkGray),
    )));

    let sidebar = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("etcast")
                .borders(Borders::ALL)
                .style(Style::default().bg(app.background.color())),
        );
    frame.render_widget(sidebar, area);
}

fn draw_body(frame: &mut Frame, app: &App, area: Rect) {
    if app.views.is_empty() {
        let message = app
            .status
            .clone()
            .unwrap_or_else(|| "Loading...".to_string());
        let placeholder = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(placeholder, area);
        return;
    }

    let layout = panel_layout(app.layout_mode, area);

    if let Some(tab_area) = layout.tab_bar {
        let titles: Vec<Line> = app.views.iter().map(|v| Line::from(v.title.clone())).collect();
        let tabs = Tabs::new(titles)
            .select(app.active_tab)
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(tabs, tab_area);

        if let Some(view) = app.views.get(app.active_tab) {
            draw_panel(frame, app, view, layout.panels[app.active_tab]);
        }
        return;
    }

    for (view, region) in app.views.iter().zip(layout.panels) {
        draw_panel(frame, app, view, region);
    }
}

fn draw_panel(frame: &mut Frame, app: &App, view: &PanelView, area: Rect) {
    let (chart_area, table_area) = if view.report.is_some() && area.height > 12 {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(4)])
            .split(area);
        (rows[0], Some(rows[1]))
    } else {
        (area, None)
    };

    match &view.chart {
        Ok(data) => {
            frame.render_widget(
                forecast_chart(data, &view.title, app.background.color()),
                chart_area,
            );
        }
        Err(err) => {
            let message = Paragraph::new(err.to_string())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .title(view.title.clone())
                        .borders(Borders::ALL),
                );
            frame.render_widget(message, chart_area);
        }
    }

    if let Some(table_area) = table_area {
        match &view.report {
            Some(Ok(report)) => frame.render_widget(error_table(report), table_area),
            Some(Err(err)) => {
                let message = Paragraph::new(err.to_string())
                    .style(Style::default().fg(Color::Red))
                    .block(Block::default().title("Backtest").borders(Borders::ALL));
                frame.render_widget(message, table_area);
            }
            None => {}
        }
    }
}
