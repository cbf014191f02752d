//! Display mode handling and panel geometry.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// How the four forecast panels are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Panels in a two-by-two grid.
    #[default]
    TwoColumn,
    /// One panel at a time behind a tab bar.
    Tabbed,
    /// Panels stacked at full width.
    FullPage,
}

impl LayoutMode {
    pub fn all() -> [LayoutMode; 3] {
        [LayoutMode::TwoColumn, LayoutMode::Tabbed, LayoutMode::FullPage]
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayoutMode::TwoColumn => "Two Column",
            LayoutMode::Tabbed => "Tabbed",
            LayoutMode::FullPage => "Full Page",
        }
    }

    pub fn next(&self) -> LayoutMode {
        match self {
            LayoutMode::TwoColumn => LayoutMode::Tabbed,
            LayoutMode::Tabbed => LayoutMode::FullPage,
            LayoutMode::FullPage => LayoutMode::TwoColumn,
        }
    }
}

/// Resolved panel geometry for one frame.
#[derive(Debug, Clone)]
pub struct PanelLayout {
    /// Tab bar row, present only in tabbed mode.
    pub tab_bar: Option<Rect>,
    /// One region per panel. In tabbed mode all four share the body and
    /// only the active panel is drawn.
    pub panels: [Rect; 4],
}

/// Compute panel regions for the given mode within `area`.
pub fn panel_layout(mode: LayoutMode, area: Rect) -> PanelLayout {
    match mode {
        LayoutMode::TwoColumn => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(area);
            let left = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(columns[0]);
            let right = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(columns[1]);
            // Panels alternate between the columns, reading order.
            PanelLayout {
                tab_bar: None,
                panels: [left[0], right[0], left[1], right[1]],
            }
        }
        LayoutMode::Tabbed => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(area);
            PanelLayout {
                tab_bar: Some(rows[0]),
                panels: [rows[1]; 4],
            }
        }
        LayoutMode::FullPage => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Percentage(25),
                    Constraint::Percentage(25),
                    Constraint::Percentage(25),
                    Constraint::Percentage(25),
                ])
                .split(area);
            PanelLayout {
                tab_bar: None,
                panels: [rows[0], rows[1], rows[2], rows[3]],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_cycle_visits_all_modes() {
        let mut mode = LayoutMode::TwoColumn;
        let mut seen = vec![mode];
        for _ in 0..2 {
            mode = mode.next();
            seen.push(mode);
        }
        assert_eq!(seen, LayoutMode::all().to_vec());
        assert_eq!(mode.next(), LayoutMode::TwoColumn);
    }

    #[test]
    fn two_column_panels_tile_without_overlap() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = panel_layout(LayoutMode::TwoColumn, area);
        assert!(layout.tab_bar.is_none());
        // Grid cells are disjoint.
        assert_ne!(layout.panels[0], layout.panels[1]);
        assert_ne!(layout.panels[0], layout.panels[2]);
        assert_eq!(layout.panels[0].y, layout.panels[1].y);
        assert_eq!(layout.panels[0].x, layout.panels[2].x);
    }

    #[test]
    fn tabbed_panels_share_the_body() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = panel_layout(LayoutMode::Tabbed, area);
        assert!(layout.tab_bar.is_some());
        assert_eq!(layout.panels[0], layout.panels[3]);
    }

    #[test]
    fn full_page_panels_stack_vertically() {
        let area = Rect::new(0, 0, 100, 40);
        let layout = panel_layout(LayoutMode::FullPage, area);
        assert_eq!(layout.panels[0].width, area.width);
        assert!(layout.panels[1].y >= layout.panels[0].y + layout.panels[0].height);
    }
}
