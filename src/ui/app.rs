//! Dashboard state and input handling.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::Color;
use tracing::error;

use crate::core::TimeSeries;
use crate::data::{load_series, DataSourceConfig, LocationRecord};
use crate::pipeline::{run_session, SessionOutcome, SplitPlan};
use crate::ui::layout::LayoutMode;
use crate::ui::view::{ChartData, PanelView};

/// Background tint choices, standing in for the hosted background images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    None,
    GreenLeaves,
    LeavesOnWater,
    LeavesInEarth,
    MoreEarthLessLeaves,
    MoreLeavesOnEarth,
}

impl Background {
    pub fn all() -> [Background; 6] {
        [
            Background::None,
            Background::GreenLeaves,
            Background::LeavesOnWater,
            Background::LeavesInEarth,
            Background::MoreEarthLessLeaves,
            Background::MoreLeavesOnEarth,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Background::None => "None",
            Background::GreenLeaves => "Green leaves",
            Background::LeavesOnWater => "Leaves on water",
            Background::LeavesInEarth => "Leaves in earth",
            Background::MoreEarthLessLeaves => "More earth, less leaves",
            Background::MoreLeavesOnEarth => "more leaves on earth",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Background::None => Color::Reset,
            Background::GreenLeaves => Color::Rgb(16, 48, 16),
            Background::LeavesOnWater => Color::Rgb(12, 36, 48),
            Background::LeavesInEarth => Color::Rgb(40, 32, 16),
            Background::MoreEarthLessLeaves => Color::Rgb(48, 36, 20),
            Background::MoreLeavesOnEarth => Color::Rgb(28, 44, 20),
        }
    }

    pub fn next(&self) -> Background {
        let all = Background::all();
        let idx = all.iter().position(|b| b == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

/// Top-level dashboard state.
///
/// Any widget change marks the state dirty; the main loop recomputes the
/// session before the next draw, mirroring whole-script re-execution on
/// every input.
pub struct App {
    pub config: DataSourceConfig,
    pub registry: Vec<LocationRecord>,
    pub city_idx: usize,
    pub layout_mode: LayoutMode,
    pub background: Background,
    pub active_tab: usize,
    pub keep: usize,
    pub extra: usize,
    pub show_source: bool,
    pub series: Option<TimeSeries>,
    pub outcome: Option<SessionOutcome>,
    pub views: Vec<PanelView>,
    pub status: Option<String>,
    pub dirty: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: DataSourceConfig, registry: Vec<LocationRecord>) -> Self {
        Self {
            config,
            registry,
            city_idx: 0,
            layout_mode: LayoutMode::default(),
            background: Background::default(),
            active_tab: 0,
            keep: 0,
            extra: SplitPlan::default_extra(),
            show_source: false,
            series: None,
            outcome: None,
            views: Vec::new(),
            status: None,
            dirty: true,
            should_quit: false,
        }
    }

    pub fn city(&self) -> &LocationRecord {
        &self.registry[self.city_idx]
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up => {
                self.city_idx = (self.city_idx + self.registry.len() - 1) % self.registry.len();
                self.series = None;
                self.dirty = true;
            }
            KeyCode::Down => {
                self.city_idx = (self.city_idx + 1) % self.registry.len();
                self.series = None;
                self.dirty = true;
            }
            KeyCode::Left => {
                if self.series.is_some() && self.keep > crate::pipeline::split::MIN_KEEP {
                    self.keep -= 1;
                    self.dirty = true;
                }
            }
            KeyCode::Right => {
                if let Some(len) = self.series_len() {
                    if self.keep < len {
                        self.keep += 1;
                        self.dirty = true;
                    }
                }
            }
            KeyCode::Char('[') => {
                if self.extra > crate::pipeline::split::MIN_EXTRA {
                    self.extra -= 1;
                    self.dirty = true;
                }
            }
            KeyCode::Char(']') => {
                if self.extra < crate::pipeline::split::MAX_EXTRA {
                    self.extra += 1;
                    self.dirty = true;
                }
            }
            KeyCode::Char('m') => {
                self.layout_mode = self.layout_mode.next();
            }
            KeyCode::Char('b') => {
                self.background = self.background.next();
            }
            KeyCode::Char('s') => {
                self.show_source = !self.show_source;
            }
            KeyCode::Tab => {
                self.active_tab = (self.active_tab + 1) % 4;
            }
            KeyCode::BackTab => {
                self.active_tab = (self.active_tab + 3) % 4;
            }
            _ => {}
        }
    }

    fn series_len(&self) -> Option<usize> {
        self.series.as_ref().map(|s| s.len())
    }

    /// Reload the city series if needed, then rerun the whole session.
    pub fn refresh(&mut self) {
        self.dirty = false;
        self.status = None;

        if self.series.is_none() {
            match load_series(&self.config, &self.city().key) {
                Ok(series) => {
                    self.keep = SplitPlan::default_keep(series.len());
                    self.extra = SplitPlan::default_extra();
                    self.series = Some(series);
                }
                Err(err) => {
                    error!(%err, city = %self.city().key, "series load failed");
                    self.status = Some(err.to_string());
                    self.outcome = None;
                    self.views.clear();
                    return;
                }
            }
        }

        let series = match &self.series {
            Some(series) => series.clone(),
            None => return,
        };

        let plan = match SplitPlan::plan(series.len(), self.keep, self.extra) {
            Ok(plan) => plan,
            Err(err) => {
                self.status = Some(err.to_string());
                return;
            }
        };

        match run_session(&series, plan) {
            Ok(outcome) => {
                self.views = build_views(self.city().display_name(), &outcome);
                self.outcome = Some(outcome);
            }
            Err(err) => {
                error!(%err, "session failed");
                self.status = Some(err.to_string());
                self.outcome = None;
                self.views.clear();
            }
        }
    }
}

fn build_views(city: String, outcome: &SessionOutcome) -> Vec<PanelView> {
    let mut views: Vec<PanelView> = outcome
        .branches
        .iter()
        .map(|branch| PanelView {
            title: format!("{} with {}", city, branch.family.name()),
            chart: branch
                .forecast
                .as_ref()
                .map(|frame| ChartData::build(&outcome.train, &outcome.held_out, frame))
                .map_err(|e| e.clone()),
            report: Some(branch.report.clone()),
        })
        .collect();

    views.push(PanelView {
        title: format!("{city} with Ensemble"),
        chart: outcome
            .ensemble
            .as_ref()
            .map(|frame| ChartData::build(&outcome.train, &outcome.held_out, frame))
            .map_err(|e| e.clone()),
        report: None,
    });

    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn test_app() -> App {
        let registry = vec![
            LocationRecord {
                key: "Fresno_CA".into(),
                latitude: 36.74,
                longitude: -119.78,
            },
            LocationRecord {
                key: "Davis_CA".into(),
                latitude: 38.54,
                longitude: -121.74,
            },
        ];
        App::new(DataSourceConfig::default(), registry)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quit_keys() {
        let mut app = test_app();
        app.on_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn city_selection_wraps_and_invalidates_series() {
        let mut app = test_app();
        app.series = Some(
            TimeSeries::new(vec![], vec![]).unwrap(),
        );
        app.on_key(key(KeyCode::Down));
        assert_eq!(app.city_idx, 1);
        assert!(app.series.is_none());
        assert!(app.dirty);

        app.on_key(key(KeyCode::Down));
        assert_eq!(app.city_idx, 0);
    }

    #[test]
    fn layout_and_background_cycle() {
        let mut app = test_app();
        app.on_key(key(KeyCode::Char('m')));
        assert_eq!(app.layout_mode, LayoutMode::Tabbed);
        app.on_key(key(KeyCode::Char('b')));
        assert_eq!(app.background, Background::GreenLeaves);
    }

    #[test]
    fn extra_slider_respects_bounds() {
        let mut app = test_app();
        app.extra = crate::pipeline::split::MIN_EXTRA;
        app.on_key(key(KeyCode::Char('[')));
        assert_eq!(app.extra, crate::pipeline::split::MIN_EXTRA);

        app.extra = crate::pipeline::split::MAX_EXTRA;
        app.on_key(key(KeyCode::Char(']')));
        assert_eq!(app.extra, crate::pipeline::split::MAX_EXTRA);
    }

    #[test]
    fn tab_cycles_four_panels() {
        let mut app = test_app();
        for expected in [1, 2, 3, 0] {
            app.on_key(key(KeyCode::Tab));
            assert_eq!(app.active_tab, expected);
        }
        app.on_key(key(KeyCode::BackTab));
        assert_eq!(app.active_tab, 3);
    }

    #[test]
    fn background_names_match_menu() {
        let names: Vec<&str> = Background::all().iter().map(|b| b.name()).collect();
        assert_eq!(
            names,
            [
                "None",
                "Green leaves",
                "Leaves on water",
                "Leaves in earth",
                "More earth, less leaves",
                "more leaves on earth",
            ]
        );
    }
}
