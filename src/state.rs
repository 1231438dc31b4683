use std::path::PathBuf;

use crate::chart::ChartSpec;
use crate::config::DashboardConfig;
use crate::data::loader::RawTables;
use crate::data::model::{DateRange, Region};
use crate::pipeline::{self, Selection};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded sources. Replaced only by a successful reload.
    pub raw: RawTables,

    /// Current region / year-range selection.
    pub selection: Selection,

    /// Charts for the current selection, rebuilt on every change.
    pub charts: Vec<ChartSpec>,

    /// Non-fatal messages from the last pipeline run.
    pub notices: Vec<String>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig, raw: RawTables) -> Self {
        let selection = Selection {
            region: config.default_region,
            range: config.years,
        };
        let mut state = Self {
            config,
            raw,
            selection,
            charts: Vec::new(),
            notices: Vec::new(),
            status_message: None,
        };
        state.rerun();
        state
    }

    /// Re-run normalise → present for the current selection.
    pub fn rerun(&mut self) {
        let (charts, notices) = pipeline::run(&self.raw, &self.selection, &self.config.charts);
        self.charts = charts;
        self.notices = notices.iter().map(|n| n.to_string()).collect();
    }

    pub fn set_region(&mut self, region: Region) {
        if self.selection.region != region {
            self.selection.region = region;
            self.rerun();
        }
    }

    /// Set the year range, clamped to the configured slider bounds.
    pub fn set_range(&mut self, start: i32, end: i32) {
        let bounds = self.config.years;
        let range = DateRange::new(
            start.clamp(bounds.start, bounds.end),
            end.clamp(bounds.start, bounds.end),
        );
        if self.selection.range != range {
            self.selection.range = range;
            self.rerun();
        }
    }

    /// Reload every source from `dir`. On failure the previous data stays.
    pub fn reload_from(&mut self, dir: PathBuf) {
        let mut config = self.config.clone();
        config.data_dir = dir;
        match pipeline::load(&config) {
            Ok(raw) => {
                log::info!("Reloaded sources from {}", config.data_dir.display());
                self.config = config;
                self.raw = raw;
                self.status_message = None;
                self.rerun();
            }
            Err(e) => {
                log::error!("Reload failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::model::{Coverage, Observation, Table};

    fn raw() -> RawTables {
        let rate = Table {
            columns: vec!["Bank Rate".into()],
            rows: (1975..=2022)
                .map(|y| Observation {
                    date: NaiveDate::from_ymd_opt(y, 1, 1).unwrap(),
                    values: vec![Some(5.0)],
                })
                .collect(),
        };
        RawTables {
            bank_rate: Coverage::National(rate),
            house_prices: Coverage::Regional(Vec::new()),
            population: Coverage::Regional(Vec::new()),
            dwellings: Coverage::Regional(Vec::new()),
            gdp_deflator: Coverage::Regional(Vec::new()),
            wages: Coverage::Regional(Vec::new()),
        }
    }

    #[test]
    fn starts_with_config_defaults_and_charts_built() {
        let state = AppState::new(DashboardConfig::default(), raw());
        assert_eq!(state.selection.region, Region::UnitedKingdom);
        assert_eq!(state.selection.range, DateRange::new(1975, 2022));
        assert_eq!(state.charts.len(), 3);
        // Five regional sources are empty for every region.
        assert_eq!(state.notices.len(), 5);
    }

    #[test]
    fn range_is_clamped_to_slider_bounds() {
        let mut state = AppState::new(DashboardConfig::default(), raw());
        state.set_range(1960, 2030);
        assert_eq!(state.selection.range, DateRange::new(1975, 2022));
        state.set_range(2010, 2000);
        assert_eq!(state.selection.range, DateRange::new(2000, 2010));
        let rate = &state.charts[0].panels[0].data;
        assert_eq!(rate.points("Bank Rate").len(), 11);
    }

    #[test]
    fn failed_reload_keeps_previous_data() {
        let mut state = AppState::new(DashboardConfig::default(), raw());
        let dir = tempfile::tempdir().unwrap();
        state.reload_from(dir.path().to_path_buf());
        assert!(state.status_message.as_deref().unwrap_or("").starts_with("Error:"));
        assert_eq!(state.raw, raw());
        assert_eq!(state.config.data_dir, PathBuf::from("datasources"));
    }
}
