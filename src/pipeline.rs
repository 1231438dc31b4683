use crate::chart::{self, ChartSpec};
use crate::config::{BaseYear, ChartSettings, DashboardConfig};
use crate::data::filter::filter_region;
use crate::data::loader::{self, RawTables};
use crate::data::model::{Coverage, DateRange, Region, Series};
use crate::data::rebase::rebase;
use crate::data::resample::resample;
use crate::error::{DashboardError, Notice};

// ---------------------------------------------------------------------------
// Pipeline stages: load → normalize → present
// ---------------------------------------------------------------------------

/// The two user inputs of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub region: Region,
    pub range: DateRange,
}

/// An index series restricted to the selected range, with the base year it
/// was anchored on (`None` when it could not be indexed).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedSeries {
    pub series: Series,
    pub base_year: Option<i32>,
}

/// Every series the charts need for one selection, already restricted to the
/// selected year range.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub selection: Selection,
    pub bank_rate: Series,
    pub house_price: Series,
    pub population_index: IndexedSeries,
    pub dwellings_index: IndexedSeries,
    pub house_price_index: IndexedSeries,
    pub wages_index: IndexedSeries,
    pub deflator_index: IndexedSeries,
    /// Non-fatal conditions met along the way, in the order encountered.
    pub notices: Vec<Notice>,
}

/// Read every source named by the config. Fatal on the first failure.
pub fn load(config: &DashboardConfig) -> Result<RawTables, DashboardError> {
    loader::load(config)
}

/// Filter, resample and rebase every series for `selection`. Never fails:
/// a series that cannot be produced comes back empty with a notice.
pub fn normalize(
    raw: &RawTables,
    selection: &Selection,
    settings: &ChartSettings,
) -> NormalizedSeries {
    log::info!("Normalising for {} over {}", selection.region, selection.range);
    let mut n = Normalizer {
        selection: *selection,
        notices: Vec::new(),
    };

    let bank_rate = n.annual(&raw.bank_rate, "Bank Rate");
    let house_price = n.annual(&raw.house_prices, "Average house price");
    let population = n.annual(&raw.population, "Population");
    let dwellings = n.annual(&raw.dwellings, "Dwellings");
    let wages = n.annual(&raw.wages, "Wages");
    let deflator = n.annual(&raw.gdp_deflator, "GDP deflator");

    let supply_base = settings.supply_demand.base_year;
    let prices_base = settings.prices_wages.base_year;

    NormalizedSeries {
        selection: *selection,
        bank_rate: n.windowed(&bank_rate),
        population_index: n.indexed(&population, supply_base),
        dwellings_index: n.indexed(&dwellings, supply_base),
        house_price_index: n.indexed(&house_price, prices_base),
        wages_index: n.indexed(&wages, prices_base),
        deflator_index: n.indexed(&deflator, prices_base),
        // An empty window was already reported by the price index.
        house_price: house_price.restrict(selection.range),
        notices: n.notices,
    }
}

/// Turn normalised series into chart specifications.
pub fn present(norm: &NormalizedSeries, settings: &ChartSettings) -> Vec<ChartSpec> {
    chart::present(norm, settings)
}

/// One full rerun for a selection change.
pub fn run(
    raw: &RawTables,
    selection: &Selection,
    settings: &ChartSettings,
) -> (Vec<ChartSpec>, Vec<Notice>) {
    let norm = normalize(raw, selection, settings);
    let charts = present(&norm, settings);
    (charts, norm.notices)
}

// ---------------------------------------------------------------------------
// Per-series steps
// ---------------------------------------------------------------------------

struct Normalizer {
    selection: Selection,
    notices: Vec<Notice>,
}

impl Normalizer {
    fn notice(&mut self, notice: Notice) {
        log::warn!("{notice}");
        self.notices.push(notice);
    }

    /// Region filter + annual resample of the source's first value column,
    /// over the whole history.
    fn annual(&mut self, coverage: &Coverage, name: &str) -> Series {
        let table = filter_region(coverage, self.selection.region);
        if table.is_empty() {
            self.notice(DashboardError::EmptyRegion {
                series: name.to_string(),
                region: self.selection.region,
            });
            return Series::new(name);
        }
        resample(&table).first_column().with_name(name)
    }

    /// Restrict to the selected range. An empty window is reported once the
    /// series itself exists; an empty series was already reported.
    fn windowed(&mut self, series: &Series) -> Series {
        let window = series.restrict(self.selection.range);
        if window.is_empty() && !series.is_empty() {
            self.notice(DashboardError::DateRangeEmpty {
                series: series.name.clone(),
                range: self.selection.range,
            });
        }
        window
    }

    /// Rebase on the full history, then restrict to the selected range. The
    /// base year may lie outside the window for a fixed anchor.
    fn indexed(&mut self, series: &Series, base: BaseYear) -> IndexedSeries {
        let window = self.windowed(series);
        if window.is_empty() {
            return IndexedSeries {
                series: window,
                base_year: None,
            };
        }
        match rebase(series, base.requested(self.selection.range)) {
            Ok(rebased) => IndexedSeries {
                series: rebased.series.restrict(self.selection.range),
                base_year: Some(rebased.base_year),
            },
            Err(e) => {
                self.notice(e);
                IndexedSeries {
                    series: Series::new(series.name.clone()),
                    base_year: None,
                }
            }
        }
    }
}
