use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::model::{DateRange, Region};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Top-level configuration
// ---------------------------------------------------------------------------

/// Dashboard configuration. Every field has a default reproducing the
/// published data set layout, so an absent config file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory that relative source paths are resolved against.
    pub data_dir: PathBuf,
    /// Bounds of the year-range slider (inclusive).
    pub years: DateRange,
    pub default_region: Region,
    pub sources: Sources,
    pub charts: ChartSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_dir: PathBuf::from("datasources"),
            years: DateRange::new(1975, 2022),
            default_region: Region::UnitedKingdom,
            sources: Sources::default(),
            charts: ChartSettings::default(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file. Missing keys fall back to defaults; bounds
    /// that are present must be in order.
    pub fn from_file(path: &Path) -> Result<Self, DashboardError> {
        let config_err = |detail: String| DashboardError::Config {
            path: path.to_path_buf(),
            detail,
        };
        let text = std::fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        let config: DashboardConfig =
            serde_json::from_str(&text).map_err(|e| config_err(e.to_string()))?;
        config.validate().map_err(config_err)?;
        Ok(config)
    }

    /// Check the year bounds and every chart domain. Deserialisation does not
    /// go through `DateRange::new`, so reversed bounds arrive as written.
    pub fn validate(&self) -> Result<(), String> {
        if self.years.start > self.years.end {
            return Err(format!(
                "years: start {} is after end {}",
                self.years.start, self.years.end
            ));
        }
        let charts = &self.charts;
        for (name, domain) in [
            ("bank_rate_domain", charts.bank_rate_domain),
            ("house_price_domain", charts.house_price_domain),
            ("supply_demand.domain", charts.supply_demand.domain),
            ("prices_wages.domain", charts.prices_wages.domain),
        ] {
            if domain.min > domain.max {
                return Err(format!(
                    "charts.{name}: min {} is above max {}",
                    domain.min, domain.max
                ));
            }
        }
        Ok(())
    }

    /// Resolve a source path against `data_dir` unless it is absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// The six input datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sources {
    pub bank_rate: SourceConfig,
    pub house_prices: SourceConfig,
    pub population: SourceConfig,
    pub dwellings: SourceConfig,
    pub gdp_deflator: SourceConfig,
    pub wages: SourceConfig,
}

impl Default for Sources {
    fn default() -> Self {
        let dwelling_sheet = |sheet: &str, header_row: usize, region: &str| PartConfig {
            path: PathBuf::from("ukdwellingdataset2020.xlsx"),
            sheet: Some(sheet.to_string()),
            header_row,
            region: Some(region.to_string()),
        };

        Sources {
            bank_rate: SourceConfig {
                parts: vec![PartConfig::file("BankRateHistoryBoE.csv", 0)],
                layout: Layout::long("Date", None, &["Bank Rate"]),
                missing: default_missing(),
                scale: 1.0,
            },
            house_prices: SourceConfig {
                parts: vec![PartConfig::file("HPI-Average-prices-2022-08.csv", 0)],
                layout: Layout::long("Date", Some("Region_Name"), &["Average_Price"]),
                missing: default_missing(),
                scale: 1.0,
            },
            population: SourceConfig {
                parts: vec![PartConfig::file("ONS_population_estimates_UK.csv", 7)],
                layout: Layout::Wide {
                    id_columns: vec!["Code".into(), "Name".into(), "Geography".into()],
                    region: "Name".into(),
                    value_name: "Population".into(),
                },
                missing: default_missing(),
                scale: 1.0,
            },
            dwellings: SourceConfig {
                parts: vec![
                    dwelling_sheet("1", 4, "United Kingdom"),
                    dwelling_sheet("3", 5, "England"),
                    dwelling_sheet("4", 4, "Wales"),
                    dwelling_sheet("5", 4, "Scotland"),
                    dwelling_sheet("6", 5, "Northern Ireland"),
                ],
                layout: Layout::long("Date", None, &["All dwellings"]),
                missing: default_missing(),
                // Published in thousands.
                scale: 1000.0,
            },
            gdp_deflator: SourceConfig {
                parts: vec![PartConfig {
                    sheet: Some("GDP Deflators".into()),
                    ..PartConfig::file(
                        "GDP_Deflators_Qtrly_National_Accounts_September_2022_update.xlsx",
                        6,
                    )
                }],
                layout: Layout::long("Financial year", None, &["GDP deflator"]),
                missing: default_missing(),
                scale: 1.0,
            },
            wages: SourceConfig {
                parts: vec![PartConfig {
                    sheet: Some("All".into()),
                    ..PartConfig::file("ashe_median_weekly_pay.xlsx", 4)
                }],
                layout: Layout::long("Year", Some("Description"), &["Median"]),
                missing: default_missing(),
                scale: 1.0,
            },
        }
    }
}

/// One dataset: one or more file parts sharing a layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub parts: Vec<PartConfig>,
    pub layout: Layout,
    /// Cell values treated as missing, in addition to blank cells.
    #[serde(default = "default_missing")]
    pub missing: Vec<String>,
    /// Multiplier applied to every parsed value.
    #[serde(default = "default_scale")]
    pub scale: f64,
}

/// A single file (or workbook sheet) contributing rows to a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartConfig {
    pub path: PathBuf,
    /// Sheet name for workbooks; the first sheet when absent.
    #[serde(default)]
    pub sheet: Option<String>,
    /// Number of rows above the header row.
    #[serde(default)]
    pub header_row: usize,
    /// Region tag for every row of this part (per-region sheets).
    #[serde(default)]
    pub region: Option<String>,
}

impl PartConfig {
    pub fn file(path: &str, header_row: usize) -> Self {
        PartConfig {
            path: PathBuf::from(path),
            sheet: None,
            header_row,
            region: None,
        }
    }
}

/// Physical arrangement of a source's columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
    /// One row per date: a date column, optional region column, value columns.
    Long {
        date: String,
        #[serde(default)]
        region: Option<String>,
        values: Vec<String>,
    },
    /// One row per region with one column per date label ("Mid-2001").
    /// Every column not in `id_columns` is a date.
    Wide {
        id_columns: Vec<String>,
        region: String,
        value_name: String,
    },
}

impl Layout {
    pub fn long(date: &str, region: Option<&str>, values: &[&str]) -> Self {
        Layout::Long {
            date: date.to_string(),
            region: region.map(str::to_string),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

fn default_missing() -> Vec<String> {
    vec!["..".into(), "-".into()]
}

fn default_scale() -> f64 {
    1.0
}

// ---------------------------------------------------------------------------
// Chart settings
// ---------------------------------------------------------------------------

/// Fixed Y-axis domain. Values outside it are clamped when drawn; the data
/// itself is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisDomain {
    pub min: f64,
    pub max: f64,
}

impl AxisDomain {
    pub const fn new(min: f64, max: f64) -> Self {
        AxisDomain { min, max }
    }

    pub fn clamp(&self, v: f64) -> f64 {
        v.clamp(self.min, self.max)
    }
}

/// How the index anchor year is chosen for a rebased chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseYear {
    /// First year of the selected range.
    RangeStart,
    Fixed(i32),
}

impl BaseYear {
    pub fn requested(&self, range: DateRange) -> i32 {
        match self {
            BaseYear::RangeStart => range.start,
            BaseYear::Fixed(y) => *y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexChart {
    pub domain: AxisDomain,
    pub base_year: BaseYear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub bank_rate_domain: AxisDomain,
    pub house_price_domain: AxisDomain,
    pub supply_demand: IndexChart,
    pub prices_wages: IndexChart,
}

impl Default for ChartSettings {
    fn default() -> Self {
        ChartSettings {
            bank_rate_domain: AxisDomain::new(0.0, 18.0),
            house_price_domain: AxisDomain::new(0.0, 600_000.0),
            supply_demand: IndexChart {
                domain: AxisDomain::new(95.0, 120.0),
                base_year: BaseYear::Fixed(2001),
            },
            prices_wages: IndexChart {
                domain: AxisDomain::new(50.0, 500.0),
                base_year: BaseYear::RangeStart,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let json = r#"{
            "data_dir": "/srv/data",
            "charts": { "supply_demand": { "domain": { "min": 90, "max": 130 }, "base_year": "range_start" } }
        }"#;
        let cfg: DashboardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(cfg.years, DateRange::new(1975, 2022));
        assert_eq!(cfg.charts.supply_demand.base_year, BaseYear::RangeStart);
        assert_eq!(cfg.charts.prices_wages, ChartSettings::default().prices_wages);
        assert_eq!(cfg.sources.dwellings.parts.len(), 5);
    }

    #[test]
    fn fixed_base_year_round_trips_through_json() {
        let json = serde_json::to_string(&BaseYear::Fixed(2001)).unwrap();
        assert_eq!(json, r#"{"fixed":2001}"#);
        let back: BaseYear = serde_json::from_str(&json).unwrap();
        assert_eq!(back.requested(DateRange::new(1990, 2000)), 2001);
        assert_eq!(BaseYear::RangeStart.requested(DateRange::new(1990, 2000)), 1990);
    }

    #[test]
    fn layout_is_tagged_by_kind() {
        let json = r#"{ "kind": "wide", "id_columns": ["Code"], "region": "Name", "value_name": "Population" }"#;
        let layout: Layout = serde_json::from_str(json).unwrap();
        assert!(matches!(layout, Layout::Wide { .. }));
    }

    #[test]
    fn relative_paths_resolve_against_data_dir() {
        let cfg = DashboardConfig {
            data_dir: PathBuf::from("data"),
            ..DashboardConfig::default()
        };
        assert_eq!(cfg.resolve(Path::new("a.csv")), PathBuf::from("data/a.csv"));
    }

    fn write_config(json: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, json).unwrap();
        (dir, path)
    }

    #[test]
    fn reversed_years_are_rejected_on_load() {
        let (_dir, path) = write_config(r#"{ "years": { "start": 2022, "end": 1975 } }"#);
        let err = DashboardConfig::from_file(&path).unwrap_err();
        let DashboardError::Config { detail, .. } = &err else {
            panic!("expected a config error, got {err:?}");
        };
        assert!(detail.contains("start 2022 is after end 1975"), "{detail}");
        assert!(err.is_fatal());
    }

    #[test]
    fn reversed_chart_domain_is_rejected_on_load() {
        let (_dir, path) =
            write_config(r#"{ "charts": { "house_price_domain": { "min": 600000, "max": 0 } } }"#);
        let err = DashboardConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("charts.house_price_domain"), "{err}");
    }

    #[test]
    fn valid_file_loads_and_defaults_validate() {
        let (_dir, path) = write_config(r#"{ "years": { "start": 1990, "end": 2000 } }"#);
        let cfg = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(cfg.years, DateRange::new(1990, 2000));
        assert_eq!(DashboardConfig::default().validate(), Ok(()));
    }

    #[test]
    fn unreadable_config_is_a_config_error() {
        let err = DashboardConfig::from_file(Path::new("/nonexistent/dashboard.json")).unwrap_err();
        assert!(matches!(err, DashboardError::Config { .. }));
    }
}
