use crate::config::{AxisDomain, ChartSettings};
use crate::data::merge::{merge, LongTable};
use crate::data::model::Region;
use crate::pipeline::NormalizedSeries;

// ---------------------------------------------------------------------------
// Chart specifications – what the plot widget draws
// ---------------------------------------------------------------------------

/// One chart: a title, one or more stacked panels sharing the year axis, and
/// source captions.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub id: &'static str,
    pub title: String,
    pub panels: Vec<Panel>,
    pub note: Option<String>,
    pub caption: String,
}

impl ChartSpec {
    /// True when no panel has a single value to draw.
    pub fn is_empty(&self) -> bool {
        self.panels.iter().all(|p| !p.data.has_values())
    }
}

/// One plot area: x = year, y = value within a fixed domain, one line per
/// series label.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub y_label: String,
    pub domain: AxisDomain,
    pub data: LongTable,
}

impl Panel {
    pub fn series_names(&self) -> Vec<&str> {
        self.data.series_names()
    }

    /// Drawable runs of one series. Each run is a maximal stretch of years
    /// with values; a missing value ends the run, so gaps are never bridged.
    /// Y values are clamped into the panel's domain for display only.
    pub fn segments(&self, series: &str) -> Vec<Vec<[f64; 2]>> {
        let mut runs = Vec::new();
        let mut current: Vec<[f64; 2]> = Vec::new();
        for (year, value) in self.data.points(series) {
            match value {
                Some(v) => current.push([year as f64, self.domain.clamp(v)]),
                None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }
}

// ---------------------------------------------------------------------------
// Presenter
// ---------------------------------------------------------------------------

/// Build the three dashboard charts from normalised series.
pub fn present(norm: &NormalizedSeries, settings: &ChartSettings) -> Vec<ChartSpec> {
    let range = norm.selection.range;
    let area = match norm.selection.region {
        Region::UnitedKingdom => "UK".to_string(),
        other => other.to_string(),
    };

    let rates = ChartSpec {
        id: "rates_prices",
        title: "House prices have risen as interest rates have fallen".into(),
        panels: vec![
            Panel {
                y_label: "Bank rate %".into(),
                domain: settings.bank_rate_domain,
                data: merge(&[("Bank Rate", &norm.bank_rate)]).restrict(range),
            },
            Panel {
                y_label: "Average house price £".into(),
                domain: settings.house_price_domain,
                data: merge(&[("Average house price", &norm.house_price)]).restrict(range),
            },
        ],
        note: Some("Note: prices are not adjusted for inflation.".into()),
        caption: "Sources: Bank of England and HM Land Registry UK House Price Index".into(),
    };

    let supply = ChartSpec {
        id: "supply_demand",
        title: format!(
            "{area} population and housing supply have grown at similar rates{}",
            index_suffix(&[norm.population_index.base_year, norm.dwellings_index.base_year])
        ),
        panels: vec![Panel {
            y_label: "Index".into(),
            domain: settings.supply_demand.domain,
            data: merge(&[
                ("Index: population", &norm.population_index.series),
                ("Index: no. dwellings", &norm.dwellings_index.series),
            ])
            .restrict(range),
        }],
        note: base_year_note(&[
            ("population", norm.population_index.base_year),
            ("dwellings", norm.dwellings_index.base_year),
        ]),
        caption: "Source: ONS UK population estimates and dwelling stock by tenure".into(),
    };

    let prices = ChartSpec {
        id: "prices_wages",
        title: format!(
            "House prices have outpaced wages and inflation{}",
            index_suffix(&[
                norm.house_price_index.base_year,
                norm.wages_index.base_year,
                norm.deflator_index.base_year,
            ])
        ),
        panels: vec![Panel {
            y_label: "Index".into(),
            domain: settings.prices_wages.domain,
            data: merge(&[
                ("Index: house prices", &norm.house_price_index.series),
                ("Index: wages", &norm.wages_index.series),
                ("Index: GDP deflator", &norm.deflator_index.series),
            ])
            .restrict(range),
        }],
        note: base_year_note(&[
            ("house prices", norm.house_price_index.base_year),
            ("wages", norm.wages_index.base_year),
            ("GDP deflator", norm.deflator_index.base_year),
        ]),
        caption: "Sources: HM Land Registry, ONS Annual Survey of Hours and Earnings, HM Treasury GDP deflators".into(),
    };

    vec![rates, supply, prices]
}

/// " (Index: 2001 = 100)" using the first resolved base year, or nothing when
/// no series could be indexed.
fn index_suffix(base_years: &[Option<i32>]) -> String {
    match base_years.iter().flatten().next() {
        Some(y) => format!(" (Index: {y} = 100)"),
        None => String::new(),
    }
}

/// A note listing each series' base year when they do not all agree.
fn base_year_note(base_years: &[(&str, Option<i32>)]) -> Option<String> {
    let resolved: Vec<(&str, i32)> = base_years
        .iter()
        .filter_map(|&(name, y)| y.map(|y| (name, y)))
        .collect();
    let first = resolved.first()?.1;
    if resolved.iter().all(|&(_, y)| y == first) {
        return None;
    }
    let parts: Vec<String> = resolved.iter().map(|(n, y)| format!("{n} {y}")).collect();
    Some(format!("Note: base years differ ({}).", parts.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::merge::LongRow;
    use crate::data::model::{DateRange, Series};
    use crate::pipeline::{IndexedSeries, Selection};

    fn panel(points: &[(i32, Option<f64>)], domain: AxisDomain) -> Panel {
        Panel {
            y_label: "Index".into(),
            domain,
            data: LongTable {
                rows: points
                    .iter()
                    .map(|&(year, value)| LongRow {
                        year,
                        series: "s".into(),
                        value,
                    })
                    .collect(),
            },
        }
    }

    #[test]
    fn missing_values_split_lines_instead_of_bridging() {
        let p = panel(
            &[(2001, Some(100.0)), (2002, None), (2003, Some(104.0)), (2004, Some(105.0))],
            AxisDomain::new(0.0, 200.0),
        );
        assert_eq!(
            p.segments("s"),
            vec![vec![[2001.0, 100.0]], vec![[2003.0, 104.0], [2004.0, 105.0]]]
        );
    }

    #[test]
    fn out_of_domain_values_are_clamped_for_display_only() {
        let p = panel(&[(2001, Some(90.0)), (2002, Some(130.0))], AxisDomain::new(95.0, 120.0));
        assert_eq!(p.segments("s"), vec![vec![[2001.0, 95.0], [2002.0, 120.0]]]);
        assert_eq!(p.data.points("s"), vec![(2001, Some(90.0)), (2002, Some(130.0))]);
    }

    #[test]
    fn base_year_note_only_when_bases_differ() {
        assert_eq!(base_year_note(&[("a", Some(2001)), ("b", Some(2001))]), None);
        assert_eq!(base_year_note(&[("a", Some(2001)), ("b", None)]), None);
        assert_eq!(
            base_year_note(&[("a", Some(2001)), ("b", Some(2002))]).as_deref(),
            Some("Note: base years differ (a 2001, b 2002).")
        );
        assert_eq!(index_suffix(&[None, Some(2001)]), " (Index: 2001 = 100)");
        assert_eq!(index_suffix(&[None]), "");
    }

    #[test]
    fn presents_three_charts_with_range_applied() {
        let indexed = |pts: &[(i32, f64)]| IndexedSeries {
            series: Series::from_points("i", pts.iter().copied()),
            base_year: pts.first().map(|p| p.0),
        };
        let norm = NormalizedSeries {
            selection: Selection {
                region: Region::England,
                range: DateRange::new(2001, 2002),
            },
            bank_rate: Series::from_points("Bank Rate", [(2001, 5.0), (2002, 4.0)]),
            house_price: Series::new("Average_Price"),
            population_index: indexed(&[(2001, 100.0), (2002, 100.4)]),
            dwellings_index: indexed(&[(2001, 100.0), (2002, 100.8)]),
            house_price_index: IndexedSeries::default(),
            wages_index: IndexedSeries::default(),
            deflator_index: IndexedSeries::default(),
            notices: Vec::new(),
        };

        let charts = present(&norm, &ChartSettings::default());
        assert_eq!(charts.len(), 3);
        assert_eq!(charts[0].panels.len(), 2);
        assert!(!charts[0].is_empty());
        assert!(charts[1].title.starts_with("England population"));
        assert!(charts[1].title.ends_with("(Index: 2001 = 100)"));
        assert!(charts[2].is_empty());
        assert_eq!(charts[2].panels[0].domain, ChartSettings::default().prices_wages.domain);
    }
}
