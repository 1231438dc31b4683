use super::model::Series;
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Rebasing to an index (base year = 100)
// ---------------------------------------------------------------------------

/// A series expressed as an index of its value in `base_year`.
#[derive(Debug, Clone, PartialEq)]
pub struct RebasedSeries {
    pub series: Series,
    pub base_year: i32,
    /// Original value at `base_year`, before rebasing.
    pub base_value: f64,
}

impl RebasedSeries {
    pub fn value_at(&self, year: i32) -> Option<f64> {
        self.series.get(year)
    }
}

/// Resolve the year the index is anchored on.
///
/// A requested year before the series' first year (a metric whose history
/// starts later than the dashboard's range) clamps to that first year.
/// Otherwise the requested year stands, present in the series or not.
/// `None` for an empty series.
pub fn resolve_base_year(series: &Series, requested: i32) -> Option<i32> {
    let first = series.first_year()?;
    Some(requested.max(first))
}

/// Rebase `series` so that its value in the resolved base year is exactly
/// 100. Every other point becomes `value / base_value * 100`.
///
/// Fails with `MissingBaseYear` when the resolved year has no value; a
/// neighbouring year is never substituted.
pub fn rebase(series: &Series, requested_base_year: i32) -> Result<RebasedSeries, DashboardError> {
    let missing = || DashboardError::MissingBaseYear {
        series: series.name.clone(),
        year: requested_base_year,
    };
    let base_year = resolve_base_year(series, requested_base_year).ok_or_else(missing)?;
    let base_value = series.get(base_year).ok_or_else(|| DashboardError::MissingBaseYear {
        series: series.name.clone(),
        year: base_year,
    })?;
    if base_value == 0.0 || !base_value.is_finite() {
        return Err(DashboardError::InvalidBaseValue {
            series: series.name.clone(),
            year: base_year,
            value: base_value,
        });
    }

    Ok(RebasedSeries {
        series: series.map_values(|v| v / base_value * 100.0),
        base_year,
        base_value,
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn dwellings() -> Series {
        Series::from_points("Dwellings", [(2001, 25_000.0), (2002, 25_250.0), (2004, 31_250.0)])
    }

    #[test]
    fn anchor_year_is_exactly_100() {
        let r = rebase(&dwellings(), 2002).unwrap();
        assert_eq!(r.base_year, 2002);
        assert_eq!(r.base_value, 25_250.0);
        assert_eq!(r.value_at(2002), Some(100.0));
        assert_eq!(r.value_at(2001), Some(25_000.0 / 25_250.0 * 100.0));
    }

    #[test]
    fn early_request_clamps_to_first_year() {
        let r = rebase(&dwellings(), 1975).unwrap();
        assert_eq!(r.base_year, 2001);
        assert_eq!(r.value_at(2001), Some(100.0));
        assert_eq!(r.value_at(2004), Some(125.0));
    }

    #[test]
    fn gap_at_requested_year_is_reported_not_filled() {
        let err = rebase(&dwellings(), 2003).unwrap_err();
        assert!(matches!(err, DashboardError::MissingBaseYear { year: 2003, .. }));
    }

    #[test]
    fn request_past_the_end_is_missing() {
        let err = rebase(&dwellings(), 2010).unwrap_err();
        assert!(matches!(err, DashboardError::MissingBaseYear { year: 2010, .. }));
    }

    #[test]
    fn empty_series_has_no_base_year() {
        assert_eq!(resolve_base_year(&Series::new("x"), 2001), None);
        assert!(rebase(&Series::new("x"), 2001).is_err());
    }

    #[test]
    fn zero_base_value_is_rejected() {
        let s = Series::from_points("Bank Rate", [(2020, 0.0), (2021, 0.1)]);
        assert!(matches!(
            rebase(&s, 2020).unwrap_err(),
            DashboardError::InvalidBaseValue { year: 2020, .. }
        ));
    }

    fn arb_series() -> impl Strategy<Value = Series> {
        prop::collection::btree_map(1950i32..2030, 1.0f64..1e7, 1..40)
            .prop_map(|points| Series::from_points("s", points))
    }

    proptest! {
        #[test]
        fn any_year_in_domain_rebases_to_exactly_100(series in arb_series(), pick in any::<prop::sample::Index>()) {
            let years: Vec<i32> = series.iter().map(|(y, _)| y).collect();
            let year = years[pick.index(years.len())];
            let r = rebase(&series, year).unwrap();
            prop_assert_eq!(r.base_year, year);
            prop_assert_eq!(r.value_at(year), Some(100.0));
            prop_assert_eq!(r.series.len(), series.len());
        }

        #[test]
        fn requests_before_domain_anchor_on_first_year(series in arb_series(), before in 1u32..50) {
            let first = series.first_year().unwrap();
            let r = rebase(&series, first - before as i32).unwrap();
            prop_assert_eq!(r.base_year, first);
            prop_assert_eq!(r.value_at(first), Some(100.0));
        }
    }
}
