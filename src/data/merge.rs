use std::collections::BTreeSet;

use super::model::{DateRange, Series};

// ---------------------------------------------------------------------------
// Long-form tables
// ---------------------------------------------------------------------------

/// One (year, series, value) triple. `value` is `None` where the series has
/// no point for a year another merged series does have.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub year: i32,
    pub series: String,
    pub value: Option<f64>,
}

/// Long-form table: the shape the chart binder consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongTable {
    pub rows: Vec<LongRow>,
}

impl LongTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Series labels in first-appearance order.
    pub fn series_names(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.rows
            .iter()
            .filter(|r| seen.insert(r.series.as_str()))
            .map(|r| r.series.as_str())
            .collect()
    }

    /// `(year, value)` pairs of one series, in year order.
    pub fn points(&self, series: &str) -> Vec<(i32, Option<f64>)> {
        let mut pts: Vec<_> = self
            .rows
            .iter()
            .filter(|r| r.series == series)
            .map(|r| (r.year, r.value))
            .collect();
        pts.sort_by_key(|&(y, _)| y);
        pts
    }

    /// Rows whose year lies inside `range`.
    pub fn restrict(&self, range: DateRange) -> LongTable {
        LongTable {
            rows: self
                .rows
                .iter()
                .filter(|r| range.contains(r.year))
                .cloned()
                .collect(),
        }
    }

    /// Whether any row in the table carries a value.
    pub fn has_values(&self) -> bool {
        self.rows.iter().any(|r| r.value.is_some())
    }
}

/// Outer-join annual series on year and melt the result to long form.
///
/// `inputs` pairs each series with the label it is shown under. Every year
/// present in any input yields one row per input; inputs lacking that year
/// get `None`. Rows are ordered by year, then by input order.
pub fn merge(inputs: &[(&str, &Series)]) -> LongTable {
    let years: BTreeSet<i32> = inputs
        .iter()
        .flat_map(|(_, s)| s.iter().map(|(y, _)| y))
        .collect();

    let rows = years
        .into_iter()
        .flat_map(|year| {
            inputs.iter().map(move |(label, s)| LongRow {
                year,
                series: label.to_string(),
                value: s.get(year),
            })
        })
        .collect();
    LongTable { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outer_join_keeps_years_from_either_side() {
        let a = Series::from_points("pop", [(2001, 1.0)]);
        let b = Series::from_points("dw", [(2002, 2.0)]);
        let t = merge(&[("Index: population", &a), ("Index: no. dwellings", &b)]);

        assert_eq!(t.rows.len(), 4);
        assert_eq!(t.points("Index: population"), vec![(2001, Some(1.0)), (2002, None)]);
        assert_eq!(t.points("Index: no. dwellings"), vec![(2001, None), (2002, Some(2.0))]);
        assert_eq!(t.series_names(), vec!["Index: population", "Index: no. dwellings"]);
    }

    #[test]
    fn empty_inputs_merge_to_empty_table() {
        let a = Series::new("a");
        let t = merge(&[("a", &a)]);
        assert!(t.is_empty());
        assert!(!t.has_values());
    }

    #[test]
    fn restrict_drops_rows_outside_range() {
        let a = Series::from_points("a", [(1999, 1.0), (2001, 2.0), (2011, 3.0)]);
        let t = merge(&[("a", &a)]).restrict(DateRange::new(2000, 2010));
        assert_eq!(t.points("a"), vec![(2001, Some(2.0))]);
    }
}
