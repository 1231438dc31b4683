use std::collections::BTreeMap;

use chrono::Datelike;

use super::model::{Series, Table};

// ---------------------------------------------------------------------------
// Annual resampling
// ---------------------------------------------------------------------------

/// A table resampled to one point per calendar year, one [`Series`] per
/// numeric column. Columns are resampled independently: a year with no
/// observations in one column may still exist in another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnualTable {
    pub columns: Vec<Series>,
}

impl AnnualTable {
    pub fn column(&self, name: &str) -> Option<&Series> {
        self.columns.iter().find(|s| s.name == name)
    }

    /// The first column, or an empty series when the table has none.
    pub fn first_column(&self) -> Series {
        self.columns.first().cloned().unwrap_or_default()
    }
}

/// Group rows by calendar year and average each column, ignoring missing
/// values. A year whose values are all missing produces no point.
pub fn resample(table: &Table) -> AnnualTable {
    let columns = table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            // year → (sum, count)
            let mut acc: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
            for obs in &table.rows {
                if let Some(Some(v)) = obs.values.get(idx) {
                    let slot = acc.entry(obs.date.year()).or_insert((0.0, 0));
                    slot.0 += v;
                    slot.1 += 1;
                }
            }
            Series::from_points(
                name.clone(),
                acc.into_iter()
                    .map(|(year, (sum, n))| (year, sum / n as f64)),
            )
        })
        .collect();
    AnnualTable { columns }
}
