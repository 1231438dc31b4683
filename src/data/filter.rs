use super::model::{Coverage, Region, Table};

// ---------------------------------------------------------------------------
// Region filter
// ---------------------------------------------------------------------------

/// Keep only the rows belonging to `region`.
///
/// * `National` coverage has no region dimension → returned whole.
/// * `Regional` coverage → the blocks whose label matches `region`
///   case-insensitively, concatenated in date order.
/// * No matching block → an empty table with the source's columns. Callers
///   render that as "no data"; it is not an error.
pub fn filter_region(coverage: &Coverage, region: Region) -> Table {
    match coverage {
        Coverage::National(table) => table.clone(),
        Coverage::Regional(blocks) => {
            let columns = blocks
                .first()
                .map(|b| b.table.columns.clone())
                .unwrap_or_default();
            let mut out = Table::new(columns);
            out.rows = blocks
                .iter()
                .filter(|b| region.matches(&b.region))
                .flat_map(|b| b.table.rows.iter().cloned())
                .collect();
            out.rows.sort_by_key(|o| o.date);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::model::{Observation, RegionalBlock};

    fn table(rows: &[(i32, f64)]) -> Table {
        Table {
            columns: vec!["Population".into()],
            rows: rows
                .iter()
                .map(|&(y, v)| Observation {
                    date: NaiveDate::from_ymd_opt(y, 1, 1).unwrap(),
                    values: vec![Some(v)],
                })
                .collect(),
        }
    }

    fn regional() -> Coverage {
        Coverage::Regional(vec![
            RegionalBlock {
                region: "UNITED KINGDOM".into(),
                table: table(&[(2001, 59.1), (2002, 59.4)]),
            },
            RegionalBlock {
                region: "ENGLAND".into(),
                table: table(&[(2001, 49.4)]),
            },
        ])
    }

    #[test]
    fn matches_upper_cased_region_labels() {
        let t = filter_region(&regional(), Region::UnitedKingdom);
        assert_eq!(t.len(), 2);
        let t = filter_region(&regional(), Region::England);
        assert_eq!(t.rows[0].values, vec![Some(49.4)]);
    }

    #[test]
    fn absent_region_yields_empty_table_not_error() {
        let t = filter_region(&regional(), Region::London);
        assert!(t.is_empty());
        assert_eq!(t.columns, vec!["Population".to_string()]);
    }

    #[test]
    fn national_coverage_ignores_region() {
        let cov = Coverage::National(table(&[(1975, 11.5)]));
        assert_eq!(filter_region(&cov, Region::London).len(), 1);
    }
}
