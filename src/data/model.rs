use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Region – the common filter dimension across all datasets
// ---------------------------------------------------------------------------

/// The fixed set of UK regions offered by the region selector.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    #[default]
    #[serde(rename = "United Kingdom")]
    UnitedKingdom,
    England,
    Scotland,
    Wales,
    #[serde(rename = "Northern Ireland")]
    NorthernIreland,
    London,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::UnitedKingdom,
        Region::England,
        Region::Scotland,
        Region::Wales,
        Region::NorthernIreland,
        Region::London,
    ];

    /// Display name, as published by ONS and HM Land Registry.
    pub fn name(&self) -> &'static str {
        match self {
            Region::UnitedKingdom => "United Kingdom",
            Region::England => "England",
            Region::Scotland => "Scotland",
            Region::Wales => "Wales",
            Region::NorthernIreland => "Northern Ireland",
            Region::London => "London",
        }
    }

    /// Case-insensitive exact match against a region label found in a source
    /// file. Some ONS files store names upper-cased ("UNITED KINGDOM").
    pub fn matches(&self, label: &str) -> bool {
        label.trim().eq_ignore_ascii_case(self.name())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.matches(s))
            .ok_or_else(|| format!("unknown region '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// DateRange – inclusive window of calendar years
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: i32,
    pub end: i32,
}

impl DateRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(start: i32, end: i32) -> Self {
        if start <= end {
            DateRange { start, end }
        } else {
            DateRange { start: end, end: start }
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Raw tables – what the loader produces
// ---------------------------------------------------------------------------

/// One dated row of a raw table. `values` is aligned with [`Table::columns`];
/// `None` marks an explicit missing value (`..`, `-`) in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

/// A raw time-indexed table for a single region (or for a source with no
/// region dimension at all).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Observation>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rows of one source that belong to one region label, exactly as spelled in
/// the source (e.g. "ENGLAND", "City of London").
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalBlock {
    pub region: String,
    pub table: Table,
}

/// How a loaded source covers the region dimension. Assembled once at load
/// time, whether the regions came from a column, a wide pivot or per-region
/// workbook sheets.
#[derive(Debug, Clone, PartialEq)]
pub enum Coverage {
    /// No region dimension: the same figures apply whatever region is chosen.
    National(Table),
    /// One block per region label found in the source.
    Regional(Vec<RegionalBlock>),
}

impl Coverage {
    /// Total number of raw rows across all blocks.
    pub fn row_count(&self) -> usize {
        match self {
            Coverage::National(t) => t.len(),
            Coverage::Regional(blocks) => blocks.iter().map(|b| b.table.len()).sum(),
        }
    }

    pub fn region_count(&self) -> usize {
        match self {
            Coverage::National(_) => 0,
            Coverage::Regional(blocks) => blocks.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Series – one metric, one region, one point per year
// ---------------------------------------------------------------------------

/// An annual series keyed by calendar year. Lookups by year are explicit map
/// lookups; a missing year is `None`, never a neighbouring value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub name: String,
    points: BTreeMap<i32, f64>,
}

impl Series {
    pub fn new(name: impl Into<String>) -> Self {
        Series {
            name: name.into(),
            points: BTreeMap::new(),
        }
    }

    pub fn from_points(
        name: impl Into<String>,
        points: impl IntoIterator<Item = (i32, f64)>,
    ) -> Self {
        Series {
            name: name.into(),
            points: points.into_iter().collect(),
        }
    }

    pub fn get(&self, year: i32) -> Option<f64> {
        self.points.get(&year).copied()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.points.keys().next().copied()
    }

    pub fn last_year(&self) -> Option<i32> {
        self.points.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in ascending year order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.points.iter().map(|(&y, &v)| (y, v))
    }

    /// A copy keeping only the years inside `range`.
    pub fn restrict(&self, range: DateRange) -> Series {
        Series {
            name: self.name.clone(),
            points: self
                .points
                .range(range.start..=range.end)
                .map(|(&y, &v)| (y, v))
                .collect(),
        }
    }

    /// Apply `f` to every value, keeping the years.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Series {
        Series {
            name: self.name.clone(),
            points: self.points.iter().map(|(&y, &v)| (y, f(v))).collect(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Series {
        self.name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_matches_upper_cased_labels() {
        assert!(Region::UnitedKingdom.matches("UNITED KINGDOM"));
        assert!(Region::NorthernIreland.matches(" northern ireland "));
        assert!(!Region::England.matches("England and Wales"));
    }

    #[test]
    fn region_parses_from_display_name() {
        assert_eq!("wales".parse::<Region>(), Ok(Region::Wales));
        assert!("Mars".parse::<Region>().is_err());
    }

    #[test]
    fn date_range_swaps_reversed_bounds() {
        let r = DateRange::new(2010, 2001);
        assert_eq!(r, DateRange { start: 2001, end: 2010 });
        assert!(r.contains(2001) && r.contains(2010));
        assert!(!r.contains(2011));
    }

    #[test]
    fn series_restrict_is_inclusive() {
        let s = Series::from_points("x", [(2000, 1.0), (2001, 2.0), (2002, 3.0), (2003, 4.0)]);
        let r = s.restrict(DateRange::new(2001, 2002));
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![(2001, 2.0), (2002, 3.0)]);
        assert_eq!(r.first_year(), Some(2001));
        assert_eq!(r.last_year(), Some(2002));
    }
}
