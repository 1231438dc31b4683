use std::path::PathBuf;

use thiserror::Error;

use crate::data::model::{DateRange, Region};

/// Everything that can go wrong between reading the sources and drawing the
/// charts.
///
/// `SourceParse` and `Config` are fatal: the dashboard refuses to start
/// without every source. The other variants are non-fatal and travel as
/// [`Notice`]s next to the data they affect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("failed to parse source '{source_name}': {detail}")]
    SourceParse { source_name: String, detail: String },

    #[error("failed to read config {}: {detail}", path.display())]
    Config { path: PathBuf, detail: String },

    #[error("{series}: no rows for region {region}")]
    EmptyRegion { series: String, region: Region },

    #[error("{series}: no value for base year {year}, index not computed")]
    MissingBaseYear { series: String, year: i32 },

    #[error("{series}: base value {value} in {year} cannot anchor an index")]
    InvalidBaseValue { series: String, year: i32, value: f64 },

    #[error("{series}: no data between {} and {}", range.start, range.end)]
    DateRangeEmpty { series: String, range: DateRange },
}

impl DashboardError {
    /// Wrap an `anyhow` chain as a source parse failure, keeping every
    /// context layer in the message.
    pub fn source_parse(source_name: &str, err: anyhow::Error) -> Self {
        DashboardError::SourceParse {
            source_name: source_name.to_string(),
            detail: format!("{err:#}"),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DashboardError::SourceParse { .. } | DashboardError::Config { .. }
        )
    }
}

/// A non-fatal condition raised while normalising one series. The series it
/// refers to is rendered empty; the message is logged and shown in the UI.
pub type Notice = DashboardError;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn source_parse_keeps_context_chain() {
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("bad number 'x'")).context("row 3");
        let e = DashboardError::source_parse("population", err.unwrap_err());
        assert!(e.is_fatal());
        let msg = e.to_string();
        assert!(msg.contains("population"));
        assert!(msg.contains("row 3: bad number 'x'"));
    }

    #[test]
    fn notices_are_not_fatal() {
        let e = DashboardError::MissingBaseYear {
            series: "Dwellings".into(),
            year: 2005,
        };
        assert!(!e.is_fatal());
        assert_eq!(e.to_string(), "Dwellings: no value for base year 2005, index not computed");
    }
}
