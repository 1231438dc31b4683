use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};

use super::model::{Coverage, Observation, RegionalBlock, Table};
use crate::config::{DashboardConfig, Layout, PartConfig, SourceConfig};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Every source, loaded and reshaped into its region coverage.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTables {
    pub bank_rate: Coverage,
    pub house_prices: Coverage,
    pub population: Coverage,
    pub dwellings: Coverage,
    pub gdp_deflator: Coverage,
    pub wages: Coverage,
}

/// Load all six sources. The first source that fails aborts the load; the
/// dashboard is never shown with a partial data set.
pub fn load(config: &DashboardConfig) -> Result<RawTables, DashboardError> {
    let s = &config.sources;
    let load_one = |name: &str, source: &SourceConfig| -> Result<Coverage, DashboardError> {
        let coverage =
            load_source(config, source).map_err(|e| DashboardError::source_parse(name, e))?;
        log::info!(
            "Loaded {name}: {} rows, {} region blocks",
            coverage.row_count(),
            coverage.region_count()
        );
        Ok(coverage)
    };

    Ok(RawTables {
        bank_rate: load_one("bank_rate", &s.bank_rate)?,
        house_prices: load_one("house_prices", &s.house_prices)?,
        population: load_one("population", &s.population)?,
        dwellings: load_one("dwellings", &s.dwellings)?,
        gdp_deflator: load_one("gdp_deflator", &s.gdp_deflator)?,
        wages: load_one("wages", &s.wages)?,
    })
}

/// Load one source: read every part, apply its layout, and assemble the
/// rows into a [`Coverage`].
pub fn load_source(config: &DashboardConfig, source: &SourceConfig) -> Result<Coverage> {
    let mut tagged = Vec::new();
    for part in &source.parts {
        let path = config.resolve(&part.path);
        let grid = read_grid(&path, part.sheet.as_deref())
            .with_context(|| format!("reading {}", path.display()))?;
        let rows = parse_part(&grid, part, source)
            .with_context(|| format!("parsing {}", path.display()))?;
        tagged.extend(rows);
    }
    assemble(source_columns(&source.layout), tagged)
}

// ---------------------------------------------------------------------------
// Grid readers – dispatch by extension
// ---------------------------------------------------------------------------

/// Cell text, row by row, exactly as it appears in the file.
type Grid = Vec<Vec<String>>;

fn read_grid(path: &Path, sheet: Option<&str>) -> Result<Grid> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => read_csv_grid(path),
        "xlsx" | "xlsm" | "xls" | "ods" => read_workbook_grid(path, sheet),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// CSV files: no header handling here, ragged rows allowed (ONS files carry
/// title lines above the real header).
fn read_csv_grid(path: &Path) -> Result<Grid> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    reader
        .records()
        .enumerate()
        .map(|(i, rec)| -> Result<Vec<String>> {
            let rec = rec.with_context(|| format!("CSV line {}", i + 1))?;
            Ok(rec.iter().map(|c| c.trim().to_string()).collect())
        })
        .collect()
}

fn read_workbook_grid(path: &Path, sheet: Option<&str>) -> Result<Grid> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| anyhow::anyhow!("opening workbook: {e}"))?;

    let name = match sheet {
        Some(s) => s.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .context("workbook has no sheets")?,
    };
    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| anyhow::anyhow!("reading sheet '{name}': {e}"))?;

    // The range starts at the first used cell; pad so `header_row` counts
    // from the top of the sheet.
    let top = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut grid: Grid = vec![Vec::new(); top];
    grid.extend(range.rows().map(|row| row.iter().map(cell_text).collect()));
    Ok(grid)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) => s.trim().to_string(),
        Data::Float(f) => format_float(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(|d| d.to_string())
            .unwrap_or_default(),
        // Empty cells and #N/A-style error cells both read as blank.
        _ => String::new(),
    }
}

/// Integral floats print without a fractional part so year cells stored as
/// numbers ("2001.0") parse as years.
fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Excel day serials count from 1899-12-30.
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(chrono::Duration::days(serial.floor() as i64))
}

// ---------------------------------------------------------------------------
// Layout parsing
// ---------------------------------------------------------------------------

/// One parsed row, with the region label it belongs to (if any).
type TaggedRow = (Option<String>, Observation);

fn source_columns(layout: &Layout) -> Vec<String> {
    match layout {
        Layout::Long { values, .. } => values.clone(),
        Layout::Wide { value_name, .. } => vec![value_name.clone()],
    }
}

fn parse_part(grid: &Grid, part: &PartConfig, source: &SourceConfig) -> Result<Vec<TaggedRow>> {
    let header = grid
        .get(part.header_row)
        .with_context(|| format!("no header at row {}", part.header_row + 1))?;
    // Line numbers in messages are 1-based file lines.
    let body = grid
        .iter()
        .enumerate()
        .skip(part.header_row + 1)
        .filter(|(_, row)| row.iter().any(|c| !c.is_empty()));

    match &source.layout {
        Layout::Long { date, region, values } => {
            let date_idx = column(header, date)?;
            let region_idx = region.as_deref().map(|r| column(header, r)).transpose()?;
            let value_idxs = values
                .iter()
                .map(|v| column(header, v))
                .collect::<Result<Vec<_>>>()?;

            let mut out = Vec::new();
            for (line, row) in body {
                let date_cell = cell(row, date_idx);
                if date_cell.is_empty() {
                    continue;
                }
                let date = parse_date(date_cell).with_context(|| format!("line {}", line + 1))?;
                let region = match (&part.region, region_idx) {
                    (Some(tag), _) => Some(tag.clone()),
                    (None, Some(i)) => Some(cell(row, i).to_string()),
                    (None, None) => None,
                };
                let values = value_idxs
                    .iter()
                    .map(|&i| parse_value(cell(row, i), &source.missing, source.scale))
                    .collect::<Result<Vec<_>>>()
                    .with_context(|| format!("line {}", line + 1))?;
                out.push((region, Observation { date, values }));
            }
            Ok(out)
        }
        Layout::Wide { id_columns, region, .. } => {
            let region_idx = column(header, region)?;
            let date_cols = header
                .iter()
                .enumerate()
                .filter(|(_, h)| !h.is_empty() && !id_columns.contains(*h))
                .map(|(i, h)| {
                    parse_date(h)
                        .with_context(|| format!("header column {}", i + 1))
                        .map(|d| (i, d))
                })
                .collect::<Result<Vec<_>>>()?;

            let mut out = Vec::new();
            for (line, row) in body {
                let label = part.region.as_deref().unwrap_or_else(|| cell(row, region_idx));
                if label.is_empty() {
                    continue;
                }
                for &(i, date) in &date_cols {
                    let value = parse_value(cell(row, i), &source.missing, source.scale)
                        .with_context(|| format!("line {}, column {}", line + 1, i + 1))?;
                    out.push((
                        Some(label.to_string()),
                        Observation {
                            date,
                            values: vec![value],
                        },
                    ));
                }
            }
            Ok(out)
        }
    }
}

fn column(header: &[String], name: &str) -> Result<usize> {
    header
        .iter()
        .position(|h| h == name)
        .with_context(|| format!("missing '{name}' column"))
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Group tagged rows into a [`Coverage`]. Blocks keep the order in which
/// their region first appears; rows inside a block are sorted by date.
fn assemble(columns: Vec<String>, rows: Vec<TaggedRow>) -> Result<Coverage> {
    if rows.iter().all(|(region, _)| region.is_none()) {
        let mut table = Table::new(columns);
        table.rows = rows.into_iter().map(|(_, obs)| obs).collect();
        table.rows.sort_by_key(|o| o.date);
        return Ok(Coverage::National(table));
    }

    let mut blocks: Vec<RegionalBlock> = Vec::new();
    for (region, obs) in rows {
        let Some(region) = region else {
            bail!("row dated {} has no region", obs.date);
        };
        match blocks.iter_mut().find(|b| b.region == region) {
            Some(block) => block.table.rows.push(obs),
            None => {
                let mut table = Table::new(columns.clone());
                table.rows.push(obs);
                blocks.push(RegionalBlock { region, table });
            }
        }
    }
    for block in &mut blocks {
        block.table.rows.sort_by_key(|o| o.date);
    }
    Ok(Coverage::Regional(blocks))
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Parse a numeric cell. Blank cells, the source's missing markers and
/// non-finite spellings (`NaN`, `inf`) become `None`; anything else that is
/// not a number is an error.
pub fn parse_value(raw: &str, missing: &[String], scale: f64) -> Result<Option<f64>> {
    let t = raw.trim();
    if t.is_empty() || missing.iter().any(|m| m == t) {
        return Ok(None);
    }
    let cleaned: String = t.chars().filter(|&c| c != ',').collect();
    let v = cleaned
        .parse::<f64>()
        .with_context(|| format!("'{t}' is not a number"))?;
    Ok(Some(v * scale).filter(|v| v.is_finite()))
}

/// Parse a date label to a calendar date.
///
/// Any non-numeric prefix is stripped first ("Mid-2001", "As at 31 March
/// 2001"). Accepted forms, tried in order:
/// * full dates: `2001-04-01`, `2001-04-01 00:00:00`, `01/04/2001`,
///   `01 Apr 2001`, `1 April 2001`
/// * year-month: `2001-04`
/// * anything starting with a four digit year: `2001`, `1975-76`, `1975 Q1`
///   (mapped to 1 January)
pub fn parse_date(label: &str) -> Result<NaiveDate> {
    let s = label
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .trim();
    if s.is_empty() {
        bail!("'{label}' contains no date");
    }

    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%d %b %Y", "%d %B %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return Ok(d);
    }

    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() == 4 {
        let year: i32 = digits.parse().context("year")?;
        if let Some(d) = NaiveDate::from_ymd_opt(year, 1, 1) {
            return Ok(d);
        }
    }
    bail!("cannot parse '{label}' as a date")
}
