//! Writes a deterministic synthetic data set in the layouts the dashboard
//! reads, plus a `dashboard.json` pointing at it.
//!
//! ```text
//! cargo run --bin generate_sample -- --out sample-data
//! cargo run -- --config sample-data/dashboard.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;

use housing_dash::config::{DashboardConfig, Layout, PartConfig, SourceConfig, Sources};

#[derive(Parser, Debug)]
#[command(about = "Generate a synthetic UK housing data set")]
struct Cli {
    /// Output directory.
    #[arg(long, default_value = "sample-data")]
    out: PathBuf,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// (name, relative price level, population millions in 2001, dwellings thousands in 2001)
const REGIONS: [(&str, f64, f64, f64); 6] = [
    ("United Kingdom", 1.0, 59.1, 25_200.0),
    ("England", 1.05, 49.4, 21_200.0),
    ("Scotland", 0.75, 5.06, 2_310.0),
    ("Wales", 0.7, 2.91, 1_300.0),
    ("Northern Ireland", 0.65, 1.69, 650.0),
    ("London", 1.9, 7.3, 3_100.0),
];

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).with_context(|| format!("invalid date {y}-{m}-{d}"))
}

fn write_bank_rate(dir: &Path, rng: &mut SimpleRng) -> Result<()> {
    let mut w = csv::Writer::from_path(dir.join("bank_rate.csv"))?;
    w.write_record(["Date", "Bank Rate"])?;
    for year in 1975..=2022 {
        let trend = (13.0 - 0.28 * (year - 1975) as f64).max(0.25);
        for month in [2, 6, 10] {
            let rate = (trend + rng.gauss(0.0, 0.4)).max(0.1);
            let d = date(year, month, 1 + (rng.next_u64() % 27) as u32)?;
            w.write_record([d.format("%d %b %Y").to_string(), format!("{rate:.2}")])?;
        }
    }
    w.flush()?;
    Ok(())
}

fn write_house_prices(dir: &Path, rng: &mut SimpleRng) -> Result<()> {
    let mut w = csv::Writer::from_path(dir.join("hpi.csv"))?;
    w.write_record(["Date", "Region_Name", "Average_Price"])?;
    for (name, level, _, _) in REGIONS {
        let mut price = 9_000.0 * level;
        for year in 1975..=2022 {
            for month in 1..=12 {
                price *= 1.0 + rng.gauss(0.0055, 0.004);
                w.write_record([
                    date(year, month, 1)?.to_string(),
                    name.to_string(),
                    format!("{price:.0}"),
                ])?;
            }
        }
    }
    w.flush()?;
    Ok(())
}

/// ONS-style wide file: title lines above the header, upper-case names, no London.
fn write_population(dir: &Path, rng: &mut SimpleRng) -> Result<()> {
    let mut w = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(dir.join("population.csv"))?;
    for line in [
        "Population estimates - local authority based by single year of age",
        "ONS Crown Copyright Reserved",
        "Units: persons",
        "Date: mid-year",
        "Sex: All persons",
        "Age: All Ages",
        "Geography: countries",
    ] {
        w.write_record([line])?;
    }
    let mut header = vec!["Code".to_string(), "Name".into(), "Geography".into()];
    header.extend((2001..=2020).map(|y| format!("Mid-{y}")));
    w.write_record(&header)?;

    for (i, (name, _, millions, _)) in REGIONS.iter().enumerate() {
        if *name == "London" {
            continue;
        }
        let mut row = vec![format!("K0{i}000001"), name.to_uppercase(), "Country".into()];
        let mut pop = millions * 1e6;
        for _ in 2001..=2020 {
            row.push(format!("{pop:.0}"));
            pop *= 1.0 + rng.gauss(0.0065, 0.001);
        }
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

/// One file per region sheet, in thousands, with a gap marker for 2004.
fn write_dwellings(dir: &Path, rng: &mut SimpleRng) -> Result<Vec<PartConfig>> {
    let mut parts = Vec::new();
    for (i, (name, _, _, thousands)) in REGIONS.iter().enumerate() {
        if *name == "London" {
            continue;
        }
        let file = format!("dwellings_{}.csv", name.to_lowercase().replace(' ', "_"));
        let mut w = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(dir.join(&file))?;
        w.write_record([format!("Table {}", i + 1)])?;
        w.write_record([format!("Dwelling stock by tenure, {name}")])?;
        w.write_record(["Thousands"])?;
        w.write_record(["Source: synthetic"])?;
        w.write_record(["Date", "All dwellings"])?;
        let mut stock = *thousands;
        for year in 2001..=2020 {
            let value = if year == 2004 && *name == "Northern Ireland" {
                "..".to_string()
            } else {
                format!("{stock:.0}")
            };
            w.write_record([format!("As at 31 March {year}"), value])?;
            stock *= 1.0 + rng.gauss(0.0075, 0.0015);
        }
        w.flush()?;
        parts.push(PartConfig {
            region: Some(name.to_string()),
            ..PartConfig::file(&file, 4)
        });
    }
    Ok(parts)
}

fn write_deflator(dir: &Path, rng: &mut SimpleRng) -> Result<()> {
    let mut w = csv::Writer::from_path(dir.join("gdp_deflator.csv"))?;
    w.write_record(["Financial year", "GDP deflator"])?;
    let mut level = 18.0;
    for year in 1975..=2022 {
        w.write_record([format!("{year}-{:02}", (year + 1) % 100), format!("{level:.3}")])?;
        let inflation = if year < 1992 { 0.07 } else { 0.022 };
        level *= 1.0 + rng.gauss(inflation, 0.01);
    }
    w.flush()?;
    Ok(())
}

fn write_wages(dir: &Path, rng: &mut SimpleRng) -> Result<()> {
    let mut w = csv::Writer::from_path(dir.join("wages.csv"))?;
    w.write_record(["Year", "Description", "Median"])?;
    for (name, level, _, _) in REGIONS {
        let mut pay = 60.0 * level.sqrt();
        for year in 1975..=2022 {
            let value = if year == 1990 && name == "Wales" {
                "-".to_string()
            } else {
                format!("{pay:.1}")
            };
            w.write_record([year.to_string(), name.to_string(), value])?;
            pay *= 1.0 + rng.gauss(0.045, 0.01);
        }
    }
    w.flush()?;
    Ok(())
}

fn csv_source(file: &str, header_row: usize, layout: Layout, scale: f64) -> SourceConfig {
    SourceConfig {
        parts: vec![PartConfig::file(file, header_row)],
        layout,
        missing: vec!["..".into(), "-".into()],
        scale,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = SimpleRng::new(cli.seed);
    fs::create_dir_all(&cli.out).with_context(|| format!("creating {}", cli.out.display()))?;

    write_bank_rate(&cli.out, &mut rng)?;
    write_house_prices(&cli.out, &mut rng)?;
    write_population(&cli.out, &mut rng)?;
    let dwelling_parts = write_dwellings(&cli.out, &mut rng)?;
    write_deflator(&cli.out, &mut rng)?;
    write_wages(&cli.out, &mut rng)?;

    let config = DashboardConfig {
        data_dir: cli.out.clone(),
        sources: Sources {
            bank_rate: csv_source(
                "bank_rate.csv",
                0,
                Layout::long("Date", None, &["Bank Rate"]),
                1.0,
            ),
            house_prices: csv_source(
                "hpi.csv",
                0,
                Layout::long("Date", Some("Region_Name"), &["Average_Price"]),
                1.0,
            ),
            population: csv_source(
                "population.csv",
                7,
                Layout::Wide {
                    id_columns: vec!["Code".into(), "Name".into(), "Geography".into()],
                    region: "Name".into(),
                    value_name: "Population".into(),
                },
                1.0,
            ),
            dwellings: SourceConfig {
                parts: dwelling_parts,
                layout: Layout::long("Date", None, &["All dwellings"]),
                missing: vec!["..".into(), "-".into()],
                scale: 1000.0,
            },
            gdp_deflator: csv_source(
                "gdp_deflator.csv",
                0,
                Layout::long("Financial year", None, &["GDP deflator"]),
                1.0,
            ),
            wages: csv_source(
                "wages.csv",
                0,
                Layout::long("Year", Some("Description"), &["Median"]),
                1.0,
            ),
        },
        ..DashboardConfig::default()
    };

    let config_path = cli.out.join("dashboard.json");
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)
        .with_context(|| format!("writing {}", config_path.display()))?;

    println!(
        "Wrote sample data set to {} (config: {})",
        cli.out.display(),
        config_path.display()
    );
    Ok(())
}
