use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use eframe::egui;

use housing_dash::app::HousingDashApp;
use housing_dash::config::DashboardConfig;
use housing_dash::pipeline;

#[derive(Parser, Debug)]
#[command(name = "housing-dash", about = "UK housing market dashboard", version)]
struct Cli {
    /// JSON config file; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the source files (overrides the config).
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match DashboardConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => DashboardConfig::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    // Every chart depends on every source: no partial dashboard.
    let raw = match pipeline::load(&config) {
        Ok(raw) => raw,
        Err(e) => {
            log::error!("{e}");
            eprintln!("housing-dash: {e}");
            return ExitCode::FAILURE;
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "UK Housing Market Analysis",
        options,
        Box::new(move |_cc| Ok(Box::new(HousingDashApp::new(config, raw)))),
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("UI error: {e}");
            ExitCode::FAILURE
        }
    }
}
