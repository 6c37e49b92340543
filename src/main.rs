mod app;
mod cases;
mod layout;
mod util;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Case dataset, CSV or JSON.
    #[arg(long, default_value = "data/CaseData.csv")]
    data: PathBuf,
    /// Bubble order: `a` largest first, `b` smallest first, anything else shuffled.
    #[arg(long, default_value = "")]
    sort: String,
    /// Seed for the shuffled order.
    #[arg(long)]
    seed: Option<u64>,
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log: String,
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log);

    let config = app::AppConfig {
        data_path: args.data,
        sort: layout::SortMode::from_param(&args.sort, args.seed),
    };
    tracing::info!(data = %config.data_path.display(), sort = ?config.sort, "starting case explorer");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "case-bubbles",
        options,
        Box::new(move |cc| Ok(Box::new(app::CaseChartApp::new(cc, config)))),
    )
}
