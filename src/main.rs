use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use hostpulse::analyze::analyze;
use hostpulse::config::{self, Config};
use hostpulse::report;
use hostpulse::system::collector::Collector;
use hostpulse::system::probe::Probe;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "hostpulse",
    about = "Samples host metrics over a bounded window and reports the trends"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Collection window in minutes
    #[arg(long)]
    duration: Option<u64>,

    /// Print the analysis as JSON instead of rendering charts
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hostpulse=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    let duration = Duration::from_secs(config.general.duration_minutes * 60);

    info!(
        minutes = config.general.duration_minutes,
        "starting collection"
    );
    let mut collector = Collector::new(Probe::new());
    let series = collector.collect(duration).await;

    if series.is_empty() {
        warn!("no samples collected; nothing to analyze");
        return Ok(());
    }

    let result = analyze(&series)?;
    if cli.json || config.report.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let width = report::terminal_chart_width();
        print!(
            "{}",
            report::render_report(&result, width, config.report.chart_height)
        );
    }

    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    };

    if let Some(minutes) = cli.duration {
        config.general.duration_minutes = minutes;
    }

    config
}
