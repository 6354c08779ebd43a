use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::error;

use climate_panel::{ClimateConfig, ClimatePanel};

/// Vehicle climate panel: temperature dial, fan slider and mode toggles.
#[derive(Parser, Debug)]
#[command(name = "climate-panel", version)]
struct Args {
    /// TrueType/OpenType font used for labels; without it only shapes are drawn
    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long, default_value_t = 420)]
    width: usize,

    #[arg(long, default_value_t = 640)]
    height: usize,

    /// Number of discrete fan speeds
    #[arg(long, default_value_t = 5)]
    fan_steps: usize,

    /// Starting dial temperature
    #[arg(long, default_value_t = 74.0)]
    temperature: f64,
}

fn main() {
    let log_level = std::env::var("CLIMATE_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(&log_level)
        .init();

    let args = Args::parse();
    let config = ClimateConfig::builder()
        .window_width(args.width)
        .window_height(args.height)
        .fan_steps(args.fan_steps)
        .initial_temperature(args.temperature)
        .maybe_font_path(args.font)
        .build();

    let result = ClimatePanel::new(config).and_then(|mut panel| panel.show());
    if let Err(err) = result {
        error!("{err}");
        process::exit(1);
    }
}
