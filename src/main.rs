use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Parser;
use tracing::info;

use update_panel::config::{DisplayMode, PanelConfig};
use update_panel::demo::{self, DemoOptions, DemoStatus};
use update_panel::update_panel;

#[derive(Parser)]
#[command(name = "update-panel", about = "Live-updating terminal panel demo.")]
struct Cli {
    /// Number of state updates to publish
    #[arg(short, long, default_value_t = 1000)]
    iterations: u32,

    /// Delay between updates, in milliseconds
    #[arg(long, default_value_t = 100)]
    delay_ms: u64,

    /// Seed for the description generator (defaults to the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Only redraw on explicit refresh requests
    #[arg(long)]
    no_auto_refresh: bool,

    /// Output mode: auto, live, or fallback
    #[arg(long)]
    mode: Option<DisplayMode>,

    /// Config file (defaults to .update-panel/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("update_panel=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = PanelConfig::load_from(path)?;
            config.apply_env(|name| std::env::var(name).ok())?;
            config
        }
        None => PanelConfig::load()?,
    };
    if cli.no_auto_refresh {
        config.auto_refresh = false;
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }

    let seed = cli.seed.unwrap_or_else(clock_seed);
    let options = DemoOptions {
        iterations: cli.iterations,
        delay: Duration::from_millis(cli.delay_ms),
        seed,
        explicit_refresh: !config.auto_refresh,
    };
    info!(seed, iterations = options.iterations, "starting demo");

    let published = update_panel::<DemoStatus>()
        .with_config(config)
        .render(demo::render_table)
        .fallback_render(demo::render_plain)
        .start(move |ctx| demo::run(ctx, options))
        .await?;

    println!("{published} updates published (seed {seed})");
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
