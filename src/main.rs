//! ecomon: samples host CPU, memory, disk and the busiest processes and
//! renders them to the terminal.
//!
//! Run with:  `RUST_LOG=info ecomon`

mod console;

use anyhow::{Context, Result};
use eco_config::{default_path, load as load_config, ConfigWatcher, SamplingConfig};
use eco_system::{ChannelPresenter, Scheduler, SysinfoProvider, TickSettings};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn tick_settings(cfg: &SamplingConfig) -> TickSettings {
    TickSettings {
        interval:         Duration::from_millis(cfg.interval_ms),
        top_n:            cfg.top_n,
        history_capacity: cfg.history_capacity,
        disk_path:        cfg.disk_path.clone(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging; RUST_LOG controls verbosity (default: info).
    // Logs go to stderr; stdout belongs to the console display.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("ecomon v{} starting", env!("CARGO_PKG_VERSION"));

    let path = default_path();
    let config = load_config(&path).context("loading configuration")?;

    let provider = SysinfoProvider::new(Duration::from_millis(config.sampling.cpu_window_ms));
    let (presenter, mut updates) = ChannelPresenter::new();
    let scheduler = Scheduler::new(provider, presenter, tick_settings(&config.sampling)).spawn();

    let (_watcher, mut reloads) = ConfigWatcher::spawn(&path);
    let mut console = console::Console::new(config.output.format);

    loop {
        tokio::select! {
            Some(msg) = updates.recv() => console.handle(msg)?,
            Some(cfg) = reloads.recv() => {
                info!("Config reloaded");
                if cfg.sampling.cpu_window_ms != config.sampling.cpu_window_ms {
                    warn!("cpu_window_ms only takes effect after a restart");
                }
                console.set_format(cfg.output.format);
                scheduler.reconfigure(tick_settings(&cfg.sampling)).await?;
            }
            res = tokio::signal::ctrl_c() => {
                res.context("installing Ctrl-C handler")?;
                info!("Shutdown requested");
                break;
            }
        }
    }

    scheduler.shutdown().await?;
    Ok(())
}
