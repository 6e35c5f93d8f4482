//! vitalwatch console front-end.
//!
//! Loads the settings document, starts the monitoring pipeline, and polls
//! it at a fixed cadence, printing each snapshot until Ctrl-C (or an
//! optional duration elapses). Diagnostics go to stderr and to an
//! append-only application log file; alerts additionally land in the
//! pipeline's own durable alert log.

mod render;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vitalwatch_core::MonitorSettings;
use vitalwatch_pipeline::Monitor;

use render::ConsoleRenderer;

#[derive(Parser, Debug)]
#[command(name = "vitalwatch", about = "Single-subject biometric monitoring console")]
struct Args {
    /// Path to the settings document
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Path to the append-only alert log
    #[arg(long, default_value = "alerts.log")]
    alert_log: PathBuf,

    /// Path to the append-only application log
    #[arg(long, default_value = "application.log")]
    app_log: PathBuf,

    /// Consumer poll interval in milliseconds
    #[arg(long, default_value = "500")]
    poll_ms: u64,

    /// Stop after this many seconds (runs until Ctrl-C when omitted)
    #[arg(long)]
    duration_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let app_log = File::options()
        .create(true)
        .append(true)
        .open(&args.app_log)
        .with_context(|| format!("opening application log {}", args.app_log.display()))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(app_log)),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "application started");

    let settings = MonitorSettings::load(&args.settings);
    let mut monitor = Monitor::new(settings, &args.alert_log);
    monitor.start();

    let mut renderer = ConsoleRenderer::new();
    let mut poll = tokio::time::interval(Duration::from_millis(args.poll_ms.max(1)));
    let deadline = args
        .duration_secs
        .map(|secs| tokio::time::Instant::now() + Duration::from_secs(secs));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("exit requested");
                break;
            }
            _ = poll.tick() => {
                monitor.tick_with(&mut renderer);
                if deadline.is_some_and(|d| tokio::time::Instant::now() >= d) {
                    break;
                }
            }
        }
    }

    monitor.stop().await;
    tracing::info!("application stopped");
    Ok(())
}
