//! Palmlink receiver — entry point.
//!
//! Runs the poll loop: fetch the station's cursor snapshot, replay it as
//! local pointer input, sleep until the next tick. Poll failures are
//! transient — the relay keeps a pending click sticky until a poll succeeds,
//! so the loop just retries after a short delay, throttling its error logs
//! so an unreachable station does not flood the terminal.
//!
//! # Usage
//!
//! ```text
//! palmlink-receiver [OPTIONS]
//!
//! Options:
//!   --station-host <HOST>     Station hostname or IP [default: 127.0.0.1]
//!   --station-port <PORT>     Station HTTP port [default: 5050]
//!   --poll-interval-ms <MS>   Poll cadence [default: 50]
//!   --screen-width <PX>       Local screen width [default: 1920]
//!   --screen-height <PX>      Local screen height [default: 1080]
//! ```
//!
//! Each option can also be set through a `PALMLINK_*` environment variable;
//! CLI flags take precedence.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use palmlink_core::domain::geometry::ScreenSize;
use palmlink_core::{DiscardSink, InputDispatcher};
use palmlink_inject::select_injector;
use palmlink_receiver::application::replay_cursor::ReplayCursorUseCase;
use palmlink_receiver::infrastructure::station_client::StationClient;
use uuid::Uuid;

/// Delay before retrying after a failed poll.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Minimum spacing between connection-error log lines.
const ERROR_LOG_INTERVAL: Duration = Duration::from_secs(2);

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Palmlink injection-side client.
#[derive(Debug, Parser)]
#[command(
    name = "palmlink-receiver",
    about = "Polls a Palmlink station's cursor relay and replays it as local input",
    version
)]
struct Cli {
    /// Hostname or IP address of the station.
    #[arg(long, default_value = "127.0.0.1", env = "PALMLINK_STATION_HOST")]
    station_host: String,

    /// HTTP port of the station.
    #[arg(long, default_value_t = 5050, env = "PALMLINK_STATION_PORT")]
    station_port: u16,

    /// Milliseconds between polls (~20 Hz by default).
    #[arg(long, default_value_t = 50, env = "PALMLINK_POLL_INTERVAL_MS")]
    poll_interval_ms: u64,

    /// Width of the local screen in pixels.
    #[arg(long, default_value_t = 1920, env = "PALMLINK_SCREEN_WIDTH")]
    screen_width: u32,

    /// Height of the local screen in pixels.
    #[arg(long, default_value_t = 1080, env = "PALMLINK_SCREEN_HEIGHT")]
    screen_height: u32,
}

impl Cli {
    fn station_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.station_host, self.station_port)
            .parse()
            .with_context(|| {
                format!(
                    "invalid station address: '{}:{}'",
                    self.station_host, self.station_port
                )
            })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let station_addr = cli.station_addr()?;
    let screen = ScreenSize::new(cli.screen_width, cli.screen_height);
    let poll_interval = Duration::from_millis(cli.poll_interval_ms);

    info!(
        "Palmlink receiver starting — station={station_addr}, screen={}x{}",
        screen.width, screen.height
    );

    // The receiver is the injection side: always try the platform backend.
    let injector = select_injector(false);
    let dispatcher = Arc::new(InputDispatcher::new(
        injector,
        Arc::new(DiscardSink),
        Uuid::new_v4(),
    ));
    let mut replay = ReplayCursorUseCase::new(dispatcher, screen);
    let client = StationClient::new(station_addr);

    // ── Ctrl+C handler ────────────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_signal = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            running_signal.store(false, Ordering::Relaxed);
        }
    });

    // ── Poll loop ─────────────────────────────────────────────────────────────
    let mut ticker = tokio::time::interval(poll_interval);
    // After a retry sleep, resume the cadence instead of bursting the ticks
    // that were missed while the station was unreachable.
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut last_error_log: Option<Instant> = None;
    let mut was_failing = false;

    while running.load(Ordering::Relaxed) {
        ticker.tick().await;

        match client.fetch_cursor().await {
            Ok(snapshot) => {
                if was_failing {
                    info!("station reachable again");
                    // The local cursor may have moved by hand meanwhile.
                    replay.reset();
                    was_failing = false;
                }
                replay.apply(&snapshot);
            }
            Err(e) => {
                was_failing = true;
                let due = last_error_log.map_or(true, |t| t.elapsed() >= ERROR_LOG_INTERVAL);
                if due {
                    warn!("poll failed: {e}; retrying");
                    last_error_log = Some(Instant::now());
                }
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }

    info!("Palmlink receiver stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
