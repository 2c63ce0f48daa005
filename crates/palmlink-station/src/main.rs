//! Palmlink station — entry point.
//!
//! Wires together the session context, the injection backend, the event
//! sink, the frame loop, and the HTTP service, then runs until Ctrl+C or a
//! `POST /quit`.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  ├─ SessionContext          -- mode, relay, text buffer, running flag
//!  ├─ select_injector()       -- platform / no-op injection backend
//!  ├─ JsonlEventSink          -- append-only dispatch audit log
//!  ├─ run_frame_loop()        -- capture → detect → classify → dispatch
//!  └─ run_http_server()       -- /switch, /api/cursor, /api/text, /quit
//! ```
//!
//! # Capability flags
//!
//! One pipeline serves every deployment; what varies is which backends are
//! attached, resolved once at startup:
//!
//! - *capture*: this build ships the placeholder source (camera backends are
//!   external); the loop degrades to serving the relay and HTTP surface.
//! - *detector*: the landmark detector is an external runtime; without it
//!   the null detector reports no hands.
//! - *injection*: platform backend unless `--headless` (or the config) turns
//!   it off, with a no-op fallback when no display is reachable.
//!
//! # Usage
//!
//! ```text
//! palmlink-station [OPTIONS]
//!
//! Options:
//!   --config <PATH>        Config file path [default: palmlink.toml]
//!   --http-port <PORT>     HTTP service port (overrides config)
//!   --bind <ADDR>          Bind address (overrides config)
//!   --frame-width <PX>     Capture frame width (overrides config)
//!   --frame-height <PX>    Capture frame height (overrides config)
//!   --headless             Disable input injection
//!   --event-log <PATH>     Dispatch log path (overrides config)
//! ```
//!
//! Each option can also be set through a `PALMLINK_*` environment variable;
//! CLI flags take precedence.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use palmlink_core::{DiscardSink, EventSink, FrameSize, InputDispatcher};
use palmlink_inject::select_injector;
use palmlink_station::application::frame_loop::run_frame_loop;
use palmlink_station::application::process_frame::ProcessFrameUseCase;
use palmlink_station::application::session::SessionContext;
use palmlink_station::infrastructure::capture::PlaceholderSource;
use palmlink_station::infrastructure::config::{load_config, StationConfig};
use palmlink_station::infrastructure::detector::NullDetector;
use palmlink_station::infrastructure::http::run_http_server;
use palmlink_station::infrastructure::sink::JsonlEventSink;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Palmlink capture-side daemon.
#[derive(Debug, Parser)]
#[command(
    name = "palmlink-station",
    about = "Hand-gesture capture daemon with an HTTP cursor relay",
    version
)]
struct Cli {
    /// Path of the TOML config file.
    #[arg(long, default_value = "palmlink.toml", env = "PALMLINK_CONFIG")]
    config: String,

    /// TCP port for the HTTP service.
    #[arg(long, env = "PALMLINK_HTTP_PORT")]
    http_port: Option<u16>,

    /// IP address to bind the HTTP service to.
    #[arg(long, env = "PALMLINK_BIND")]
    bind: Option<String>,

    /// Capture frame width in pixels.
    #[arg(long, env = "PALMLINK_FRAME_WIDTH")]
    frame_width: Option<u32>,

    /// Capture frame height in pixels.
    #[arg(long, env = "PALMLINK_FRAME_HEIGHT")]
    frame_height: Option<u32>,

    /// Disable input injection for this session.
    #[arg(long, env = "PALMLINK_HEADLESS")]
    headless: bool,

    /// Path of the append-only dispatch log.
    #[arg(long, env = "PALMLINK_EVENT_LOG")]
    event_log: Option<String>,
}

impl Cli {
    /// Applies CLI overrides on top of the file-loaded config.
    fn apply_overrides(&self, mut config: StationConfig) -> StationConfig {
        if let Some(port) = self.http_port {
            config.network.http_port = port;
        }
        if let Some(bind) = &self.bind {
            config.network.bind_address = bind.clone();
        }
        if let Some(width) = self.frame_width {
            config.capture.frame_width = width;
        }
        if let Some(height) = self.frame_height {
            config.capture.frame_height = height;
        }
        if self.headless {
            config.station.headless = true;
        }
        if let Some(event_log) = &self.event_log {
            config.station.event_log = event_log.clone();
        }
        config
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.apply_overrides(load_config(Path::new(&cli.config))?);

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.station.log_level.clone())),
        )
        .init();

    let ctx = Arc::new(SessionContext::new());
    info!("Palmlink station starting (session {})", ctx.session_id);
    info!(
        "capabilities: capture=placeholder detector=none injection={}",
        if config.station.headless { "disabled" } else { "platform" }
    );

    // ── Dispatch plumbing ─────────────────────────────────────────────────────
    let injector = select_injector(config.station.headless);
    let sink: Arc<dyn EventSink> = match JsonlEventSink::create(Path::new(&config.station.event_log))
    {
        Ok(sink) => Arc::new(sink),
        Err(e) => {
            warn!("event log unavailable ({e}); dispatch records will be discarded");
            Arc::new(DiscardSink)
        }
    };
    let dispatcher = Arc::new(InputDispatcher::new(injector, sink, ctx.session_id));

    // ── Frame pipeline ────────────────────────────────────────────────────────
    let frame = FrameSize::new(config.capture.frame_width, config.capture.frame_height);
    let idle_backoff = Duration::from_millis(config.capture.idle_backoff_ms);
    let use_case = ProcessFrameUseCase::new(frame, dispatcher, Arc::clone(&ctx));
    let capture = Arc::new(PlaceholderSource::new(frame, idle_backoff));
    let detector = Arc::new(NullDetector);

    let frame_task = tokio::spawn(run_frame_loop(
        use_case,
        capture,
        detector,
        Arc::clone(&ctx),
        idle_backoff,
    ));

    // ── Ctrl+C handler ────────────────────────────────────────────────────────
    let ctx_signal = Arc::clone(&ctx);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            ctx_signal.request_shutdown();
        }
    });

    // ── HTTP service ──────────────────────────────────────────────────────────
    let bind_addr: SocketAddr = format!(
        "{}:{}",
        config.network.bind_address, config.network.http_port
    )
    .parse()
    .with_context(|| {
        format!(
            "invalid bind address: '{}:{}'",
            config.network.bind_address, config.network.http_port
        )
    })?;

    run_http_server(bind_addr, Arc::clone(&ctx)).await?;

    frame_task.await.context("frame loop task panicked")?;
    info!("Palmlink station stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
