//! Input-injection backends for Palmlink.
//!
//! Implements the [`palmlink_core::InputInjector`] port:
//!
//! - **`noop`** – accepts and discards every event. Used when the session is
//!   headless (the hosted relay deployment) and as the safe fallback when no
//!   platform backend can start.
//! - **`linux`** – X11/XTest backend, selected at compile time via
//!   `#[cfg(target_os = "linux")]`.
//!
//! A recording double for tests lives in `palmlink_core::dispatch::mock`.
//!
//! Backend selection happens once at startup through [`select_injector`]; the
//! rest of the program only ever sees `Arc<dyn InputInjector>`.

pub mod noop;

#[cfg(target_os = "linux")]
pub mod linux;

use std::sync::Arc;

use palmlink_core::InputInjector;
use tracing::{info, warn};

/// Resolves the injection capability for this session.
///
/// `headless = true` forces the no-op backend regardless of platform — the
/// relay and the event sink are the session's only outputs in that
/// deployment. Otherwise the platform backend is tried, falling back to
/// no-op (with a log line) when it cannot start, so a missing display never
/// prevents the service from serving the relay.
pub fn select_injector(headless: bool) -> Arc<dyn InputInjector> {
    if headless {
        info!("injection disabled by configuration; using no-op backend");
        return Arc::new(noop::NoopInjector::new());
    }

    #[cfg(target_os = "linux")]
    {
        match linux::XTestInjector::new() {
            Ok(injector) => {
                info!("using X11/XTest injection backend");
                return Arc::new(injector);
            }
            Err(e) => {
                warn!("X11 injection backend unavailable ({e}); falling back to no-op");
                return Arc::new(noop::NoopInjector::new());
            }
        }
    }

    #[cfg(not(target_os = "linux"))]
    {
        warn!("no injection backend for this platform; using no-op");
        Arc::new(noop::NoopInjector::new())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
