//! TOML-based configuration for the station.
//!
//! All fields carry `#[serde(default = ...)]` values so the station works on
//! first run (no config file yet) and keeps working when a newer build reads
//! an older file that is missing fields. CLI flags (see `main.rs`) override
//! whatever the file provides.
//!
//! Example file:
//!
//! ```toml
//! [station]
//! log_level = "info"
//! headless = false
//! event_log = "palmlink-events.jsonl"
//!
//! [network]
//! http_port = 5050
//! bind_address = "0.0.0.0"
//!
//! [capture]
//! frame_width = 1280
//! frame_height = 720
//! idle_backoff_ms = 250
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level station configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StationConfig {
    #[serde(default)]
    pub station: StationSection,
    #[serde(default)]
    pub network: NetworkSection,
    #[serde(default)]
    pub capture: CaptureSection,
}

/// General behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StationSection {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Run with injection disabled (the hosted relay deployment).
    #[serde(default)]
    pub headless: bool,
    /// Path of the append-only dispatch log.
    #[serde(default = "default_event_log")]
    pub event_log: String,
}

/// HTTP service settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkSection {
    /// TCP port of the HTTP service.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// IP address to bind to. `"0.0.0.0"` binds all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

/// Frame acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureSection {
    /// Capture frame width in pixels.
    #[serde(default = "default_frame_width")]
    pub frame_width: u32,
    /// Capture frame height in pixels.
    #[serde(default = "default_frame_height")]
    pub frame_height: u32,
    /// Backoff between acquisition attempts when no frame is available.
    #[serde(default = "default_idle_backoff_ms")]
    pub idle_backoff_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_event_log() -> String {
    "palmlink-events.jsonl".to_string()
}
fn default_http_port() -> u16 {
    5050
}
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_frame_width() -> u32 {
    1280
}
fn default_frame_height() -> u32 {
    720
}
fn default_idle_backoff_ms() -> u64 {
    250
}

impl Default for StationSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            headless: false,
            event_log: default_event_log(),
        }
    }
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            bind_address: default_bind_address(),
        }
    }
}

impl Default for CaptureSection {
    fn default() -> Self {
        Self {
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
            idle_backoff_ms: default_idle_backoff_ms(),
        }
    }
}

// ── Load / save ───────────────────────────────────────────────────────────────

/// Loads the config from `path`, returning defaults when the file does not
/// exist yet.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found"
/// and [`ConfigError::Parse`] for invalid TOML.
pub fn load_config(path: &Path) -> Result<StationConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StationConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
