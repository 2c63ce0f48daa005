//! Infrastructure layer for the station.
//!
//! Contains the outward-facing adapters: the frame source, the hand-landmark
//! detector boundary, the HTTP service, the append-only event sink, and the
//! TOML configuration store.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `palmlink_core`, but MUST NOT be imported by the application layer.

pub mod capture;
pub mod config;
pub mod detector;
pub mod http;
pub mod sink;
