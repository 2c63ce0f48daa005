//! palmlink-station library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/` and
//! the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the station do?
//!
//! The *station* is the machine with the camera. Once per frame it asks the
//! hand-landmark detector for fingertip positions, classifies them into
//! gesture events under the current interaction mode, and dispatches the
//! events three ways:
//!
//! 1. Into the local OS input surface (when this deployment has one).
//! 2. Into the cursor relay, which a receiver on another machine polls.
//! 3. Into the append-only event sink for audit/history.
//!
//! Alongside the frame loop it serves the HTTP surface: mode switching,
//! relay report/consume, the typed-text buffer, and remote shutdown.
//!
//! The station runs everywhere from a desktop with a webcam to a headless
//! relay host. Rather than shipping one variant per deployment, a single
//! pipeline is parameterized by capability flags (`has_capture`,
//! `has_detector`, `has_injection`) resolved once at startup.

pub mod application;
pub mod infrastructure;
