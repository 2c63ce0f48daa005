//! palmlink-receiver library entry point.
//!
//! Re-exports all public modules so tests and the binary entry point in
//! `main.rs` share the same module tree.
//!
//! # What does the receiver do?
//!
//! The *receiver* runs on the desktop being controlled. It polls the
//! station's `GET /api/cursor` endpoint (~20 Hz by default), scales the
//! normalized coordinates to its **own** screen resolution, and replays the
//! result as real pointer input through the local injection backend.
//!
//! The relay's click flag is consumed by the poll that fetched it, so a
//! click is injected exactly once no matter how often the receiver polls,
//! and a poll that fails loses nothing — the flag stays set on the station
//! until a poll succeeds.

pub mod application;
pub mod infrastructure;
