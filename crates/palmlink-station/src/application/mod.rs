//! Application layer use cases for the station.
//!
//! Use cases orchestrate the domain objects from `palmlink-core` and depend
//! on abstractions (the capture, detector, injection, and sink ports) rather
//! than concrete implementations, so the infrastructure can be swapped
//! without touching this code.
//!
//! # Sub-modules
//!
//! - **`session`** – The explicit session context: mode, relay, typed-text
//!   buffer, and the running flag, each internally synchronized. Passed to
//!   every component instead of living in globals.
//!
//! - **`process_frame`** – Turns one frame's detected hands into dispatched
//!   gesture events, relay reports, and text-buffer updates. Runs on every
//!   frame; this is the hot path.
//!
//! - **`frame_loop`** – The continuous capture → detect → process loop,
//!   including degraded operation when capture or the detector is missing
//!   and the shutdown protocol.

pub mod frame_loop;
pub mod process_frame;
pub mod session;
