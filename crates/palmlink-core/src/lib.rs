//! # palmlink-core
//!
//! Shared library for Palmlink containing the gesture classification pipeline,
//! the cursor relay state machine, the input dispatch critical section, and
//! the JSON wire types of the HTTP polling protocol.
//!
//! This crate is used by both the station (capture side) and the receiver
//! (injection side). It has zero dependencies on OS APIs, camera or detector
//! runtimes, or network sockets.
//!
//! # Architecture overview
//!
//! Palmlink turns hand poses seen by a camera into real pointer and keyboard
//! input. The machine with the camera (the "station") classifies fingertip
//! landmarks into gesture events and either injects them locally or publishes
//! them through a polled cursor relay. A second machine (the "receiver") polls
//! the relay and replays the events against its own desktop.
//!
//! This crate (`palmlink-core`) is the shared foundation. It defines:
//!
//! - **`domain`** – Pure gesture logic with no OS dependencies: coordinate
//!   mapping between normalized / frame / screen spaces, the pinch click
//!   classifier, the virtual keyboard layout and its hit test, the per-key
//!   debouncer, the interaction mode, and the per-frame gesture classifier.
//!
//! - **`dispatch`** – The single serialized entry point into the OS input
//!   injection surface, expressed against the [`dispatch::InputInjector`]
//!   port so platform backends and tests can be swapped freely.
//!
//! - **`protocol`** – The JSON messages exchanged over the HTTP polling
//!   channel between station and receiver.

pub mod dispatch;
pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `palmlink_core::GestureEvent` instead of the full module path.
pub use dispatch::{
    DiscardSink, DispatchRecord, EventSink, InjectionError, InputDispatcher, InputInjector,
};
pub use domain::classifier::{GestureClassifier, GestureEvent};
pub use domain::debounce::Debouncer;
pub use domain::geometry::{FrameSize, NormalizedPoint, Point, ScreenSize};
pub use domain::hand::{Fingertip, FingertipSet, Handedness};
pub use domain::keyboard::{KeyRegion, KeyboardLayout};
pub use domain::mode::{Mode, ModeController};
pub use domain::relay::{CursorRelay, CursorState};
