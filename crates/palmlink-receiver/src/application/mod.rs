//! Application layer use cases for the receiver.
//!
//! - **`replay_cursor`** – Translates one polled cursor snapshot into local
//!   pointer input: scaling to the local screen, duplicate-move suppression,
//!   and move-before-click ordering.

pub mod replay_cursor;
