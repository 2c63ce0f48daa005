//! Wire types for the HTTP polling protocol.
//!
//! The station exposes a small JSON-over-HTTP surface; the receiver polls it.
//! Keeping the message structs here — away from any socket code — means both
//! binaries and their tests share one definition of the wire format.

pub mod messages;

pub use messages::{
    CursorReport, CursorSnapshot, ErrorResponse, OkResponse, SwitchRequest, SwitchResponse,
    TextResponse,
};
