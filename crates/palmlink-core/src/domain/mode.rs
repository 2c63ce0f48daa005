//! Interaction mode and its shared controller.
//!
//! The mode decides which hand drives which concern: in `mouse` mode the left
//! hand moves the pointer and pinch-clicks; in `keyboard` mode the right hand
//! taps virtual keys. There is exactly one mode per session and it is never
//! unset after initialization.
//!
//! The controller is shared between the HTTP handler that services the switch
//! endpoint and the frame loop. A switch takes effect for the *next* frame:
//! the frame loop reads the mode once at frame start and uses that local copy
//! for the whole pass, so a request arriving mid-frame cannot change the
//! behavior of the frame in flight.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// The two interaction modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Mouse,
    Keyboard,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Mouse => "mouse",
            Mode::Keyboard => "keyboard",
        }
    }

    fn to_word(self) -> u8 {
        match self {
            Mode::Mouse => 0,
            Mode::Keyboard => 1,
        }
    }

    fn from_word(word: u8) -> Mode {
        match word {
            0 => Mode::Mouse,
            _ => Mode::Keyboard,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mouse" => Ok(Mode::Mouse),
            "keyboard" => Ok(Mode::Keyboard),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode: {0:?} (expected \"mouse\" or \"keyboard\")")]
pub struct UnknownMode(pub String);

/// Thread-safe holder of the current [`Mode`].
///
/// The mode is a single word, so an atomic is enough — readers and writers
/// never observe a torn or intermediate value, and there is no compound
/// read-modify-write to protect.
pub struct ModeController {
    inner: AtomicU8,
}

impl ModeController {
    /// Creates a controller starting in the given mode.
    pub fn new(initial: Mode) -> Self {
        Self {
            inner: AtomicU8::new(initial.to_word()),
        }
    }

    /// The current mode.
    pub fn get(&self) -> Mode {
        Mode::from_word(self.inner.load(Ordering::Relaxed))
    }

    /// Switches the mode. Takes effect for the next frame read.
    pub fn set(&self, mode: Mode) {
        self.inner.store(mode.to_word(), Ordering::Relaxed);
    }
}

impl Default for ModeController {
    /// Sessions start in `mouse` mode.
    fn default() -> Self {
        Self::new(Mode::Mouse)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_mouse() {
        assert_eq!(ModeController::default().get(), Mode::Mouse);
    }

    #[test]
    fn test_set_changes_subsequent_reads() {
        let ctl = ModeController::default();
        ctl.set(Mode::Keyboard);
        assert_eq!(ctl.get(), Mode::Keyboard);
        ctl.set(Mode::Mouse);
        assert_eq!(ctl.get(), Mode::Mouse);
    }

    #[test]
    fn test_mode_parses_recognized_names() {
        assert_eq!("mouse".parse::<Mode>().unwrap(), Mode::Mouse);
        assert_eq!("keyboard".parse::<Mode>().unwrap(), Mode::Keyboard);
    }

    #[test]
    fn test_mode_rejects_unrecognized_names() {
        assert!("trackpad".parse::<Mode>().is_err());
        assert!("Mouse".parse::<Mode>().is_err(), "names are case sensitive");
        assert!("".parse::<Mode>().is_err());
    }

    #[test]
    fn test_mode_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Mode::Mouse).unwrap(), "\"mouse\"");
        let parsed: Mode = serde_json::from_str("\"keyboard\"").unwrap();
        assert_eq!(parsed, Mode::Keyboard);
    }

    #[test]
    fn test_mode_deserialization_rejects_unknown_value() {
        assert!(serde_json::from_str::<Mode>("\"pen\"").is_err());
    }
}
