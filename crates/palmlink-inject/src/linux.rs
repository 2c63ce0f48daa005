//! Linux X11 input injection via the XTest extension.
//!
//! Uses `XTestFakeMotionEvent`, `XTestFakeButtonEvent`, and
//! `XTestFakeKeyEvent` to inject events into the X11 session. Synthesized
//! events are delivered to the focused window exactly like physical input.
//!
//! # Key name translation
//!
//! The dispatcher hands this backend lowercase key names (`"q"`, `"7"`).
//! X11 identifies keys by *KeySym*; for ASCII letters and digits the KeySym
//! value equals the character's codepoint (`XK_a` = 0x0061). The conversion
//! to the wire-level keycode is:
//!
//! ```text
//! key name → KeySym → XKeysymToKeycode(display, keysym) → X11 keycode
//! ```
//!
//! # Scaffold status
//!
//! Like the other platform backends this validates the translation path but
//! defers the actual XTest FFI calls. The production implementation holds a
//! `*mut x11::xlib::Display` obtained from `XOpenDisplay(null)` and passes it
//! to each XTest call, followed by `XFlush`.
//!
//! # Permissions
//!
//! XTest requires access to the X display. If `DISPLAY` is unset or the X
//! server is unreachable, construction fails and the caller falls back to the
//! no-op backend.

use palmlink_core::{InjectionError, InputInjector};

/// `CurrentTime` (0) tells XTest to stamp events with the server's clock.
const CURRENT_TIME: u64 = 0;

/// Screen number `-1` means "the screen currently containing the pointer",
/// which is correct for absolute motion events.
const SCREEN_DEFAULT: i32 = -1;

/// X11 button number of the primary (left) button.
const BUTTON_LEFT: u32 = 1;

/// Maps a lowercase ASCII key name to its X11 KeySym.
///
/// Only single alphanumeric characters have a mapping — that covers the whole
/// virtual keyboard vocabulary. Returns `None` for anything else.
fn key_to_keysym(key: &str) -> Option<u32> {
    let mut chars = key.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    if c.is_ascii_lowercase() || c.is_ascii_digit() {
        Some(c as u32)
    } else {
        None
    }
}

/// X11/XTest injection backend.
pub struct XTestInjector {
    // Production: *mut x11::xlib::Display from XOpenDisplay(null).
}

impl XTestInjector {
    /// Connects to the X display named by the `DISPLAY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::Unavailable`] when no display can be opened.
    pub fn new() -> Result<Self, InjectionError> {
        if std::env::var_os("DISPLAY").is_none() {
            return Err(InjectionError::Unavailable);
        }
        // Production: XOpenDisplay(null), checking for a null return.
        Ok(Self {})
    }
}

impl InputInjector for XTestInjector {
    fn move_to(&self, x: i32, y: i32) -> Result<(), InjectionError> {
        // Production: XTestFakeMotionEvent(display, SCREEN_DEFAULT, x, y,
        // CURRENT_TIME) followed by XFlush(display).
        let _ = (x, y, SCREEN_DEFAULT);
        Ok(())
    }

    fn click(&self) -> Result<(), InjectionError> {
        // Production: XTestFakeButtonEvent(display, BUTTON_LEFT, True,
        // CURRENT_TIME) then the matching release.
        let _ = (BUTTON_LEFT, CURRENT_TIME);
        Ok(())
    }

    fn press_key(&self, key: &str) -> Result<(), InjectionError> {
        let keysym = key_to_keysym(key)
            .ok_or_else(|| InjectionError::Platform(format!("no KeySym for key {key:?}")))?;
        // Production: keycode = XKeysymToKeycode(display, keysym), then
        // XTestFakeKeyEvent press + release, then XFlush(display).
        let _ = keysym;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_map_to_ascii_keysyms() {
        assert_eq!(key_to_keysym("a"), Some(0x61));
        assert_eq!(key_to_keysym("q"), Some(0x71));
        assert_eq!(key_to_keysym("z"), Some(0x7A));
    }

    #[test]
    fn test_digits_map_to_ascii_keysyms() {
        assert_eq!(key_to_keysym("0"), Some(0x30));
        assert_eq!(key_to_keysym("9"), Some(0x39));
    }

    #[test]
    fn test_unmapped_names_are_rejected() {
        assert_eq!(key_to_keysym(""), None);
        assert_eq!(key_to_keysym("qq"), None);
        assert_eq!(key_to_keysym("Q"), None, "dispatcher lowercases before the backend");
        assert_eq!(key_to_keysym("enter"), None);
    }
}
