//! Recording test doubles for the dispatch ports.
//!
//! The real injectors make OS calls that need a desktop session and actually
//! move the cursor on the test machine. These doubles record every call into
//! `Mutex<Vec<…>>` fields instead, so tests can assert exactly what was
//! injected and in what order. They are compiled into the library (not behind
//! `#[cfg(test)]`) because the station and receiver crates use them in their
//! own tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{DispatchRecord, EventSink, InjectionError, InputInjector};

/// One recorded injector call, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectedOp {
    MoveTo(i32, i32),
    Click,
    KeyPress(String),
}

/// Failure behavior of a [`RecordingInjector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureMode {
    None,
    /// Every call returns [`InjectionError::Platform`].
    Platform,
    /// Every call returns [`InjectionError::Unavailable`].
    Unavailable,
}

/// An injector that records calls instead of performing them.
pub struct RecordingInjector {
    /// Every call in the order it arrived.
    pub ops: Mutex<Vec<InjectedOp>>,
    attempts: AtomicUsize,
    failure: FailureMode,
}

impl RecordingInjector {
    /// A healthy injector: records every call and succeeds.
    pub fn new() -> Self {
        Self::with_failure(FailureMode::None)
    }

    /// An injector whose every call fails with a transient platform error.
    pub fn failing() -> Self {
        Self::with_failure(FailureMode::Platform)
    }

    /// An injector whose every call reports the surface as gone.
    pub fn unavailable() -> Self {
        Self::with_failure(FailureMode::Unavailable)
    }

    fn with_failure(failure: FailureMode) -> Self {
        Self {
            ops: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
            failure,
        }
    }

    /// Number of calls that reached this injector, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    fn call(&self, op: InjectedOp) -> Result<(), InjectionError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        match self.failure {
            FailureMode::None => {
                self.ops.lock().unwrap().push(op);
                Ok(())
            }
            FailureMode::Platform => Err(InjectionError::Platform("mock failure".into())),
            FailureMode::Unavailable => Err(InjectionError::Unavailable),
        }
    }
}

impl Default for RecordingInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl InputInjector for RecordingInjector {
    fn move_to(&self, x: i32, y: i32) -> Result<(), InjectionError> {
        self.call(InjectedOp::MoveTo(x, y))
    }

    fn click(&self) -> Result<(), InjectionError> {
        self.call(InjectedOp::Click)
    }

    fn press_key(&self, key: &str) -> Result<(), InjectionError> {
        self.call(InjectedOp::KeyPress(key.to_string()))
    }
}

/// An event sink that keeps every record in memory.
#[derive(Default)]
pub struct RecordingSink {
    pub records: Mutex<Vec<DispatchRecord>>,
}

impl EventSink for RecordingSink {
    fn record(&self, record: DispatchRecord) {
        self.records.lock().unwrap().push(record);
    }
}
