//! Append-only event sink backed by a JSON-lines file.
//!
//! Dispatch records are audit data, not control flow: a write must never
//! stall the frame loop and a failed write must never reach the dispatch
//! path. The sink therefore hands records to a dedicated writer thread over
//! a bounded channel — `record` is a `try_send` that drops (and counts) the
//! record when the queue is full or the writer is gone.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{sync_channel, SyncSender, TrySendError};
use std::thread::JoinHandle;

use palmlink_core::{DispatchRecord, EventSink};
use thiserror::Error;
use tracing::{debug, warn};

/// Capacity of the in-flight record queue. A full queue means the disk is
/// far behind the gesture rate; newest records are dropped, the loop is not.
const QUEUE_CAPACITY: usize = 256;

/// Error type for sink construction.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to open event log {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes one JSON object per line to an append-only log file.
pub struct JsonlEventSink {
    tx: Option<SyncSender<DispatchRecord>>,
    writer: Option<JoinHandle<()>>,
    dropped: AtomicU64,
}

impl JsonlEventSink {
    /// Opens (or creates) the log file in append mode and starts the writer
    /// thread.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Open`] when the file cannot be opened.
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| SinkError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let (tx, rx) = sync_channel::<DispatchRecord>(QUEUE_CAPACITY);
        let writer = std::thread::spawn(move || write_loop(file, rx));

        Ok(Self {
            tx: Some(tx),
            writer: Some(writer),
            dropped: AtomicU64::new(0),
        })
    }

    /// Number of records dropped because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Drains the channel, writing each record as one JSON line. Exits when every
/// sender is gone, flushing what it has.
fn write_loop(file: File, rx: std::sync::mpsc::Receiver<DispatchRecord>) {
    let mut out = BufWriter::new(file);
    while let Ok(record) = rx.recv() {
        match serde_json::to_string(&record) {
            Ok(line) => {
                if writeln!(out, "{line}").is_err() {
                    debug!("event log write failed; record discarded");
                }
            }
            Err(e) => debug!("event record serialization failed: {e}"),
        }
    }
    let _ = out.flush();
}

impl EventSink for JsonlEventSink {
    fn record(&self, record: DispatchRecord) {
        let Some(tx) = &self.tx else { return };
        match tx.try_send(record) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                warn!("event log queue full; dropped {dropped} record(s) so far");
            }
            Err(TrySendError::Disconnected(_)) => {
                debug!("event log writer gone; record discarded");
            }
        }
    }
}

impl Drop for JsonlEventSink {
    fn drop(&mut self) {
        // Closing the channel lets the writer drain and exit; joining makes
        // the flush visible before the process (or a test) moves on.
        self.tx.take();
        if let Some(writer) = self.writer.take() {
            let _ = writer.join();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use palmlink_core::Mode;
    use uuid::Uuid;

    fn temp_log_path() -> PathBuf {
        std::env::temp_dir().join(format!("palmlink-sink-test-{}.jsonl", Uuid::new_v4()))
    }

    fn a_record(session_id: Uuid, text: &str) -> DispatchRecord {
        DispatchRecord {
            session_id,
            text: Some(text.to_string()),
            x: Some(1),
            y: Some(2),
            mode: Mode::Keyboard,
            timestamp_ms: 42,
        }
    }

    #[test]
    fn test_records_are_written_as_json_lines() {
        let path = temp_log_path();
        let session_id = Uuid::new_v4();
        {
            let sink = JsonlEventSink::create(&path).unwrap();
            sink.record(a_record(session_id, "Q"));
            sink.record(a_record(session_id, "W"));
            // Drop joins the writer, guaranteeing the flush.
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: DispatchRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.text.as_deref(), Some("Q"));
        assert_eq!(first.session_id, session_id);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_sink_appends_across_instances() {
        let path = temp_log_path();
        let session_id = Uuid::new_v4();
        {
            let sink = JsonlEventSink::create(&path).unwrap();
            sink.record(a_record(session_id, "A"));
        }
        {
            let sink = JsonlEventSink::create(&path).unwrap();
            sink.record(a_record(session_id, "B"));
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2, "append mode preserves prior lines");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_create_fails_for_an_unwritable_path() {
        let path = Path::new("/definitely/not/a/real/dir/events.jsonl");
        assert!(matches!(
            JsonlEventSink::create(path),
            Err(SinkError::Open { .. })
        ));
    }

    #[test]
    fn test_no_records_dropped_under_light_load() {
        let path = temp_log_path();
        let sink = JsonlEventSink::create(&path).unwrap();
        for _ in 0..10 {
            sink.record(a_record(Uuid::new_v4(), "X"));
        }
        assert_eq!(sink.dropped(), 0);
        drop(sink);
        std::fs::remove_file(&path).ok();
    }
}
