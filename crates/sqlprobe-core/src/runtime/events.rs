// sqlprobe-core/src/runtime/events.rs
// ============================================================================
// Module: Harness Event Sinks
// Description: JSON-line sinks for structured harness events.
// Purpose: Route run progress to stderr, a log file, memory, or nowhere.
// Dependencies: serde_json, crate::interfaces
// ============================================================================

//! ## Overview
//! Sinks serialize [`HarnessEvent`] values as one JSON object per line.
//! Serialization and write failures are swallowed so logging never changes a
//! run's outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use crate::core::HarnessEvent;
use crate::interfaces::HarnessEventSink;

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Event sink that logs JSON lines to stderr.
pub struct StderrEventSink;

impl HarnessEventSink for StderrEventSink {
    fn record(&self, event: &HarnessEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Event sink that appends JSON lines to a file.
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileEventSink {
    /// Opens the event log file in append mode, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl HarnessEventSink for FileEventSink {
    fn record(&self, event: &HarnessEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op event sink.
pub struct NoopEventSink;

impl HarnessEventSink for NoopEventSink {
    fn record(&self, _event: &HarnessEvent) {}
}

/// Event sink that keeps events in memory for inspection.
#[derive(Default)]
pub struct MemoryEventSink {
    /// Recorded events, oldest first.
    events: Mutex<Vec<HarnessEvent>>,
}

impl MemoryEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HarnessEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl HarnessEventSink for MemoryEventSink {
    fn record(&self, event: &HarnessEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
