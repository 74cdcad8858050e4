// sqlprobe-core/src/core/event.rs
// ============================================================================
// Module: Harness Events
// Description: Structured log events emitted while a run progresses.
// Purpose: Give sinks a serializable record of phase progress and failures.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Events are emitted as the pipeline moves between phases. Sinks serialize
//! them as JSON lines; see [`crate::HarnessEventSink`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::phase::Phase;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Event classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HarnessEventKind {
    /// A run began.
    RunStarted,
    /// A phase began.
    PhaseStarted,
    /// A phase completed successfully.
    PhaseCompleted,
    /// A phase failed.
    PhaseFailed,
    /// Cleanup failed after a result was already decided.
    CleanupFailed,
    /// Closing the store failed.
    StoreCloseFailed,
    /// A run finished with a reported outcome.
    RunFinished,
}

/// Structured harness event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarnessEvent {
    /// Event classification.
    pub event: HarnessEventKind,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Phase the event refers to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    /// Phase or run duration in milliseconds, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
    /// Whether the run succeeded (run-level events only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Diagnostic or outcome text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HarnessEvent {
    /// Creates an event of `kind` stamped with the current time.
    #[must_use]
    pub fn new(kind: HarnessEventKind) -> Self {
        Self {
            event: kind,
            timestamp_ms: now_ms(),
            phase: None,
            elapsed_ms: None,
            success: None,
            message: None,
        }
    }

    /// Attaches a phase.
    #[must_use]
    pub const fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Attaches a duration in milliseconds.
    #[must_use]
    pub const fn with_elapsed_ms(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = Some(elapsed_ms);
        self
    }

    /// Attaches a run success flag.
    #[must_use]
    pub const fn with_success(mut self, success: bool) -> Self {
        self.success = Some(success);
        self
    }

    /// Attaches a message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Returns the current unix epoch in milliseconds.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|now| now.as_millis()).unwrap_or_default()
}
