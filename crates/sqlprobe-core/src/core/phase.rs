// sqlprobe-core/src/core/phase.rs
// ============================================================================
// Module: Pipeline Phases
// Description: Phase identifiers and timing samples.
// Purpose: Label pipeline steps and carry their monotonic timings.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Phases run strictly in declaration order. Timings are offsets from the
//! start of the run so reports can combine adjacent phases.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Phase
// ============================================================================

/// A discrete pipeline step.
///
/// # Invariants
/// - Variant order matches execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// `UPPER()` sanity query.
    UppercaseCheck,
    /// Extra disposable bulk load.
    ExtraBulkInsert,
    /// Table drop after the extra bulk load.
    CleanupA,
    /// Main disposable bulk load.
    MainBulkInsert,
    /// Table drop after the main bulk load.
    CleanupB,
    /// Insert of the checked values.
    PopulateInsert,
    /// Row count verification.
    CountCheck,
    /// Full scan verification.
    FullScanCheck,
    /// Repeated update/read cycle on one row.
    RepeatedUpdateRead,
    /// Table drop at the end of the run.
    FinalCleanup,
}

impl Phase {
    /// Returns a stable label for the phase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UppercaseCheck => "uppercase_check",
            Self::ExtraBulkInsert => "extra_bulk_insert",
            Self::CleanupA => "cleanup_a",
            Self::MainBulkInsert => "main_bulk_insert",
            Self::CleanupB => "cleanup_b",
            Self::PopulateInsert => "populate_insert",
            Self::CountCheck => "count_check",
            Self::FullScanCheck => "full_scan_check",
            Self::RepeatedUpdateRead => "repeated_update_read",
            Self::FinalCleanup => "final_cleanup",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Timing
// ============================================================================

/// Start and end of one phase, measured from the start of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTiming {
    /// Phase measured.
    pub phase: Phase,
    /// Offset at which the phase started.
    pub started_at: Duration,
    /// Offset at which the phase completed.
    pub ended_at: Duration,
}

impl PhaseTiming {
    /// Returns the phase duration, saturating at zero.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.ended_at.saturating_sub(self.started_at)
    }
}

/// Converts a duration to whole milliseconds, saturating at `u64::MAX`.
#[must_use]
pub fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
