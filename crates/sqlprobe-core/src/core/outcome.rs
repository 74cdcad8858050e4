// sqlprobe-core/src/core/outcome.rs
// ============================================================================
// Module: Run Outcome
// Description: Terminal success or failure of a harness run.
// Purpose: Render the single human-readable result string for a run.
// Dependencies: crate::core::{error, phase}
// ============================================================================

//! ## Overview
//! A run ends in exactly one [`Outcome`]. Success carries a
//! [`TimingSummary`] whose rendering lists millisecond timings in a fixed
//! order; failure carries the triggering diagnostic plus, when cleanup also
//! failed, the secondary cleanup error.
//!
//! ## Invariants
//! - Failure text always begins with `FAILED: `.
//! - A cleanup error never replaces the primary diagnostic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::core::error::HarnessError;
use crate::core::phase::Phase;
use crate::core::phase::PhaseTiming;
use crate::core::phase::duration_ms;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix for every failure diagnostic.
pub const FAILURE_PREFIX: &str = "FAILED: ";

// ============================================================================
// SECTION: Timing Summary
// ============================================================================

/// Millisecond timings reported on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingSummary {
    /// Full check: bulk load, populate write, verification reads, and the
    /// optional update/read cycle.
    Full {
        /// Run start to the start of the populate phase.
        bulk_insert_ms: u64,
        /// Populate phase duration.
        write_ms: u64,
        /// Count check start to full scan end.
        read_ms: u64,
        /// Update/read phase duration when it ran.
        update_read_ms: Option<u64>,
    },
    /// Count-only fast path.
    CountOnly {
        /// Run start to the end of the last bulk load.
        bulk_write_ms: u64,
        /// Count check duration.
        read_count_ms: u64,
    },
}

impl TimingSummary {
    /// Builds the full-check summary from recorded timings.
    #[must_use]
    pub fn full(timings: &[PhaseTiming]) -> Self {
        let populate = find(timings, Phase::PopulateInsert);
        let count = find(timings, Phase::CountCheck);
        let scan = find(timings, Phase::FullScanCheck);
        let bulk_insert_ms = populate.map_or(0, |timing| duration_ms(timing.started_at));
        let write_ms = populate.map_or(0, |timing| duration_ms(timing.duration()));
        let read_ms = match (count, scan) {
            (Some(count), Some(scan)) => duration_ms(scan.ended_at.saturating_sub(count.started_at)),
            _ => 0,
        };
        let update_read_ms =
            find(timings, Phase::RepeatedUpdateRead).map(|timing| duration_ms(timing.duration()));
        Self::Full {
            bulk_insert_ms,
            write_ms,
            read_ms,
            update_read_ms,
        }
    }

    /// Builds the count-only summary from recorded timings.
    #[must_use]
    pub fn count_only(timings: &[PhaseTiming]) -> Self {
        let bulk_end = find(timings, Phase::MainBulkInsert)
            .or_else(|| find(timings, Phase::ExtraBulkInsert))
            .map_or(0, |timing| duration_ms(timing.ended_at));
        let read_count_ms =
            find(timings, Phase::CountCheck).map_or(0, |timing| duration_ms(timing.duration()));
        Self::CountOnly {
            bulk_write_ms: bulk_end,
            read_count_ms,
        }
    }

    /// Returns the reported components in display order.
    #[must_use]
    pub fn components(&self) -> Vec<u64> {
        match *self {
            Self::Full {
                bulk_insert_ms,
                write_ms,
                read_ms,
                update_read_ms,
            } => {
                let mut components = vec![bulk_insert_ms, write_ms, read_ms];
                components.extend(update_read_ms);
                components
            }
            Self::CountOnly {
                bulk_write_ms,
                read_count_ms,
            } => vec![bulk_write_ms, read_count_ms],
        }
    }
}

impl fmt::Display for TimingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Full {
                bulk_insert_ms,
                write_ms,
                read_ms,
                update_read_ms,
            } => {
                write!(
                    f,
                    "SQL test OK bulk insert time (ms): {bulk_insert_ms} write time (ms): \
                     {write_ms} read time (ms): {read_ms}"
                )?;
                if let Some(update_read_ms) = update_read_ms {
                    write!(f, " update/read time (ms): {update_read_ms}")?;
                }
                Ok(())
            }
            Self::CountOnly {
                bulk_write_ms,
                read_count_ms,
            } => write!(
                f,
                "SQL test OK bulk write time (ms): {bulk_write_ms} read count time (ms): \
                 {read_count_ms}"
            ),
        }
    }
}

/// Returns the timing recorded for `phase`, if any.
fn find(timings: &[PhaseTiming], phase: Phase) -> Option<&PhaseTiming> {
    timings.iter().find(|timing| timing.phase == phase)
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessReport {
    /// Reported timing components.
    pub summary: TimingSummary,
    /// Every phase timing recorded during the run, final cleanup included.
    pub timings: Vec<PhaseTiming>,
}

/// Failed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    /// Phase that failed. `None` when no phase was entered.
    pub phase: Option<Phase>,
    /// Primary diagnostic.
    pub error: HarnessError,
    /// Cleanup failure observed after the primary error.
    pub cleanup_error: Option<HarnessError>,
    /// Success text that was overturned by a final cleanup failure.
    pub completed_summary: Option<String>,
    /// Phase timings recorded before the failure.
    pub timings: Vec<PhaseTiming>,
}

impl FailureReport {
    /// Failure raised inside `phase`.
    #[must_use]
    pub const fn in_phase(phase: Phase, error: HarnessError, timings: Vec<PhaseTiming>) -> Self {
        Self {
            phase: Some(phase),
            error,
            cleanup_error: None,
            completed_summary: None,
            timings,
        }
    }

    /// Failure before any phase ran, such as an unusable store handle.
    #[must_use]
    pub const fn before_run(error: HarnessError) -> Self {
        Self {
            phase: None,
            error,
            cleanup_error: None,
            completed_summary: None,
            timings: Vec::new(),
        }
    }

    /// Final cleanup failed after every check passed.
    #[must_use]
    pub fn cleanup_after_success(report: &SuccessReport, error: HarnessError) -> Self {
        Self {
            phase: Some(Phase::FinalCleanup),
            error,
            cleanup_error: None,
            completed_summary: Some(report.summary.to_string()),
            timings: report.timings.clone(),
        }
    }

    /// Attaches a cleanup error observed after the primary failure.
    #[must_use]
    pub fn with_cleanup_error(mut self, error: HarnessError) -> Self {
        self.cleanup_error = Some(error);
        self
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(FAILURE_PREFIX)?;
        if let Some(summary) = &self.completed_summary {
            return write!(f, "CLEANUP error after result: {summary}: {}", self.error);
        }
        write!(f, "{}", self.error)?;
        if let Some(cleanup_error) = &self.cleanup_error {
            write!(f, " (CLEANUP error after result: {cleanup_error})")?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Terminal result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every enabled check passed and cleanup succeeded.
    Success(SuccessReport),
    /// A phase or cleanup failed.
    Failure(FailureReport),
}

impl Outcome {
    /// Returns true for a successful run.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the phase timings recorded during the run.
    #[must_use]
    pub fn timings(&self) -> &[PhaseTiming] {
        match self {
            Self::Success(report) => &report.timings,
            Self::Failure(report) => &report.timings,
        }
    }

    /// Renders the operator-facing result string.
    #[must_use]
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(report) => write!(f, "{}", report.summary),
            Self::Failure(report) => write!(f, "{report}"),
        }
    }
}
