// sqlprobe-core/src/runtime/pipeline.rs
// ============================================================================
// Module: Harness Pipeline
// Description: Fixed-order phase orchestration with timing and cleanup.
// Purpose: Turn one store handle and one config into exactly one outcome.
// Dependencies: crate::core, crate::interfaces, crate::runtime::harness
// ============================================================================

//! ## Overview
//! [`run_full_pipeline`] runs the enabled phases in declaration order, timing
//! each against a single monotonic clock. The first failure short-circuits to
//! a best-effort table drop; the drop's own failure is attached to the
//! report, never substituted for the primary diagnostic.
//!
//! [`run_and_report`] wraps the pipeline with store open and close and hands
//! the rendered outcome to a [`Reporter`] exactly once.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::time::Instant;

use crate::core::FailureReport;
use crate::core::HarnessConfig;
use crate::core::HarnessError;
use crate::core::HarnessEvent;
use crate::core::HarnessEventKind;
use crate::core::Outcome;
use crate::core::Phase;
use crate::core::PhaseTiming;
use crate::core::SuccessReport;
use crate::core::TimingSummary;
use crate::core::duration_ms;
use crate::core::generate_values;
use crate::interfaces::HarnessEventSink;
use crate::interfaces::OpenOptions;
use crate::interfaces::Reporter;
use crate::interfaces::SqlStore;
use crate::interfaces::StoreOpener;
use crate::runtime::harness;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Phase that failed together with its diagnostic.
type PhaseFailure = (Phase, HarnessError);

/// Clock and timing log for one run.
struct PhaseRecorder<'a> {
    /// Run start.
    started: Instant,
    /// Timings of completed phases.
    timings: Vec<PhaseTiming>,
    /// Destination for progress events.
    events: &'a dyn HarnessEventSink,
}

impl<'a> PhaseRecorder<'a> {
    /// Starts the run clock.
    fn start(events: &'a dyn HarnessEventSink) -> Self {
        events.record(&HarnessEvent::new(HarnessEventKind::RunStarted));
        Self {
            started: Instant::now(),
            timings: Vec::new(),
            events,
        }
    }

    /// Awaits `work` as `phase`, recording its timing on success.
    async fn phase<T, F>(&mut self, phase: Phase, work: F) -> Result<T, PhaseFailure>
    where
        F: Future<Output = Result<T, HarnessError>>,
    {
        self.events.record(&HarnessEvent::new(HarnessEventKind::PhaseStarted).with_phase(phase));
        let started_at = self.started.elapsed();
        match work.await {
            Ok(value) => {
                let timing = PhaseTiming {
                    phase,
                    started_at,
                    ended_at: self.started.elapsed(),
                };
                self.events.record(
                    &HarnessEvent::new(HarnessEventKind::PhaseCompleted)
                        .with_phase(phase)
                        .with_elapsed_ms(duration_ms(timing.duration())),
                );
                self.timings.push(timing);
                Ok(value)
            }
            Err(error) => {
                let elapsed = self.started.elapsed().saturating_sub(started_at);
                self.events.record(
                    &HarnessEvent::new(HarnessEventKind::PhaseFailed)
                        .with_phase(phase)
                        .with_elapsed_ms(duration_ms(elapsed))
                        .with_message(error.to_string()),
                );
                Err((phase, error))
            }
        }
    }

    /// Emits the terminal run event.
    fn finish(&self, outcome: &Outcome) {
        self.events.record(
            &HarnessEvent::new(HarnessEventKind::RunFinished)
                .with_elapsed_ms(duration_ms(self.started.elapsed()))
                .with_success(outcome.is_success())
                .with_message(outcome.text()),
        );
    }
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

/// Runs every enabled phase against `store` and returns the outcome.
///
/// The working table is dropped at the end of every run that reached the
/// store, whether it passed or failed.
pub async fn run_full_pipeline<S>(
    store: &S,
    config: &HarnessConfig,
    events: &dyn HarnessEventSink,
) -> Outcome
where
    S: SqlStore + ?Sized,
{
    let mut recorder = PhaseRecorder::start(events);

    let outcome = if let Err(error) = config.validate() {
        let report = FailureReport::before_run(error);
        Outcome::Failure(cleanup_after_failure(store, &recorder, report).await)
    } else {
        match run_phases(store, config, &mut recorder).await {
            Ok(summary) => {
                let cleanup =
                    recorder.phase(Phase::FinalCleanup, harness::reset_table(store)).await;
                let report = SuccessReport {
                    summary,
                    timings: recorder.timings.clone(),
                };
                match cleanup {
                    Ok(()) => Outcome::Success(report),
                    Err((_, error)) => {
                        recorder.events.record(
                            &HarnessEvent::new(HarnessEventKind::CleanupFailed)
                                .with_phase(Phase::FinalCleanup)
                                .with_message(error.to_string()),
                        );
                        Outcome::Failure(FailureReport::cleanup_after_success(&report, error))
                    }
                }
            }
            Err((phase, error)) => {
                let report = FailureReport::in_phase(phase, error, recorder.timings.clone());
                Outcome::Failure(cleanup_after_failure(store, &recorder, report).await)
            }
        }
    };

    recorder.finish(&outcome);
    outcome
}

/// Opens a store, runs the pipeline, closes the store, and reports once.
///
/// A store that cannot be opened yields `FAILED: no valid db handle: ...`
/// without issuing any statement. Close failures are logged as events and do
/// not change the outcome.
pub async fn run_and_report<O>(
    opener: &O,
    options: &OpenOptions,
    config: &HarnessConfig,
    events: &dyn HarnessEventSink,
    reporter: &mut dyn Reporter,
) -> Outcome
where
    O: StoreOpener + ?Sized,
{
    let outcome = match opener.open(options) {
        Ok(store) => {
            let outcome = run_full_pipeline(&store, config, events).await;
            if let Err(err) = store.close().await {
                events.record(
                    &HarnessEvent::new(HarnessEventKind::StoreCloseFailed)
                        .with_message(err.to_string()),
                );
            }
            outcome
        }
        Err(err) => {
            let outcome = Outcome::Failure(FailureReport::before_run(HarnessError::Handle(
                err.message().to_string(),
            )));
            events.record(
                &HarnessEvent::new(HarnessEventKind::RunFinished)
                    .with_success(false)
                    .with_message(outcome.text()),
            );
            outcome
        }
    };
    reporter.report(&outcome.text());
    outcome
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Runs the phases between the run start and the final cleanup.
async fn run_phases<S>(
    store: &S,
    config: &HarnessConfig,
    recorder: &mut PhaseRecorder<'_>,
) -> Result<TimingSummary, PhaseFailure>
where
    S: SqlStore + ?Sized,
{
    if config.uppercase_check {
        recorder.phase(Phase::UppercaseCheck, harness::uppercase_check(store)).await?;
    }
    if config.extra_bulk.enabled {
        let extra = config.extra_bulk;
        recorder
            .phase(
                Phase::ExtraBulkInsert,
                harness::bulk_insert(store, extra.char_count, extra.record_count),
            )
            .await?;
        recorder.phase(Phase::CleanupA, harness::reset_table(store)).await?;
    }
    if config.bulk.enabled {
        let bulk = config.bulk;
        recorder
            .phase(
                Phase::MainBulkInsert,
                harness::bulk_insert(store, bulk.char_count, bulk.record_count),
            )
            .await?;
        recorder.phase(Phase::CleanupB, harness::reset_table(store)).await?;
    }

    let values = generate_values(config.populate_record_size, config.populate_record_count);
    recorder.phase(Phase::PopulateInsert, harness::insert_values(store, &values)).await?;
    recorder.phase(Phase::CountCheck, harness::check_count(store, values.len())).await?;

    if !config.full_check {
        return Ok(TimingSummary::count_only(&recorder.timings));
    }

    recorder.phase(Phase::FullScanCheck, harness::select_all(store, &values)).await?;
    if config.update_read.enabled {
        let updates = generate_values(config.populate_record_size, config.update_read.value_count);
        recorder
            .phase(Phase::RepeatedUpdateRead, harness::repeated_update_read(store, &updates))
            .await?;
    }
    Ok(TimingSummary::full(&recorder.timings))
}

/// Drops the working table after a failure and attaches any cleanup error.
async fn cleanup_after_failure<S>(
    store: &S,
    recorder: &PhaseRecorder<'_>,
    report: FailureReport,
) -> FailureReport
where
    S: SqlStore + ?Sized,
{
    match harness::reset_table(store).await {
        Ok(()) => report,
        Err(error) => {
            recorder.events.record(
                &HarnessEvent::new(HarnessEventKind::CleanupFailed)
                    .with_phase(Phase::FinalCleanup)
                    .with_message(error.to_string()),
            );
            report.with_cleanup_error(error)
        }
    }
}
