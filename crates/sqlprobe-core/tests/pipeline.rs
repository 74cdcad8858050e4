// crates/sqlprobe-core/tests/pipeline.rs
// ============================================================================
// Module: Pipeline Tests
// Description: End-to-end phase orchestration on the in-memory store.
// Purpose: Validate reports, failure short-circuits, cleanup, and events.
// ============================================================================

//! Pipeline orchestration tests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use sqlprobe_core::BulkLoadConfig;
use sqlprobe_core::HarnessConfig;
use sqlprobe_core::HarnessEventKind;
use sqlprobe_core::InMemorySqlStore;
use sqlprobe_core::InMemoryStoreOpener;
use sqlprobe_core::MemoryEventSink;
use sqlprobe_core::NoopEventSink;
use sqlprobe_core::OpenOptions;
use sqlprobe_core::Outcome;
use sqlprobe_core::Phase;
use sqlprobe_core::SqlValue;
use sqlprobe_core::TimingSummary;
use sqlprobe_core::UpdateReadConfig;
use sqlprobe_core::run_and_report;
use sqlprobe_core::run_full_pipeline;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn small_config() -> HarnessConfig {
    HarnessConfig {
        bulk: BulkLoadConfig {
            enabled: true,
            char_count: 100,
            record_count: 50,
        },
        populate_record_count: 20,
        populate_record_size: 200,
        update_read: UpdateReadConfig {
            enabled: true,
            value_count: 5,
        },
        ..HarnessConfig::default()
    }
}

fn minimal_config() -> HarnessConfig {
    HarnessConfig {
        bulk: BulkLoadConfig::disabled(),
        update_read: UpdateReadConfig {
            enabled: false,
            value_count: 1,
        },
        ..small_config()
    }
}

fn failure_phase(outcome: &Outcome) -> Option<Phase> {
    match outcome {
        Outcome::Failure(report) => report.phase,
        Outcome::Success(_) => panic!("expected failure, got {outcome}"),
    }
}

// ============================================================================
// SECTION: Success
// ============================================================================

#[tokio::test]
async fn full_run_reports_four_timings_and_drops_table() {
    let store = InMemorySqlStore::new();
    let outcome = run_full_pipeline(&store, &small_config(), &NoopEventSink).await;

    let Outcome::Success(report) = &outcome else {
        panic!("unexpected outcome: {outcome}");
    };
    assert!(matches!(report.summary, TimingSummary::Full { update_read_ms: Some(_), .. }));
    assert_eq!(report.summary.components().len(), 4);
    assert!(outcome.text().starts_with("SQL test OK bulk insert time (ms): "));
    assert!(outcome.text().contains(" write time (ms): "));
    assert!(outcome.text().contains(" read time (ms): "));
    assert!(outcome.text().contains(" update/read time (ms): "));
    assert!(!store.table_exists());
}

#[tokio::test]
async fn phases_run_in_declaration_order() {
    let store = InMemorySqlStore::new();
    let config = HarnessConfig {
        uppercase_check: true,
        extra_bulk: BulkLoadConfig {
            enabled: true,
            char_count: 10,
            record_count: 5,
        },
        ..small_config()
    };
    let outcome = run_full_pipeline(&store, &config, &NoopEventSink).await;
    assert!(outcome.is_success(), "{outcome}");

    let phases: Vec<Phase> = outcome.timings().iter().map(|timing| timing.phase).collect();
    assert_eq!(
        phases,
        vec![
            Phase::UppercaseCheck,
            Phase::ExtraBulkInsert,
            Phase::CleanupA,
            Phase::MainBulkInsert,
            Phase::CleanupB,
            Phase::PopulateInsert,
            Phase::CountCheck,
            Phase::FullScanCheck,
            Phase::RepeatedUpdateRead,
            Phase::FinalCleanup,
        ]
    );
    for pair in outcome.timings().windows(2) {
        assert!(pair[0].ended_at <= pair[1].started_at);
    }
}

#[tokio::test]
async fn disabled_update_read_reports_three_timings() {
    let store = InMemorySqlStore::new();
    let outcome = run_full_pipeline(&store, &minimal_config(), &NoopEventSink).await;
    let Outcome::Success(report) = &outcome else {
        panic!("unexpected outcome: {outcome}");
    };
    assert_eq!(report.summary.components().len(), 3);
    assert!(!outcome.text().contains("update/read"));
}

#[tokio::test]
async fn count_only_run_skips_full_scan() {
    let store = InMemorySqlStore::new();
    let config = HarnessConfig {
        full_check: false,
        ..small_config()
    };
    let outcome = run_full_pipeline(&store, &config, &NoopEventSink).await;

    let Outcome::Success(report) = &outcome else {
        panic!("unexpected outcome: {outcome}");
    };
    assert!(matches!(report.summary, TimingSummary::CountOnly { .. }));
    assert_eq!(report.summary.components().len(), 2);
    assert!(outcome.text().starts_with("SQL test OK bulk write time (ms): "));
    assert!(outcome.text().contains(" read count time (ms): "));
    assert!(!store.executed_statements().iter().any(|sql| sql == "SELECT * FROM tt"));
    assert!(!store.table_exists());
}

#[tokio::test]
async fn loose_ids_pass_update_read_but_fail_full_scan() {
    let store = InMemorySqlStore::new().ids_as_text();
    let outcome = run_full_pipeline(&store, &small_config(), &NoopEventSink).await;
    assert_eq!(outcome.text(), "FAILED: SELECT * INCORRECT id field at index: 0 : 101");
    assert_eq!(failure_phase(&outcome), Some(Phase::FullScanCheck));
}

// ============================================================================
// SECTION: Failures
// ============================================================================

#[tokio::test]
async fn populate_failure_rolls_back_and_cleans_up() {
    let store = InMemorySqlStore::new().fail_on("INSERT INTO tt", 3, "disk full");
    let outcome = run_full_pipeline(&store, &minimal_config(), &NoopEventSink).await;

    assert_eq!(outcome.text(), "FAILED: transaction error message: disk full");
    assert_eq!(failure_phase(&outcome), Some(Phase::PopulateInsert));
    assert!(!store.table_exists());
    assert!(!store.executed_statements().iter().any(|sql| sql.starts_with("SELECT")));
    assert_eq!(
        store.executed_statements().last().map(String::as_str),
        Some("DROP TABLE IF EXISTS tt")
    );
}

#[tokio::test]
async fn bulk_failure_stops_before_populate() {
    let store = InMemorySqlStore::new().fail_on("INSERT INTO tt", 10, "disk full");
    let outcome = run_full_pipeline(&store, &small_config(), &NoopEventSink).await;
    assert_eq!(failure_phase(&outcome), Some(Phase::MainBulkInsert));
    assert!(outcome.timings().is_empty());
}

#[tokio::test]
async fn missing_count_result_set_fails_count_check() {
    let store = InMemorySqlStore::new().omit_result_set("COUNT");
    let outcome = run_full_pipeline(&store, &minimal_config(), &NoopEventSink).await;
    assert_eq!(outcome.text(), "FAILED: SELECT COUNT MISSING valid resultSet");
    assert_eq!(failure_phase(&outcome), Some(Phase::CountCheck));
    assert!(!store.table_exists());
}

#[tokio::test]
async fn corrupted_row_fails_full_scan() {
    let store = InMemorySqlStore::new().corrupt_value(7, SqlValue::from("bogus"));
    let outcome = run_full_pipeline(&store, &minimal_config(), &NoopEventSink).await;
    assert_eq!(outcome.text(), "FAILED: SELECT * INCORRECT value field at index: 7 : bogus");
}

#[tokio::test]
async fn cleanup_error_is_appended_to_primary_failure() {
    let store = InMemorySqlStore::new()
        .fail_always_on("DROP TABLE", 1, "database is locked")
        .fail_on("INSERT INTO tt", 0, "disk full");
    let outcome = run_full_pipeline(&store, &minimal_config(), &NoopEventSink).await;
    assert_eq!(
        outcome.text(),
        "FAILED: transaction error message: disk full (CLEANUP error after result: cleanup error \
         message: database is locked)"
    );
    assert_eq!(failure_phase(&outcome), Some(Phase::PopulateInsert));
}

#[tokio::test]
async fn final_cleanup_failure_overturns_success() {
    let store = InMemorySqlStore::new().fail_on("DROP TABLE", 1, "database is locked");
    let outcome = run_full_pipeline(&store, &minimal_config(), &NoopEventSink).await;

    let text = outcome.text();
    assert!(text.starts_with("FAILED: CLEANUP error after result: SQL test OK bulk insert time"));
    assert!(text.ends_with(": cleanup error message: database is locked"));
    assert_eq!(failure_phase(&outcome), Some(Phase::FinalCleanup));
    assert!(store.table_exists());
}

#[tokio::test]
async fn invalid_config_fails_before_any_phase() {
    let store = InMemorySqlStore::new();
    let config = HarnessConfig {
        bulk: BulkLoadConfig {
            enabled: true,
            char_count: 100,
            record_count: 0,
        },
        ..small_config()
    };
    let outcome = run_full_pipeline(&store, &config, &NoopEventSink).await;
    assert_eq!(
        outcome.text(),
        "FAILED: invalid harness config: bulk.record_count must be greater than zero"
    );
    assert_eq!(failure_phase(&outcome), None);
    assert_eq!(store.executed_statements(), vec!["DROP TABLE IF EXISTS tt".to_string()]);
}

#[tokio::test]
async fn zero_populate_count_fails_before_any_phase() {
    let store = InMemorySqlStore::new();
    let config = HarnessConfig {
        populate_record_count: 0,
        ..minimal_config()
    };
    let outcome = run_full_pipeline(&store, &config, &NoopEventSink).await;
    assert_eq!(
        outcome.text(),
        "FAILED: invalid harness config: populate_record_count must be greater than zero"
    );
    assert_eq!(failure_phase(&outcome), None);
    assert_eq!(store.executed_statements(), vec!["DROP TABLE IF EXISTS tt".to_string()]);
}

// ============================================================================
// SECTION: Events
// ============================================================================

#[tokio::test]
async fn events_bracket_the_run() {
    let store = InMemorySqlStore::new();
    let sink = MemoryEventSink::new();
    let outcome = run_full_pipeline(&store, &minimal_config(), &sink).await;
    let events = sink.events();

    assert_eq!(events.first().map(|event| event.event), Some(HarnessEventKind::RunStarted));
    let last = events.last().unwrap();
    assert_eq!(last.event, HarnessEventKind::RunFinished);
    assert_eq!(last.success, Some(true));
    assert_eq!(last.message.as_deref(), Some(outcome.text().as_str()));

    let completed: Vec<Phase> = events
        .iter()
        .filter(|event| event.event == HarnessEventKind::PhaseCompleted)
        .filter_map(|event| event.phase)
        .collect();
    assert_eq!(
        completed,
        vec![Phase::PopulateInsert, Phase::CountCheck, Phase::FullScanCheck, Phase::FinalCleanup]
    );
}

#[tokio::test]
async fn failed_phase_and_cleanup_emit_events() {
    let store = InMemorySqlStore::new()
        .fail_always_on("DROP TABLE", 1, "database is locked")
        .fail_on("INSERT INTO tt", 0, "disk full");
    let sink = MemoryEventSink::new();
    let _ = run_full_pipeline(&store, &minimal_config(), &sink).await;
    let events = sink.events();

    let failed = events.iter().find(|event| event.event == HarnessEventKind::PhaseFailed).unwrap();
    assert_eq!(failed.phase, Some(Phase::PopulateInsert));
    assert_eq!(failed.message.as_deref(), Some("transaction error message: disk full"));
    assert!(events.iter().any(|event| event.event == HarnessEventKind::CleanupFailed));
    assert_eq!(events.last().and_then(|event| event.success), Some(false));
}

// ============================================================================
// SECTION: Reporting
// ============================================================================

#[tokio::test]
async fn open_failure_reports_once_without_statements() {
    let opener = InMemoryStoreOpener::failing("sqlite plugin not installed");
    let mut reports: Vec<String> = Vec::new();
    let mut reporter = |text: &str| reports.push(text.to_string());
    let outcome = run_and_report(
        &opener,
        &OpenOptions::new("test.db"),
        &small_config(),
        &NoopEventSink,
        &mut reporter,
    )
    .await;

    assert!(!outcome.is_success());
    assert_eq!(reports, vec!["FAILED: no valid db handle: sqlite plugin not installed".to_string()]);
}

#[tokio::test]
async fn successful_run_reports_once_and_closes_store() {
    let store = InMemorySqlStore::new();
    let opener = InMemoryStoreOpener::new(store.clone());
    let mut reports: Vec<String> = Vec::new();
    let mut reporter = |text: &str| reports.push(text.to_string());
    let outcome = run_and_report(
        &opener,
        &OpenOptions::new("test.db"),
        &small_config(),
        &NoopEventSink,
        &mut reporter,
    )
    .await;

    assert!(outcome.is_success());
    assert_eq!(reports, vec![outcome.text()]);
    assert!(store.is_closed());
}

#[tokio::test]
async fn close_failure_is_logged_not_reported() {
    let store = InMemorySqlStore::new();
    let opener = InMemoryStoreOpener::new(store.clone());
    let sink = MemoryEventSink::new();
    let mut reports: Vec<String> = Vec::new();
    let mut reporter = |text: &str| reports.push(text.to_string());

    let first =
        run_and_report(&opener, &OpenOptions::new("test.db"), &minimal_config(), &sink, &mut reporter)
            .await;
    assert!(first.is_success());
    let second =
        run_and_report(&opener, &OpenOptions::new("test.db"), &minimal_config(), &sink, &mut reporter)
            .await;

    assert_eq!(
        second.text(),
        "FAILED: transaction error message: store handle closed (CLEANUP error after result: \
         cleanup error message: store handle closed)"
    );
    assert_eq!(reports.len(), 2);
    assert!(sink.events().iter().any(|event| event.event == HarnessEventKind::StoreCloseFailed));
}
