// crates/sqlprobe-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Store Tests
// Description: Harness operations and full runs against a SQLite file.
// Purpose: Validate atomic batches, value mapping, and path resolution.
// ============================================================================

//! ## Overview
//! Integration tests for the `SQLite` store:
//! - Round trips, counts, and update/read cycles through the harness
//! - Rollback of a batch that runs out of space
//! - Opener path resolution and rejection rules
//! - A stock-sized populate run end to end

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

use std::path::Path;

use sqlprobe_core::Batch;
use sqlprobe_core::BulkLoadConfig;
use sqlprobe_core::HarnessConfig;
use sqlprobe_core::MemoryEventSink;
use sqlprobe_core::NoopEventSink;
use sqlprobe_core::OpenOptions;
use sqlprobe_core::Outcome;
use sqlprobe_core::SqlStore;
use sqlprobe_core::SqlValue;
use sqlprobe_core::Statement;
use sqlprobe_core::StoreError;
use sqlprobe_core::StoreOpener;
use sqlprobe_core::UpdateReadConfig;
use sqlprobe_core::count_rows;
use sqlprobe_core::generate_values;
use sqlprobe_core::insert_values;
use sqlprobe_core::repeated_update_read;
use sqlprobe_core::run_and_report;
use sqlprobe_core::run_full_pipeline;
use sqlprobe_core::select_all;
use sqlprobe_core::uppercase_check;
use sqlprobe_store_sqlite::SqliteSqlStore;
use sqlprobe_store_sqlite::SqliteStoreConfig;
use sqlprobe_store_sqlite::SqliteStoreError;
use sqlprobe_store_sqlite::SqliteStoreOpener;
use sqlprobe_store_sqlite::SqliteSyncMode;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn open_store(dir: &Path) -> SqliteSqlStore {
    let mut config = SqliteStoreConfig::new(dir.join("test.db"));
    config.sync_mode = SqliteSyncMode::Normal;
    SqliteSqlStore::open(config).unwrap()
}

async fn table_exists(store: &SqliteSqlStore) -> bool {
    let results = store
        .transaction(Batch::new().with(Statement::new(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'tt'",
        )))
        .await
        .unwrap();
    !results[0].is_empty()
}

// ============================================================================
// SECTION: Harness Operations
// ============================================================================

#[tokio::test]
async fn insert_and_select_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    let values = generate_values(1000, 40);
    insert_values(&store, &values).await.unwrap();

    let records = select_all(&store, &values).await.unwrap();
    assert_eq!(records.len(), 40);
    assert_eq!(records[0].id, 101);
    assert_eq!(records[39].id, 140);
    assert_eq!(records[39].value, values[39]);
    assert_eq!(count_rows(&store).await.unwrap(), 40);
}

#[tokio::test]
async fn update_read_cycle_keeps_single_row() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    repeated_update_read(&store, &generate_values(100, 10)).await.unwrap();
    assert_eq!(count_rows(&store).await.unwrap(), 1);
}

#[tokio::test]
async fn upper_is_ascii_uppercase() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    uppercase_check(&store).await.unwrap();
}

#[tokio::test]
async fn result_sets_follow_statement_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    let batch = Batch::new()
        .with(Statement::new("DROP TABLE IF EXISTS tt"))
        .with(Statement::new("CREATE TABLE tt (id, value)"))
        .with(Statement::with_params(
            "INSERT INTO tt VALUES (?,?)",
            vec![SqlValue::Integer(7), SqlValue::Real(1.5)],
        ))
        .with(Statement::new("SELECT * FROM tt"));
    let results = store.transaction(batch).await.unwrap();

    assert_eq!(results.len(), 4);
    assert_eq!(results[2].rows_affected, 1);
    let row = results[3].item(0).unwrap();
    assert_eq!(row.get("id"), Some(&SqlValue::Integer(7)));
    assert_eq!(row.get("value"), Some(&SqlValue::Real(1.5)));
}

#[tokio::test]
async fn failed_statement_rolls_back_whole_batch() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    let batch = Batch::new()
        .with(Statement::new("CREATE TABLE tt (id, value)"))
        .with(Statement::new("INSERT INTO missing VALUES (1)"));
    let err = store.transaction(batch).await.unwrap_err();

    assert!(matches!(err, StoreError::Transaction(ref message) if message.contains("missing")));
    assert!(!table_exists(&store).await);
}

#[tokio::test]
async fn full_database_leaves_no_table() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    store
        .transaction(Batch::new().with(Statement::new("PRAGMA max_page_count = 16")))
        .await
        .unwrap();

    let err = insert_values(&store, &generate_values(1000, 5000)).await.unwrap_err();
    assert!(err.to_string().starts_with("transaction error message: "));
    assert!(err.to_string().contains("full"));
    assert!(!table_exists(&store).await);
}

// ============================================================================
// SECTION: Lifecycle
// ============================================================================

#[tokio::test]
async fn closed_store_rejects_transactions() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    store.close().await.unwrap();

    let err = store.transaction(Batch::new()).await.unwrap_err();
    assert_eq!(err, StoreError::Closed);
    assert_eq!(store.close().await.unwrap_err(), StoreError::Closed);
}

#[test]
fn directory_path_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = SqliteSqlStore::open(SqliteStoreConfig::new(dir.path())).err().unwrap();
    assert!(matches!(err, SqliteStoreError::Invalid(_)));
}

#[test]
fn opener_resolves_default_and_named_locations() {
    let opener = SqliteStoreOpener::new("/var/probe");
    let default = opener.resolve_path(&OpenOptions::new("test.db")).unwrap();
    assert_eq!(default, Path::new("/var/probe/test.db"));

    let mut options = OpenOptions::new("test.db");
    options.location = "library".to_string();
    assert_eq!(opener.resolve_path(&options).unwrap(), Path::new("/var/probe/library/test.db"));
}

#[test]
fn opener_rejects_escaping_names_and_unknown_variants() {
    let opener = SqliteStoreOpener::new("/var/probe");
    for name in ["../test.db", "nested/test.db", "", ".."] {
        assert!(opener.resolve_path(&OpenOptions::new(name)).is_err(), "{name}");
    }

    let mut options = OpenOptions::new("test.db");
    options.location = "../elsewhere".to_string();
    assert!(opener.resolve_path(&options).is_err());

    let mut options = OpenOptions::new("test.db");
    options.engine_variant = Some("sqlcipher".to_string());
    let err = opener.resolve_path(&options).unwrap_err();
    assert_eq!(err, SqliteStoreError::Invalid("unsupported engine variant: sqlcipher".to_string()));

    options.engine_variant = Some("bundled".to_string());
    assert!(opener.resolve_path(&options).is_ok());
}

#[test]
fn opener_creates_location_directory() {
    let dir = tempfile::tempdir().unwrap();
    let opener = SqliteStoreOpener::new(dir.path());
    let mut options = OpenOptions::new("probe.db");
    options.location = "nested".to_string();
    let store = opener.open(&options).unwrap();
    assert!(store.path().starts_with(dir.path().join("nested")));
    assert!(dir.path().join("nested").join("probe.db").exists());
}

// ============================================================================
// SECTION: Full Runs
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn stock_populate_run_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    let config = HarnessConfig {
        bulk: BulkLoadConfig {
            enabled: true,
            char_count: 100,
            record_count: 2_000,
        },
        ..HarnessConfig::default()
    };
    let outcome = run_full_pipeline(&store, &config, &NoopEventSink).await;

    let Outcome::Success(report) = &outcome else {
        panic!("unexpected outcome: {outcome}");
    };
    assert_eq!(report.summary.components().len(), 4);
    assert!(!table_exists(&store).await);
}

#[tokio::test]
async fn count_only_run_reports_two_timings() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());
    let config = HarnessConfig {
        bulk: BulkLoadConfig::disabled(),
        populate_record_count: 100,
        full_check: false,
        update_read: UpdateReadConfig {
            enabled: false,
            value_count: 1,
        },
        ..HarnessConfig::default()
    };
    let outcome = run_full_pipeline(&store, &config, &NoopEventSink).await;
    assert!(outcome.text().starts_with("SQL test OK bulk write time (ms): "), "{outcome}");
}

#[tokio::test]
async fn run_and_report_through_opener() {
    let dir = tempfile::tempdir().unwrap();
    let opener = SqliteStoreOpener::new(dir.path());
    let config = HarnessConfig {
        bulk: BulkLoadConfig::disabled(),
        populate_record_count: 50,
        ..HarnessConfig::default()
    };
    let sink = MemoryEventSink::new();
    let mut reports: Vec<String> = Vec::new();
    let mut reporter = |text: &str| reports.push(text.to_string());
    let outcome =
        run_and_report(&opener, &OpenOptions::new("test.db"), &config, &sink, &mut reporter)
            .await;

    assert!(outcome.is_success(), "{outcome}");
    assert_eq!(reports.len(), 1);
    assert!(dir.path().join("test.db").exists());
}

#[tokio::test]
async fn unsupported_variant_is_a_handle_failure() {
    let dir = tempfile::tempdir().unwrap();
    let opener = SqliteStoreOpener::new(dir.path());
    let mut options = OpenOptions::new("test.db");
    options.engine_variant = Some("sqlcipher".to_string());
    let mut reports: Vec<String> = Vec::new();
    let mut reporter = |text: &str| reports.push(text.to_string());
    let _ = run_and_report(
        &opener,
        &options,
        &HarnessConfig::default(),
        &NoopEventSink,
        &mut reporter,
    )
    .await;

    assert_eq!(
        reports,
        vec!["FAILED: no valid db handle: unsupported engine variant: sqlcipher".to_string()]
    );
}
