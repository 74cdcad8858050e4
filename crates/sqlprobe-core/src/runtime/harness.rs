// sqlprobe-core/src/runtime/harness.rs
// ============================================================================
// Module: Harness Operations
// Description: Individual write and verification steps against a store.
// Purpose: Issue one transaction per step and validate its result sets.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Each operation here is one pipeline step. Writes are single atomic
//! batches; reads check every result set they receive and fail on the first
//! discrepancy.
//!
//! ## Invariants
//! - Operations leave the working table either absent or holding exactly the
//!   rows they wrote.
//! - Full-scan ids are compared strictly; the update/read id check uses
//!   [`SqlValue::loosely_equals_int`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Batch;
use crate::core::HarnessError;
use crate::core::Record;
use crate::core::ResultSet;
use crate::core::ResultShapeError;
use crate::core::Row;
use crate::core::SqlValue;
use crate::core::Statement;
use crate::core::UPDATE_RECORD_ID;
use crate::core::pattern_payload;
use crate::core::record_id;
use crate::core::sql;
use crate::interfaces::SqlStore;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Query label for the count check.
const COUNT_QUERY: &str = "SELECT COUNT";
/// Query label for the full scan.
const SCAN_QUERY: &str = "SELECT *";
/// Query label for the update/read cycle.
const UPDATE_READ_QUERY: &str = "UPDATE/READ";
/// Query label for the uppercase sanity check.
const UPPER_QUERY: &str = "SELECT UPPER";

/// Text fed to the uppercase sanity check.
pub const UPPER_INPUT: &str = "Some US-ASCII text";
/// Expected uppercase sanity check result.
pub const UPPER_EXPECTED: &str = "SOME US-ASCII TEXT";

/// Maximum characters of a mismatched value echoed into diagnostics.
const MAX_PREVIEW_CHARS: usize = 64;

// ============================================================================
// SECTION: Writes
// ============================================================================

/// Drops the working table when present.
///
/// # Errors
///
/// Returns [`HarnessError::Transaction`] when the store rejects the drop.
pub async fn reset_table<S>(store: &S) -> Result<(), HarnessError>
where
    S: SqlStore + ?Sized,
{
    let batch = Batch::new().with(Statement::new(sql::DROP_TABLE));
    store
        .transaction(batch)
        .await
        .map_err(|err| HarnessError::transaction("cleanup", &err))?;
    Ok(())
}

/// Recreates the working table and inserts `record_count` disposable rows of
/// at least `char_count` characters.
///
/// # Errors
///
/// Returns [`HarnessError::Transaction`] when the batch fails.
pub async fn bulk_insert<S>(
    store: &S,
    char_count: usize,
    record_count: usize,
) -> Result<(), HarnessError>
where
    S: SqlStore + ?Sized,
{
    let payload = pattern_payload(char_count);
    let mut batch = recreate_batch(record_count);
    for index in 0 .. record_count {
        batch.push(insert_statement(index, format!("{payload}{index}"))?);
    }
    store
        .transaction(batch)
        .await
        .map_err(|err| HarnessError::transaction("transaction", &err))?;
    Ok(())
}

/// Recreates the working table and inserts one row per value, ids from 101.
///
/// # Errors
///
/// Returns [`HarnessError::Transaction`] when the batch fails.
pub async fn insert_values<S>(store: &S, values: &[String]) -> Result<(), HarnessError>
where
    S: SqlStore + ?Sized,
{
    let mut batch = recreate_batch(values.len());
    for (index, value) in values.iter().enumerate() {
        batch.push(insert_statement(index, value.clone())?);
    }
    store
        .transaction(batch)
        .await
        .map_err(|err| HarnessError::transaction("transaction", &err))?;
    Ok(())
}

// ============================================================================
// SECTION: Reads
// ============================================================================

/// Counts the rows of the working table.
///
/// # Errors
///
/// Returns [`HarnessError`] when the query fails, the result set is absent,
/// it holds anything other than exactly one row, or the `count` field is
/// missing or not a non-negative integer.
pub async fn count_rows<S>(store: &S) -> Result<u64, HarnessError>
where
    S: SqlStore + ?Sized,
{
    let results = store
        .transaction(Batch::new().with(Statement::new(sql::COUNT_ROWS)))
        .await
        .map_err(|err| HarnessError::transaction("transaction", &err))?;
    let result = first_result(&results, COUNT_QUERY)?;
    let row = single_row(result, COUNT_QUERY)?;
    let count = required_field(row, COUNT_QUERY, 0, "count")?;
    count.as_integer().and_then(|value| u64::try_from(value).ok()).ok_or_else(|| {
        HarnessError::from(ResultShapeError::UnusableField {
            query: COUNT_QUERY,
            index: 0,
            field: "count",
            actual: preview(count),
        })
    })
}

/// Counts the rows of the working table and compares against `expected`.
///
/// # Errors
///
/// Returns [`HarnessError`] when [`count_rows`] fails or the count differs.
pub async fn check_count<S>(store: &S, expected: usize) -> Result<u64, HarnessError>
where
    S: SqlStore + ?Sized,
{
    let count = count_rows(store).await?;
    if usize::try_from(count).ok() != Some(expected) {
        return Err(ResultShapeError::FieldMismatch {
            query: COUNT_QUERY,
            index: 0,
            field: "count",
            actual: count.to_string(),
        }
        .into());
    }
    Ok(count)
}

/// Reads every row and checks it against `expected`, in index order.
///
/// # Errors
///
/// Returns [`HarnessError`] when the query fails, the row count differs from
/// `expected.len()`, or any row has a missing or mismatched `id` or `value`.
pub async fn select_all<S>(store: &S, expected: &[String]) -> Result<Vec<Record>, HarnessError>
where
    S: SqlStore + ?Sized,
{
    let results = store
        .transaction(Batch::new().with(Statement::new(sql::SELECT_ALL)))
        .await
        .map_err(|err| HarnessError::transaction("SELECT * transaction", &err))?;
    let result = first_result(&results, SCAN_QUERY)?;
    if result.len() != expected.len() {
        return Err(ResultShapeError::RowCount {
            query: SCAN_QUERY,
            expected: expected.len(),
            actual: result.len(),
        }
        .into());
    }
    let mut records = Vec::with_capacity(expected.len());
    for (index, (row, expected_value)) in result.rows.iter().zip(expected).enumerate() {
        let id = required_field(row, SCAN_QUERY, index, "id")?;
        let value = required_field(row, SCAN_QUERY, index, "value")?;
        let expected_id = record_id(index).ok_or_else(|| {
            HarnessError::InvalidConfig(format!("record index {index} overflows the id range"))
        })?;
        if id.as_integer() != Some(expected_id) {
            return Err(mismatch(SCAN_QUERY, index, "id", id));
        }
        if value.as_text() != Some(expected_value.as_str()) {
            return Err(mismatch(SCAN_QUERY, index, "value", value));
        }
        records.push(Record {
            id: expected_id,
            value: expected_value.clone(),
        });
    }
    Ok(records)
}

/// Seeds one row with `values[0]`, then applies each following value as an
/// update and reads it back. Stops at the first mismatch.
///
/// # Errors
///
/// Returns [`HarnessError::InvalidConfig`] for an empty `values`, and
/// [`HarnessError`] when a transaction fails or a read-back differs.
pub async fn repeated_update_read<S>(store: &S, values: &[String]) -> Result<(), HarnessError>
where
    S: SqlStore + ?Sized,
{
    let Some((seed, updates)) = values.split_first() else {
        return Err(HarnessError::InvalidConfig(
            "update/read requires at least one value".to_string(),
        ));
    };
    let seed_batch = recreate_batch(1).with(Statement::with_params(
        sql::INSERT_ROW,
        vec![SqlValue::Integer(UPDATE_RECORD_ID), SqlValue::Text(seed.clone())],
    ));
    store
        .transaction(seed_batch)
        .await
        .map_err(|err| HarnessError::transaction("transaction", &err))?;
    read_back(store, seed).await?;

    for value in updates {
        let update = Batch::new().with(Statement::with_params(
            sql::UPDATE_VALUE,
            vec![SqlValue::Text(value.clone()), SqlValue::Integer(UPDATE_RECORD_ID)],
        ));
        store
            .transaction(update)
            .await
            .map_err(|err| HarnessError::transaction("UPDATE transaction", &err))?;
        read_back(store, value).await?;
    }
    Ok(())
}

/// Runs `SELECT UPPER(?)` and checks the store uppercases ASCII text.
///
/// # Errors
///
/// Returns [`HarnessError`] when the query fails or the result differs.
pub async fn uppercase_check<S>(store: &S) -> Result<(), HarnessError>
where
    S: SqlStore + ?Sized,
{
    let batch = Batch::new()
        .with(Statement::with_params(sql::SELECT_UPPER, vec![SqlValue::from(UPPER_INPUT)]));
    let results = store
        .transaction(batch)
        .await
        .map_err(|err| HarnessError::transaction("SELECT UPPER transaction", &err))?;
    let result = first_result(&results, UPPER_QUERY)?;
    let row = single_row(result, UPPER_QUERY)?;
    let upper = required_field(row, UPPER_QUERY, 0, "upper_text")?;
    if upper.as_text() != Some(UPPER_EXPECTED) {
        return Err(mismatch(UPPER_QUERY, 0, "upper_text", upper));
    }
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads the single update/read row and checks its id and value.
async fn read_back<S>(store: &S, expected: &str) -> Result<(), HarnessError>
where
    S: SqlStore + ?Sized,
{
    let results = store
        .transaction(Batch::new().with(Statement::new(sql::SELECT_ALL)))
        .await
        .map_err(|err| HarnessError::transaction("SELECT * transaction", &err))?;
    let result = first_result(&results, UPDATE_READ_QUERY)?;
    let row = single_row(result, UPDATE_READ_QUERY)?;
    let id = required_field(row, UPDATE_READ_QUERY, 0, "id")?;
    let value = required_field(row, UPDATE_READ_QUERY, 0, "value")?;
    if !id.loosely_equals_int(UPDATE_RECORD_ID) {
        return Err(mismatch(UPDATE_READ_QUERY, 0, "id", id));
    }
    if value.as_text() != Some(expected) {
        return Err(mismatch(UPDATE_READ_QUERY, 0, "value", value));
    }
    Ok(())
}

/// Starts a batch that drops and recreates the working table.
fn recreate_batch(extra: usize) -> Batch {
    let mut batch = Batch::with_capacity(extra.saturating_add(2));
    batch.push(Statement::new(sql::DROP_TABLE));
    batch.push(Statement::new(sql::CREATE_TABLE));
    batch
}

/// Builds the insert for the record at `index`.
fn insert_statement(index: usize, value: String) -> Result<Statement, HarnessError> {
    let id = record_id(index).ok_or_else(|| {
        HarnessError::InvalidConfig(format!("record index {index} overflows the id range"))
    })?;
    Ok(Statement::with_params(sql::INSERT_ROW, vec![SqlValue::Integer(id), SqlValue::Text(value)]))
}

/// Returns the first result set, or a missing-result error.
fn first_result<'a>(
    results: &'a [ResultSet],
    query: &'static str,
) -> Result<&'a ResultSet, HarnessError> {
    results.first().ok_or_else(|| {
        ResultShapeError::MissingResultSet {
            query,
        }
        .into()
    })
}

/// Returns the only row of `result`, or a row-count error.
fn single_row<'a>(result: &'a ResultSet, query: &'static str) -> Result<&'a Row, HarnessError> {
    match result.rows.as_slice() {
        [row] => Ok(row),
        rows => Err(ResultShapeError::RowCount {
            query,
            expected: 1,
            actual: rows.len(),
        }
        .into()),
    }
}

/// Returns a non-null field, or a missing-field error.
fn required_field<'a>(
    row: &'a Row,
    query: &'static str,
    index: usize,
    field: &'static str,
) -> Result<&'a SqlValue, HarnessError> {
    match row.get(field) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(ResultShapeError::MissingField {
            query,
            index,
            field,
        }
        .into()),
    }
}

/// Builds a field-mismatch error with a truncated rendering of `actual`.
fn mismatch(
    query: &'static str,
    index: usize,
    field: &'static str,
    actual: &SqlValue,
) -> HarnessError {
    ResultShapeError::FieldMismatch {
        query,
        index,
        field,
        actual: preview(actual),
    }
    .into()
}

/// Renders a value for diagnostics, truncated to [`MAX_PREVIEW_CHARS`].
fn preview(value: &SqlValue) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() <= MAX_PREVIEW_CHARS {
        return rendered;
    }
    let mut truncated: String = rendered.chars().take(MAX_PREVIEW_CHARS).collect();
    truncated.push_str("...");
    truncated
}
