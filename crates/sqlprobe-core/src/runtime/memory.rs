// sqlprobe-core/src/runtime/memory.rs
// ============================================================================
// Module: SQL Probe In-Memory Store
// Description: Scriptable in-memory store understanding the harness SQL.
// Purpose: Exercise the pipeline deterministically without a database engine.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemorySqlStore`] interprets exactly the statements the harness issues
//! against a single two-column table. Batches apply to a copy of the table
//! that replaces the original only when every statement succeeds, so a failed
//! batch leaves no trace.
//!
//! Fault hooks let tests inject store errors, drop result sets, or perturb
//! read results. It is not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::Batch;
use crate::core::ResultSet;
use crate::core::Row;
use crate::core::SqlValue;
use crate::core::Statement;
use crate::core::sql;
use crate::interfaces::OpenOptions;
use crate::interfaces::SqlStore;
use crate::interfaces::StoreError;
use crate::interfaces::StoreOpener;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Injected transaction failure.
#[derive(Debug, Clone)]
struct Fault {
    /// SQL fragment that triggers the fault.
    fragment: String,
    /// Matching statements to let through before failing.
    skip: usize,
    /// Error message returned by the store.
    message: String,
    /// Keep failing after the first trigger.
    persistent: bool,
}

/// Mutable store state guarded by one mutex.
#[derive(Debug, Default)]
struct MemoryState {
    /// Working table rows as `(id, value)`; `None` when the table is absent.
    table: Option<Vec<(SqlValue, SqlValue)>>,
    /// Every statement received, in order, including rolled-back ones.
    executed: Vec<String>,
    /// Pending injected failures.
    faults: Vec<Fault>,
    /// SQL fragments whose result sets are withheld.
    omitted: Vec<String>,
    /// Report ids as text on reads.
    ids_as_text: bool,
    /// Value overrides applied to full-scan rows by index.
    corruptions: Vec<(usize, SqlValue)>,
    /// Whether `close` has been called.
    closed: bool,
}

/// In-memory store for tests and demos.
#[derive(Debug, Default, Clone)]
pub struct InMemorySqlStore {
    /// Shared state; clones observe the same table.
    state: Arc<Mutex<MemoryState>>,
}

impl InMemorySqlStore {
    /// Creates an empty store with no working table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the next statement containing `fragment` after letting `skip`
    /// matching statements through.
    #[must_use]
    pub fn fail_on(self, fragment: &str, skip: usize, message: &str) -> Self {
        self.push_fault(fragment, skip, message, false);
        self
    }

    /// Fails every statement containing `fragment` after `skip` matches.
    #[must_use]
    pub fn fail_always_on(self, fragment: &str, skip: usize, message: &str) -> Self {
        self.push_fault(fragment, skip, message, true);
        self
    }

    /// Withholds the result set of statements containing `fragment`.
    #[must_use]
    pub fn omit_result_set(self, fragment: &str) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.omitted.push(fragment.to_string());
        }
        self
    }

    /// Returns ids as decimal text on reads.
    #[must_use]
    pub fn ids_as_text(self) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.ids_as_text = true;
        }
        self
    }

    /// Replaces the value of full-scan row `index` on reads.
    #[must_use]
    pub fn corrupt_value(self, index: usize, value: SqlValue) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.corruptions.push((index, value));
        }
        self
    }

    /// Returns every statement received so far.
    #[must_use]
    pub fn executed_statements(&self) -> Vec<String> {
        self.state.lock().map(|state| state.executed.clone()).unwrap_or_default()
    }

    /// Returns true when the working table exists.
    #[must_use]
    pub fn table_exists(&self) -> bool {
        self.state.lock().is_ok_and(|state| state.table.is_some())
    }

    /// Returns the number of rows in the working table.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.table.as_ref().map(Vec::len))
            .unwrap_or_default()
    }

    /// Returns true once `close` has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().is_ok_and(|state| state.closed)
    }

    /// Registers a fault.
    fn push_fault(&self, fragment: &str, skip: usize, message: &str, persistent: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.faults.push(Fault {
                fragment: fragment.to_string(),
                skip,
                message: message.to_string(),
                persistent,
            });
        }
    }
}

#[async_trait]
impl SqlStore for InMemorySqlStore {
    async fn transaction(&self, batch: Batch) -> Result<Vec<ResultSet>, StoreError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Transaction("in-memory store mutex poisoned".to_string()))?;
        if guard.closed {
            return Err(StoreError::Closed);
        }
        let mut table = guard.table.clone();
        let mut results = Vec::with_capacity(batch.len());
        for statement in batch.into_statements() {
            guard.executed.push(statement.sql.clone());
            if let Some(message) = guard.trigger_fault(&statement.sql) {
                return Err(StoreError::Transaction(message));
            }
            let result = execute(&guard, &mut table, &statement)?;
            if !guard.omitted.iter().any(|fragment| statement.sql.contains(fragment.as_str())) {
                results.push(result);
            }
        }
        guard.table = table;
        drop(guard);
        Ok(results)
    }

    async fn close(&self) -> Result<(), StoreError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Io("in-memory store mutex poisoned".to_string()))?;
        if guard.closed {
            return Err(StoreError::Closed);
        }
        guard.closed = true;
        drop(guard);
        Ok(())
    }
}

impl MemoryState {
    /// Consumes a matching fault and returns its message when it fires.
    fn trigger_fault(&mut self, sql: &str) -> Option<String> {
        let position = self.faults.iter().position(|fault| sql.contains(fault.fragment.as_str()))?;
        let fault = &mut self.faults[position];
        if fault.skip > 0 {
            fault.skip -= 1;
            return None;
        }
        let message = fault.message.clone();
        if !fault.persistent {
            self.faults.remove(position);
        }
        Some(message)
    }

    /// Renders a stored id for reads.
    fn read_id(&self, id: &SqlValue) -> SqlValue {
        match (self.ids_as_text, id) {
            (true, SqlValue::Integer(value)) => SqlValue::Text(value.to_string()),
            _ => id.clone(),
        }
    }
}

// ============================================================================
// SECTION: Opener
// ============================================================================

/// Opener handing out clones of one [`InMemorySqlStore`].
#[derive(Debug, Default, Clone)]
pub struct InMemoryStoreOpener {
    /// Store returned by `open`.
    store: InMemorySqlStore,
    /// Error message returned instead of a store.
    failure: Option<String>,
}

impl InMemoryStoreOpener {
    /// Creates an opener for `store`.
    #[must_use]
    pub const fn new(store: InMemorySqlStore) -> Self {
        Self {
            store,
            failure: None,
        }
    }

    /// Creates an opener whose `open` always fails with `message`.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            store: InMemorySqlStore::new(),
            failure: Some(message.to_string()),
        }
    }
}

impl StoreOpener for InMemoryStoreOpener {
    type Store = InMemorySqlStore;

    fn open(&self, options: &OpenOptions) -> Result<Self::Store, StoreError> {
        if let Some(message) = &self.failure {
            return Err(StoreError::Open(message.clone()));
        }
        if options.name.trim().is_empty() {
            return Err(StoreError::Open("database name is empty".to_string()));
        }
        Ok(self.store.clone())
    }
}

// ============================================================================
// SECTION: Interpreter
// ============================================================================

/// Applies one statement to the working copy of the table.
fn execute(
    state: &MemoryState,
    table: &mut Option<Vec<(SqlValue, SqlValue)>>,
    statement: &Statement,
) -> Result<ResultSet, StoreError> {
    let params = statement.params.as_slice();
    match statement.sql.as_str() {
        sql::DROP_TABLE => {
            *table = None;
            Ok(ResultSet::affected(0))
        }
        sql::CREATE_TABLE => {
            if table.is_some() {
                return Err(StoreError::Transaction(format!(
                    "table {} already exists",
                    sql::WORKING_TABLE
                )));
            }
            *table = Some(Vec::new());
            Ok(ResultSet::affected(0))
        }
        sql::INSERT_ROW => {
            let [id, value] = params else {
                return Err(param_error(statement, 2));
            };
            existing(table)?.push((id.clone(), value.clone()));
            Ok(ResultSet::affected(1))
        }
        sql::UPDATE_VALUE => {
            let [value, id] = params else {
                return Err(param_error(statement, 2));
            };
            let mut affected = 0_u64;
            for row in existing(table)?.iter_mut().filter(|row| row.0 == *id) {
                row.1 = value.clone();
                affected += 1;
            }
            Ok(ResultSet::affected(affected))
        }
        sql::COUNT_ROWS => {
            let count = i64::try_from(existing(table)?.len())
                .map_err(|err| StoreError::Transaction(err.to_string()))?;
            Ok(ResultSet::from_rows(vec![Row::new(vec![(
                "count".to_string(),
                SqlValue::Integer(count),
            )])]))
        }
        sql::SELECT_ALL => {
            let rows = existing(table)?
                .iter()
                .enumerate()
                .map(|(index, (id, value))| {
                    let value = state
                        .corruptions
                        .iter()
                        .find(|(target, _)| *target == index)
                        .map_or_else(|| value.clone(), |(_, replacement)| replacement.clone());
                    Row::new(vec![
                        ("id".to_string(), state.read_id(id)),
                        ("value".to_string(), value),
                    ])
                })
                .collect();
            Ok(ResultSet::from_rows(rows))
        }
        sql::SELECT_UPPER => {
            let [input] = params else {
                return Err(param_error(statement, 1));
            };
            let upper = match input {
                SqlValue::Text(text) => SqlValue::Text(text.to_ascii_uppercase()),
                other => other.clone(),
            };
            Ok(ResultSet::from_rows(vec![Row::new(vec![("upper_text".to_string(), upper)])]))
        }
        other => Err(StoreError::Transaction(format!("unsupported statement: {other}"))),
    }
}

/// Returns the working table or a no-such-table error.
fn existing(
    table: &mut Option<Vec<(SqlValue, SqlValue)>>,
) -> Result<&mut Vec<(SqlValue, SqlValue)>, StoreError> {
    table
        .as_mut()
        .ok_or_else(|| StoreError::Transaction(format!("no such table: {}", sql::WORKING_TABLE)))
}

/// Builds a parameter-count error.
fn param_error(statement: &Statement, expected: usize) -> StoreError {
    StoreError::Transaction(format!(
        "statement expects {expected} parameters, got {}: {}",
        statement.params.len(),
        statement.sql
    ))
}
