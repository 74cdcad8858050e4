// crates/sqlprobe-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite SQL Store
// Description: Transactional SqlStore backed by SQLite.
// Purpose: Execute statement batches atomically and map rows to SqlValue.
// Dependencies: sqlprobe-core, rusqlite, serde, thiserror, tokio
// ============================================================================

//! ## Overview
//! [`SqliteSqlStore`] owns one connection behind a mutex. Every batch runs
//! on the blocking thread pool inside a single `SQLite` transaction that
//! commits only after all statements succeed; any error rolls it back.
//! Statements that produce columns are read into rows, all others report
//! their affected row count.
//!
//! [`SqliteStoreOpener`] maps a database name and location label to a file
//! under a base directory, rejecting names that would escape it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use serde::Deserialize;
use serde::Serialize;
use sqlprobe_core::Batch;
use sqlprobe_core::OpenOptions;
use sqlprobe_core::ResultSet;
use sqlprobe_core::Row;
use sqlprobe_core::SqlStore;
use sqlprobe_core::SqlValue;
use sqlprobe_core::Statement;
use sqlprobe_core::StoreError;
use sqlprobe_core::StoreOpener;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default busy timeout (ms).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Location label that maps to the opener's base directory.
const DEFAULT_LOCATION: &str = "default";
/// Engine variants this backend accepts.
const SUPPORTED_VARIANTS: [&str; 2] = ["sqlite", "bundled"];

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode.
    #[default]
    Wal,
    /// Delete journal mode.
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for one `SQLite` database file.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a config for `path` with default pragmas.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Invalid store configuration or open request.
    #[error("sqlite store invalid config: {0}")]
    Invalid(String),
    /// The connection was already closed.
    #[error("sqlite store closed")]
    Closed,
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Transaction(message),
            SqliteStoreError::Invalid(message) => Self::Open(message),
            SqliteStoreError::Closed => Self::Closed,
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed SQL store.
#[derive(Clone)]
pub struct SqliteSqlStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Connection guarded for single-writer access; `None` once closed.
    connection: Arc<Mutex<Option<Connection>>>,
}

impl SqliteSqlStore {
    /// Opens the database file described by `config`, creating it when absent.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the path is unusable or the
    /// connection cannot be opened and configured.
    pub fn open(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let connection = open_connection(&config)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(Some(connection))),
        })
    }

    /// Returns the database file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.config.path
    }
}

#[async_trait]
impl SqlStore for SqliteSqlStore {
    async fn transaction(&self, batch: Batch) -> Result<Vec<ResultSet>, StoreError> {
        let connection = Arc::clone(&self.connection);
        let results = tokio::task::spawn_blocking(move || run_batch(&connection, batch))
            .await
            .map_err(|err| StoreError::Transaction(err.to_string()))??;
        Ok(results)
    }

    async fn close(&self) -> Result<(), StoreError> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("sqlite mutex poisoned".to_string()))?;
        let connection = guard.take().ok_or(SqliteStoreError::Closed)?;
        drop(guard);
        connection.close().map_err(|(_, err)| SqliteStoreError::Db(err.to_string()))?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Opener
// ============================================================================

/// Opens [`SqliteSqlStore`] handles by database name under a base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteStoreOpener {
    /// Directory that the `default` location maps to.
    pub directory: PathBuf,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreOpener {
    /// Creates an opener rooted at `directory` with default pragmas.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }

    /// Resolves the database file path for `options`.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Invalid`] for unsupported engine variants
    /// or names and locations that are not single plain path components.
    pub fn resolve_path(&self, options: &OpenOptions) -> Result<PathBuf, SqliteStoreError> {
        if let Some(variant) = options.engine_variant.as_deref()
            && !SUPPORTED_VARIANTS.contains(&variant)
        {
            return Err(SqliteStoreError::Invalid(format!(
                "unsupported engine variant: {variant}"
            )));
        }
        validate_component("database name", &options.name)?;
        let directory = if options.location == DEFAULT_LOCATION {
            self.directory.clone()
        } else {
            validate_component("location", &options.location)?;
            self.directory.join(&options.location)
        };
        Ok(directory.join(&options.name))
    }
}

impl StoreOpener for SqliteStoreOpener {
    type Store = SqliteSqlStore;

    fn open(&self, options: &OpenOptions) -> Result<Self::Store, StoreError> {
        let path = self.resolve_path(options).map_err(open_error)?;
        let config = SqliteStoreConfig {
            path,
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
        };
        SqliteSqlStore::open(config).map_err(open_error)
    }
}

/// Reports any failure while opening as [`StoreError::Open`].
fn open_error(error: SqliteStoreError) -> StoreError {
    match StoreError::from(error) {
        StoreError::Open(message) | StoreError::Transaction(message) | StoreError::Io(message) => {
            StoreError::Open(message)
        }
        StoreError::Closed => StoreError::Closed,
    }
}

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Runs every statement of `batch` inside one transaction.
fn run_batch(
    connection: &Mutex<Option<Connection>>,
    batch: Batch,
) -> Result<Vec<ResultSet>, SqliteStoreError> {
    let mut guard =
        connection.lock().map_err(|_| SqliteStoreError::Db("sqlite mutex poisoned".to_string()))?;
    let connection = guard.as_mut().ok_or(SqliteStoreError::Closed)?;
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let mut results = Vec::with_capacity(batch.len());
    for statement in batch.statements() {
        results.push(run_statement(&tx, statement)?);
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    drop(guard);
    Ok(results)
}

/// Executes one statement and collects its rows or affected count.
fn run_statement(
    connection: &Connection,
    statement: &Statement,
) -> Result<ResultSet, SqliteStoreError> {
    let mut prepared = connection
        .prepare_cached(&statement.sql)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let params = params_from_iter(statement.params.iter().map(to_sqlite_value));
    if prepared.column_count() == 0 {
        let affected =
            prepared.execute(params).map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        return Ok(ResultSet::affected(u64::try_from(affected).unwrap_or(u64::MAX)));
    }

    let names: Vec<String> = prepared.column_names().iter().map(ToString::to_string).collect();
    let mut rows = prepared.query(params).map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let mut collected = Vec::new();
    while let Some(row) = rows.next().map_err(|err| SqliteStoreError::Db(err.to_string()))? {
        let mut columns = Vec::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            let value: Value = row.get(index).map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            columns.push((name.clone(), from_sqlite_value(value)));
        }
        collected.push(Row::new(columns));
    }
    Ok(ResultSet::from_rows(collected))
}

/// Converts a harness value into a `SQLite` parameter.
fn to_sqlite_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(value) => Value::Integer(*value),
        SqlValue::Real(value) => Value::Real(*value),
        SqlValue::Text(value) => Value::Text(value.clone()),
        SqlValue::Blob(value) => Value::Blob(value.clone()),
    }
}

/// Converts a `SQLite` column value into a harness value.
fn from_sqlite_value(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(value) => SqlValue::Integer(value),
        Value::Real(value) => SqlValue::Real(value),
        Value::Text(value) => SqlValue::Text(value),
        Value::Blob(value) => SqlValue::Blob(value),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Requires `value` to be exactly one normal path component.
fn validate_component(label: &str, value: &str) -> Result<(), SqliteStoreError> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(SqliteStoreError::Invalid(format!(
            "{label} must be a plain file name: {value:?}"
        ))),
    }
}

/// Opens an `SQLite` connection and applies pragmas.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies journal, sync, and busy-timeout settings.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}
