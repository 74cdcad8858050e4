// sqlprobe-core/src/core/values.rs
// ============================================================================
// Module: SQL Values and Result Sets
// Description: Typed cells, rows, result sets, and statement batches.
// Purpose: Carry store requests and responses without backend-specific types.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A transaction is an ordered [`Batch`] of [`Statement`]s. Stores answer with
//! one [`ResultSet`] per statement, in order; non-query statements produce an
//! empty row list with an affected-row count. Cells are typed as
//! [`SqlValue`], mirroring `SQLite`'s storage classes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: SQL Values
// ============================================================================

/// A single typed cell or statement parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SqlValue {
    /// SQL `NULL`.
    Null,
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit float.
    Real(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns the integer payload when the value is stored as an integer.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text payload when the value is stored as text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns true for SQL `NULL`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Compares against an integer with coercion.
    ///
    /// Some store variants hand back numeric columns as text or floats, so
    /// `Integer(n)` and an integral `Real` equal to `n` match. `Text` matches
    /// when its trimmed content parses to `n` as an integer or as an integral
    /// float such as `123.0` or `1.23e2`. Everything else does not.
    #[must_use]
    pub fn loosely_equals_int(&self, expected: i64) -> bool {
        match self {
            Self::Integer(value) => *value == expected,
            Self::Real(value) => real_equals_int(*value, expected),
            Self::Text(value) => {
                let trimmed = value.trim();
                match trimmed.parse::<i64>() {
                    Ok(parsed) => parsed == expected,
                    Err(_) => trimmed
                        .parse::<f64>()
                        .is_ok_and(|parsed| real_equals_int(parsed, expected)),
                }
            }
            Self::Null | Self::Blob(_) => false,
        }
    }
}

/// Returns true when `value` is finite, integral, and equal to `expected`.
fn real_equals_int(value: f64, expected: i64) -> bool {
    value.is_finite() && value.fract() == 0.0 && format!("{value:.0}") == expected.to_string()
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Real(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Blob(bytes) => write!(f, "<blob {} bytes>", bytes.len()),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// ============================================================================
// SECTION: Rows and Result Sets
// ============================================================================

/// One result row as ordered `(column, value)` pairs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row {
    /// Columns in select-list order.
    columns: Vec<(String, SqlValue)>,
}

impl Row {
    /// Creates a row from ordered columns.
    #[must_use]
    pub const fn new(columns: Vec<(String, SqlValue)>) -> Self {
        Self {
            columns,
        }
    }

    /// Looks up a column by name. The first match wins on duplicate names.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns.iter().find(|(column, _)| column == name).map(|(_, value)| value)
    }

    /// Returns the number of columns.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true when the row has no columns.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Response to a single statement.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultSet {
    /// Rows returned by a query. Empty for non-query statements.
    pub rows: Vec<Row>,
    /// Rows changed by a non-query statement.
    pub rows_affected: u64,
}

impl ResultSet {
    /// Builds a query result.
    #[must_use]
    pub const fn from_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            rows_affected: 0,
        }
    }

    /// Builds a non-query result.
    #[must_use]
    pub const fn affected(rows_affected: u64) -> Self {
        Self {
            rows: Vec::new(),
            rows_affected,
        }
    }

    /// Returns the row count.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when no rows were returned.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the row at `index`.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }
}

// ============================================================================
// SECTION: Statements and Batches
// ============================================================================

/// A SQL statement with positional parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// SQL text using `?` placeholders.
    pub sql: String,
    /// Positional parameters bound in order.
    pub params: Vec<SqlValue>,
}

impl Statement {
    /// Creates a statement without parameters.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a statement with positional parameters.
    #[must_use]
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Ordered statements executed as one atomic transaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Batch {
    /// Statements in execution order.
    statements: Vec<Statement>,
}

impl Batch {
    /// Creates an empty batch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            statements: Vec::new(),
        }
    }

    /// Creates an empty batch with room for `capacity` statements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            statements: Vec::with_capacity(capacity),
        }
    }

    /// Appends a statement and returns the batch.
    #[must_use]
    pub fn with(mut self, statement: Statement) -> Self {
        self.statements.push(statement);
        self
    }

    /// Appends a statement in place.
    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// Returns the statements in order.
    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Consumes the batch, returning its statements.
    #[must_use]
    pub fn into_statements(self) -> Vec<Statement> {
        self.statements
    }

    /// Returns the statement count.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.statements.len()
    }

    /// Returns true when the batch holds no statements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
