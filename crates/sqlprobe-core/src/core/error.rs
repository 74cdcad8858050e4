// sqlprobe-core/src/core/error.rs
// ============================================================================
// Module: Harness Errors
// Description: Failure taxonomy for harness phases.
// Purpose: Turn store and result-shape failures into one diagnostic string.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every phase returns [`HarnessError`]. Display strings are the diagnostics
//! shown to the operator after the `FAILED: ` prefix, so they name the query
//! and the offending field or count.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Result Shape Errors
// ============================================================================

/// A result set did not have the expected shape or content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResultShapeError {
    /// The store returned no result set for the statement.
    #[error("{query} MISSING valid resultSet")]
    MissingResultSet {
        /// Query label.
        query: &'static str,
    },
    /// The row count differs from the expected count.
    #[error("{query} INCORRECT resultSet.rows.length value: {actual} (expected {expected})")]
    RowCount {
        /// Query label.
        query: &'static str,
        /// Expected row count.
        expected: usize,
        /// Actual row count.
        actual: usize,
    },
    /// A row lacks a field, or the field is `NULL`.
    #[error("{query} MISSING VALID {field} field at index: {index}")]
    MissingField {
        /// Query label.
        query: &'static str,
        /// Zero-based row index.
        index: usize,
        /// Field name.
        field: &'static str,
    },
    /// A field holds a value of the wrong storage class.
    #[error("{query} UNUSABLE {field} field at index: {index} : {actual}")]
    UnusableField {
        /// Query label.
        query: &'static str,
        /// Zero-based row index.
        index: usize,
        /// Field name.
        field: &'static str,
        /// Rendered actual value.
        actual: String,
    },
    /// A field differs from the expected value.
    #[error("{query} INCORRECT {field} field at index: {index} : {actual}")]
    FieldMismatch {
        /// Query label.
        query: &'static str,
        /// Zero-based row index.
        index: usize,
        /// Field name.
        field: &'static str,
        /// Rendered actual value.
        actual: String,
    },
}

// ============================================================================
// SECTION: Harness Errors
// ============================================================================

/// Terminal failure of a harness phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarnessError {
    /// No usable store handle could be opened.
    #[error("no valid db handle: {0}")]
    Handle(String),
    /// The store reported an error for a transaction.
    #[error("{context} error message: {message}")]
    Transaction {
        /// Which transaction failed.
        context: &'static str,
        /// Store-provided message.
        message: String,
    },
    /// A result set was missing or did not match expectations.
    #[error(transparent)]
    ResultShape(#[from] ResultShapeError),
    /// The harness configuration is unusable.
    #[error("invalid harness config: {0}")]
    InvalidConfig(String),
}

impl HarnessError {
    /// Wraps a store error raised by the named transaction.
    #[must_use]
    pub fn transaction(context: &'static str, error: &StoreError) -> Self {
        Self::Transaction {
            context,
            message: error.message().to_string(),
        }
    }
}
