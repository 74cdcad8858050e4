// sqlprobe-core/src/interfaces/mod.rs
// ============================================================================
// Module: SQL Probe Interfaces
// Description: Backend-agnostic interfaces for stores, reporting, and events.
// Purpose: Define the contract surfaces used by the harness runtime.
// Dependencies: async-trait, crate::core, serde, thiserror
// ============================================================================

//! ## Overview
//! The harness reaches its collaborators only through these traits: a
//! [`StoreOpener`] yields a [`SqlStore`] handle, a [`Reporter`] receives the
//! single outcome string, and a [`HarnessEventSink`] receives structured
//! progress events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::Batch;
use crate::core::HarnessEvent;
use crate::core::ResultSet;

// ============================================================================
// SECTION: Store
// ============================================================================

/// Store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be opened.
    #[error("store open error: {0}")]
    Open(String),
    /// The store rejected or failed a transaction.
    #[error("store transaction error: {0}")]
    Transaction(String),
    /// The handle was already closed.
    #[error("store handle closed")]
    Closed,
    /// Store I/O error.
    #[error("store io error: {0}")]
    Io(String),
}

impl StoreError {
    /// Returns the store-provided message without the variant prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Open(message) | Self::Transaction(message) | Self::Io(message) => message,
            Self::Closed => "store handle closed",
        }
    }
}

/// Parameters used to open a named store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenOptions {
    /// Database name.
    pub name: String,
    /// Storage location label. `default` maps to the opener's base location.
    pub location: String,
    /// Optional engine variant requested from the opener.
    #[serde(default)]
    pub engine_variant: Option<String>,
}

impl OpenOptions {
    /// Creates options for `name` in the default location.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: "default".to_string(),
            engine_variant: None,
        }
    }
}

/// Transactional SQL store handle.
///
/// # Invariants
/// - A batch either commits completely or not at all.
/// - On success, one [`ResultSet`] is returned per statement, in order.
#[async_trait]
pub trait SqlStore: Send + Sync {
    /// Executes `batch` as one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when any statement fails; the transaction is
    /// rolled back.
    async fn transaction(&self, batch: Batch) -> Result<Vec<ResultSet>, StoreError>;

    /// Releases the handle. Stores without an explicit close keep the default.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store fails to release its resources.
    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Factory for named store handles.
pub trait StoreOpener {
    /// Store handle type produced by this opener.
    type Store: SqlStore;

    /// Opens the store described by `options`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when no usable handle can be produced.
    fn open(&self, options: &OpenOptions) -> Result<Self::Store, StoreError>;
}

// ============================================================================
// SECTION: Reporting
// ============================================================================

/// Receives the outcome string of a run.
pub trait Reporter {
    /// Called exactly once per run.
    fn report(&mut self, text: &str);
}

impl<F> Reporter for F
where
    F: FnMut(&str),
{
    fn report(&mut self, text: &str) {
        self(text);
    }
}

// ============================================================================
// SECTION: Event Sink
// ============================================================================

/// Sink for structured harness events.
pub trait HarnessEventSink: Send + Sync {
    /// Records an event. Sinks must not fail the run.
    fn record(&self, event: &HarnessEvent);
}
