// sqlprobe-core/src/lib.rs
// ============================================================================
// Module: SQL Probe Core Library
// Description: Public API surface for the SQL Probe verification harness.
// Purpose: Expose the data model, store interfaces, and pipeline runtime.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! SQL Probe drives a fixed sequence of transactions against a SQL-like store,
//! checks every result set against the values it wrote, and reports one
//! outcome string with per-phase timings. The harness is backend-agnostic and
//! reaches the store only through the [`SqlStore`] and [`StoreOpener`]
//! interfaces.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::HarnessEventSink;
pub use interfaces::OpenOptions;
pub use interfaces::Reporter;
pub use interfaces::SqlStore;
pub use interfaces::StoreError;
pub use interfaces::StoreOpener;
pub use runtime::FileEventSink;
pub use runtime::InMemorySqlStore;
pub use runtime::InMemoryStoreOpener;
pub use runtime::MemoryEventSink;
pub use runtime::NoopEventSink;
pub use runtime::StderrEventSink;
pub use runtime::bulk_insert;
pub use runtime::check_count;
pub use runtime::count_rows;
pub use runtime::insert_values;
pub use runtime::repeated_update_read;
pub use runtime::reset_table;
pub use runtime::run_and_report;
pub use runtime::run_full_pipeline;
pub use runtime::select_all;
pub use runtime::uppercase_check;
