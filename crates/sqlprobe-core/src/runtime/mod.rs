// sqlprobe-core/src/runtime/mod.rs
// ============================================================================
// Module: SQL Probe Runtime
// Description: Harness operations, pipeline orchestration, and sinks.
// Purpose: Execute verification runs against any SQL store implementation.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime drives a [`crate::SqlStore`] through the harness phases. It
//! also ships an in-memory store for tests and the standard event sinks.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod events;
pub mod harness;
pub mod memory;
pub mod pipeline;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use events::FileEventSink;
pub use events::MemoryEventSink;
pub use events::NoopEventSink;
pub use events::StderrEventSink;
pub use harness::bulk_insert;
pub use harness::check_count;
pub use harness::count_rows;
pub use harness::insert_values;
pub use harness::repeated_update_read;
pub use harness::reset_table;
pub use harness::select_all;
pub use harness::uppercase_check;
pub use memory::InMemorySqlStore;
pub use memory::InMemoryStoreOpener;
pub use pipeline::run_and_report;
pub use pipeline::run_full_pipeline;
