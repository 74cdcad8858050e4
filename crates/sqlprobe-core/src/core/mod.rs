// sqlprobe-core/src/core/mod.rs
// ============================================================================
// Module: SQL Probe Core Types
// Description: Data model for statements, result sets, phases, and outcomes.
// Purpose: Provide stable, serializable types shared by stores and the harness.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Core types describe what flows between the harness and a store: SQL
//! statements and their typed result sets, the generated test records, the
//! pipeline phases with their timings, and the terminal [`Outcome`] of a run.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod config;
pub mod error;
pub mod event;
pub mod outcome;
pub mod phase;
pub mod record;
pub mod sql;
pub mod values;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::BulkLoadConfig;
pub use config::HarnessConfig;
pub use config::MAX_CHAR_COUNT;
pub use config::MAX_RECORD_COUNT;
pub use config::UpdateReadConfig;
pub use error::HarnessError;
pub use error::ResultShapeError;
pub use event::HarnessEvent;
pub use event::HarnessEventKind;
pub use outcome::FailureReport;
pub use outcome::Outcome;
pub use outcome::SuccessReport;
pub use outcome::TimingSummary;
pub use phase::Phase;
pub use phase::PhaseTiming;
pub use phase::duration_ms;
pub use record::FIRST_RECORD_ID;
pub use record::PATTERN_BLOCK;
pub use record::Record;
pub use record::UPDATE_RECORD_ID;
pub use record::generate_values;
pub use record::pattern_payload;
pub use record::record_id;
pub use values::Batch;
pub use values::ResultSet;
pub use values::Row;
pub use values::SqlValue;
pub use values::Statement;
