// sqlprobe-config/src/lib.rs
// ============================================================================
// Module: SQL Probe Config Library
// Description: Configuration model, validation, and example generation.
// Purpose: Single source of truth for sqlprobe.toml semantics.
// Dependencies: sqlprobe-core, sqlprobe-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `sqlprobe-config` defines the `sqlprobe.toml` model: which store to open,
//! how the harness runs, and where structured events go. Loading enforces
//! path and size limits and validates every section before use.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
