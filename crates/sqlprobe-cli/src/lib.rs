// sqlprobe-cli/src/lib.rs
// ============================================================================
// Module: SQL Probe CLI Library
// Description: Shared helpers for the SQL Probe command-line interface.
// Purpose: Provide reusable components (i18n, repeat loop) for the binary and tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! This library module houses shared CLI utilities: the message catalog used
//! for every user-facing line and the repeat plan that decides whether the
//! `run` command triggers another probe. The binary entry point
//! (`src/main.rs`) imports these helpers.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;
/// Repeat loop decisions for the `run` command.
pub mod repeat;
