// sqlprobe-core/src/core/record.rs
// ============================================================================
// Module: Test Records
// Description: Synthetic payload generation and record identifiers.
// Purpose: Produce deterministic, distinct values of a requested size.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Payloads are built by repeating [`PATTERN_BLOCK`] until the requested
//! character count is covered, then appending the record's zero-based index.
//! The suffix keeps every value distinct; the block keeps the size
//! predictable. Record ids start at [`FIRST_RECORD_ID`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fixed 100-character block repeated to synthesize payloads.
pub const PATTERN_BLOCK: &str = concat!(
    "-ABCDEFGHIJKLMNOPQRSTUVWXYZ-1234567890---!#$%^*()-",
    "-abcdefghijklmnopqrstuvwxyz-!#$%^&*()--1234567890-",
);

/// Id of the first inserted record; ids increase by one per record.
pub const FIRST_RECORD_ID: i64 = 101;

/// Id of the single row used by the repeated update/read phase.
pub const UPDATE_RECORD_ID: i64 = 123;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A row of the working table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record identifier.
    pub id: i64,
    /// Record payload.
    pub value: String,
}

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Returns the pattern block repeated enough times to cover `char_count`.
///
/// The block is always emitted at least once.
#[must_use]
pub fn pattern_payload(char_count: usize) -> String {
    let repeat = char_count.div_ceil(PATTERN_BLOCK.len()).max(1);
    PATTERN_BLOCK.repeat(repeat)
}

/// Builds `record_count` distinct values of at least `char_count` characters
/// each, suffixed with their zero-based index.
#[must_use]
pub fn generate_values(char_count: usize, record_count: usize) -> Vec<String> {
    let payload = pattern_payload(char_count);
    (0 .. record_count).map(|index| format!("{payload}{index}")).collect()
}

/// Returns the record id for a zero-based index, or `None` on overflow.
#[must_use]
pub fn record_id(index: usize) -> Option<i64> {
    i64::try_from(index).ok().and_then(|offset| FIRST_RECORD_ID.checked_add(offset))
}
