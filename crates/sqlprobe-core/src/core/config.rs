// sqlprobe-core/src/core/config.rs
// ============================================================================
// Module: Harness Configuration
// Description: Record counts, payload sizes, and phase switches for a run.
// Purpose: Replace module-level knobs with one explicit, validated structure.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`HarnessConfig`] selects which phases run and how much data each phase
//! writes. Defaults reproduce the stock run: a 70 000-row bulk load of
//! 100-character values, 5 000 populated records of 1 000 characters, a full
//! scan, and a 100-step update/read cycle.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::error::HarnessError;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum records written by any single phase.
pub const MAX_RECORD_COUNT: usize = 10_000_000;
/// Maximum requested payload size in characters.
pub const MAX_CHAR_COUNT: usize = 1_000_000;

/// Default bulk-load record count.
const DEFAULT_BULK_RECORD_COUNT: usize = 70_000;
/// Default bulk-load payload size.
const DEFAULT_BULK_CHAR_COUNT: usize = 100;
/// Default populate record count.
const DEFAULT_POPULATE_RECORD_COUNT: usize = 5_000;
/// Default populate payload size.
const DEFAULT_POPULATE_RECORD_SIZE: usize = 1_000;
/// Default number of values cycled through the update/read phase.
const DEFAULT_UPDATE_READ_COUNT: usize = 100;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Disposable bulk load run before the checked data is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BulkLoadConfig {
    /// Whether the phase runs.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Minimum payload size per record.
    #[serde(default = "default_bulk_char_count")]
    pub char_count: usize,
    /// Number of records inserted.
    #[serde(default = "default_bulk_record_count")]
    pub record_count: usize,
}

impl BulkLoadConfig {
    /// Returns a disabled bulk load with default sizes.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            char_count: DEFAULT_BULK_CHAR_COUNT,
            record_count: DEFAULT_BULK_RECORD_COUNT,
        }
    }

    /// Validates sizes against harness limits.
    fn validate(&self, field: &str) -> Result<(), HarnessError> {
        if !self.enabled {
            return Ok(());
        }
        if self.record_count == 0 {
            return Err(HarnessError::InvalidConfig(format!(
                "{field}.record_count must be greater than zero"
            )));
        }
        validate_counts(field, self.char_count, self.record_count)
    }
}

impl Default for BulkLoadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            char_count: DEFAULT_BULK_CHAR_COUNT,
            record_count: DEFAULT_BULK_RECORD_COUNT,
        }
    }
}

/// Repeated update/read cycle on a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateReadConfig {
    /// Whether the phase runs.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of values cycled through the row, including the seed value.
    #[serde(default = "default_update_read_count")]
    pub value_count: usize,
}

impl Default for UpdateReadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            value_count: DEFAULT_UPDATE_READ_COUNT,
        }
    }
}

/// Full harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Run the `UPPER()` sanity query before any writes.
    #[serde(default)]
    pub uppercase_check: bool,
    /// Extra bulk load ahead of the main one.
    #[serde(default = "BulkLoadConfig::disabled")]
    pub extra_bulk: BulkLoadConfig,
    /// Main bulk load timed as raw write throughput.
    #[serde(default)]
    pub bulk: BulkLoadConfig,
    /// Records written and verified by the populate, count, and scan phases.
    #[serde(default = "default_populate_record_count")]
    pub populate_record_count: usize,
    /// Minimum payload size of populated records.
    #[serde(default = "default_populate_record_size")]
    pub populate_record_size: usize,
    /// Run the full scan after the count check. When false the run reports
    /// right after the count check.
    #[serde(default = "default_true")]
    pub full_check: bool,
    /// Repeated update/read cycle.
    #[serde(default)]
    pub update_read: UpdateReadConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            uppercase_check: false,
            extra_bulk: BulkLoadConfig::disabled(),
            bulk: BulkLoadConfig::default(),
            populate_record_count: DEFAULT_POPULATE_RECORD_COUNT,
            populate_record_size: DEFAULT_POPULATE_RECORD_SIZE,
            full_check: true,
            update_read: UpdateReadConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Validates counts and sizes against harness limits.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidConfig`] when a limit is exceeded or a
    /// required count is zero.
    pub fn validate(&self) -> Result<(), HarnessError> {
        self.extra_bulk.validate("extra_bulk")?;
        self.bulk.validate("bulk")?;
        if self.populate_record_count == 0 {
            return Err(HarnessError::InvalidConfig(
                "populate_record_count must be greater than zero".to_string(),
            ));
        }
        validate_counts("populate", self.populate_record_size, self.populate_record_count)?;
        if self.update_read.enabled {
            if self.update_read.value_count == 0 {
                return Err(HarnessError::InvalidConfig(
                    "update_read.value_count must be greater than zero".to_string(),
                ));
            }
            validate_counts(
                "update_read",
                self.populate_record_size,
                self.update_read.value_count,
            )?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a size/count pair against the global limits.
fn validate_counts(field: &str, char_count: usize, record_count: usize) -> Result<(), HarnessError> {
    if record_count > MAX_RECORD_COUNT {
        return Err(HarnessError::InvalidConfig(format!(
            "{field} record count exceeds limit ({record_count} > {MAX_RECORD_COUNT})"
        )));
    }
    if char_count > MAX_CHAR_COUNT {
        return Err(HarnessError::InvalidConfig(format!(
            "{field} char count exceeds limit ({char_count} > {MAX_CHAR_COUNT})"
        )));
    }
    Ok(())
}

/// Serde default for enabled flags.
const fn default_true() -> bool {
    true
}

/// Serde default for bulk payload size.
const fn default_bulk_char_count() -> usize {
    DEFAULT_BULK_CHAR_COUNT
}

/// Serde default for bulk record count.
const fn default_bulk_record_count() -> usize {
    DEFAULT_BULK_RECORD_COUNT
}

/// Serde default for populate record count.
const fn default_populate_record_count() -> usize {
    DEFAULT_POPULATE_RECORD_COUNT
}

/// Serde default for populate payload size.
const fn default_populate_record_size() -> usize {
    DEFAULT_POPULATE_RECORD_SIZE
}

/// Serde default for update/read value count.
const fn default_update_read_count() -> usize {
    DEFAULT_UPDATE_READ_COUNT
}
