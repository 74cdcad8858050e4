// sqlprobe-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic starting point for sqlprobe.toml.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for SQL Probe configuration. Every value shown equals
//! its default, so the example describes the stock run.

/// Returns a canonical example `sqlprobe.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[store]
name = "test.db"
location = "default"
# engine_variant = "bundled"
directory = "."
busy_timeout_ms = 5000
journal_mode = "wal"
sync_mode = "full"

[harness]
uppercase_check = false
populate_record_count = 5000
populate_record_size = 1000
full_check = true

[harness.extra_bulk]
enabled = false
char_count = 100
record_count = 70000

[harness.bulk]
enabled = true
char_count = 100
record_count = 70000

[harness.update_read]
enabled = true
value_count = 100

[logging]
sink = "stderr"
# path = "sqlprobe-events.jsonl"
"#,
    )
}
