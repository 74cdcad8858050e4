//! Config load validation tests for sqlprobe-config.
// crates/sqlprobe-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards, defaults, and section rules.
// Purpose: Ensure config input handling is strict and defaults match the stock run.
// =============================================================================

#![allow(clippy::use_debug, reason = "Failure messages include debug renderings.")]

use std::io::Write;
use std::path::Path;

use sqlprobe_config::ConfigError;
use sqlprobe_config::EventSinkKind;
use sqlprobe_config::SqlProbeConfig;
use sqlprobe_config::config_toml_example;
use sqlprobe_core::HarnessConfig;
use sqlprobe_store_sqlite::SqliteStoreMode;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<SqlProbeConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(content: &str) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(content.as_bytes()).map_err(|err| err.to_string())?;
    Ok(file)
}

// ============================================================================
// SECTION: Load Guards
// ============================================================================

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(SqlProbeConfig::load(Some(path)), "config path exceeds max length")
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(SqlProbeConfig::load(Some(path)), "config path component too long")
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'#'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(SqlProbeConfig::load(Some(file.path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(SqlProbeConfig::load(Some(file.path())), "config file must be utf-8")
}

#[test]
fn load_rejects_missing_explicit_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(SqlProbeConfig::load(Some(&path)), "config io error")
}

#[test]
fn load_rejects_unknown_sections() -> TestResult {
    let file = write_config("[storage]\nname = \"x.db\"\n")?;
    assert_invalid(SqlProbeConfig::load(Some(file.path())), "config parse error")
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

#[test]
fn empty_file_yields_stock_defaults() -> TestResult {
    let file = write_config("")?;
    let config = SqlProbeConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config != SqlProbeConfig::default() {
        return Err(format!("unexpected config: {config:?}"));
    }
    if config.harness != HarnessConfig::default() {
        return Err("harness defaults differ".to_string());
    }
    let options = config.store.open_options();
    if options.name != "test.db" || options.location != "default" {
        return Err(format!("unexpected open options: {options:?}"));
    }
    if config.logging.sink != EventSinkKind::Stderr {
        return Err("default sink should be stderr".to_string());
    }
    Ok(())
}

#[test]
fn example_config_parses_to_defaults() -> TestResult {
    let config =
        SqlProbeConfig::from_toml_str(&config_toml_example()).map_err(|err| err.to_string())?;
    if config != SqlProbeConfig::default() {
        return Err(format!("example drifted from defaults: {config:?}"));
    }
    Ok(())
}

#[test]
fn sections_override_defaults() -> TestResult {
    let config = SqlProbeConfig::from_toml_str(
        r#"
[store]
name = "probe.db"
directory = "/tmp/probe"
journal_mode = "delete"

[harness]
full_check = false
populate_record_count = 10

[harness.bulk]
enabled = false
"#,
    )
    .map_err(|err| err.to_string())?;
    if config.store.name != "probe.db" || config.store.journal_mode != SqliteStoreMode::Delete {
        return Err(format!("store overrides lost: {:?}", config.store));
    }
    let opener = config.store.sqlite_opener();
    if opener.directory != Path::new("/tmp/probe") {
        return Err(format!("unexpected opener: {opener:?}"));
    }
    if config.harness.full_check || config.harness.bulk.enabled {
        return Err("harness overrides lost".to_string());
    }
    if config.harness.populate_record_size != 1000 {
        return Err("unspecified harness fields should keep defaults".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Section Validation
// ============================================================================

#[test]
fn harness_limits_are_enforced() -> TestResult {
    assert_invalid(
        SqlProbeConfig::from_toml_str("[harness.bulk]\nrecord_count = 0\n"),
        "bulk.record_count must be greater than zero",
    )?;
    assert_invalid(
        SqlProbeConfig::from_toml_str("[harness]\npopulate_record_count = 0\n"),
        "populate_record_count must be greater than zero",
    )?;
    assert_invalid(
        SqlProbeConfig::from_toml_str("[harness]\npopulate_record_size = 2000000\n"),
        "char count exceeds limit",
    )
}

#[test]
fn store_names_must_be_plain() -> TestResult {
    assert_invalid(
        SqlProbeConfig::from_toml_str("[store]\nname = \"../escape.db\"\n"),
        "store.name must be a plain name",
    )?;
    assert_invalid(
        SqlProbeConfig::from_toml_str("[store]\nname = \"  \"\n"),
        "store.name must be non-empty",
    )?;
    assert_invalid(
        SqlProbeConfig::from_toml_str("[store]\nlocation = \"a/b\"\n"),
        "store.location must be a plain name",
    )
}

#[test]
fn store_timeout_is_bounded() -> TestResult {
    assert_invalid(
        SqlProbeConfig::from_toml_str("[store]\nbusy_timeout_ms = 600001\n"),
        "store.busy_timeout_ms exceeds limit",
    )
}

#[test]
fn file_sink_requires_path() -> TestResult {
    assert_invalid(
        SqlProbeConfig::from_toml_str("[logging]\nsink = \"file\"\n"),
        "logging.path is required",
    )?;
    let config = SqlProbeConfig::from_toml_str(
        "[logging]\nsink = \"file\"\npath = \"events.jsonl\"\n",
    )
    .map_err(|err| err.to_string())?;
    if config.logging.sink != EventSinkKind::File {
        return Err("file sink not selected".to_string());
    }
    Ok(())
}
