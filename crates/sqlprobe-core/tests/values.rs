// crates/sqlprobe-core/tests/values.rs
// ============================================================================
// Module: Value Generation Tests
// Description: Payload synthesis and coercing id comparison.
// Purpose: Pin generated payload shapes and the loose integer contract.
// ============================================================================

//! Value generation and comparison tests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeSet;

use proptest::prelude::*;
use sqlprobe_core::PATTERN_BLOCK;
use sqlprobe_core::SqlValue;
use sqlprobe_core::generate_values;
use sqlprobe_core::pattern_payload;
use sqlprobe_core::record_id;

#[test]
fn pattern_block_is_one_hundred_characters() {
    assert_eq!(PATTERN_BLOCK.chars().count(), 100);
    assert!(PATTERN_BLOCK.is_ascii());
}

#[test]
fn payload_repeats_block_at_least_once() {
    assert_eq!(pattern_payload(0), PATTERN_BLOCK);
    assert_eq!(pattern_payload(1).len(), 100);
    assert_eq!(pattern_payload(100).len(), 100);
    assert_eq!(pattern_payload(101).len(), 200);
    assert_eq!(pattern_payload(1000).len(), 1000);
}

#[test]
fn values_are_suffixed_with_their_index() {
    let values = generate_values(150, 3);
    assert_eq!(values.len(), 3);
    for (index, value) in values.iter().enumerate() {
        assert!(value.starts_with(PATTERN_BLOCK));
        assert_eq!(value.len(), 200 + index.to_string().len());
        assert!(value.ends_with(&index.to_string()));
    }
}

#[test]
fn zero_records_yield_no_values() {
    assert!(generate_values(1000, 0).is_empty());
}

#[test]
fn record_ids_start_at_one_hundred_one() {
    assert_eq!(record_id(0), Some(101));
    assert_eq!(record_id(4999), Some(5100));
    assert_eq!(record_id(usize::MAX), None);
}

#[test]
fn loose_equality_accepts_coercible_ids() {
    assert!(SqlValue::Integer(123).loosely_equals_int(123));
    assert!(SqlValue::Text("123".to_string()).loosely_equals_int(123));
    assert!(SqlValue::Text(" 123 ".to_string()).loosely_equals_int(123));
    assert!(SqlValue::Real(123.0).loosely_equals_int(123));
}

#[test]
fn loose_equality_rejects_other_values() {
    assert!(!SqlValue::Text("abc".to_string()).loosely_equals_int(123));
    assert!(!SqlValue::Text("123.5".to_string()).loosely_equals_int(123));
    assert!(!SqlValue::Real(123.5).loosely_equals_int(123));
    assert!(!SqlValue::Real(f64::NAN).loosely_equals_int(123));
    assert!(!SqlValue::Integer(124).loosely_equals_int(123));
    assert!(!SqlValue::Null.loosely_equals_int(123));
    assert!(!SqlValue::Blob(b"123".to_vec()).loosely_equals_int(123));
}

#[test]
fn loose_equality_accepts_integral_float_text() {
    assert!(SqlValue::Text("123.0".to_string()).loosely_equals_int(123));
    assert!(SqlValue::Text("1.23e2".to_string()).loosely_equals_int(123));
    assert!(SqlValue::Text(" 123.00 ".to_string()).loosely_equals_int(123));
    assert!(!SqlValue::Text("123.5".to_string()).loosely_equals_int(123));
    assert!(!SqlValue::Text("1.24e2".to_string()).loosely_equals_int(123));
    assert!(!SqlValue::Text("inf".to_string()).loosely_equals_int(123));
    assert!(!SqlValue::Text("NaN".to_string()).loosely_equals_int(123));
}

proptest! {
    #[test]
    fn generated_values_are_distinct_and_long_enough(
        char_count in 0usize .. 2_500,
        record_count in 0usize .. 200,
    ) {
        let values = generate_values(char_count, record_count);
        prop_assert_eq!(values.len(), record_count);
        let distinct: BTreeSet<&String> = values.iter().collect();
        prop_assert_eq!(distinct.len(), record_count);
        for (index, value) in values.iter().enumerate() {
            let suffix = index.to_string();
            prop_assert!(value.ends_with(&suffix));
            prop_assert!(value.len() - suffix.len() >= char_count);
        }
    }

    #[test]
    fn generation_is_deterministic(char_count in 0usize .. 500, record_count in 0usize .. 50) {
        prop_assert_eq!(
            generate_values(char_count, record_count),
            generate_values(char_count, record_count)
        );
    }
}
