// sqlprobe-core/src/core/sql.rs
// ============================================================================
// Module: Harness SQL
// Description: SQL text issued by the verification harness.
// Purpose: Keep statement text in one place for the harness and test stores.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Every statement the harness sends targets the single working table
//! [`WORKING_TABLE`]. The table is created without declared column types so
//! stores keep whatever storage class the parameters carry.

/// Name of the ephemeral working table.
pub const WORKING_TABLE: &str = "tt";

/// Drops the working table when present.
pub const DROP_TABLE: &str = "DROP TABLE IF EXISTS tt";
/// Creates the working table.
pub const CREATE_TABLE: &str = "CREATE TABLE tt (id, value)";
/// Inserts one `(id, value)` row.
pub const INSERT_ROW: &str = "INSERT INTO tt VALUES (?,?)";
/// Counts rows in the working table.
pub const COUNT_ROWS: &str = "SELECT COUNT(*) AS count FROM tt";
/// Reads every row of the working table.
pub const SELECT_ALL: &str = "SELECT * FROM tt";
/// Rewrites the value of one row by id.
pub const UPDATE_VALUE: &str = "UPDATE tt SET value = ? WHERE id = ?";
/// Uppercases a bound text parameter.
pub const SELECT_UPPER: &str = "SELECT UPPER(?) AS upper_text";
