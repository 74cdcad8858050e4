// sqlprobe-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite SQL Store
// Description: SqlStore backend using an embedded SQLite database.
// Purpose: Run harness transactions against a real file-backed engine.
// Dependencies: sqlprobe-core, rusqlite, tokio
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`sqlprobe_core::SqlStore`] and the
//! matching [`sqlprobe_core::StoreOpener`]. Each batch runs inside one
//! `SQLite` transaction on the blocking thread pool.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::DEFAULT_BUSY_TIMEOUT_MS;
pub use store::SqliteSqlStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteStoreOpener;
pub use store::SqliteSyncMode;
