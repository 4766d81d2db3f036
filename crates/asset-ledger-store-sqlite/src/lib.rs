// crates/asset-ledger-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Ledger Engine
// Description: Durable LedgerEngine backend using SQLite WAL.
// Purpose: Provide persistent tables, rows, and flat state for the asset ledger.
// Dependencies: asset-ledger-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`asset_ledger_core::LedgerEngine`].
//! Each ledger table becomes one physical table whose primary key is the key
//! column tuple, so inserts can never overwrite. Prefix reads stream rows from
//! a dedicated read connection on a producer thread. Database contents are
//! treated as untrusted and validated on read.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::DEFAULT_STREAM_BUFFER;
pub use store::SqliteLedgerConfig;
pub use store::SqliteLedgerEngine;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
