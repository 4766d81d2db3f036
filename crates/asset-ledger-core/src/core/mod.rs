// crates/asset-ledger-core/src/core/mod.rs
// ============================================================================
// Module: Asset Ledger Core Types
// Description: Catalog, column model, codec, records, and errors.
// Purpose: Group the value types shared by the runtime and engine backends.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Core types are plain values with no engine access. The runtime composes
//! them with a [`crate::interfaces::LedgerEngine`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod asset;
pub mod catalog;
pub mod codec;
pub mod columns;
pub mod errors;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use asset::ASSET_ARGUMENT_COUNT;
pub use asset::AssetRecord;
pub use catalog::ASSET_TABLE;
pub use catalog::HISTORY_TABLE;
pub use catalog::SchemaCatalog;
pub use codec::DecodeError;
pub use codec::EncodeError;
pub use columns::ColumnDefinition;
pub use columns::ColumnKind;
pub use columns::ColumnValue;
pub use columns::Row;
pub use columns::key_values;
pub use errors::EngineOperation;
pub use errors::LedgerError;
pub use errors::ValidationError;
