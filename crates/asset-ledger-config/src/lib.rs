// crates/asset-ledger-config/src/lib.rs
// ============================================================================
// Module: Asset Ledger Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for asset-ledger.toml semantics.
// Dependencies: asset-ledger-core, asset-ledger-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `asset-ledger-config` defines the configuration model for the asset
//! ledger. It loads TOML with strict size and path limits and fails closed on
//! invalid values.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
