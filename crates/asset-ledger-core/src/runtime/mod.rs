// crates/asset-ledger-core/src/runtime/mod.rs
// ============================================================================
// Module: Asset Ledger Runtime
// Description: Table layer, asset coordinator, dispatch, and in-memory engine.
// Purpose: Execute ledger operations against any LedgerEngine backend.
// Dependencies: crate::{audit, core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the table layer over a [`crate::LedgerEngine`]
//! and the asset operations built on it. Every external surface calls into
//! the same [`AssetLedger`].

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod dispatch;
pub mod ledger;
pub mod memory;
pub mod scan;
pub mod store;
pub mod tables;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use dispatch::INVOKE_FUNCTIONS;
pub use dispatch::QUERY_FUNCTIONS;
pub use ledger::AssetLedger;
pub use ledger::DEFAULT_APP_VERSION;
pub use ledger::DEFAULT_HISTORY_DISAMBIGUATOR;
pub use ledger::DEFAULT_HISTORY_ERA;
pub use ledger::HistoryEntry;
pub use ledger::HistoryKeyPolicy;
pub use ledger::VERSION_STATE_KEY;
pub use memory::InMemoryLedgerEngine;
pub use scan::ScanResult;
pub use scan::ScannedRow;
pub use store::DEFAULT_MAX_ROWS_PER_SCAN;
pub use store::TableStore;
