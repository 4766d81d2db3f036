// crates/asset-ledger-core/src/lib.rs
// ============================================================================
// Module: Asset Ledger Core Library
// Description: Public API surface for the asset ledger core.
// Purpose: Expose core types, the engine interface, and runtime helpers.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Asset ledger core is a transactional record store layered over an external
//! append-only engine. Tables have composite string keys and one opaque
//! payload column; inserts never overwrite; reads are exact-key or prefix
//! scans. It is backend-agnostic and integrates with storage through the
//! [`LedgerEngine`] trait.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use audit::AuditOutcome;
pub use audit::FileAuditSink;
pub use audit::LedgerAuditEvent;
pub use audit::LedgerAuditSink;
pub use audit::MemoryAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use interfaces::CreateOutcome;
pub use interfaces::DropOutcome;
pub use interfaces::EngineError;
pub use interfaces::LedgerEngine;
pub use interfaces::RowItem;
pub use interfaces::RowSender;
pub use interfaces::RowStream;
pub use runtime::AssetLedger;
pub use runtime::DEFAULT_APP_VERSION;
pub use runtime::DEFAULT_HISTORY_DISAMBIGUATOR;
pub use runtime::DEFAULT_HISTORY_ERA;
pub use runtime::DEFAULT_MAX_ROWS_PER_SCAN;
pub use runtime::HistoryEntry;
pub use runtime::HistoryKeyPolicy;
pub use runtime::INVOKE_FUNCTIONS;
pub use runtime::InMemoryLedgerEngine;
pub use runtime::QUERY_FUNCTIONS;
pub use runtime::ScanResult;
pub use runtime::ScannedRow;
pub use runtime::TableStore;
pub use runtime::VERSION_STATE_KEY;
