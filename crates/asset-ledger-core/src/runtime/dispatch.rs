// crates/asset-ledger-core/src/runtime/dispatch.rs
// ============================================================================
// Module: Asset Ledger Dispatch
// Description: Named invoke and query functions over the asset ledger.
// Purpose: Route a function name and string arguments to a ledger operation.
// Dependencies: crate::{audit, core, runtime::ledger}
// ============================================================================

//! ## Overview
//! Callers address the ledger by function name with a list of string
//! arguments. Invoke functions may write; query functions only read. A name
//! outside the registered set fails with [`LedgerError::UnknownFunction`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::audit::AuditOutcome;
use crate::audit::LedgerAuditEvent;
use crate::core::LedgerError;
use crate::runtime::ledger::AssetLedger;

// ============================================================================
// SECTION: Function Names
// ============================================================================

/// Invoke function: post an asset.
pub const POST_ASSET: &str = "postAsset";
/// Query function: read an asset by serial number.
pub const GET_ASSET: &str = "getAsset";
/// Query function: read one history row by full key.
pub const GET_HISTORY: &str = "getHistory";
/// Query function: list history rows under a key prefix.
pub const LIST_HISTORY: &str = "listHistory";

/// Registered invoke functions.
pub const INVOKE_FUNCTIONS: &[&str] = &[POST_ASSET];
/// Registered query functions.
pub const QUERY_FUNCTIONS: &[&str] = &[GET_ASSET, GET_HISTORY, LIST_HISTORY];

// ============================================================================
// SECTION: Dispatch
// ============================================================================

impl AssetLedger {
    /// Runs a named invoke function.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownFunction`] for unregistered names and the
    /// failures of the named operation otherwise.
    pub fn invoke(&self, function: &str, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        match function {
            POST_ASSET => self.post_asset(args),
            _ => Err(self.unknown_function(function)),
        }
    }

    /// Runs a named query function.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownFunction`] for unregistered names and the
    /// failures of the named operation otherwise.
    pub fn query(&self, function: &str, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        match function {
            GET_ASSET => self.get_asset(args),
            GET_HISTORY => self.get_history(args),
            LIST_HISTORY => self.list_history(args),
            _ => Err(self.unknown_function(function)),
        }
    }

    /// Builds and audits an unknown-function failure.
    fn unknown_function(&self, function: &str) -> LedgerError {
        let err = LedgerError::UnknownFunction {
            function: function.to_string(),
        };
        self.store().emit(
            &LedgerAuditEvent::new("function.unknown", AuditOutcome::Rejected)
                .key(&[function.to_string()])
                .error_kind(err.kind()),
        );
        err
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
