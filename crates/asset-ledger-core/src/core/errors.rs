// crates/asset-ledger-core/src/core/errors.rs
// ============================================================================
// Module: Asset Ledger Errors
// Description: Closed error taxonomy for table and domain operations.
// Purpose: Let callers branch on error kind with structured table/key context.
// Dependencies: serde, thiserror, crate::core::codec
// ============================================================================

//! ## Overview
//! Every ledger operation reports failures through [`LedgerError`]. Variants
//! carry the table and key context needed to diagnose a failure instead of a
//! pre-formatted message. Payload bytes never appear in an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

use crate::core::codec::DecodeError;
use crate::core::codec::EncodeError;

// ============================================================================
// SECTION: Engine Operations
// ============================================================================

/// Engine primitive that produced a failure.
///
/// # Invariants
/// - Labels are stable for audit and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineOperation {
    /// Table creation.
    Create,
    /// Table drop.
    Drop,
    /// Single-row insert.
    Insert,
    /// Exact-key row fetch.
    Get,
    /// Prefix row stream.
    Scan,
    /// Flat state write.
    PutState,
    /// Flat state read.
    GetState,
}

impl EngineOperation {
    /// Returns a stable label for the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Drop => "drop",
            Self::Insert => "insert",
            Self::Get => "get",
            Self::Scan => "scan",
            Self::PutState => "put_state",
            Self::GetState => "get_state",
        }
    }

    /// Returns true for read primitives (failures surface as query errors).
    #[must_use]
    pub const fn is_query(self) -> bool {
        matches!(self, Self::Get | Self::Scan | Self::GetState)
    }
}

// ============================================================================
// SECTION: Validation Errors
// ============================================================================

/// Input rejected before any engine call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Wrong number of arguments for a named operation.
    #[error("incorrect number of arguments: expected {expected}, got {actual}")]
    ArgumentCount {
        /// Expected argument count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },
    /// Serial number is not an integer.
    #[error("serial number must be an integer: {value:?}")]
    NonNumericSerial {
        /// Rejected serial number.
        value: String,
    },
    /// Key tuple length does not match the table's key arity.
    #[error("key for table {table} must have {expected} components, got {actual}")]
    KeyArity {
        /// Table name.
        table: String,
        /// Catalog key arity.
        expected: usize,
        /// Supplied key length.
        actual: usize,
    },
    /// Scan prefix is empty or longer than the table's key arity.
    #[error("scan prefix for table {table} must have 1..={max} components, got {actual}")]
    PrefixLength {
        /// Table name.
        table: String,
        /// Catalog key arity.
        max: usize,
        /// Supplied prefix length.
        actual: usize,
    },
}

// ============================================================================
// SECTION: Ledger Errors
// ============================================================================

/// Ledger operation failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Key context is the caller-supplied key (or its first component).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Malformed input; nothing was written.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    /// Table is unknown to the catalog or has no key columns.
    #[error("invalid schema for table {table}: at least 1 key column is required")]
    InvalidSchema {
        /// Table name.
        table: String,
    },
    /// Insert collided with an existing key; the stored row is unchanged.
    #[error("row with key {key:?} already exists in table {table}")]
    DuplicateKey {
        /// Table name.
        table: String,
        /// Colliding key.
        key: Vec<String>,
    },
    /// Point read found no row for the key.
    #[error("no row with key {key:?} in table {table}")]
    NotFound {
        /// Table name.
        table: String,
        /// Requested key.
        key: Vec<String>,
    },
    /// Stored payload does not match the expected record structure.
    #[error("table {table} key {key:?}: {source}")]
    Decode {
        /// Table name.
        table: String,
        /// Key of the offending row.
        key: Vec<String>,
        /// Decode failure.
        source: DecodeError,
    },
    /// Record could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// Engine rejected the operation.
    #[error("{} on table {table} failed (key {key_hint:?}): {message}", .operation.as_str())]
    Engine {
        /// Table (or flat state key) involved.
        table: String,
        /// Engine primitive that failed.
        operation: EngineOperation,
        /// First key component when available.
        key_hint: Option<String>,
        /// Engine failure description.
        message: String,
    },
    /// Named operation is not registered.
    #[error("received unknown function invocation: {function}")]
    UnknownFunction {
        /// Requested function name.
        function: String,
    },
}

impl LedgerError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::InvalidSchema {
                ..
            } => "invalid_schema",
            Self::DuplicateKey {
                ..
            } => "duplicate_key",
            Self::NotFound {
                ..
            } => "not_found",
            Self::Decode {
                ..
            } => "decode",
            Self::Encode(_) => "encode",
            Self::Engine {
                operation,
                ..
            } => {
                if operation.is_query() {
                    "query"
                } else {
                    "engine"
                }
            }
            Self::UnknownFunction {
                ..
            } => "unknown_function",
        }
    }
}
