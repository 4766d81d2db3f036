// crates/asset-ledger-core/src/core/asset.rs
// ============================================================================
// Module: Asset Ledger Asset Record
// Description: Asset domain record and its validated construction from raw args.
// Purpose: Turn raw string arguments into an immutable record ready to encode.
// Dependencies: serde, crate::core::{codec, errors}
// ============================================================================

//! ## Overview
//! An [`AssetRecord`] is built once from raw arguments, validated, encoded, and
//! written. Ownership changes are recorded as new history rows; a stored record
//! is never mutated. Field labels on the wire are `Serialno`, `Partno`, and
//! `Owner`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::codec::DecodeError;
use crate::core::codec::EncodeError;
use crate::core::codec::decode_record;
use crate::core::codec::encode_record;
use crate::core::errors::ValidationError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Number of raw arguments an asset is built from.
pub const ASSET_ARGUMENT_COUNT: usize = 3;

// ============================================================================
// SECTION: Asset Record
// ============================================================================

/// Asset domain record.
///
/// # Invariants
/// - `serial_number` parses as a signed 64-bit integer when built via
///   [`AssetRecord::from_args`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Serial number (integer-valued string).
    #[serde(rename = "Serialno")]
    pub serial_number: String,
    /// Part number.
    #[serde(rename = "Partno")]
    pub part_number: String,
    /// Current owner.
    #[serde(rename = "Owner")]
    pub owner: String,
}

impl AssetRecord {
    /// Builds an asset from `[serial_number, part_number, owner]`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ArgumentCount`] unless exactly three arguments
    /// are supplied, and [`ValidationError::NonNumericSerial`] when the serial
    /// number is not an integer.
    pub fn from_args(args: &[String]) -> Result<Self, ValidationError> {
        let [serial_number, part_number, owner] = args else {
            return Err(ValidationError::ArgumentCount {
                expected: ASSET_ARGUMENT_COUNT,
                actual: args.len(),
            });
        };
        if serial_number.parse::<i64>().is_err() {
            return Err(ValidationError::NonNumericSerial {
                value: serial_number.clone(),
            });
        }
        Ok(Self {
            serial_number: serial_number.clone(),
            part_number: part_number.clone(),
            owner: owner.clone(),
        })
    }

    /// Encodes the record as payload bytes in field declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] when serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        encode_record(self)
    }

    /// Decodes a record from payload bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when the payload is malformed or misses a field.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        decode_record(bytes)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
