// crates/asset-ledger-core/src/core/codec.rs
// ============================================================================
// Module: Asset Ledger Record Codec
// Description: JSON encoding of domain records into payload bytes.
// Purpose: Produce deterministic payloads and report decode failures per row.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Payloads are compact JSON objects whose fields appear in the record's
//! declaration order, so the same record always encodes to the same bytes,
//! whichever table it lands in. Decoding is field-labelled and
//! order-independent; a decode failure is a value, not a panic, so a scan can
//! attach it to the row that produced it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Payload encoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to encode record payload: {0}")]
pub struct EncodeError(pub String);

/// Payload decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to decode record payload: {message}")]
pub struct DecodeError {
    /// Structural failure description.
    pub message: String,
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// Encodes a record as compact JSON bytes in field declaration order.
///
/// # Errors
///
/// Returns [`EncodeError`] when the record cannot be serialized.
pub fn encode_record<T: Serialize + ?Sized>(record: &T) -> Result<Vec<u8>, EncodeError> {
    serde_json::to_vec(record).map_err(|err| EncodeError(err.to_string()))
}

/// Decodes payload bytes into a record.
///
/// # Errors
///
/// Returns [`DecodeError`] when the bytes are not valid JSON or do not match
/// the record's fields.
pub fn decode_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(bytes).map_err(|err| DecodeError {
        message: classify_json_error(&err),
    })
}

/// Prefixes a JSON error with its category label.
fn classify_json_error(err: &serde_json::Error) -> String {
    let category = match err.classify() {
        serde_json::error::Category::Io => "io",
        serde_json::error::Category::Syntax => "syntax",
        serde_json::error::Category::Data => "data",
        serde_json::error::Category::Eof => "eof",
    };
    format!("{category}: {err}")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::expect_used,
        clippy::unwrap_used,
        reason = "Test assertions use expect/unwrap for clarity."
    )]

    use std::collections::BTreeMap;

    use serde::Deserialize;
    use serde::Serialize;

    use super::decode_record;
    use super::encode_record;

    /// Record whose field order is not alphabetical.
    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    struct Pair {
        /// Declared first.
        zeta: String,
        /// Declared second.
        alpha: u32,
    }

    #[test]
    fn encode_keeps_declaration_order() {
        let pair = Pair {
            zeta: "z".to_string(),
            alpha: 1,
        };
        assert_eq!(encode_record(&pair).unwrap(), br#"{"zeta":"z","alpha":1}"#.to_vec());
    }

    #[test]
    fn encode_sorts_map_keys() {
        let map: BTreeMap<&str, u32> = [("b", 2), ("a", 1)].into_iter().collect();
        assert_eq!(encode_record(&map).unwrap(), br#"{"a":1,"b":2}"#.to_vec());
    }

    #[test]
    fn malformed_json_is_a_syntax_failure() {
        let err = decode_record::<Pair>(b"{zeta}").unwrap_err();
        assert!(err.message.starts_with("syntax: "), "{}", err.message);
    }

    #[test]
    fn truncated_json_is_an_eof_failure() {
        let err = decode_record::<Pair>(br#"{"zeta":"z","#).unwrap_err();
        assert!(err.message.starts_with("eof: "), "{}", err.message);
    }

    #[test]
    fn wrong_shape_is_a_data_failure() {
        let err = decode_record::<Pair>(br#"{"zeta":"z","alpha":"one"}"#).unwrap_err();
        assert!(err.message.starts_with("data: "), "{}", err.message);
        let err = decode_record::<Pair>(br#"{"zeta":"z"}"#).unwrap_err();
        assert!(err.message.starts_with("data: "));
        assert!(err.message.contains("alpha"));
    }

    #[test]
    fn empty_payload_is_an_eof_failure() {
        let err = decode_record::<Pair>(b"").unwrap_err();
        assert!(err.message.starts_with("eof: "));
        assert!(err.to_string().starts_with("failed to decode record payload: eof"));
    }
}
