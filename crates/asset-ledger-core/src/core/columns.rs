// crates/asset-ledger-core/src/core/columns.rs
// ============================================================================
// Module: Asset Ledger Column Model
// Description: Tagged column kinds, values, definitions, and rows.
// Purpose: Give row construction and row decoding an exhaustive value type.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every table in the ledger is a run of string key columns followed by a
//! single opaque payload column. Column values are a closed tagged variant
//! so the row boundaries (insert, point read, scan) must handle both kinds
//! explicitly instead of probing an untyped cell.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Column Types
// ============================================================================

/// Physical kind of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// UTF-8 string column (used for key components).
    String,
    /// Opaque binary column (used for the payload).
    Bytes,
}

/// Column definition submitted to the engine at table creation.
///
/// # Invariants
/// - `name` is unique within its table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Column kind.
    pub kind: ColumnKind,
    /// Whether the column participates in the composite key.
    pub key: bool,
}

impl ColumnDefinition {
    /// Creates a string key column definition.
    #[must_use]
    pub fn string_key(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::String,
            key: true,
        }
    }

    /// Creates a non-key binary payload column definition.
    #[must_use]
    pub fn bytes_payload(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Bytes,
            key: false,
        }
    }
}

/// Single cell value stored in a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ColumnValue {
    /// String cell.
    String(String),
    /// Binary cell.
    Bytes(Vec<u8>),
}

impl ColumnValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ColumnKind {
        match self {
            Self::String(_) => ColumnKind::String,
            Self::Bytes(_) => ColumnKind::Bytes,
        }
    }

    /// Returns the string content when this is a string cell.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            Self::Bytes(_) => None,
        }
    }

    /// Returns the binary content when this is a bytes cell.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::String(_) => None,
            Self::Bytes(value) => Some(value),
        }
    }
}

/// Builds string cells for an ordered key tuple.
#[must_use]
pub fn key_values(key: &[String]) -> Vec<ColumnValue> {
    key.iter().cloned().map(ColumnValue::String).collect()
}

// ============================================================================
// SECTION: Rows
// ============================================================================

/// Ordered row of cells as exchanged with the engine.
///
/// An empty row is the engine's "no such key" answer for point reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Cells in column order.
    pub columns: Vec<ColumnValue>,
}

impl Row {
    /// Creates a row from cells.
    #[must_use]
    pub const fn new(columns: Vec<ColumnValue>) -> Self {
        Self {
            columns,
        }
    }

    /// Builds a ledger row from a key tuple followed by a payload.
    #[must_use]
    pub fn from_key_and_payload(key: &[String], payload: Vec<u8>) -> Self {
        let mut columns = key_values(key);
        columns.push(ColumnValue::Bytes(payload));
        Self::new(columns)
    }

    /// Returns true when the row carries no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the leading `arity` cells as strings, or `None` if any is missing
    /// or not a string cell.
    #[must_use]
    pub fn key_strings(&self, arity: usize) -> Option<Vec<String>> {
        self.columns
            .get(.. arity)?
            .iter()
            .map(|value| value.as_str().map(str::to_string))
            .collect()
    }

    /// Returns the payload cell positioned right after `arity` key cells.
    #[must_use]
    pub fn payload(&self, arity: usize) -> Option<&[u8]> {
        self.columns.get(arity).and_then(ColumnValue::as_bytes)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::ColumnKind;
    use super::ColumnValue;
    use super::Row;

    #[test]
    fn payload_sits_after_key_columns() {
        let key = vec!["2016".to_string(), "42".to_string(), "random".to_string()];
        let row = Row::from_key_and_payload(&key, b"{}".to_vec());
        assert_eq!(row.columns.len(), 4);
        assert_eq!(row.key_strings(3), Some(key));
        assert_eq!(row.payload(3), Some(&b"{}"[..]));
        assert_eq!(row.payload(2), None);
    }

    #[test]
    fn key_strings_rejects_bytes_cells() {
        let row = Row::new(vec![ColumnValue::Bytes(vec![1]), ColumnValue::Bytes(vec![2])]);
        assert_eq!(row.key_strings(1), None);
        assert_eq!(row.columns[0].kind(), ColumnKind::Bytes);
    }

    #[test]
    fn empty_row_has_no_payload() {
        let row = Row::default();
        assert!(row.is_empty());
        assert_eq!(row.payload(0), None);
        assert_eq!(row.key_strings(1), None);
    }
}
