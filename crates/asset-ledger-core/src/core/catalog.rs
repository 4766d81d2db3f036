// crates/asset-ledger-core/src/core/catalog.rs
// ============================================================================
// Module: Asset Ledger Schema Catalog
// Description: Immutable table name to key arity mapping.
// Purpose: Decide how many leading cells of a row are key components.
// Dependencies: crate::core::columns
// ============================================================================

//! ## Overview
//! The schema catalog is a plain value built once and handed to every
//! component that needs a table's key arity. Unknown tables report an arity of
//! zero, which callers treat as an invalid schema.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::columns::ColumnDefinition;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Primary asset table keyed by serial number.
pub const ASSET_TABLE: &str = "AssetTable";
/// Append-only asset history table keyed by era, serial number, and token.
pub const HISTORY_TABLE: &str = "ContractHistory";
/// Name prefix for positional key columns.
pub const KEY_COLUMN_PREFIX: &str = "keyName";
/// Name of the trailing payload column.
pub const PAYLOAD_COLUMN_NAME: &str = "Details";
/// Key arity of [`ASSET_TABLE`].
pub const ASSET_TABLE_KEY_ARITY: usize = 1;
/// Key arity of [`HISTORY_TABLE`].
pub const HISTORY_TABLE_KEY_ARITY: usize = 3;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static table catalog.
///
/// # Invariants
/// - Table order is preserved as supplied (resets follow this order).
/// - Entries are never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCatalog {
    /// Ordered `(table, key arity)` entries.
    tables: Vec<(String, usize)>,
}

impl SchemaCatalog {
    /// Builds a catalog from ordered `(table, key arity)` entries.
    ///
    /// Later duplicates of a table name are ignored.
    #[must_use]
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let mut tables: Vec<(String, usize)> = Vec::new();
        for (name, arity) in entries {
            let name = name.into();
            if tables.iter().all(|(existing, _)| *existing != name) {
                tables.push((name, arity));
            }
        }
        Self {
            tables,
        }
    }

    /// Returns the catalog of the asset ledger: asset table then history table.
    #[must_use]
    pub fn asset_ledger() -> Self {
        Self::new([(ASSET_TABLE, ASSET_TABLE_KEY_ARITY), (HISTORY_TABLE, HISTORY_TABLE_KEY_ARITY)])
    }

    /// Returns the key arity of `table`, or 0 when the table is unknown.
    #[must_use]
    pub fn key_arity(&self, table: &str) -> usize {
        self.tables.iter().find(|(name, _)| name == table).map_or(0, |(_, arity)| *arity)
    }

    /// Returns table names in catalog order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|(name, _)| name.as_str())
    }

    /// Builds the column layout for `table`: `arity` string key columns named
    /// positionally, then one bytes payload column.
    ///
    /// Returns `None` when the arity is below one.
    #[must_use]
    pub fn column_definitions(&self, table: &str) -> Option<Vec<ColumnDefinition>> {
        let arity = self.key_arity(table);
        if arity < 1 {
            return None;
        }
        let mut columns: Vec<ColumnDefinition> = (0 .. arity)
            .map(|index| ColumnDefinition::string_key(format!("{KEY_COLUMN_PREFIX}{index}")))
            .collect();
        columns.push(ColumnDefinition::bytes_payload(PAYLOAD_COLUMN_NAME));
        Some(columns)
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::asset_ledger()
    }
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

    use super::ASSET_TABLE;
    use super::HISTORY_TABLE;
    use super::SchemaCatalog;
    use crate::core::columns::ColumnKind;

    #[test]
    fn asset_ledger_arities() {
        let catalog = SchemaCatalog::asset_ledger();
        assert_eq!(catalog.key_arity(ASSET_TABLE), 1);
        assert_eq!(catalog.key_arity(HISTORY_TABLE), 3);
        assert_eq!(catalog.key_arity("Unknown"), 0);
        assert_eq!(catalog.table_names().collect::<Vec<_>>(), vec![ASSET_TABLE, HISTORY_TABLE]);
    }

    #[test]
    fn history_columns_layout() {
        let columns = SchemaCatalog::asset_ledger().column_definitions(HISTORY_TABLE).unwrap();
        let names: Vec<&str> = columns.iter().map(|column| column.name.as_str()).collect();
        assert_eq!(names, vec!["keyName0", "keyName1", "keyName2", "Details"]);
        assert!(columns[.. 3].iter().all(|column| column.key && column.kind == ColumnKind::String));
        assert!(!columns[3].key);
        assert_eq!(columns[3].kind, ColumnKind::Bytes);
    }

    #[test]
    fn zero_arity_has_no_layout() {
        let catalog = SchemaCatalog::new([("Empty", 0_usize), ("Empty", 2)]);
        assert_eq!(catalog.key_arity("Empty"), 0);
        assert!(catalog.column_definitions("Empty").is_none());
        assert!(catalog.column_definitions("Missing").is_none());
    }
}
