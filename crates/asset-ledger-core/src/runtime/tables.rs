// crates/asset-ledger-core/src/runtime/tables.rs
// ============================================================================
// Module: Asset Ledger Table Lifecycle
// Description: Catalog-driven table creation and reset.
// Purpose: Build column layouts from key arity and apply them to the engine.
// Dependencies: crate::{audit, core, interfaces, runtime::store}
// ============================================================================

//! ## Overview
//! Creation is idempotent: an existing table counts as success. Reset drops
//! then recreates each table and stops at the first creation failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::audit::AuditOutcome;
use crate::audit::LedgerAuditEvent;
use crate::core::EngineOperation;
use crate::core::LedgerError;
use crate::interfaces::CreateOutcome;
use crate::interfaces::DropOutcome;
use crate::runtime::store::TableStore;
use crate::runtime::store::engine_error;

// ============================================================================
// SECTION: Lifecycle
// ============================================================================

impl TableStore {
    /// Creates `table` with `arity` string key columns and one bytes payload
    /// column.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidSchema`] when the catalog arity is below
    /// one and [`LedgerError::Engine`] with the table name for any engine
    /// failure other than "already exists".
    pub fn create_table(&self, table: &str) -> Result<CreateOutcome, LedgerError> {
        let result = self.create_table_quiet(table);
        match &result {
            Ok(outcome) => self.emit(
                &LedgerAuditEvent::new(
                    match outcome {
                        CreateOutcome::Created => "table.created",
                        CreateOutcome::AlreadyExists => "table.exists",
                    },
                    AuditOutcome::Ok,
                )
                .table(table),
            ),
            Err(err) => self.emit_failure("table.created", table, &[], err),
        }
        result
    }

    /// Table creation without audit.
    fn create_table_quiet(&self, table: &str) -> Result<CreateOutcome, LedgerError> {
        let columns =
            self.catalog().column_definitions(table).ok_or_else(|| LedgerError::InvalidSchema {
                table: table.to_string(),
            })?;
        self.engine()
            .create_table(table, &columns)
            .map_err(|err| engine_error(table, EngineOperation::Create, &[], &err))
    }

    /// Drops then recreates each named table, in order.
    ///
    /// A missing table is not an error. Remaining tables are skipped after the
    /// first failure.
    ///
    /// # Errors
    ///
    /// Returns the first failure, carrying the failing table's name.
    pub fn reset_all<S: AsRef<str>>(&self, tables: &[S]) -> Result<(), LedgerError> {
        for table in tables {
            let table = table.as_ref();
            match self.engine().drop_table(table) {
                Ok(DropOutcome::Dropped | DropOutcome::NotFound) => {}
                Err(err) => {
                    let err = engine_error(table, EngineOperation::Drop, &[], &err);
                    self.emit_failure("table.reset", table, &[], &err);
                    return Err(err);
                }
            }
            self.create_table(table)?;
        }
        Ok(())
    }

    /// Resets every table in the catalog, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns the first failure, carrying the failing table's name.
    pub fn reset_catalog(&self) -> Result<(), LedgerError> {
        let tables: Vec<String> = self.catalog().table_names().map(str::to_string).collect();
        self.reset_all(&tables)
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

    use std::sync::Arc;

    use crate::core::ASSET_TABLE;
    use crate::core::HISTORY_TABLE;
    use crate::core::LedgerError;
    use crate::core::SchemaCatalog;
    use crate::interfaces::CreateOutcome;
    use crate::runtime::memory::InMemoryLedgerEngine;
    use crate::runtime::store::TableStore;

    fn store_with(catalog: SchemaCatalog) -> TableStore {
        TableStore::new(Arc::new(InMemoryLedgerEngine::new()), catalog)
    }

    #[test]
    fn create_is_idempotent() {
        let store = store_with(SchemaCatalog::asset_ledger());
        assert_eq!(store.create_table(HISTORY_TABLE).unwrap(), CreateOutcome::Created);
        assert_eq!(store.create_table(HISTORY_TABLE).unwrap(), CreateOutcome::AlreadyExists);
    }

    #[test]
    fn zero_arity_table_is_invalid_schema() {
        let store = store_with(SchemaCatalog::new([("Empty", 0_usize)]));
        assert_eq!(
            store.create_table("Empty").unwrap_err(),
            LedgerError::InvalidSchema {
                table: "Empty".to_string(),
            }
        );
        assert!(store.create_table("Unknown").is_err());
    }

    #[test]
    fn reset_clears_rows() {
        let store = store_with(SchemaCatalog::asset_ledger());
        store.reset_catalog().unwrap();
        store.insert(ASSET_TABLE, &["1".to_string()], b"x".to_vec()).unwrap();
        store.reset_catalog().unwrap();
        assert_eq!(store.get(ASSET_TABLE, &["1".to_string()]).unwrap_err().kind(), "not_found");
    }

    #[test]
    fn reset_stops_at_first_failing_table() {
        let store = store_with(SchemaCatalog::new([("Good", 1_usize), ("Bad", 0), ("Later", 2)]));
        let err = store.reset_catalog().unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidSchema {
                table: "Bad".to_string(),
            }
        );
        assert_eq!(store.create_table("Good").unwrap(), CreateOutcome::AlreadyExists);
        assert_eq!(store.create_table("Later").unwrap(), CreateOutcome::Created);
    }

    #[test]
    fn reset_subset_leaves_other_tables_intact() {
        let store = store_with(SchemaCatalog::asset_ledger());
        store.reset_catalog().unwrap();
        let history_key = vec!["2016".to_string(), "1".to_string(), "random".to_string()];
        store.insert(ASSET_TABLE, &["1".to_string()], b"a".to_vec()).unwrap();
        store.insert(HISTORY_TABLE, &history_key, b"h".to_vec()).unwrap();
        store.reset_all(&[ASSET_TABLE]).unwrap();
        assert!(matches!(
            store.get(ASSET_TABLE, &["1".to_string()]).unwrap_err(),
            LedgerError::NotFound { .. }
        ));
        assert_eq!(store.get(HISTORY_TABLE, &history_key).unwrap(), b"h".to_vec());
    }
}
