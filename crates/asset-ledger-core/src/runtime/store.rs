// crates/asset-ledger-core/src/runtime/store.rs
// ============================================================================
// Module: Asset Ledger Table Store
// Description: Insert-once write path and exact-key read path over an engine.
// Purpose: Map key tuples and payloads to engine rows with structured errors.
// Dependencies: crate::{audit, core, interfaces}
// ============================================================================

//! ## Overview
//! [`TableStore`] is the table layer: it consults the injected
//! [`SchemaCatalog`] before building any key tuple, turns engine answers into
//! [`LedgerError`] kinds, and records one audit event per operation. There is
//! no update-in-place anywhere in this layer; every mutation is a new row.
//!
//! Table lifecycle lives in `tables.rs` and prefix scans in `scan.rs`; both
//! extend [`TableStore`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::audit::AuditOutcome;
use crate::audit::LedgerAuditEvent;
use crate::audit::LedgerAuditSink;
use crate::audit::NoopAuditSink;
use crate::core::ColumnValue;
use crate::core::EngineOperation;
use crate::core::LedgerError;
use crate::core::Row;
use crate::core::SchemaCatalog;
use crate::core::ValidationError;
use crate::core::columns::key_values;
use crate::interfaces::EngineError;
use crate::interfaces::LedgerEngine;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default cap on rows materialized by one scan.
pub const DEFAULT_MAX_ROWS_PER_SCAN: usize = 10_000;

// ============================================================================
// SECTION: Table Store
// ============================================================================

/// Table layer bound to one engine and one catalog.
///
/// # Invariants
/// - Every key tuple is checked against the catalog arity before reaching the
///   engine.
/// - `max_rows_per_scan` is at least one.
#[derive(Clone)]
pub struct TableStore {
    /// Backing engine.
    engine: Arc<dyn LedgerEngine>,
    /// Injected table catalog.
    catalog: SchemaCatalog,
    /// Cap on rows returned by one scan.
    max_rows_per_scan: usize,
    /// Audit sink for operation events.
    audit: Arc<dyn LedgerAuditSink>,
}

impl TableStore {
    /// Creates a table store with the default scan cap and no audit output.
    #[must_use]
    pub fn new(engine: Arc<dyn LedgerEngine>, catalog: SchemaCatalog) -> Self {
        Self {
            engine,
            catalog,
            max_rows_per_scan: DEFAULT_MAX_ROWS_PER_SCAN,
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Sets the scan row cap; zero is raised to one.
    #[must_use]
    pub fn with_max_rows_per_scan(mut self, max_rows: usize) -> Self {
        self.max_rows_per_scan = max_rows.max(1);
        self
    }

    /// Sets the audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn LedgerAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the injected catalog.
    #[must_use]
    pub const fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    /// Returns the scan row cap.
    #[must_use]
    pub const fn max_rows_per_scan(&self) -> usize {
        self.max_rows_per_scan
    }

    /// Returns the backing engine.
    #[must_use]
    pub fn engine(&self) -> &dyn LedgerEngine {
        self.engine.as_ref()
    }

    /// Records an audit event.
    pub(crate) fn emit(&self, event: &LedgerAuditEvent) {
        self.audit.record(event);
    }

    /// Records the failure of an operation on `table`.
    pub(crate) fn emit_failure(
        &self,
        event: &'static str,
        table: &str,
        key: &[String],
        err: &LedgerError,
    ) {
        self.emit(
            &LedgerAuditEvent::new(event, failure_outcome(err))
                .table(table)
                .key(key)
                .error_kind(err.kind()),
        );
    }

    /// Returns the key arity of `table`, failing for unknown tables.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidSchema`] when the arity is below one.
    pub fn key_arity(&self, table: &str) -> Result<usize, LedgerError> {
        let arity = self.catalog.key_arity(table);
        if arity < 1 {
            return Err(LedgerError::InvalidSchema {
                table: table.to_string(),
            });
        }
        Ok(arity)
    }

    /// Checks that `key` carries exactly the table's key arity.
    fn full_key_arity(&self, table: &str, key: &[String]) -> Result<usize, LedgerError> {
        let arity = self.key_arity(table)?;
        if key.len() != arity {
            return Err(ValidationError::KeyArity {
                table: table.to_string(),
                expected: arity,
                actual: key.len(),
            }
            .into());
        }
        Ok(arity)
    }

    /// Inserts a new row built from `key` followed by `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateKey`] when the key exists (the stored row
    /// is left unchanged), [`LedgerError::Validation`] on arity mismatch, and
    /// [`LedgerError::Engine`] when the engine rejects the row.
    pub fn insert(&self, table: &str, key: &[String], payload: Vec<u8>) -> Result<(), LedgerError> {
        let result = self.insert_row(table, key, payload);
        match &result {
            Ok(()) => self.emit(
                &LedgerAuditEvent::new("row.inserted", AuditOutcome::Ok).table(table).key(key),
            ),
            Err(err) => self.emit_failure("row.inserted", table, key, err),
        }
        result
    }

    /// Insert without audit.
    fn insert_row(&self, table: &str, key: &[String], payload: Vec<u8>) -> Result<(), LedgerError> {
        self.full_key_arity(table, key)?;
        let row = Row::from_key_and_payload(key, payload);
        match self.engine.insert_row(table, row) {
            Ok(true) => Ok(()),
            Ok(false) => Err(LedgerError::DuplicateKey {
                table: table.to_string(),
                key: key.to_vec(),
            }),
            Err(err) => Err(engine_error(table, EngineOperation::Insert, key, &err)),
        }
    }

    /// Fetches the raw payload stored under a full key.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] when no row exists,
    /// [`LedgerError::Validation`] on arity mismatch, and
    /// [`LedgerError::Engine`] (a query failure) when the engine fails or the
    /// row has no payload cell.
    pub fn get(&self, table: &str, key: &[String]) -> Result<Vec<u8>, LedgerError> {
        let result = self.get_payload(table, key);
        match &result {
            Ok(_) => {
                let event = LedgerAuditEvent::new("row.read", AuditOutcome::Ok);
                self.emit(&event.table(table).key(key));
            }
            Err(err) => self.emit_failure("row.read", table, key, err),
        }
        result
    }

    /// Point read without audit.
    fn get_payload(&self, table: &str, key: &[String]) -> Result<Vec<u8>, LedgerError> {
        let arity = self.full_key_arity(table, key)?;
        let predicate: Vec<ColumnValue> = key_values(key);
        let row = self
            .engine
            .get_row(table, &predicate)
            .map_err(|err| engine_error(table, EngineOperation::Get, key, &err))?;
        if row.is_empty() {
            return Err(LedgerError::NotFound {
                table: table.to_string(),
                key: key.to_vec(),
            });
        }
        row.payload(arity).map(<[u8]>::to_vec).ok_or_else(|| LedgerError::Engine {
            table: table.to_string(),
            operation: EngineOperation::Get,
            key_hint: key.first().cloned(),
            message: format!("row has no bytes payload at column {arity}"),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Wraps an engine failure with table and first-key-component context.
pub(crate) fn engine_error(
    table: &str,
    operation: EngineOperation,
    key: &[String],
    err: &EngineError,
) -> LedgerError {
    LedgerError::Engine {
        table: table.to_string(),
        operation,
        key_hint: key.first().cloned(),
        message: err.to_string(),
    }
}

/// Classifies a failure for audit output.
pub(crate) const fn failure_outcome(err: &LedgerError) -> AuditOutcome {
    match err {
        LedgerError::Engine {
            ..
        }
        | LedgerError::Encode(_)
        | LedgerError::Decode {
            ..
        } => AuditOutcome::Error,
        _ => AuditOutcome::Rejected,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::expect_used,
        clippy::panic,
        clippy::unwrap_used,
        reason = "Test assertions use expect/unwrap for clarity."
    )]

    use std::sync::Arc;

    use super::TableStore;
    use crate::audit::AuditOutcome;
    use crate::audit::MemoryAuditSink;
    use crate::core::ASSET_TABLE;
    use crate::core::EngineOperation;
    use crate::core::LedgerError;
    use crate::core::SchemaCatalog;
    use crate::core::ValidationError;
    use crate::runtime::memory::InMemoryLedgerEngine;

    fn key(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    fn store() -> TableStore {
        let store = TableStore::new(
            Arc::new(InMemoryLedgerEngine::new()),
            SchemaCatalog::asset_ledger(),
        );
        store.reset_catalog().unwrap();
        store
    }

    #[test]
    fn insert_then_get_returns_raw_payload() {
        let store = store();
        store.insert(ASSET_TABLE, &key(&["1"]), b"payload".to_vec()).unwrap();
        assert_eq!(store.get(ASSET_TABLE, &key(&["1"])).unwrap(), b"payload".to_vec());
    }

    #[test]
    fn get_absent_key_is_not_found() {
        let err = store().get(ASSET_TABLE, &key(&["404"])).unwrap_err();
        assert_eq!(
            err,
            LedgerError::NotFound {
                table: ASSET_TABLE.to_string(),
                key: key(&["404"]),
            }
        );
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn key_arity_is_checked_before_engine() {
        let store = store();
        let err = store.insert(ASSET_TABLE, &key(&["1", "2"]), Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Validation(ValidationError::KeyArity {
                expected: 1,
                actual: 2,
                ..
            })
        ));
        let err = store.get(ASSET_TABLE, &[]).unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn unknown_table_is_invalid_schema() {
        let err = store().insert("Nope", &key(&["1"]), Vec::new()).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidSchema {
                table: "Nope".to_string(),
            }
        );
    }

    #[test]
    fn missing_engine_table_surfaces_engine_error_with_key_hint() {
        let store = TableStore::new(
            Arc::new(InMemoryLedgerEngine::new()),
            SchemaCatalog::asset_ledger(),
        );
        let err = store.insert(ASSET_TABLE, &key(&["7"]), Vec::new()).unwrap_err();
        match err {
            LedgerError::Engine {
                table,
                operation,
                key_hint,
                ..
            } => {
                assert_eq!(table, ASSET_TABLE);
                assert_eq!(operation, EngineOperation::Insert);
                assert_eq!(key_hint.as_deref(), Some("7"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let err = store.get(ASSET_TABLE, &key(&["7"])).unwrap_err();
        assert_eq!(err.kind(), "query");
    }

    #[test]
    fn duplicate_insert_is_audited_as_rejected() {
        let audit = Arc::new(MemoryAuditSink::default());
        let store = store().with_audit(audit.clone());
        store.insert(ASSET_TABLE, &key(&["1"]), b"a".to_vec()).unwrap();
        store.insert(ASSET_TABLE, &key(&["1"]), b"b".to_vec()).unwrap_err();
        let events = audit.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].outcome, AuditOutcome::Ok);
        assert_eq!(events[1].outcome, AuditOutcome::Rejected);
        assert_eq!(events[1].error_kind, Some("duplicate_key"));
    }
}
