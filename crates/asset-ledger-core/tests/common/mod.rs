// crates/asset-ledger-core/tests/common/mod.rs
// ============================================================================
// Module: Asset Ledger Test Helpers
// Description: Shared fixtures and a fault-injecting engine wrapper.
// Purpose: Reduce duplication across ledger integration tests.
// Dependencies: asset-ledger-core
// ============================================================================

#![allow(dead_code, reason = "Not every test binary uses every helper.")]

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;

use asset_ledger_core::AssetLedger;
use asset_ledger_core::ColumnDefinition;
use asset_ledger_core::ColumnValue;
use asset_ledger_core::CreateOutcome;
use asset_ledger_core::DropOutcome;
use asset_ledger_core::EngineError;
use asset_ledger_core::InMemoryLedgerEngine;
use asset_ledger_core::LedgerAuditSink;
use asset_ledger_core::LedgerEngine;
use asset_ledger_core::Row;
use asset_ledger_core::RowStream;
use asset_ledger_core::SchemaCatalog;
use asset_ledger_core::TableStore;

/// Converts string literals into owned arguments.
pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

/// Builds an initialized ledger over an in-memory engine.
pub fn memory_ledger() -> AssetLedger {
    let ledger = AssetLedger::new(TableStore::new(
        Arc::new(InMemoryLedgerEngine::new()),
        SchemaCatalog::asset_ledger(),
    ));
    ledger.initialize().expect("initialize");
    ledger
}

/// Builds an initialized ledger over `engine` with `audit`.
pub fn ledger_over(engine: Arc<dyn LedgerEngine>, audit: Arc<dyn LedgerAuditSink>) -> AssetLedger {
    let ledger =
        AssetLedger::new(TableStore::new(engine, SchemaCatalog::asset_ledger()).with_audit(audit));
    ledger.initialize().expect("initialize");
    ledger
}

/// Engine wrapper that records table layouts and fails chosen primitives.
#[derive(Default)]
pub struct FaultyEngine {
    /// Engine doing the real work.
    pub inner: InMemoryLedgerEngine,
    /// Tables whose inserts fail with a database error.
    pub failing_inserts: Mutex<BTreeSet<String>>,
    /// Tables whose drops fail with a database error.
    pub failing_drops: Mutex<BTreeSet<String>>,
    /// Tables whose creates fail with a database error.
    pub failing_creates: Mutex<BTreeSet<String>>,
    /// Every create request in order.
    pub creates: Mutex<Vec<(String, Vec<ColumnDefinition>)>>,
}

impl FaultyEngine {
    /// Makes inserts into `table` fail.
    pub fn fail_inserts(&self, table: &str) {
        self.failing_inserts.lock().expect("lock").insert(table.to_string());
    }

    /// Makes drops of `table` fail.
    pub fn fail_drops(&self, table: &str) {
        self.failing_drops.lock().expect("lock").insert(table.to_string());
    }

    /// Makes creates of `table` fail.
    pub fn fail_creates(&self, table: &str) {
        self.failing_creates.lock().expect("lock").insert(table.to_string());
    }

    /// Returns the recorded create requests.
    pub fn recorded_creates(&self) -> Vec<(String, Vec<ColumnDefinition>)> {
        self.creates.lock().expect("lock").clone()
    }

    fn fails(set: &Mutex<BTreeSet<String>>, table: &str) -> bool {
        set.lock().expect("lock").contains(table)
    }
}

impl LedgerEngine for FaultyEngine {
    fn create_table(
        &self,
        name: &str,
        columns: &[ColumnDefinition],
    ) -> Result<CreateOutcome, EngineError> {
        self.creates.lock().expect("lock").push((name.to_string(), columns.to_vec()));
        if Self::fails(&self.failing_creates, name) {
            return Err(EngineError::Db("injected create failure".to_string()));
        }
        self.inner.create_table(name, columns)
    }

    fn drop_table(&self, name: &str) -> Result<DropOutcome, EngineError> {
        if Self::fails(&self.failing_drops, name) {
            return Err(EngineError::Db("injected drop failure".to_string()));
        }
        self.inner.drop_table(name)
    }

    fn insert_row(&self, table: &str, row: Row) -> Result<bool, EngineError> {
        if Self::fails(&self.failing_inserts, table) {
            return Err(EngineError::Db("injected insert failure".to_string()));
        }
        self.inner.insert_row(table, row)
    }

    fn get_row(&self, table: &str, key: &[ColumnValue]) -> Result<Row, EngineError> {
        self.inner.get_row(table, key)
    }

    fn get_rows(&self, table: &str, partial_key: &[ColumnValue]) -> Result<RowStream, EngineError> {
        self.inner.get_rows(table, partial_key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), EngineError> {
        self.inner.put_state(key, value)
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, EngineError> {
        self.inner.get_state(key)
    }
}
