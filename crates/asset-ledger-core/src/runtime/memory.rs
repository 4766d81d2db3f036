// crates/asset-ledger-core/src/runtime/memory.rs
// ============================================================================
// Module: Asset Ledger In-Memory Engine
// Description: Simple in-memory ledger engine for tests and local runs.
// Purpose: Provide a deterministic engine implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides an in-memory implementation of [`LedgerEngine`] for
//! tests and local demos. Rows are kept per table in key order, so prefix
//! streams deliver rows sorted by key. It is not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::ColumnDefinition;
use crate::core::ColumnValue;
use crate::core::Row;
use crate::interfaces::CreateOutcome;
use crate::interfaces::DropOutcome;
use crate::interfaces::EngineError;
use crate::interfaces::LedgerEngine;
use crate::interfaces::RowStream;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Stored table: its column layout and rows keyed by key tuple.
#[derive(Debug, Clone)]
struct MemoryTable {
    /// Column layout fixed at creation.
    columns: Vec<ColumnDefinition>,
    /// Rows keyed by their string key cells.
    rows: BTreeMap<Vec<String>, Row>,
}

impl MemoryTable {
    /// Returns the number of leading key columns.
    fn key_count(&self) -> usize {
        self.columns.iter().take_while(|column| column.key).count()
    }
}

/// Engine state guarded by one mutex.
#[derive(Debug, Default)]
struct MemoryState {
    /// Tables by name.
    tables: BTreeMap<String, MemoryTable>,
    /// Flat key/value entries.
    state: BTreeMap<String, Vec<u8>>,
}

/// In-memory ledger engine for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLedgerEngine {
    /// Engine state protected by a mutex.
    inner: Arc<Mutex<MemoryState>>,
}

impl InMemoryLedgerEngine {
    /// Creates an empty in-memory engine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryState::default())),
        }
    }

    /// Locks the engine state.
    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, EngineError> {
        self.inner.lock().map_err(|_| EngineError::Db("ledger engine mutex poisoned".to_string()))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Extracts string key cells, rejecting non-string cells.
fn string_cells(table: &str, cells: &[ColumnValue]) -> Result<Vec<String>, EngineError> {
    cells
        .iter()
        .map(|cell| {
            cell.as_str().map(str::to_string).ok_or_else(|| {
                EngineError::Schema(format!("key cells for table {table} must be strings"))
            })
        })
        .collect()
}

/// Checks that a row matches the table layout cell by cell.
fn check_row_layout(table: &str, layout: &MemoryTable, row: &Row) -> Result<(), EngineError> {
    if row.columns.len() != layout.columns.len() {
        return Err(EngineError::Schema(format!(
            "table {table} expects {} columns, got {}",
            layout.columns.len(),
            row.columns.len()
        )));
    }
    for (definition, cell) in layout.columns.iter().zip(&row.columns) {
        if definition.kind != cell.kind() {
            return Err(EngineError::Schema(format!(
                "column {} of table {table} has the wrong kind",
                definition.name
            )));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Engine Implementation
// ============================================================================

impl LedgerEngine for InMemoryLedgerEngine {
    fn create_table(
        &self,
        name: &str,
        columns: &[ColumnDefinition],
    ) -> Result<CreateOutcome, EngineError> {
        if columns.is_empty() {
            return Err(EngineError::Schema(format!("table {name} declares no columns")));
        }
        let mut guard = self.lock()?;
        if guard.tables.contains_key(name) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        guard.tables.insert(
            name.to_string(),
            MemoryTable {
                columns: columns.to_vec(),
                rows: BTreeMap::new(),
            },
        );
        drop(guard);
        Ok(CreateOutcome::Created)
    }

    fn drop_table(&self, name: &str) -> Result<DropOutcome, EngineError> {
        let removed = self.lock()?.tables.remove(name);
        Ok(if removed.is_some() { DropOutcome::Dropped } else { DropOutcome::NotFound })
    }

    fn insert_row(&self, table: &str, row: Row) -> Result<bool, EngineError> {
        let mut guard = self.lock()?;
        let layout = guard
            .tables
            .get_mut(table)
            .ok_or_else(|| EngineError::TableNotFound(table.to_string()))?;
        let key_count = layout.key_count();
        if key_count == 0 {
            return Err(EngineError::NoKeyColumns(table.to_string()));
        }
        check_row_layout(table, layout, &row)?;
        let key = string_cells(table, &row.columns[.. key_count])?;
        if layout.rows.contains_key(&key) {
            return Ok(false);
        }
        layout.rows.insert(key, row);
        drop(guard);
        Ok(true)
    }

    fn get_row(&self, table: &str, key: &[ColumnValue]) -> Result<Row, EngineError> {
        let guard = self.lock()?;
        let layout =
            guard.tables.get(table).ok_or_else(|| EngineError::TableNotFound(table.to_string()))?;
        let key = string_cells(table, key)?;
        Ok(layout.rows.get(&key).cloned().unwrap_or_default())
    }

    fn get_rows(&self, table: &str, partial_key: &[ColumnValue]) -> Result<RowStream, EngineError> {
        let guard = self.lock()?;
        let layout =
            guard.tables.get(table).ok_or_else(|| EngineError::TableNotFound(table.to_string()))?;
        if partial_key.len() > layout.key_count() {
            return Err(EngineError::Schema(format!(
                "partial key for table {table} has {} cells but the table has {} key columns",
                partial_key.len(),
                layout.key_count()
            )));
        }
        let prefix = string_cells(table, partial_key)?;
        let rows: Vec<Row> = layout
            .rows
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, row)| row.clone())
            .collect();
        drop(guard);
        Ok(RowStream::from_rows(rows))
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), EngineError> {
        self.lock()?.state.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, EngineError> {
        Ok(self.lock()?.state.get(key).cloned())
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

    use super::InMemoryLedgerEngine;
    use crate::core::ColumnDefinition;
    use crate::core::ColumnValue;
    use crate::core::Row;
    use crate::core::columns::key_values;
    use crate::interfaces::CreateOutcome;
    use crate::interfaces::DropOutcome;
    use crate::interfaces::EngineError;
    use crate::interfaces::LedgerEngine;

    fn keys(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    fn two_key_layout() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::string_key("keyName0"),
            ColumnDefinition::string_key("keyName1"),
            ColumnDefinition::bytes_payload("Details"),
        ]
    }

    #[test]
    fn create_is_idempotent_and_drop_reports_missing() {
        let engine = InMemoryLedgerEngine::new();
        assert_eq!(engine.create_table("T", &two_key_layout()).unwrap(), CreateOutcome::Created);
        assert_eq!(
            engine.create_table("T", &two_key_layout()).unwrap(),
            CreateOutcome::AlreadyExists
        );
        assert_eq!(engine.drop_table("T").unwrap(), DropOutcome::Dropped);
        assert_eq!(engine.drop_table("T").unwrap(), DropOutcome::NotFound);
    }

    #[test]
    fn insert_never_overwrites() {
        let engine = InMemoryLedgerEngine::new();
        engine.create_table("T", &two_key_layout()).unwrap();
        let key = keys(&["a", "b"]);
        assert!(engine.insert_row("T", Row::from_key_and_payload(&key, b"first".to_vec())).unwrap());
        assert!(
            !engine.insert_row("T", Row::from_key_and_payload(&key, b"second".to_vec())).unwrap()
        );
        let row = engine.get_row("T", &key_values(&key)).unwrap();
        assert_eq!(row.payload(2), Some(&b"first"[..]));
    }

    #[test]
    fn insert_rejects_tables_without_key_columns() {
        let engine = InMemoryLedgerEngine::new();
        engine.create_table("Flat", &[ColumnDefinition::bytes_payload("Details")]).unwrap();
        let err = engine
            .insert_row("Flat", Row::new(vec![ColumnValue::Bytes(b"x".to_vec())]))
            .unwrap_err();
        assert_eq!(err, EngineError::NoKeyColumns("Flat".to_string()));
    }

    #[test]
    fn insert_rejects_mismatched_layout() {
        let engine = InMemoryLedgerEngine::new();
        engine.create_table("T", &two_key_layout()).unwrap();
        let err = engine
            .insert_row("T", Row::from_key_and_payload(&keys(&["a"]), b"x".to_vec()))
            .unwrap_err();
        assert!(matches!(err, EngineError::Schema(_)));
    }

    #[test]
    fn get_row_on_absent_key_is_empty() {
        let engine = InMemoryLedgerEngine::new();
        engine.create_table("T", &two_key_layout()).unwrap();
        assert!(engine.get_row("T", &key_values(&keys(&["x", "y"]))).unwrap().is_empty());
        assert!(matches!(
            engine.get_row("Missing", &key_values(&keys(&["x"]))),
            Err(EngineError::TableNotFound(_))
        ));
    }

    #[test]
    fn prefix_stream_matches_leading_cells_only() {
        let engine = InMemoryLedgerEngine::new();
        engine.create_table("T", &two_key_layout()).unwrap();
        for key in [["a", "2"], ["a", "1"], ["ab", "1"], ["b", "1"]] {
            let key = keys(&key);
            engine.insert_row("T", Row::from_key_and_payload(&key, Vec::new())).unwrap();
        }
        let rows: Vec<Row> = engine
            .get_rows("T", &key_values(&keys(&["a"])))
            .unwrap()
            .map(Result::unwrap)
            .collect();
        let found: Vec<Vec<String>> = rows.iter().map(|row| row.key_strings(2).unwrap()).collect();
        assert_eq!(found, vec![keys(&["a", "1"]), keys(&["a", "2"])]);
    }

    #[test]
    fn flat_state_replaces_previous_value() {
        let engine = InMemoryLedgerEngine::new();
        assert_eq!(engine.get_state("version").unwrap(), None);
        engine.put_state("version", b"1").unwrap();
        engine.put_state("version", b"23").unwrap();
        assert_eq!(engine.get_state("version").unwrap(), Some(b"23".to_vec()));
    }
}
