// crates/asset-ledger-core/src/interfaces/mod.rs
// ============================================================================
// Module: Asset Ledger Interfaces
// Description: Backend-agnostic ledger engine contract and row streams.
// Purpose: Define the primitives the table layer consumes from a storage engine.
// Dependencies: thiserror, crate::core
// ============================================================================

//! ## Overview
//! A [`LedgerEngine`] physically stores rows and provides durability and
//! isolation per call. The table layer never talks to storage any other way.
//! Prefix reads hand back a [`RowStream`]: a one-shot, non-restartable
//! sequence fed by a producer through a bounded channel. Dropping the stream
//! early tells the producer to stop.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::mpsc;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::SyncSender;

use thiserror::Error;

use crate::core::ColumnDefinition;
use crate::core::ColumnValue;
use crate::core::Row;

// ============================================================================
// SECTION: Engine Errors
// ============================================================================

/// Engine primitive failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Referenced table does not exist.
    #[error("table not found: {0}")]
    TableNotFound(String),
    /// Row or table declares no key columns.
    #[error("no key columns supplied for table {0}")]
    NoKeyColumns(String),
    /// Row or column layout does not match the table schema.
    #[error("schema mismatch: {0}")]
    Schema(String),
    /// Engine I/O failure.
    #[error("engine io error: {0}")]
    Io(String),
    /// Backing database failure.
    #[error("engine db error: {0}")]
    Db(String),
}

/// Result of a table creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Table was created.
    Created,
    /// Table already existed; nothing changed.
    AlreadyExists,
}

/// Result of a table drop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Table and its rows were removed.
    Dropped,
    /// Table did not exist.
    NotFound,
}

// ============================================================================
// SECTION: Row Streams
// ============================================================================

/// Stream item: a row or a producer failure.
pub type RowItem = Result<Row, EngineError>;

/// Producer half of a [`RowStream`].
#[derive(Debug)]
pub struct RowSender {
    /// Bounded channel into the consumer.
    sender: SyncSender<RowItem>,
}

impl RowSender {
    /// Sends one item, blocking while the buffer is full.
    ///
    /// Returns `false` once the consumer has dropped the stream.
    #[must_use]
    pub fn send(&self, item: RowItem) -> bool {
        self.sender.send(item).is_ok()
    }
}

/// One-shot sequence of rows returned by a prefix read.
///
/// # Invariants
/// - Ends when the producer finishes; cannot be restarted.
#[derive(Debug)]
pub struct RowStream {
    /// Consumer half of the channel.
    receiver: Receiver<RowItem>,
}

impl RowStream {
    /// Creates a producer/consumer pair with `buffer` rows of backpressure.
    #[must_use]
    pub fn channel(buffer: usize) -> (RowSender, Self) {
        let (sender, receiver) = mpsc::sync_channel(buffer.max(1));
        (
            RowSender {
                sender,
            },
            Self {
                receiver,
            },
        )
    }

    /// Creates a stream over already materialized rows.
    #[must_use]
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let (sender, stream) = Self::channel(rows.len());
        for row in rows {
            if !sender.send(Ok(row)) {
                break;
            }
        }
        stream
    }
}

impl Iterator for RowStream {
    type Item = RowItem;

    fn next(&mut self) -> Option<Self::Item> {
        self.receiver.recv().ok()
    }
}

// ============================================================================
// SECTION: Ledger Engine
// ============================================================================

/// Storage engine consumed by the table layer.
///
/// Implementations must treat each call as atomic and must never overwrite an
/// existing row on insert.
pub trait LedgerEngine: Send + Sync {
    /// Creates a table with the given columns.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the layout is rejected or storage fails.
    fn create_table(
        &self,
        name: &str,
        columns: &[ColumnDefinition],
    ) -> Result<CreateOutcome, EngineError>;

    /// Drops a table and all of its rows.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when storage fails.
    fn drop_table(&self, name: &str) -> Result<DropOutcome, EngineError>;

    /// Inserts a row; returns `false` when a row with the same key exists.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoKeyColumns`] when no key cells are supplied and
    /// other variants when the row does not fit the table or storage fails.
    fn insert_row(&self, table: &str, row: Row) -> Result<bool, EngineError>;

    /// Fetches the row matching a full key; an empty row means absent.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the table is missing or storage fails.
    fn get_row(&self, table: &str, key: &[ColumnValue]) -> Result<Row, EngineError>;

    /// Streams every row whose leading key cells equal `partial_key`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the stream cannot be opened.
    fn get_rows(&self, table: &str, partial_key: &[ColumnValue]) -> Result<RowStream, EngineError>;

    /// Writes a flat key/value entry, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when storage fails.
    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), EngineError>;

    /// Reads a flat key/value entry.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when storage fails.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, EngineError>;
}

// ============================================================================
// SECTION: Tests
// ============================================================================
