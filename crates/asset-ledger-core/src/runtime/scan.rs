// crates/asset-ledger-core/src/runtime/scan.rs
// ============================================================================
// Module: Asset Ledger Range Reads
// Description: Prefix scans drained into bounded, per-row decoded results.
// Purpose: Materialize engine row streams with per-row decode outcomes.
// Dependencies: serde, crate::{audit, core, interfaces, runtime::store}
// ============================================================================

//! ## Overview
//! A scan submits a key prefix to the engine, drains the resulting stream into
//! memory, and decodes each payload on its own. Rows keep the order the engine
//! delivers; no sort is applied. The drain stops at the store's row cap, and a
//! scan that had more rows available is marked truncated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::de::DeserializeOwned;

use crate::audit::AuditOutcome;
use crate::audit::LedgerAuditEvent;
use crate::core::EngineOperation;
use crate::core::LedgerError;
use crate::core::ValidationError;
use crate::core::codec::decode_record;
use crate::core::columns::key_values;
use crate::runtime::store::TableStore;
use crate::runtime::store::engine_error;

// ============================================================================
// SECTION: Types
// ============================================================================

/// One scanned row with its independent decode outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedRow<T> {
    /// Full key of the row.
    pub key: Vec<String>,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
    /// Decoded record, or a [`LedgerError::Decode`] naming this row.
    pub record: Result<T, LedgerError>,
}

/// Materialized scan output.
///
/// # Invariants
/// - `total_rows == rows.len()`.
/// - `truncated` is true only when the engine had more rows than the cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult<T> {
    /// Rows in engine delivery order.
    pub rows: Vec<ScannedRow<T>>,
    /// Number of rows returned.
    pub total_rows: usize,
    /// True when rows beyond the cap were left unread.
    pub truncated: bool,
}

impl<T> ScanResult<T> {
    /// Returns the number of rows whose payload failed to decode.
    #[must_use]
    pub fn decode_failures(&self) -> usize {
        self.rows.iter().filter(|row| row.record.is_err()).count()
    }

    /// Returns the successfully decoded records, in order.
    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.rows.iter().filter_map(|row| row.record.as_ref().ok())
    }
}

// ============================================================================
// SECTION: Scan
// ============================================================================

impl TableStore {
    /// Scans all rows whose leading key components equal `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] when the prefix is empty or longer
    /// than the key arity and [`LedgerError::Engine`] (a query failure) when the
    /// stream cannot be opened, yields an error, or yields a malformed row.
    /// Payload decode failures are attached to their rows instead, as
    /// [`LedgerError::Decode`] carrying the table and the row key.
    pub fn scan<T: DeserializeOwned>(
        &self,
        table: &str,
        prefix: &[String],
    ) -> Result<ScanResult<T>, LedgerError> {
        let result = self.scan_rows::<T>(table, prefix);
        match &result {
            Ok(scan) => {
                let mut event = LedgerAuditEvent::new("rows.scanned", AuditOutcome::Ok)
                    .table(table)
                    .key(prefix);
                event.row_count = Some(scan.total_rows);
                event.truncated = Some(scan.truncated);
                event.decode_failures = Some(scan.decode_failures());
                self.emit(&event);
            }
            Err(err) => self.emit_failure("rows.scanned", table, prefix, err),
        }
        result
    }

    /// Scan without audit.
    fn scan_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        prefix: &[String],
    ) -> Result<ScanResult<T>, LedgerError> {
        let arity = self.key_arity(table)?;
        if prefix.is_empty() || prefix.len() > arity {
            return Err(ValidationError::PrefixLength {
                table: table.to_string(),
                max: arity,
                actual: prefix.len(),
            }
            .into());
        }
        let stream = self
            .engine()
            .get_rows(table, &key_values(prefix))
            .map_err(|err| engine_error(table, EngineOperation::Scan, prefix, &err))?;

        let cap = self.max_rows_per_scan();
        let mut raw = Vec::new();
        let mut truncated = false;
        for item in stream {
            if raw.len() == cap {
                truncated = true;
                break;
            }
            let row = item.map_err(|err| engine_error(table, EngineOperation::Scan, prefix, &err))?;
            let (Some(key), Some(payload)) = (row.key_strings(arity), row.payload(arity)) else {
                return Err(LedgerError::Engine {
                    table: table.to_string(),
                    operation: EngineOperation::Scan,
                    key_hint: prefix.first().cloned(),
                    message: format!("streamed row does not match a {arity}-key layout"),
                });
            };
            raw.push((key, payload.to_vec()));
        }

        let rows: Vec<ScannedRow<T>> = raw
            .into_iter()
            .map(|(key, payload)| {
                let record = decode_record(&payload).map_err(|source| LedgerError::Decode {
                    table: table.to_string(),
                    key: key.clone(),
                    source,
                });
                ScannedRow {
                    key,
                    payload,
                    record,
                }
            })
            .collect();
        Ok(ScanResult {
            total_rows: rows.len(),
            rows,
            truncated,
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
