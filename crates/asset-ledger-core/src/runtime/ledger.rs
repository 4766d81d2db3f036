// crates/asset-ledger-core/src/runtime/ledger.rs
// ============================================================================
// Module: Asset Ledger Coordinator
// Description: Domain operations over the asset and history tables.
// Purpose: Post assets into both tables and serve point and history reads.
// Dependencies: serde, crate::{audit, core, runtime::{scan, store}}
// ============================================================================

//! ## Overview
//! [`AssetLedger`] turns raw string arguments into table operations. Posting
//! an asset writes the primary row first and the history row second with the
//! same payload bytes. The two writes are not compensated: when the history
//! write fails, the primary row stays committed, the failure is returned
//! unchanged, and an `asset.history_orphaned` audit event names the asset key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::audit::AuditOutcome;
use crate::audit::LedgerAuditEvent;
use crate::core::ASSET_TABLE;
use crate::core::AssetRecord;
use crate::core::EngineOperation;
use crate::core::HISTORY_TABLE;
use crate::core::LedgerError;
use crate::core::codec::encode_record;
use crate::runtime::scan::ScanResult;
use crate::runtime::store::TableStore;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Flat state key holding the application version marker.
pub const VERSION_STATE_KEY: &str = "version";
/// Default time bucket leading every history key.
pub const DEFAULT_HISTORY_ERA: &str = "2016";
/// Default token trailing every history key.
pub const DEFAULT_HISTORY_DISAMBIGUATOR: &str = "random";
/// Default application version written at initialization.
pub const DEFAULT_APP_VERSION: u32 = 23;

// ============================================================================
// SECTION: History Keys
// ============================================================================

/// Key derivation for history rows: `[era, serial_number, disambiguator]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryKeyPolicy {
    /// Leading time bucket.
    pub era: String,
    /// Trailing disambiguating token.
    pub disambiguator: String,
}

impl HistoryKeyPolicy {
    /// Builds the history key for an asset serial number.
    #[must_use]
    pub fn key_for(&self, serial_number: &str) -> Vec<String> {
        vec![self.era.clone(), serial_number.to_string(), self.disambiguator.clone()]
    }
}

impl Default for HistoryKeyPolicy {
    fn default() -> Self {
        Self {
            era: DEFAULT_HISTORY_ERA.to_string(),
            disambiguator: DEFAULT_HISTORY_DISAMBIGUATOR.to_string(),
        }
    }
}

/// One entry of a history listing.
///
/// Exactly one of `record` and `error` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    /// History key of the row.
    pub key: Vec<String>,
    /// Decoded asset, when the payload decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<AssetRecord>,
    /// Rendered [`LedgerError::Decode`], when it did not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// SECTION: Asset Ledger
// ============================================================================

/// Domain coordinator over the asset and history tables.
#[derive(Clone)]
pub struct AssetLedger {
    /// Table layer.
    store: TableStore,
    /// History key derivation.
    history: HistoryKeyPolicy,
    /// Version marker written at initialization.
    app_version: u32,
}

impl AssetLedger {
    /// Creates a ledger with default history keys and version marker.
    #[must_use]
    pub fn new(store: TableStore) -> Self {
        Self {
            store,
            history: HistoryKeyPolicy::default(),
            app_version: DEFAULT_APP_VERSION,
        }
    }

    /// Sets the history key derivation.
    #[must_use]
    pub fn with_history_policy(mut self, history: HistoryKeyPolicy) -> Self {
        self.history = history;
        self
    }

    /// Sets the version marker written at initialization.
    #[must_use]
    pub const fn with_app_version(mut self, app_version: u32) -> Self {
        self.app_version = app_version;
        self
    }

    /// Returns the table layer.
    #[must_use]
    pub const fn store(&self) -> &TableStore {
        &self.store
    }

    /// Returns the history key derivation.
    #[must_use]
    pub const fn history_policy(&self) -> &HistoryKeyPolicy {
        &self.history
    }

    /// Resets every catalog table and writes the version marker.
    ///
    /// # Errors
    ///
    /// Returns the first table reset failure, or [`LedgerError::Engine`] when
    /// the marker cannot be written.
    pub fn initialize(&self) -> Result<(), LedgerError> {
        self.store.reset_catalog()?;
        let marker = self.app_version.to_string();
        if let Err(err) = self.store.engine().put_state(VERSION_STATE_KEY, marker.as_bytes()) {
            let err = LedgerError::Engine {
                table: VERSION_STATE_KEY.to_string(),
                operation: EngineOperation::PutState,
                key_hint: None,
                message: err.to_string(),
            };
            self.store.emit_failure("ledger.initialized", VERSION_STATE_KEY, &[], &err);
            return Err(err);
        }
        self.store.emit(&LedgerAuditEvent::new("ledger.initialized", AuditOutcome::Ok));
        Ok(())
    }

    /// Reads back the version marker, if one was written.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Engine`] when the read fails or the marker is not
    /// UTF-8.
    pub fn version(&self) -> Result<Option<String>, LedgerError> {
        let to_error = |message: String| LedgerError::Engine {
            table: VERSION_STATE_KEY.to_string(),
            operation: EngineOperation::GetState,
            key_hint: None,
            message,
        };
        let state = self.store.engine().get_state(VERSION_STATE_KEY);
        let Some(bytes) = state.map_err(|err| to_error(err.to_string()))? else {
            return Ok(None);
        };
        String::from_utf8(bytes).map(Some).map_err(|err| to_error(err.to_string()))
    }

    /// Posts an asset from `[serial_number, part_number, owner]` into the asset
    /// table and then the history table, returning the stored payload.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] before any write on bad arguments,
    /// the asset table failure without touching history, or the history table
    /// failure with the asset row left in place.
    pub fn post_asset(&self, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        let record = match AssetRecord::from_args(args) {
            Ok(record) => record,
            Err(err) => {
                let err = LedgerError::from(err);
                self.store.emit_failure("asset.posted", ASSET_TABLE, &[], &err);
                return Err(err);
            }
        };
        let payload = record.encode()?;
        let asset_key = vec![record.serial_number.clone()];
        self.store.insert(ASSET_TABLE, &asset_key, payload.clone())?;

        let history_key = self.history.key_for(&record.serial_number);
        if let Err(err) = self.store.insert(HISTORY_TABLE, &history_key, payload.clone()) {
            self.store.emit(
                &LedgerAuditEvent::new("asset.history_orphaned", AuditOutcome::Error)
                    .table(ASSET_TABLE)
                    .key(&asset_key)
                    .error_kind(err.kind()),
            );
            return Err(err);
        }
        self.store.emit(
            &LedgerAuditEvent::new("asset.posted", AuditOutcome::Ok)
                .table(ASSET_TABLE)
                .key(&asset_key),
        );
        Ok(payload)
    }

    /// Returns the raw payload stored for `[serial_number]`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] when no asset row exists and the point
    /// read failures of [`TableStore::get`].
    pub fn get_asset(&self, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        self.store.get(ASSET_TABLE, args)
    }

    /// Returns the raw payload stored for `[era, serial_number, disambiguator]`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] when no history row exists and the
    /// point read failures of [`TableStore::get`].
    pub fn get_history(&self, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        self.store.get(HISTORY_TABLE, args)
    }

    /// Scans history rows under a key prefix with per-row decode results.
    ///
    /// # Errors
    ///
    /// Returns the scan failures of [`TableStore::scan`].
    pub fn history(&self, prefix: &[String]) -> Result<ScanResult<AssetRecord>, LedgerError> {
        self.store.scan(HISTORY_TABLE, prefix)
    }

    /// Lists history rows under a key prefix as a JSON array of
    /// [`HistoryEntry`] values.
    ///
    /// # Errors
    ///
    /// Returns the scan failures of [`TableStore::scan`] or
    /// [`LedgerError::Encode`] when the listing cannot be serialized.
    pub fn list_history(&self, prefix: &[String]) -> Result<Vec<u8>, LedgerError> {
        let scan = self.history(prefix)?;
        let entries: Vec<HistoryEntry> = scan
            .rows
            .into_iter()
            .map(|row| match row.record {
                Ok(record) => HistoryEntry {
                    key: row.key,
                    record: Some(record),
                    error: None,
                },
                Err(err) => HistoryEntry {
                    key: row.key,
                    record: None,
                    error: Some(err.to_string()),
                },
            })
            .collect();
        encode_record(&entries).map_err(LedgerError::from)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
