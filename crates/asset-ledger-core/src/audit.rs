// crates/asset-ledger-core/src/audit.rs
// ============================================================================
// Module: Asset Ledger Audit Logging
// Description: Structured audit events for table and domain operations.
// Purpose: Emit JSON-line logs without hard dependencies on a logging stack.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines the audit event payload and sinks used by the table
//! layer. Events carry table names, keys, counts, and error kinds; they never
//! carry payload bytes. Deployments route events to stderr, a file, or
//! nowhere.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome classification for audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// Operation succeeded.
    Ok,
    /// Operation was rejected (validation, duplicate key, not found).
    Rejected,
    /// Operation failed in the engine.
    Error,
}

/// Ledger audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Table involved, when any.
    pub table: Option<String>,
    /// Key or key prefix involved.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key: Vec<String>,
    /// Outcome classification.
    pub outcome: AuditOutcome,
    /// Rows returned by a scan.
    pub row_count: Option<usize>,
    /// Whether a scan hit its row cap.
    pub truncated: Option<bool>,
    /// Rows whose payload failed to decode.
    pub decode_failures: Option<usize>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
}

impl LedgerAuditEvent {
    /// Creates an event with a consistent timestamp and no optional fields.
    #[must_use]
    pub fn new(event: &'static str, outcome: AuditOutcome) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            table: None,
            key: Vec::new(),
            outcome,
            row_count: None,
            truncated: None,
            decode_failures: None,
            error_kind: None,
        }
    }

    /// Sets the table.
    #[must_use]
    pub fn table(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    /// Sets the key or key prefix.
    #[must_use]
    pub fn key(mut self, key: &[String]) -> Self {
        self.key = key.to_vec();
        self
    }

    /// Sets the error kind label.
    #[must_use]
    pub const fn error_kind(mut self, kind: &'static str) -> Self {
        self.error_kind = Some(kind);
        self
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for ledger events.
pub trait LedgerAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &LedgerAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl LedgerAuditSink for StderrAuditSink {
    fn record(&self, event: &LedgerAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LedgerAuditSink for FileAuditSink {
    fn record(&self, event: &LedgerAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl LedgerAuditSink for NoopAuditSink {
    fn record(&self, _event: &LedgerAuditEvent) {}
}

/// In-memory audit sink that keeps every event (tests and diagnostics).
#[derive(Default)]
pub struct MemoryAuditSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<LedgerAuditEvent>>,
}

impl MemoryAuditSink {
    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<LedgerAuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl LedgerAuditSink for MemoryAuditSink {
    fn record(&self, event: &LedgerAuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
