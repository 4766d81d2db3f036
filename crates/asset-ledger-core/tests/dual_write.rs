// crates/asset-ledger-core/tests/dual_write.rs
// ============================================================================
// Module: Dual-Table Write Tests
// Description: Failure ordering of the asset and history writes.
// Purpose: Pin down what is committed when either write fails.
// Dependencies: asset-ledger-core
// ============================================================================

//! ## Overview
//! Posting an asset writes the asset table first and the history table second,
//! without compensation. These tests inject engine failures into each table
//! and check which rows survive and which audit events are emitted.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use std::sync::Arc;

use asset_ledger_core::ASSET_TABLE;
use asset_ledger_core::AuditOutcome;
use asset_ledger_core::EngineOperation;
use asset_ledger_core::HISTORY_TABLE;
use asset_ledger_core::LedgerError;
use asset_ledger_core::MemoryAuditSink;

use crate::common::FaultyEngine;
use crate::common::args;
use crate::common::ledger_over;

#[test]
fn history_failure_leaves_asset_row_committed() {
    let engine = Arc::new(FaultyEngine::default());
    let audit = Arc::new(MemoryAuditSink::default());
    let ledger = ledger_over(engine.clone(), audit.clone());
    engine.fail_inserts(HISTORY_TABLE);

    let err = ledger.post_asset(&args(&["42", "WIDGET", "alice"])).unwrap_err();
    match &err {
        LedgerError::Engine {
            table,
            operation,
            key_hint,
            ..
        } => {
            assert_eq!(table, HISTORY_TABLE);
            assert_eq!(*operation, EngineOperation::Insert);
            assert_eq!(key_hint.as_deref(), Some("2016"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(ledger.get_asset(&args(&["42"])).is_ok());
    assert_eq!(ledger.history(&args(&["2016", "42"])).unwrap().total_rows, 0);

    let orphaned: Vec<_> =
        audit.events().into_iter().filter(|event| event.event == "asset.history_orphaned").collect();
    assert_eq!(orphaned.len(), 1);
    assert_eq!(orphaned[0].outcome, AuditOutcome::Error);
    assert_eq!(orphaned[0].table.as_deref(), Some(ASSET_TABLE));
    assert_eq!(orphaned[0].key, args(&["42"]));
}

#[test]
fn asset_failure_skips_history_write() {
    let engine = Arc::new(FaultyEngine::default());
    let audit = Arc::new(MemoryAuditSink::default());
    let ledger = ledger_over(engine.clone(), audit.clone());
    engine.fail_inserts(ASSET_TABLE);

    let err = ledger.post_asset(&args(&["42", "WIDGET", "alice"])).unwrap_err();
    assert!(matches!(err, LedgerError::Engine { ref table, .. } if table == ASSET_TABLE));
    assert_eq!(ledger.history(&args(&["2016", "42"])).unwrap().total_rows, 0);
    assert!(audit.events().iter().all(|event| event.event != "asset.history_orphaned"));
}

#[test]
fn both_rows_carry_identical_payload_bytes() {
    let engine = Arc::new(FaultyEngine::default());
    let ledger = ledger_over(engine, Arc::new(MemoryAuditSink::default()));
    let payload = ledger.post_asset(&args(&["-3", "BOLT", "erin"])).unwrap();
    assert_eq!(ledger.get_asset(&args(&["-3"])).unwrap(), payload);
    assert_eq!(ledger.get_history(&args(&["2016", "-3", "random"])).unwrap(), payload);
}

#[test]
fn successful_post_is_audited_once() {
    let engine = Arc::new(FaultyEngine::default());
    let audit = Arc::new(MemoryAuditSink::default());
    let ledger = ledger_over(engine, audit.clone());
    ledger.post_asset(&args(&["1", "P", "o"])).unwrap();
    let names: Vec<&str> = audit.events().iter().map(|event| event.event).collect();
    let posted = names.iter().filter(|name| **name == "asset.posted").count();
    let inserted = names.iter().filter(|name| **name == "row.inserted").count();
    assert_eq!(posted, 1);
    assert_eq!(inserted, 2);
}
