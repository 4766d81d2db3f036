//! Property-based tests for asset-ledger-core codec round trips and insert-once.
// crates/asset-ledger-core/tests/proptest_ledger.rs
// ============================================================================
// Module: Asset Ledger Property-Based Tests
// Description: Randomized checks of codec round trips and insert-once.
// Purpose: Ensure records survive encoding and stored rows are never replaced.
// ============================================================================

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

use asset_ledger_core::AssetRecord;
use asset_ledger_core::HISTORY_TABLE;
use asset_ledger_core::LedgerError;
use proptest::prelude::*;

use crate::common::memory_ledger;

proptest! {
    #[test]
    fn asset_records_round_trip(
        serial in any::<i64>(),
        part_number in ".{0,24}",
        owner in ".{0,24}",
    ) {
        let record = AssetRecord::from_args(&[serial.to_string(), part_number, owner]).unwrap();
        let decoded = AssetRecord::decode(&record.encode().unwrap()).unwrap();
        prop_assert_eq!(decoded, record);
    }

    #[test]
    fn encoding_is_deterministic(part_number in "[A-Z]{1,8}", owner in "[a-z]{1,8}") {
        let record = AssetRecord {
            serial_number: "1".to_string(),
            part_number,
            owner,
        };
        prop_assert_eq!(record.encode().unwrap(), record.clone().encode().unwrap());
    }

    #[test]
    fn inserts_never_overwrite(
        era in "[0-9]{4}",
        tag in "[a-z]{1,6}",
        first in proptest::collection::vec(any::<u8>(), 0..32),
        second in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let ledger = memory_ledger();
        let store = ledger.store();
        let key = vec![era, "1".to_string(), tag];
        store.insert(HISTORY_TABLE, &key, first.clone()).unwrap();
        let is_duplicate =
            matches!(store.insert(HISTORY_TABLE, &key, second), Err(LedgerError::DuplicateKey { .. }));
        prop_assert!(is_duplicate);
        prop_assert_eq!(store.get(HISTORY_TABLE, &key).unwrap(), first);
    }
}
