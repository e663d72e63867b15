//! # Property-Based Test Generators
//!
//! Composable `proptest` strategies for balance sheets and ledger action
//! sequences.
//!
//! Field values are bounded to 10^12 so that sums over a few dozen reports
//! stay far from `u64` wrap-around; a separate strategy produces zero
//! liabilities to hit the division-by-zero path.

extern crate std;

use proptest::prelude::*;
use std::vec::Vec;

use super::BalanceSheet;

/// Upper bound on a single balance-sheet field.
pub const MAX_FIELD: u64 = 1_000_000_000_000;

// ── Scalar Generators ────────────────────────────────────────────────────────

/// Strategy for one balance-sheet amount, biased toward edge cases.
///
/// Distribution:
///   10% → 0
///   10% → 1
///   10% → MAX_FIELD
///   70% → uniform in [1, MAX_FIELD]
pub fn amount_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![
        1 => Just(0u64),
        1 => Just(1u64),
        1 => Just(MAX_FIELD),
        7 => (1u64..=MAX_FIELD),
    ]
}

/// Strategy for strictly positive amounts.
pub fn positive_amount_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![
        1 => Just(1u64),
        1 => Just(MAX_FIELD),
        8 => (1u64..=MAX_FIELD),
    ]
}

/// Strategy for time advancement between actions, in seconds.
pub fn duration_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![
        1 => Just(0u64),
        3 => (1u64..=3_600u64),
        3 => (1u64..=86_400u64),
        1 => Just(604_800u64),
    ]
}

// ── Balance Sheet Generators ─────────────────────────────────────────────────

/// Any balance sheet within bounds. Fields are independent; the ledger does
/// not enforce accounting identities.
pub fn balance_sheet_strategy() -> impl Strategy<Value = BalanceSheet> {
    (
        amount_strategy(),
        amount_strategy(),
        amount_strategy(),
        amount_strategy(),
        amount_strategy(),
    )
        .prop_map(|(la, ta, cl, tl, nc)| BalanceSheet::new(la, ta, cl, tl, nc))
}

/// Balance sheets with non-zero denominators for both institution ratios.
pub fn solvent_sheet_strategy() -> impl Strategy<Value = BalanceSheet> {
    (
        amount_strategy(),
        positive_amount_strategy(),
        positive_amount_strategy(),
        amount_strategy(),
        amount_strategy(),
    )
        .prop_map(|(la, ta, cl, tl, nc)| BalanceSheet::new(la, ta, cl, tl, nc))
}

/// Balance sheets declaring no current liabilities.
pub fn zero_liability_sheet_strategy() -> impl Strategy<Value = BalanceSheet> {
    (amount_strategy(), amount_strategy(), amount_strategy())
        .prop_map(|(la, ta, nc)| BalanceSheet::new(la, ta, 0, 0, nc))
}

/// A submission schedule: `(institution_index, sheet)` pairs in order.
pub fn submission_schedule(
    num_institutions: usize,
    max_len: usize,
) -> impl Strategy<Value = Vec<(usize, BalanceSheet)>> {
    prop::collection::vec(
        (0..num_institutions, balance_sheet_strategy()),
        1..=max_len,
    )
}

// ── Action Generators ────────────────────────────────────────────────────────

/// Ledger operations available to state exploration.
///
/// `institution_index` selects from the harness pool (modular indexing);
/// `report_id` and `request_slot` are taken modulo what exists at execution
/// time so that most generated actions reach real records.
#[derive(Debug, Clone)]
pub enum LedgerAction {
    /// Encrypt and submit a balance sheet.
    Submit {
        institution_index: usize,
        sheet: BalanceSheet,
    },
    /// Request decryption of a report, possibly by a non-owner.
    RequestReveal {
        institution_index: usize,
        report_id: u64,
    },
    /// Gateway delivers a genuine attestation for an issued request.
    Deliver { request_slot: usize },
    /// Gateway delivers genuine plaintexts with a tampered proof.
    DeliverForged { request_slot: usize },
    /// Regulator rebuilds the market snapshot.
    Aggregate,
    /// Regulator requests the current market ratio.
    RequestMarketRatio,
    /// Advance the ledger clock.
    AdvanceTime { delta: u64 },
    /// Admin: pause submissions.
    Pause,
    /// Admin: resume submissions.
    Unpause,
}

/// Strategy for individual ledger actions.
///
/// Submissions and reveals dominate; admin toggles are rare.
pub fn ledger_action_strategy(num_institutions: usize) -> impl Strategy<Value = LedgerAction> {
    let inst = 0..num_institutions;

    prop_oneof![
        30 => (inst.clone(), balance_sheet_strategy()).prop_map(|(i, s)| LedgerAction::Submit {
            institution_index: i,
            sheet: s,
        }),
        20 => (inst.clone(), 1u64..=16u64).prop_map(|(i, r)| LedgerAction::RequestReveal {
            institution_index: i,
            report_id: r,
        }),
        20 => (0usize..8).prop_map(|r| LedgerAction::Deliver { request_slot: r }),
        4 => (0usize..8).prop_map(|r| LedgerAction::DeliverForged { request_slot: r }),
        8 => Just(LedgerAction::Aggregate),
        6 => Just(LedgerAction::RequestMarketRatio),
        8 => duration_strategy().prop_map(|d| LedgerAction::AdvanceTime { delta: d }),
        2 => Just(LedgerAction::Pause),
        2 => Just(LedgerAction::Unpause),
    ]
}

/// Strategy for a sequence of 1..=`max_len` ledger actions.
pub fn ledger_action_sequence(
    num_institutions: usize,
    max_len: usize,
) -> impl Strategy<Value = Vec<LedgerAction>> {
    prop::collection::vec(ledger_action_strategy(num_institutions), 1..=max_len)
}
