//! # Confidential Ledger Testing Framework
//!
//! A reusable harness for exercising the liquidity ledger together with the
//! reference FHE coprocessor, supporting property-based testing, invariant
//! checking, and randomized protocol exploration.
//!
//! ## Architecture
//!
//! ```text
//! test/framework/
//! ├── mod.rs             LedgerHarness, snapshots, re-exports
//! ├── generators.rs      Property-based balance sheet and action generators
//! ├── invariants.rs      State invariant definitions & verification
//! └── state_explorer.rs  Random action execution with a reference model
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use test_framework::{BalanceSheet, LedgerHarness};
//!
//! let h = LedgerHarness::new(2);
//! let id = h.submit(0, &BalanceSheet::new(100, 500, 50, 300, 200));
//! let request = h.request_reveal(0, id).unwrap();
//! let metrics = h.deliver(request).unwrap();
//! assert!(metrics.is_revealed);
//! ```

extern crate std;

use core::cell::RefCell;

pub mod generators;

use fhe_coprocessor::{Attestation, FheCoprocessorContract, FheCoprocessorContractClient};
use liquidity_ledger::{
    AggregatedRiskMetrics, DecryptedMetrics, EncryptedFields, LedgerError,
    LiquidityLedgerContract, LiquidityLedgerContractClient, MarketRatioResult, ReportState,
};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    vec, Address, BytesN, Env,
};

// ── Plain-side model types ───────────────────────────────────────────────────

/// A balance sheet as the institution knows it, before encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceSheet {
    pub liquid_assets: u64,
    pub total_assets: u64,
    pub current_liabilities: u64,
    pub total_liabilities: u64,
    pub net_capital: u64,
}

impl BalanceSheet {
    pub fn new(
        liquid_assets: u64,
        total_assets: u64,
        current_liabilities: u64,
        total_liabilities: u64,
        net_capital: u64,
    ) -> Self {
        Self {
            liquid_assets,
            total_assets,
            current_liabilities,
            total_liabilities,
            net_capital,
        }
    }

    /// Field values in the ledger's fixed decryption order.
    pub fn to_array(&self) -> [u64; 5] {
        [
            self.liquid_assets,
            self.total_assets,
            self.current_liabilities,
            self.total_liabilities,
            self.net_capital,
        ]
    }

    /// True when `metrics` carries exactly these values.
    pub fn matches(&self, metrics: &DecryptedMetrics) -> bool {
        self.liquid_assets == metrics.liquid_assets
            && self.total_assets == metrics.total_assets
            && self.current_liabilities == metrics.current_liabilities
            && self.total_liabilities == metrics.total_liabilities
            && self.net_capital == metrics.net_capital
    }
}

/// Collapses a generated `try_*` result into the contract-level outcome.
///
/// Host-level failures (conversion errors, traps) are test bugs and panic.
pub fn outcome<T, C, I>(result: Result<Result<T, C>, Result<LedgerError, I>>) -> Result<T, LedgerError> {
    match result {
        Ok(Ok(value)) => Ok(value),
        Err(Ok(err)) => Err(err),
        _ => panic!("contract call failed outside the ledger error space"),
    }
}

// ── Ledger Harness ───────────────────────────────────────────────────────────

/// Pre-wired ledger + coprocessor fixture with a pool of institutions.
///
/// One address acts as the decryption gateway for both contracts, as a real
/// deployment's relayer would.
pub struct LedgerHarness {
    pub env: Env,
    pub ledger: LiquidityLedgerContractClient<'static>,
    pub fhe: FheCoprocessorContractClient<'static>,
    pub admin: Address,
    pub regulator: Address,
    pub gateway: Address,
    pub institutions: std::vec::Vec<Address>,
    /// Plaintext of every accepted submission, indexed by `report_id - 1`.
    submitted: RefCell<std::vec::Vec<BalanceSheet>>,
}

impl LedgerHarness {
    /// Deploy both contracts with all auth mocked and `num_institutions`
    /// fresh institution addresses.
    pub fn new(num_institutions: usize) -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().set_timestamp(1_700_000_000);

        let admin = Address::generate(&env);
        let regulator = Address::generate(&env);
        let gateway = Address::generate(&env);

        let fhe_id = env.register(FheCoprocessorContract, ());
        let fhe = FheCoprocessorContractClient::new(&env, &fhe_id);
        fhe.initialize(&admin, &gateway);

        let ledger_id = env.register(LiquidityLedgerContract, ());
        let ledger = LiquidityLedgerContractClient::new(&env, &ledger_id);
        ledger.initialize(&admin, &regulator, &fhe_id, &gateway);

        let institutions = (0..num_institutions)
            .map(|_| Address::generate(&env))
            .collect();

        Self {
            env,
            ledger,
            fhe,
            admin,
            regulator,
            gateway,
            institutions,
            submitted: RefCell::new(std::vec::Vec::new()),
        }
    }

    pub fn institution(&self, index: usize) -> &Address {
        &self.institutions[index % self.institutions.len()]
    }

    /// Advance the ledger timestamp by `delta` seconds.
    pub fn advance_time(&self, delta: u64) {
        let now = self.env.ledger().timestamp();
        self.env.ledger().set_timestamp(now.saturating_add(delta));
    }

    /// Client-side encryption of `sheet`, shared with the ledger contract.
    pub fn encrypt_sheet(&self, institution: &Address, sheet: &BalanceSheet) -> EncryptedFields {
        let encrypt = |value: u64| -> BytesN<32> {
            let handle = self.fhe.encrypt(institution, &value);
            self.fhe.allow(institution, &handle, &self.ledger.address);
            handle
        };
        EncryptedFields {
            liquid_assets: encrypt(sheet.liquid_assets),
            total_assets: encrypt(sheet.total_assets),
            current_liabilities: encrypt(sheet.current_liabilities),
            total_liabilities: encrypt(sheet.total_liabilities),
            net_capital: encrypt(sheet.net_capital),
        }
    }

    pub fn try_submit(&self, institution_index: usize, sheet: &BalanceSheet) -> Result<u64, LedgerError> {
        let institution = self.institution(institution_index).clone();
        let fields = self.encrypt_sheet(&institution, sheet);
        let id = outcome(self.ledger.try_submit(&institution, &fields))?;
        self.submitted.borrow_mut().push(*sheet);
        Ok(id)
    }

    pub fn submit(&self, institution_index: usize, sheet: &BalanceSheet) -> u64 {
        match self.try_submit(institution_index, sheet) {
            Ok(id) => id,
            Err(e) => panic!("submission rejected: {:?}", e),
        }
    }

    /// Plaintext the harness submitted under `report_id`.
    pub fn submitted(&self, report_id: u64) -> Option<BalanceSheet> {
        let index = usize::try_from(report_id).ok()?.checked_sub(1)?;
        self.submitted.borrow().get(index).copied()
    }

    /// Sums and ratio the market aggregation should produce, in plaintext.
    pub fn expected_market(&self) -> (u64, u64, u64) {
        let sheets = self.submitted.borrow();
        let liquid = sheets
            .iter()
            .fold(0u64, |acc, s| acc.wrapping_add(s.liquid_assets));
        let liabilities = sheets
            .iter()
            .fold(0u64, |acc, s| acc.wrapping_add(s.current_liabilities));
        (liquid, liabilities, liquid.checked_div(liabilities).unwrap_or(u64::MAX))
    }

    pub fn request_reveal(&self, institution_index: usize, report_id: u64) -> Result<u64, LedgerError> {
        let institution = self.institution(institution_index);
        outcome(self.ledger.try_request_metrics_decryption(institution, &report_id))
    }

    /// The gateway's off-chain step for `request_id`.
    pub fn attest(&self, request_id: u64) -> Attestation {
        self.fhe.attest(&self.gateway, &request_id)
    }

    /// Attest `request_id` and deliver the result to the report callback.
    pub fn deliver(&self, request_id: u64) -> Result<DecryptedMetrics, LedgerError> {
        let att = self.attest(request_id);
        outcome(self.ledger.try_resolve_institution_metrics(
            &self.gateway,
            &request_id,
            &att.plaintexts,
            &att.proof,
        ))
    }

    /// Deliver genuine plaintexts with a corrupted proof.
    pub fn deliver_forged(&self, request_id: u64) -> Result<DecryptedMetrics, LedgerError> {
        let att = self.attest(request_id);
        let mut bytes = att.proof.to_array();
        bytes[0] ^= 0xff;
        let forged = BytesN::from_array(&self.env, &bytes);
        outcome(self.ledger.try_resolve_institution_metrics(
            &self.gateway,
            &request_id,
            &att.plaintexts,
            &forged,
        ))
    }

    pub fn aggregate(&self) -> Result<AggregatedRiskMetrics, LedgerError> {
        outcome(self.ledger.try_aggregate_market_risk(&self.regulator))
    }

    pub fn request_market_ratio(&self) -> Result<u64, LedgerError> {
        outcome(self.ledger.try_request_market_ratio_decryption(&self.regulator))
    }

    pub fn deliver_market(&self, request_id: u64) -> Result<MarketRatioResult, LedgerError> {
        let att = self.attest(request_id);
        outcome(self.ledger.try_resolve_market_ratio(
            &self.gateway,
            &request_id,
            &att.plaintexts,
            &att.proof,
        ))
    }

    /// Request, attest and deliver the current market ratio in one go.
    pub fn reveal_market_ratio(&self) -> Result<u64, LedgerError> {
        let request_id = self.request_market_ratio()?;
        Ok(self.deliver_market(request_id)?.liquidity_ratio)
    }

    /// Decrypt a handle the `owner` may access, bypassing the ledger.
    pub fn decrypt_as(&self, owner: &Address, handle: &BytesN<32>) -> u64 {
        let request_id = self
            .fhe
            .request_decryption(owner, &vec![&self.env, handle.clone()]);
        self.attest(request_id)
            .plaintexts
            .get(0)
            .expect("single plaintext")
    }

    /// Snapshot of all observable ledger state for invariant checking.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let report_count = self.ledger.get_report_count();
        let reports = (1..=report_count)
            .map(|id| {
                let report = self.ledger.get_report(&id);
                let institution_index = self
                    .institutions
                    .iter()
                    .position(|a| *a == report.institution);
                ReportView {
                    id,
                    stored_id: report.id,
                    institution_index,
                    state: self.ledger.get_report_state(&id),
                    metrics: self.ledger.get_decrypted_metrics(&id),
                    submitted: self.submitted(id),
                }
            })
            .collect();

        let institution_reports = self
            .institutions
            .iter()
            .map(|a| self.ledger.get_institution_reports(a).iter().collect())
            .collect();

        LedgerSnapshot {
            report_count,
            past_end_missing: self
                .ledger
                .try_get_report(&(report_count + 1))
                .is_err(),
            reports,
            institution_reports,
        }
    }
}

/// One report as seen through the public read API.
#[derive(Debug, Clone)]
pub struct ReportView {
    /// Id the report was looked up under.
    pub id: u64,
    /// Id stored inside the report record.
    pub stored_id: u64,
    pub institution_index: Option<usize>,
    pub state: ReportState,
    pub metrics: DecryptedMetrics,
    /// What the harness encrypted for this id, if it submitted it.
    pub submitted: Option<BalanceSheet>,
}

/// Immutable snapshot of ledger state at a point in time.
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    pub report_count: u64,
    /// `get_report(report_count + 1)` fails, i.e. there is nothing past the end.
    pub past_end_missing: bool,
    pub reports: std::vec::Vec<ReportView>,
    /// Per institution (by harness index), the ids returned by the index.
    pub institution_reports: std::vec::Vec<std::vec::Vec<u64>>,
}

// ── Run bookkeeping ──────────────────────────────────────────────────────────

/// Outcome of a single action during exploration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action succeeded.
    Ok,
    /// The contract rejected the action with a ledger error code.
    ExpectedError(u32),
}

impl<T> From<Result<T, LedgerError>> for ActionOutcome {
    fn from(result: Result<T, LedgerError>) -> Self {
        match result {
            Ok(_) => ActionOutcome::Ok,
            Err(e) => ActionOutcome::ExpectedError(e as u32),
        }
    }
}

/// Summary of a test run with coverage metrics.
#[derive(Debug, Clone)]
pub struct TestRunSummary {
    pub actions_executed: usize,
    pub invariant_checks: usize,
    pub invariant_violations: std::vec::Vec<std::string::String>,
    pub entry_points_hit: std::collections::HashSet<std::string::String>,
    pub transitions_observed: usize,
}

impl TestRunSummary {
    pub fn new() -> Self {
        Self {
            actions_executed: 0,
            invariant_checks: 0,
            invariant_violations: std::vec::Vec::new(),
            entry_points_hit: std::collections::HashSet::new(),
            transitions_observed: 0,
        }
    }

    /// True when no invariant violations were detected.
    pub fn passed(&self) -> bool {
        self.invariant_violations.is_empty()
    }

    /// Fraction of `all_entry_points` exercised during the run.
    pub fn entry_point_coverage(&self, all_entry_points: &[&str]) -> f64 {
        if all_entry_points.is_empty() {
            return 1.0;
        }
        let hit = all_entry_points
            .iter()
            .filter(|ep| self.entry_points_hit.contains(**ep))
            .count();
        hit as f64 / all_entry_points.len() as f64
    }
}

impl Default for TestRunSummary {
    fn default() -> Self {
        Self::new()
    }
}
