//! Confidential liquidity ledger.
//!
//! Institutions register encrypted balance sheets; the regulator folds them
//! into encrypted market totals; plaintext is only ever produced through the
//! asynchronous decryption protocol of an external FHE coprocessor, whose
//! gateway calls back into `resolve_institution_metrics` /
//! `resolve_market_ratio` with proof-carrying plaintexts.

#![no_std]

pub mod access;
pub mod aggregation;
pub mod coordinator;
pub mod errors;
pub mod events;
pub mod metrics;
pub mod registry;
pub mod service;
pub mod types;


use soroban_sdk::{contract, contractimpl, symbol_short, Address, BytesN, Env, Vec};

use crate::access::{AccessPolicy, ADMIN, GATEWAY, REGULATOR};
use crate::service::COPROCESSOR;

pub use crate::errors::LedgerError;
pub use crate::types::{
    AggregatedRiskMetrics, DecryptedMetrics, DecryptionTarget, EncryptedBalanceSheet,
    EncryptedFields, InstitutionRisk, MarketRatioResult, PendingDecryption, ReportState,
};

#[contract]
pub struct LiquidityLedgerContract;

#[contractimpl]
impl LiquidityLedgerContract {
    /// One-time setup: role holders, the coprocessor address, and the empty
    /// aggregation snapshot.
    pub fn initialize(
        env: Env,
        admin: Address,
        regulator: Address,
        coprocessor: Address,
        gateway: Address,
    ) -> Result<(), LedgerError> {
        if env.storage().instance().has(&ADMIN) {
            return Err(LedgerError::AlreadyInitialized);
        }
        admin.require_auth();

        let storage = env.storage().instance();
        storage.set(&ADMIN, &admin);
        storage.set(&REGULATOR, &regulator);
        storage.set(&GATEWAY, &gateway);
        storage.set(&COPROCESSOR, &coprocessor);
        storage.set(&registry::REPORT_CTR, &0u64);
        aggregation::init_snapshot(&env);
        common::extend_instance(&env);

        events::publish_initialized(&env, admin, regulator, coprocessor, gateway);
        Ok(())
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&ADMIN)
    }

    pub fn get_admin(env: Env) -> Result<Address, LedgerError> {
        Ok(AccessPolicy::load(&env)?.admin)
    }

    pub fn get_regulator(env: Env) -> Result<Address, LedgerError> {
        Ok(AccessPolicy::load(&env)?.regulator)
    }

    pub fn get_gateway(env: Env) -> Result<Address, LedgerError> {
        Ok(AccessPolicy::load(&env)?.gateway)
    }

    pub fn set_regulator(env: Env, caller: Address, regulator: Address) -> Result<(), LedgerError> {
        let policy = AccessPolicy::load(&env)?;
        policy.require_admin(&caller)?;
        env.storage().instance().set(&REGULATOR, &regulator);
        events::publish_role_updated(&env, symbol_short!("REGULATOR"), policy.regulator, regulator);
        Ok(())
    }

    pub fn set_gateway(env: Env, caller: Address, gateway: Address) -> Result<(), LedgerError> {
        let policy = AccessPolicy::load(&env)?;
        policy.require_admin(&caller)?;
        env.storage().instance().set(&GATEWAY, &gateway);
        events::publish_role_updated(&env, symbol_short!("GATEWAY"), policy.gateway, gateway);
        Ok(())
    }

    pub fn pause(env: Env, caller: Address) -> Result<(), LedgerError> {
        AccessPolicy::load(&env)?.require_admin(&caller)?;
        common::pause(&env, &caller);
        Ok(())
    }

    pub fn unpause(env: Env, caller: Address) -> Result<(), LedgerError> {
        AccessPolicy::load(&env)?.require_admin(&caller)?;
        common::unpause(&env, &caller);
        Ok(())
    }

    pub fn is_paused(env: Env) -> bool {
        common::is_paused(&env)
    }

    // ── Report registry ─────────────────────────────────────────────────────

    /// Registers an encrypted balance sheet and returns its id.
    ///
    /// Ids start at 1 and increase by one per submission across all
    /// institutions. The paired metrics record starts unrevealed.
    pub fn submit(env: Env, institution: Address, fields: EncryptedFields) -> Result<u64, LedgerError> {
        institution.require_auth();
        common::require_not_paused(&env)?;
        AccessPolicy::load(&env)?;

        let report = registry::register(&env, &institution, fields)?;
        aggregation::accumulate(&env, &report.fields)?;
        metrics::create_stub(&env, report.id);
        common::extend_instance(&env);

        events::publish_report_submitted(&env, report.id, institution);
        Ok(report.id)
    }

    pub fn get_report(env: Env, report_id: u64) -> Result<EncryptedBalanceSheet, LedgerError> {
        registry::load(&env, report_id)
    }

    pub fn get_report_count(env: Env) -> u64 {
        registry::count(&env)
    }

    /// Ids submitted by `institution`, in submission order.
    pub fn get_institution_reports(env: Env, institution: Address) -> Vec<u64> {
        registry::institution_reports(&env, &institution)
    }

    pub fn get_report_state(env: Env, report_id: u64) -> Result<ReportState, LedgerError> {
        registry::state(&env, report_id)
    }

    pub fn get_decrypted_metrics(env: Env, report_id: u64) -> Result<DecryptedMetrics, LedgerError> {
        metrics::load(&env, report_id)
    }

    // ── Risk computation ────────────────────────────────────────────────────

    /// Encrypted liquidity and solvency ratios of one report, shared with
    /// `caller`. Open to the submitting institution and the regulator.
    pub fn calculate_institution_risk(
        env: Env,
        caller: Address,
        report_id: u64,
    ) -> Result<InstitutionRisk, LedgerError> {
        aggregation::institution_risk(&env, &caller, report_id)
    }

    /// Snapshots the encrypted market totals kept current by `submit`.
    pub fn aggregate_market_risk(
        env: Env,
        regulator: Address,
    ) -> Result<AggregatedRiskMetrics, LedgerError> {
        AccessPolicy::load(&env)?.require_regulator(&regulator)?;
        let snapshot = aggregation::aggregate(&env, &regulator)?;
        events::publish_aggregation_completed(
            &env,
            snapshot.epoch,
            snapshot.report_count,
            regulator,
        );
        Ok(snapshot)
    }

    pub fn get_aggregated_metrics(env: Env) -> Result<AggregatedRiskMetrics, LedgerError> {
        aggregation::load_snapshot(&env)
    }

    // ── Decryption requests ─────────────────────────────────────────────────

    pub fn request_metrics_decryption(
        env: Env,
        institution: Address,
        report_id: u64,
    ) -> Result<u64, LedgerError> {
        coordinator::request_metrics(&env, &institution, report_id)
    }

    pub fn request_market_ratio_decryption(
        env: Env,
        regulator: Address,
    ) -> Result<u64, LedgerError> {
        AccessPolicy::load(&env)?.require_regulator(&regulator)?;
        coordinator::request_market_ratio(&env, &regulator)
    }

    pub fn get_pending_request(env: Env, request_id: u64) -> Result<PendingDecryption, LedgerError> {
        coordinator::load_pending(&env, request_id)
    }

    // ── Gateway callbacks ───────────────────────────────────────────────────

    pub fn resolve_institution_metrics(
        env: Env,
        gateway: Address,
        request_id: u64,
        plaintexts: Vec<u64>,
        proof: BytesN<32>,
    ) -> Result<DecryptedMetrics, LedgerError> {
        coordinator::resolve_metrics(&env, &gateway, request_id, plaintexts, proof)
    }

    pub fn resolve_market_ratio(
        env: Env,
        gateway: Address,
        request_id: u64,
        plaintexts: Vec<u64>,
        proof: BytesN<32>,
    ) -> Result<MarketRatioResult, LedgerError> {
        coordinator::resolve_market_ratio(&env, &gateway, request_id, plaintexts, proof)
    }

    /// Market ratio record of the current aggregation epoch.
    pub fn get_market_ratio(env: Env) -> Result<MarketRatioResult, LedgerError> {
        let epoch = aggregation::load_snapshot(&env)?.epoch;
        aggregation::market_result(&env, epoch)
    }

    pub fn get_market_ratio_at(env: Env, epoch: u64) -> Result<MarketRatioResult, LedgerError> {
        aggregation::market_result(&env, epoch)
    }
}
