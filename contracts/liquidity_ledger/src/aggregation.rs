//! Homomorphic market aggregation and per-institution ratios.
//!
//! Encrypted market sums are folded in once per submission, so they always
//! cover every registered report. Aggregation snapshots those sums and
//! derives the ratio at constant cost. Running it twice over the same
//! reports yields the same totals; only the epoch advances.

use common::ttl;
use soroban_sdk::{symbol_short, Address, BytesN, Env, Symbol};

use crate::access::{self, AccessPolicy};
use crate::registry;
use crate::service::{self, CoprocessorClient};
use crate::types::{AggregatedRiskMetrics, EncryptedFields, InstitutionRisk, MarketRatioResult};
use crate::LedgerError;

const SNAPSHOT: Symbol = symbol_short!("AGG");
const MARKET_RESULT: Symbol = symbol_short!("MKT_RES");
const SUM_LIQUID: Symbol = symbol_short!("SUM_LIQ");
const SUM_LIABILITIES: Symbol = symbol_short!("SUM_CL");

fn market_key(epoch: u64) -> (Symbol, u64) {
    (MARKET_RESULT, epoch)
}

/// Writes the empty, initialized snapshot. Called once from `initialize`.
pub fn init_snapshot(env: &Env) {
    let snapshot = AggregatedRiskMetrics {
        total_liquid_assets: None,
        total_current_liabilities: None,
        liquidity_ratio: None,
        is_initialized: true,
        epoch: 0,
        report_count: 0,
        computed_at: 0,
    };
    env.storage().instance().set(&SNAPSHOT, &snapshot);
}

pub fn load_snapshot(env: &Env) -> Result<AggregatedRiskMetrics, LedgerError> {
    let snapshot: AggregatedRiskMetrics = env
        .storage()
        .instance()
        .get(&SNAPSHOT)
        .ok_or(LedgerError::NotInitialized)?;
    if !snapshot.is_initialized {
        return Err(LedgerError::NotInitialized);
    }
    Ok(snapshot)
}

/// Adds a newly registered report to the running encrypted sums.
///
/// The first report starts both sums from an encryption of zero so that a
/// sum handle is never one of the institution's own handles.
pub fn accumulate(env: &Env, fields: &EncryptedFields) -> Result<(), LedgerError> {
    let coprocessor = service::client(env)?;
    let ledger = env.current_contract_address();
    let storage = env.storage().instance();

    let liquid = running_sum(env, &coprocessor, &ledger, &SUM_LIQUID);
    let liabilities = running_sum(env, &coprocessor, &ledger, &SUM_LIABILITIES);
    storage.set(
        &SUM_LIQUID,
        &coprocessor.add(&ledger, &liquid, &fields.liquid_assets),
    );
    storage.set(
        &SUM_LIABILITIES,
        &coprocessor.add(&ledger, &liabilities, &fields.current_liabilities),
    );
    Ok(())
}

fn running_sum(
    env: &Env,
    coprocessor: &CoprocessorClient,
    ledger: &Address,
    key: &Symbol,
) -> BytesN<32> {
    env.storage()
        .instance()
        .get(key)
        .unwrap_or_else(|| coprocessor.trivial_encrypt(ledger, &0))
}

/// Snapshots the running sums and derives
/// `liquidity_ratio = total_liquid_assets / total_current_liabilities`.
///
/// Division follows the service: the reference coprocessor truncates and
/// returns `u64::MAX` when total current liabilities are zero.
pub fn aggregate(env: &Env, regulator: &Address) -> Result<AggregatedRiskMetrics, LedgerError> {
    let mut snapshot = load_snapshot(env)?;
    let report_count = registry::count(env);
    if report_count == 0 {
        return Err(LedgerError::NoReports);
    }

    let storage = env.storage().instance();
    let liquid: BytesN<32> = storage.get(&SUM_LIQUID).ok_or(LedgerError::NoReports)?;
    let liabilities: BytesN<32> = storage
        .get(&SUM_LIABILITIES)
        .ok_or(LedgerError::NoReports)?;

    let coprocessor = service::client(env)?;
    let ledger = env.current_contract_address();
    let ratio = coprocessor.div(&ledger, &liquid, &liabilities);

    for handle in [&liquid, &liabilities, &ratio] {
        coprocessor.allow(&ledger, handle, regulator);
    }

    snapshot.total_liquid_assets = Some(liquid);
    snapshot.total_current_liabilities = Some(liabilities);
    snapshot.liquidity_ratio = Some(ratio);
    snapshot.epoch = snapshot.epoch.saturating_add(1);
    snapshot.report_count = report_count;
    snapshot.computed_at = env.ledger().timestamp();
    env.storage().instance().set(&SNAPSHOT, &snapshot);

    store_market_result(
        env,
        &MarketRatioResult {
            epoch: snapshot.epoch,
            liquidity_ratio: 0,
            is_revealed: false,
            revealed_at: 0,
        },
    );

    Ok(snapshot)
}

pub fn market_result(env: &Env, epoch: u64) -> Result<MarketRatioResult, LedgerError> {
    env.storage()
        .persistent()
        .get(&market_key(epoch))
        .ok_or(LedgerError::NotInitialized)
}

pub fn store_market_result(env: &Env, result: &MarketRatioResult) {
    let key = market_key(result.epoch);
    env.storage().persistent().set(&key, result);
    ttl::extend_persistent(env, &key);
}

/// `liquidity = liquid_assets / current_liabilities`,
/// `solvency = net_capital / total_assets`, both as ciphertext handles.
///
/// Report records are left untouched, but each call allocates two result
/// handles in the service, so only the submitting institution or the
/// regulator may ask. The caller is put on the access list of both results.
pub fn institution_risk(
    env: &Env,
    caller: &Address,
    report_id: u64,
) -> Result<InstitutionRisk, LedgerError> {
    let report = registry::load(env, report_id)?;
    let policy = AccessPolicy::load(env)?;
    if *caller == report.institution {
        access::require_owner(&report, caller)?;
    } else {
        policy.require_regulator(caller)?;
    }

    let coprocessor = service::client(env)?;
    let ledger = env.current_contract_address();

    let liquidity_ratio = share(
        &coprocessor,
        &ledger,
        caller,
        coprocessor.div(
            &ledger,
            &report.fields.liquid_assets,
            &report.fields.current_liabilities,
        ),
    );
    let solvency_ratio = share(
        &coprocessor,
        &ledger,
        caller,
        coprocessor.div(&ledger, &report.fields.net_capital, &report.fields.total_assets),
    );

    Ok(InstitutionRisk {
        report_id,
        liquidity_ratio,
        solvency_ratio,
    })
}

fn share(
    coprocessor: &CoprocessorClient,
    ledger: &Address,
    grantee: &Address,
    handle: BytesN<32>,
) -> BytesN<32> {
    coprocessor.allow(ledger, &handle, grantee);
    handle
}
