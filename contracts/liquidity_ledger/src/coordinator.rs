//! Decryption request coordination.
//!
//! Issuing a request hands ciphertext handles to the service and records the
//! returned request id. The gateway later delivers plaintexts and a proof for
//! that id; the matching `resolve_*` handler checks the proof with the
//! service and applies the one-time reveal.
//!
//! Pending entries are kept after resolution. A replayed callback therefore
//! still finds its entry and is turned away by the reveal guard.

use common::ttl;
use soroban_sdk::{log, symbol_short, vec, Address, BytesN, Env, Symbol, Vec};

use crate::access::{self, AccessPolicy};
use crate::aggregation;
use crate::events;
use crate::metrics;
use crate::registry;
use crate::service::{self, CoprocessorClient};
use crate::types::{
    DecryptedMetrics, DecryptionTarget, MarketRatioResult, PendingDecryption, ReportState,
};
use crate::LedgerError;

const PENDING: Symbol = symbol_short!("PENDING");

fn pending_key(request_id: u64) -> (Symbol, u64) {
    (PENDING, request_id)
}

pub fn load_pending(env: &Env, request_id: u64) -> Result<PendingDecryption, LedgerError> {
    env.storage()
        .persistent()
        .get(&pending_key(request_id))
        .ok_or(LedgerError::InvalidRequest)
}

fn store_pending(env: &Env, pending: &PendingDecryption) {
    let key = pending_key(pending.request_id);
    env.storage().persistent().set(&key, pending);
    ttl::extend_persistent(env, &key);
}

/// Sends `handles` to the service and records the request id against
/// `target`. A service that hands out an id twice is refused.
fn open(
    env: &Env,
    requester: &Address,
    target: DecryptionTarget,
    handles: Vec<BytesN<32>>,
) -> Result<u64, LedgerError> {
    let coprocessor = service::client(env)?;
    let request_id = coprocessor.request_decryption(&env.current_contract_address(), &handles);
    if env.storage().persistent().has(&pending_key(request_id)) {
        return Err(LedgerError::InvalidRequest);
    }
    store_pending(
        env,
        &PendingDecryption {
            request_id,
            target,
            requester: requester.clone(),
            requested_at: env.ledger().timestamp(),
            resolved: false,
        },
    );
    Ok(request_id)
}

fn verify(
    env: &Env,
    coprocessor: &CoprocessorClient,
    request_id: u64,
    plaintexts: &Vec<u64>,
    proof: &BytesN<32>,
) -> Result<(), LedgerError> {
    if !coprocessor.verify_proof(&request_id, plaintexts, proof) {
        log!(env, "decryption proof rejected", request_id);
        return Err(LedgerError::ProofVerificationFailure);
    }
    Ok(())
}

// ── Institution reports ─────────────────────────────────────────────────────

/// Requests decryption of all five fields of `report_id`.
///
/// Several requests for one unrevealed report may be outstanding; the first
/// valid callback wins.
pub fn request_metrics(
    env: &Env,
    institution: &Address,
    report_id: u64,
) -> Result<u64, LedgerError> {
    let report = registry::load(env, report_id)?;
    access::require_owner(&report, institution)?;
    if metrics::is_revealed(env, report_id)? {
        return Err(LedgerError::AlreadyRevealed);
    }

    let request_id = open(
        env,
        institution,
        DecryptionTarget::Report(report_id),
        report.fields.to_vec(env),
    )?;
    registry::set_state(env, report_id, ReportState::DecryptionRequested);

    events::publish_decryption_requested(env, request_id, report_id, institution.clone());
    Ok(request_id)
}

pub fn resolve_metrics(
    env: &Env,
    gateway: &Address,
    request_id: u64,
    plaintexts: Vec<u64>,
    proof: BytesN<32>,
) -> Result<DecryptedMetrics, LedgerError> {
    AccessPolicy::load(env)?.require_gateway(gateway)?;

    let mut pending = load_pending(env, request_id)?;
    let report_id = match pending.target {
        DecryptionTarget::Report(id) => id,
        DecryptionTarget::Market(_) => return Err(LedgerError::InvalidRequest),
    };
    if metrics::is_revealed(env, report_id)? {
        log!(env, "replayed reveal for report", report_id, request_id);
        return Err(LedgerError::AlreadyRevealed);
    }
    if plaintexts.len() != crate::types::FIELD_COUNT {
        return Err(LedgerError::InvalidPlaintexts);
    }

    let coprocessor = service::client(env)?;
    verify(env, &coprocessor, request_id, &plaintexts, &proof)?;

    let record = metrics::reveal(env, report_id, &plaintexts)?;
    registry::set_state(env, report_id, ReportState::Revealed);
    pending.resolved = true;
    store_pending(env, &pending);

    events::publish_metrics_decrypted(env, request_id, report_id);
    Ok(record)
}

// ── Market ratio ────────────────────────────────────────────────────────────

/// Requests decryption of the current epoch's market liquidity ratio.
pub fn request_market_ratio(env: &Env, regulator: &Address) -> Result<u64, LedgerError> {
    let snapshot = aggregation::load_snapshot(env)?;
    let ratio = snapshot.liquidity_ratio.ok_or(LedgerError::NotInitialized)?;
    if aggregation::market_result(env, snapshot.epoch)?.is_revealed {
        return Err(LedgerError::AlreadyRevealed);
    }

    let request_id = open(
        env,
        regulator,
        DecryptionTarget::Market(snapshot.epoch),
        vec![env, ratio],
    )?;

    events::publish_market_ratio_requested(env, request_id, snapshot.epoch);
    Ok(request_id)
}

/// Persists the revealed market ratio for the epoch the request was issued
/// against. Requests from an epoch superseded by a newer aggregation are
/// stale and refused.
pub fn resolve_market_ratio(
    env: &Env,
    gateway: &Address,
    request_id: u64,
    plaintexts: Vec<u64>,
    proof: BytesN<32>,
) -> Result<MarketRatioResult, LedgerError> {
    AccessPolicy::load(env)?.require_gateway(gateway)?;

    let mut pending = load_pending(env, request_id)?;
    let epoch = match pending.target {
        DecryptionTarget::Market(epoch) => epoch,
        DecryptionTarget::Report(_) => return Err(LedgerError::InvalidRequest),
    };
    if epoch != aggregation::load_snapshot(env)?.epoch {
        log!(env, "stale market ratio request", request_id, epoch);
        return Err(LedgerError::InvalidRequest);
    }

    let mut result = aggregation::market_result(env, epoch)?;
    if result.is_revealed {
        return Err(LedgerError::AlreadyRevealed);
    }
    let ratio = match (plaintexts.len(), plaintexts.get(0)) {
        (1, Some(value)) => value,
        _ => return Err(LedgerError::InvalidPlaintexts),
    };

    let coprocessor = service::client(env)?;
    verify(env, &coprocessor, request_id, &plaintexts, &proof)?;

    result.liquidity_ratio = ratio;
    result.is_revealed = true;
    result.revealed_at = env.ledger().timestamp();
    aggregation::store_market_result(env, &result);
    pending.resolved = true;
    store_pending(env, &pending);

    events::publish_market_ratio_decrypted(env, request_id, epoch);
    Ok(result)
}
