//! Plaintext reveal records, one per report.

use common::ttl;
use soroban_sdk::{symbol_short, Env, Symbol, Vec};

use crate::types::{DecryptedMetrics, FIELD_COUNT};
use crate::LedgerError;

const METRICS: Symbol = symbol_short!("METRICS");

fn metrics_key(report_id: u64) -> (Symbol, u64) {
    (METRICS, report_id)
}

/// Creates the unrevealed stub that accompanies a freshly submitted report.
pub fn create_stub(env: &Env, report_id: u64) {
    let stub = DecryptedMetrics {
        report_id,
        liquid_assets: 0,
        total_assets: 0,
        current_liabilities: 0,
        total_liabilities: 0,
        net_capital: 0,
        is_revealed: false,
        revealed_at: 0,
    };
    let key = metrics_key(report_id);
    env.storage().persistent().set(&key, &stub);
    ttl::extend_persistent(env, &key);
}

pub fn load(env: &Env, report_id: u64) -> Result<DecryptedMetrics, LedgerError> {
    env.storage()
        .persistent()
        .get(&metrics_key(report_id))
        .ok_or(LedgerError::ReportNotFound)
}

pub fn is_revealed(env: &Env, report_id: u64) -> Result<bool, LedgerError> {
    Ok(load(env, report_id)?.is_revealed)
}

/// Writes verified plaintexts into the record and flips `is_revealed`.
///
/// Plaintexts arrive in the order of `EncryptedFields::to_vec`. A record is
/// written at most once.
pub fn reveal(
    env: &Env,
    report_id: u64,
    plaintexts: &Vec<u64>,
) -> Result<DecryptedMetrics, LedgerError> {
    let mut record = load(env, report_id)?;
    if record.is_revealed {
        return Err(LedgerError::AlreadyRevealed);
    }
    if plaintexts.len() != FIELD_COUNT {
        return Err(LedgerError::InvalidPlaintexts);
    }

    let field = |i: u32| plaintexts.get(i).ok_or(LedgerError::InvalidPlaintexts);
    record.liquid_assets = field(0)?;
    record.total_assets = field(1)?;
    record.current_liabilities = field(2)?;
    record.total_liabilities = field(3)?;
    record.net_capital = field(4)?;
    record.is_revealed = true;
    record.revealed_at = env.ledger().timestamp();

    let key = metrics_key(report_id);
    env.storage().persistent().set(&key, &record);
    ttl::extend_persistent(env, &key);
    Ok(record)
}
