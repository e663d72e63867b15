//! Append-only store of encrypted balance sheets.

use common::ttl;
use soroban_sdk::{symbol_short, Address, Env, Symbol, Vec};

use crate::service;
use crate::types::{EncryptedBalanceSheet, EncryptedFields, ReportState};
use crate::LedgerError;

pub(crate) const REPORT_CTR: Symbol = symbol_short!("RPT_CTR");
const REPORT: Symbol = symbol_short!("RPT");
const REPORT_STATE: Symbol = symbol_short!("RPT_ST");
const INSTITUTION: Symbol = symbol_short!("INST");

fn report_key(id: u64) -> (Symbol, u64) {
    (REPORT, id)
}

fn state_key(id: u64) -> (Symbol, u64) {
    (REPORT_STATE, id)
}

fn index_key(institution: &Address) -> (Symbol, Address) {
    (INSTITUTION, institution.clone())
}

pub fn count(env: &Env) -> u64 {
    env.storage().instance().get(&REPORT_CTR).unwrap_or(0)
}

/// Stores a new report under the next id and indexes it by submitter.
///
/// Both the submitter and the ledger must be on the access list of every
/// handle. The submitter check stops an institution from registering another
/// party's ciphertexts and then having the ledger decrypt them on its behalf.
pub fn register(
    env: &Env,
    institution: &Address,
    fields: EncryptedFields,
) -> Result<EncryptedBalanceSheet, LedgerError> {
    let coprocessor = service::client(env)?;
    let ledger = env.current_contract_address();
    for handle in fields.to_vec(env).iter() {
        if !coprocessor.is_allowed(&handle, institution) || !coprocessor.is_allowed(&handle, &ledger) {
            return Err(LedgerError::HandleNotAllowed);
        }
    }

    let id = count(env).saturating_add(1);
    env.storage().instance().set(&REPORT_CTR, &id);

    let report = EncryptedBalanceSheet {
        id,
        institution: institution.clone(),
        fields,
        timestamp: env.ledger().timestamp(),
    };
    let key = report_key(id);
    env.storage().persistent().set(&key, &report);
    ttl::extend_persistent(env, &key);

    set_state(env, id, ReportState::Submitted);

    let idx = index_key(institution);
    let mut ids = institution_reports(env, institution);
    ids.push_back(id);
    env.storage().persistent().set(&idx, &ids);
    ttl::extend_persistent(env, &idx);

    Ok(report)
}

pub fn load(env: &Env, id: u64) -> Result<EncryptedBalanceSheet, LedgerError> {
    env.storage()
        .persistent()
        .get(&report_key(id))
        .ok_or(LedgerError::ReportNotFound)
}

pub fn institution_reports(env: &Env, institution: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&index_key(institution))
        .unwrap_or(Vec::new(env))
}

pub fn state(env: &Env, id: u64) -> Result<ReportState, LedgerError> {
    env.storage()
        .persistent()
        .get(&state_key(id))
        .ok_or(LedgerError::ReportNotFound)
}

/// Moves a report along Submitted → DecryptionRequested → Revealed.
/// Revealed is terminal.
pub fn set_state(env: &Env, id: u64, next: ReportState) {
    let key = state_key(id);
    let current: Option<ReportState> = env.storage().persistent().get(&key);
    if current == Some(ReportState::Revealed) {
        return;
    }
    env.storage().persistent().set(&key, &next);
    ttl::extend_persistent(env, &key);
}
