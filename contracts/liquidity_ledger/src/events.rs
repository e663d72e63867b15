#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

/// Event published when the contract is initialized.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub regulator: Address,
    pub coprocessor: Address,
    pub gateway: Address,
    pub timestamp: u64,
}

/// Event published when an institution registers a new encrypted report.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReportSubmittedEvent {
    pub report_id: u64,
    pub institution: Address,
    pub timestamp: u64,
}

/// Event published when an institution asks for its report to be revealed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecryptionRequestedEvent {
    pub request_id: u64,
    pub report_id: u64,
    pub institution: Address,
    pub timestamp: u64,
}

/// Event published once a report's metrics become plaintext.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MetricsDecryptedEvent {
    pub request_id: u64,
    pub report_id: u64,
    pub timestamp: u64,
}

/// Event published when the regulator rebuilds the market snapshot.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AggregationCompletedEvent {
    pub epoch: u64,
    pub report_count: u64,
    pub regulator: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketRatioRequestedEvent {
    pub request_id: u64,
    pub epoch: u64,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MarketRatioDecryptedEvent {
    pub request_id: u64,
    pub epoch: u64,
    pub timestamp: u64,
}

/// Event published when the admin reassigns a role.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleUpdatedEvent {
    pub role: Symbol,
    pub previous: Address,
    pub current: Address,
    pub timestamp: u64,
}

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    regulator: Address,
    coprocessor: Address,
    gateway: Address,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            regulator,
            coprocessor,
            gateway,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_report_submitted(env: &Env, report_id: u64, institution: Address) {
    env.events().publish(
        (symbol_short!("SUBMIT"), institution.clone()),
        ReportSubmittedEvent {
            report_id,
            institution,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_decryption_requested(
    env: &Env,
    request_id: u64,
    report_id: u64,
    institution: Address,
) {
    env.events().publish(
        (symbol_short!("DEC_REQ"), institution.clone()),
        DecryptionRequestedEvent {
            request_id,
            report_id,
            institution,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_metrics_decrypted(env: &Env, request_id: u64, report_id: u64) {
    env.events().publish(
        (symbol_short!("REVEAL"), report_id),
        MetricsDecryptedEvent {
            request_id,
            report_id,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_aggregation_completed(env: &Env, epoch: u64, report_count: u64, regulator: Address) {
    env.events().publish(
        (symbol_short!("AGGR"), epoch),
        AggregationCompletedEvent {
            epoch,
            report_count,
            regulator,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_market_ratio_requested(env: &Env, request_id: u64, epoch: u64) {
    env.events().publish(
        (symbol_short!("MKT_REQ"), epoch),
        MarketRatioRequestedEvent {
            request_id,
            epoch,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_market_ratio_decrypted(env: &Env, request_id: u64, epoch: u64) {
    env.events().publish(
        (symbol_short!("MKT_RVL"), epoch),
        MarketRatioDecryptedEvent {
            request_id,
            epoch,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_role_updated(env: &Env, role: Symbol, previous: Address, current: Address) {
    env.events().publish(
        (symbol_short!("ROLE"), role.clone()),
        RoleUpdatedEvent {
            role,
            previous,
            current,
            timestamp: env.ledger().timestamp(),
        },
    );
}
