#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{contracttype, symbol_short, Address, Env};

/// Fired when a decryption request is opened. The gateway watches for it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecryptionRequestedEvent {
    pub request_id: u64,
    pub requester: Address,
    pub handle_count: u32,
    pub timestamp: u64,
}

/// Fired when the gateway attests a request.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecryptionAttestedEvent {
    pub request_id: u64,
    pub gateway: Address,
    pub timestamp: u64,
}

pub fn publish_decryption_requested(
    env: &Env,
    request_id: u64,
    requester: Address,
    handle_count: u32,
) {
    env.events().publish(
        (symbol_short!("DEC_REQ"), requester.clone()),
        DecryptionRequestedEvent {
            request_id,
            requester,
            handle_count,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_decryption_attested(env: &Env, request_id: u64, gateway: Address) {
    env.events().publish(
        (symbol_short!("ATTEST"), request_id),
        DecryptionAttestedEvent {
            request_id,
            gateway,
            timestamp: env.ledger().timestamp(),
        },
    );
}
