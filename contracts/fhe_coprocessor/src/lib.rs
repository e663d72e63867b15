//! Reference FHE coprocessor.
//!
//! Implements the ciphertext-handle service the confidential ledger consumes:
//! homomorphic `add` / `div` over opaque handles, per-handle access lists, and
//! the asynchronous decryption flow (`request_decryption` → gateway `attest`
//! → requester callback → `verify_proof`).
//!
//! Values behind handles are held as shadow plaintexts in contract storage.
//! This is a conformance and test double for the service interface, not a
//! confidential scheme.

#![no_std]

pub mod events;
pub mod handles;
pub mod oracle;


use soroban_sdk::{contract, contractimpl, symbol_short, Address, BytesN, Env, Symbol, Vec};

pub use oracle::{Attestation, DecryptionRequest};

const ADMIN: Symbol = symbol_short!("ADMIN");
const GATEWAY: Symbol = symbol_short!("GATEWAY");

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum CoprocessorError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    UnknownHandle = 4,
    AccessDenied = 5,
    UnknownRequest = 6,
    EmptyRequest = 7,
}

#[contract]
pub struct FheCoprocessorContract;

#[contractimpl]
impl FheCoprocessorContract {
    pub fn initialize(env: Env, admin: Address, gateway: Address) -> Result<(), CoprocessorError> {
        if env.storage().instance().has(&ADMIN) {
            return Err(CoprocessorError::AlreadyInitialized);
        }
        admin.require_auth();
        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&GATEWAY, &gateway);
        Ok(())
    }

    pub fn get_gateway(env: Env) -> Result<Address, CoprocessorError> {
        env.storage()
            .instance()
            .get(&GATEWAY)
            .ok_or(CoprocessorError::NotInitialized)
    }

    pub fn set_gateway(env: Env, caller: Address, gateway: Address) -> Result<(), CoprocessorError> {
        caller.require_auth();
        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(CoprocessorError::NotInitialized)?;
        if caller != admin {
            return Err(CoprocessorError::Unauthorized);
        }
        env.storage().instance().set(&GATEWAY, &gateway);
        Ok(())
    }

    // ── Inputs ───────────────────────────────────────────────────────────────

    /// Client-side encryption of a private input. The owner is the only
    /// account on the new handle's access list.
    pub fn encrypt(env: Env, owner: Address, value: u64) -> BytesN<32> {
        owner.require_auth();
        handles::create(&env, &owner, value)
    }

    /// Encrypts a public constant (e.g. the zero an accumulator starts from).
    pub fn trivial_encrypt(env: Env, caller: Address, value: u64) -> BytesN<32> {
        caller.require_auth();
        handles::create(&env, &caller, value)
    }

    // ── Access lists ─────────────────────────────────────────────────────────

    pub fn allow(
        env: Env,
        owner: Address,
        handle: BytesN<32>,
        grantee: Address,
    ) -> Result<(), CoprocessorError> {
        owner.require_auth();
        handles::require_access(&env, &handle, &owner)?;
        handles::grant(&env, &handle, &grantee);
        Ok(())
    }

    pub fn is_allowed(env: Env, handle: BytesN<32>, account: Address) -> bool {
        handles::is_allowed(&env, &handle, &account)
    }

    // ── Homomorphic arithmetic ───────────────────────────────────────────────

    /// `a + b`, wrapping modulo 2^64.
    pub fn add(
        env: Env,
        caller: Address,
        a: BytesN<32>,
        b: BytesN<32>,
    ) -> Result<BytesN<32>, CoprocessorError> {
        caller.require_auth();
        let lhs = handles::require_access(&env, &a, &caller)?;
        let rhs = handles::require_access(&env, &b, &caller)?;
        Ok(handles::create(&env, &caller, lhs.wrapping_add(rhs)))
    }

    /// `a / b`, truncating; a zero divisor yields `u64::MAX`.
    pub fn div(
        env: Env,
        caller: Address,
        a: BytesN<32>,
        b: BytesN<32>,
    ) -> Result<BytesN<32>, CoprocessorError> {
        caller.require_auth();
        let lhs = handles::require_access(&env, &a, &caller)?;
        let rhs = handles::require_access(&env, &b, &caller)?;
        Ok(handles::create(&env, &caller, handles::divide(lhs, rhs)))
    }

    // ── Decryption ───────────────────────────────────────────────────────────

    pub fn request_decryption(
        env: Env,
        caller: Address,
        targets: Vec<BytesN<32>>,
    ) -> Result<u64, CoprocessorError> {
        caller.require_auth();
        let count = targets.len();
        let request_id = oracle::open(&env, &caller, targets)?;
        events::publish_decryption_requested(&env, request_id, caller, count);
        Ok(request_id)
    }

    pub fn get_request(env: Env, request_id: u64) -> Result<DecryptionRequest, CoprocessorError> {
        oracle::load(&env, request_id)
    }

    /// Gateway step: decrypts the request and returns the payload the
    /// gateway forwards to the requester's callback.
    pub fn attest(
        env: Env,
        gateway: Address,
        request_id: u64,
    ) -> Result<Attestation, CoprocessorError> {
        gateway.require_auth();
        if gateway != Self::get_gateway(env.clone())? {
            return Err(CoprocessorError::Unauthorized);
        }
        let attestation = oracle::attest(&env, request_id)?;
        events::publish_decryption_attested(&env, request_id, gateway);
        Ok(attestation)
    }

    pub fn verify_proof(
        env: Env,
        request_id: u64,
        plaintexts: Vec<u64>,
        proof: BytesN<32>,
    ) -> bool {
        oracle::verify(&env, request_id, &plaintexts, &proof)
    }
}
