//! Client side of the ciphertext service the ledger depends on.
//!
//! Any contract exposing these entry points can back the ledger; the
//! `fhe_coprocessor` crate is the reference implementation.

use soroban_sdk::{symbol_short, Address, BytesN, Env, Symbol, Vec};

use crate::LedgerError;

pub(crate) const COPROCESSOR: Symbol = symbol_short!("COPROC");

#[soroban_sdk::contractclient(name = "CoprocessorClient")]
#[allow(dead_code)]
pub trait CoprocessorInterface {
    fn trivial_encrypt(env: Env, caller: Address, value: u64) -> BytesN<32>;
    fn allow(env: Env, owner: Address, handle: BytesN<32>, grantee: Address);
    fn is_allowed(env: Env, handle: BytesN<32>, account: Address) -> bool;
    fn add(env: Env, caller: Address, a: BytesN<32>, b: BytesN<32>) -> BytesN<32>;
    fn div(env: Env, caller: Address, a: BytesN<32>, b: BytesN<32>) -> BytesN<32>;
    fn request_decryption(env: Env, caller: Address, targets: Vec<BytesN<32>>) -> u64;
    fn verify_proof(env: Env, request_id: u64, plaintexts: Vec<u64>, proof: BytesN<32>) -> bool;
}

pub fn client(env: &Env) -> Result<CoprocessorClient<'_>, LedgerError> {
    let address: Address = env
        .storage()
        .instance()
        .get(&COPROCESSOR)
        .ok_or(LedgerError::NotInitialized)?;
    Ok(CoprocessorClient::new(env, &address))
}
