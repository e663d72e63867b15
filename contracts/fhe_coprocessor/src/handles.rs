//! Ciphertext handle registry.
//!
//! A handle is an opaque 32-byte reference. The reference coprocessor keeps
//! the value behind each handle in its own storage (a shadow plaintext) and
//! enforces a per-handle access list the way FHE coprocessors do: only
//! accounts on a handle's list may compute on it, decrypt it, or share it.

use soroban_sdk::{symbol_short, Address, Bytes, BytesN, Env, Symbol};

use crate::CoprocessorError;
use common::ttl;

const HANDLE_CTR: Symbol = symbol_short!("HND_CTR");
const SHADOW: Symbol = symbol_short!("CT");
const ACL: Symbol = symbol_short!("ACL");

const HANDLE_DOMAIN: &[u8] = b"fhe-coprocessor/handle/v1";

fn shadow_key(handle: &BytesN<32>) -> (Symbol, BytesN<32>) {
    (SHADOW, handle.clone())
}

fn acl_key(handle: &BytesN<32>, account: &Address) -> (Symbol, BytesN<32>, Address) {
    (ACL, handle.clone(), account.clone())
}

/// Allocates a fresh handle for `value` and grants `owner` access to it.
pub fn create(env: &Env, owner: &Address, value: u64) -> BytesN<32> {
    let seq: u64 = env
        .storage()
        .instance()
        .get(&HANDLE_CTR)
        .unwrap_or(0u64)
        .saturating_add(1);
    env.storage().instance().set(&HANDLE_CTR, &seq);

    let mut preimage = Bytes::from_slice(env, HANDLE_DOMAIN);
    preimage.extend_from_array(&seq.to_be_bytes());
    let handle: BytesN<32> = env.crypto().sha256(&preimage).into();

    let key = shadow_key(&handle);
    env.storage().persistent().set(&key, &value);
    ttl::extend_persistent(env, &key);
    grant(env, &handle, owner);

    handle
}

/// Reads the value behind a handle.
pub fn value_of(env: &Env, handle: &BytesN<32>) -> Result<u64, CoprocessorError> {
    env.storage()
        .persistent()
        .get(&shadow_key(handle))
        .ok_or(CoprocessorError::UnknownHandle)
}

pub fn grant(env: &Env, handle: &BytesN<32>, account: &Address) {
    let key = acl_key(handle, account);
    env.storage().persistent().set(&key, &true);
    ttl::extend_persistent(env, &key);
}

pub fn is_allowed(env: &Env, handle: &BytesN<32>, account: &Address) -> bool {
    env.storage()
        .persistent()
        .get(&acl_key(handle, account))
        .unwrap_or(false)
}

/// Resolves a handle the caller is entitled to use.
pub fn require_access(
    env: &Env,
    handle: &BytesN<32>,
    account: &Address,
) -> Result<u64, CoprocessorError> {
    let value = value_of(env, handle)?;
    if !is_allowed(env, handle, account) {
        return Err(CoprocessorError::AccessDenied);
    }
    Ok(value)
}

/// Unsigned division with TFHE semantics: truncates toward zero and yields
/// `u64::MAX` for a zero divisor instead of trapping.
pub fn divide(lhs: u64, rhs: u64) -> u64 {
    lhs.checked_div(rhs).unwrap_or(u64::MAX)
}
