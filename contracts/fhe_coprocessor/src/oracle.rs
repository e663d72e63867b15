//! Asynchronous decryption requests and their gateway attestations.
//!
//! A request freezes the list of handles to decrypt. The gateway later
//! attests it, producing the plaintexts plus a proof binding them to the
//! request id. `verify` accepts a (plaintexts, proof) pair only if it is the
//! exact pair the gateway attested.

use soroban_sdk::{contracttype, symbol_short, Address, Bytes, BytesN, Env, Symbol, Vec};

use crate::handles;
use crate::CoprocessorError;
use common::ttl;

const REQ_CTR: Symbol = symbol_short!("REQ_CTR");
const REQUEST: Symbol = symbol_short!("REQ");

const PROOF_DOMAIN: &[u8] = b"fhe-coprocessor/decryption/v1";

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecryptionRequest {
    pub id: u64,
    pub requester: Address,
    pub handles: Vec<BytesN<32>>,
    pub requested_at: u64,
    /// Proof digest recorded once the gateway has attested the request.
    pub attestation: Option<BytesN<32>>,
}

/// Plaintexts and proof handed to the requester's callback.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attestation {
    pub request_id: u64,
    pub plaintexts: Vec<u64>,
    pub proof: BytesN<32>,
}

fn request_key(id: u64) -> (Symbol, u64) {
    (REQUEST, id)
}

pub fn open(
    env: &Env,
    requester: &Address,
    targets: Vec<BytesN<32>>,
) -> Result<u64, CoprocessorError> {
    if targets.is_empty() {
        return Err(CoprocessorError::EmptyRequest);
    }
    for handle in targets.iter() {
        handles::require_access(env, &handle, requester)?;
    }

    let id: u64 = env
        .storage()
        .instance()
        .get(&REQ_CTR)
        .unwrap_or(0u64)
        .saturating_add(1);
    env.storage().instance().set(&REQ_CTR, &id);

    let request = DecryptionRequest {
        id,
        requester: requester.clone(),
        handles: targets,
        requested_at: env.ledger().timestamp(),
        attestation: None,
    };
    store(env, &request);
    Ok(id)
}

pub fn load(env: &Env, id: u64) -> Result<DecryptionRequest, CoprocessorError> {
    env.storage()
        .persistent()
        .get(&request_key(id))
        .ok_or(CoprocessorError::UnknownRequest)
}

fn store(env: &Env, request: &DecryptionRequest) {
    let key = request_key(request.id);
    env.storage().persistent().set(&key, request);
    ttl::extend_persistent(env, &key);
}

/// Decrypts every handle of the request in order and records the proof.
pub fn attest(env: &Env, id: u64) -> Result<Attestation, CoprocessorError> {
    let mut request = load(env, id)?;

    let mut plaintexts = Vec::new(env);
    for handle in request.handles.iter() {
        plaintexts.push_back(handles::value_of(env, &handle)?);
    }
    let proof = digest(env, id, &plaintexts);

    request.attestation = Some(proof.clone());
    store(env, &request);

    Ok(Attestation {
        request_id: id,
        plaintexts,
        proof,
    })
}

pub fn verify(env: &Env, id: u64, plaintexts: &Vec<u64>, proof: &BytesN<32>) -> bool {
    let request = match load(env, id) {
        Ok(r) => r,
        Err(_) => return false,
    };
    match request.attestation {
        Some(attested) => attested == *proof && digest(env, id, plaintexts) == *proof,
        None => false,
    }
}

fn digest(env: &Env, id: u64, plaintexts: &Vec<u64>) -> BytesN<32> {
    let mut preimage = Bytes::from_slice(env, PROOF_DOMAIN);
    preimage.extend_from_array(&id.to_be_bytes());
    preimage.extend_from_array(&plaintexts.len().to_be_bytes());
    for value in plaintexts.iter() {
        preimage.extend_from_array(&value.to_be_bytes());
    }
    env.crypto().sha256(&preimage).into()
}
