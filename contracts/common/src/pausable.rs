#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::CommonError;

const PAUSED: Symbol = symbol_short!("PAUSED");

/// Returns `true` when the contract is paused.
pub fn is_paused(env: &Env) -> bool {
    env.storage().instance().get(&PAUSED).unwrap_or(false)
}

/// Returns `CommonError::Paused` when the contract is paused.
///
/// Place this at the top of every state-mutating function that must honour
/// the pause. Decryption callbacks and view functions do not call it, so
/// requests already in flight can still settle.
pub fn require_not_paused(env: &Env) -> Result<(), CommonError> {
    if is_paused(env) {
        return Err(CommonError::Paused);
    }
    Ok(())
}

/// Pauses the contract and emits `("PAUSED", caller)`.
///
/// Callers enforce admin authorization before invoking this.
pub fn pause(env: &Env, caller: &Address) {
    env.storage().instance().set(&PAUSED, &true);
    env.events()
        .publish((symbol_short!("PAUSED"), caller.clone()), true);
}

/// Unpauses the contract and emits `("UNPAUSED", caller)`.
pub fn unpause(env: &Env, caller: &Address) {
    env.storage().instance().set(&PAUSED, &false);
    env.events()
        .publish((symbol_short!("UNPAUSED"), caller.clone()), false);
}
