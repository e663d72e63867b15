//! Role and ownership checks.
//!
//! Every gated entry point takes the acting identity as an explicit
//! parameter. The identity must authorize the call and then match the role
//! recorded in instance storage.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::types::EncryptedBalanceSheet;
use crate::LedgerError;

pub(crate) const ADMIN: Symbol = symbol_short!("ADMIN");
pub(crate) const REGULATOR: Symbol = symbol_short!("REGULATOR");
pub(crate) const GATEWAY: Symbol = symbol_short!("GATEWAY");

/// Role holders, loaded fresh for each call.
pub struct AccessPolicy {
    pub admin: Address,
    pub regulator: Address,
    pub gateway: Address,
}

impl AccessPolicy {
    pub fn load(env: &Env) -> Result<Self, LedgerError> {
        let storage = env.storage().instance();
        Ok(Self {
            admin: storage.get(&ADMIN).ok_or(LedgerError::NotInitialized)?,
            regulator: storage.get(&REGULATOR).ok_or(LedgerError::NotInitialized)?,
            gateway: storage.get(&GATEWAY).ok_or(LedgerError::NotInitialized)?,
        })
    }

    pub fn require_admin(&self, caller: &Address) -> Result<(), LedgerError> {
        require_identity(caller, &self.admin)
    }

    pub fn require_regulator(&self, caller: &Address) -> Result<(), LedgerError> {
        require_identity(caller, &self.regulator)
    }

    /// Only the decryption gateway may deliver oracle callbacks.
    pub fn require_gateway(&self, caller: &Address) -> Result<(), LedgerError> {
        require_identity(caller, &self.gateway)
    }
}

/// Ownership check: only the submitting institution acts on its report.
pub fn require_owner(report: &EncryptedBalanceSheet, caller: &Address) -> Result<(), LedgerError> {
    require_identity(caller, &report.institution)
}

fn require_identity(caller: &Address, expected: &Address) -> Result<(), LedgerError> {
    caller.require_auth();
    if caller != expected {
        return Err(LedgerError::Unauthorized);
    }
    Ok(())
}
