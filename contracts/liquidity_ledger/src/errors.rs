use common::CommonError;

/// Ledger error codes. Codes are part of the contract ABI and must not be
/// renumbered.
#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum LedgerError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    AlreadyRevealed = 4,
    InvalidRequest = 5,
    ProofVerificationFailure = 6,
    ReportNotFound = 7,
    InvalidPlaintexts = 8,
    NoReports = 9,
    HandleNotAllowed = 10,
    Paused = 11,
}

impl From<CommonError> for LedgerError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::Paused => LedgerError::Paused,
        }
    }
}
