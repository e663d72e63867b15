//! Shared utilities and error types for the confidential ledger contracts.
//!
//! This crate provides:
//! - [`CommonError`]: error codes for guards shared by every contract.
//! - [`pausable`]: admin-controlled circuit breaker for state-mutating calls.
//! - [`ttl`]: storage lifetime constants and extension helpers.
//!
//! Contract-specific errors live in each contract crate and are converted
//! from [`CommonError`] where a shared guard is used.

#![no_std]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

use soroban_sdk::contracterror;

pub mod pausable;
pub mod ttl;

pub use pausable::*;
pub use ttl::*;

// ── Shared error enum ────────────────────────────────────────────────────────

/// Error codes raised by the shared guards.
///
/// Codes 40 to 49 are reserved for contract state guards.
#[contracterror]
#[derive(Clone, Debug, Eq, PartialEq, Copy)]
#[repr(u32)]
pub enum CommonError {
    /// The contract is currently paused and cannot process requests.
    Paused = 40,
}
