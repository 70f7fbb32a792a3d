//! Shared test utilities for hgraph ledger crates.
//!
//! - [`strategies`] - proptest generators for identifiers, keys and transaction ids
//! - [`assert_eventually`] - poll a condition until it holds or a timeout expires
//! - [`ed25519_private_key`] / [`ecdsa_private_key`] - deterministic keys for tests

#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::disallowed_methods))]

pub mod strategies;

use hgraph_ledger_types::PrivateKey;

mod assertions;
pub use assertions::assert_eventually;

/// Deterministic Ed25519 private key derived from `seed`.
#[must_use]
pub fn ed25519_private_key(seed: u8) -> PrivateKey {
    match PrivateKey::from_bytes_ed25519(&[seed; 32]) {
        Ok(key) => key,
        Err(_) => unreachable!("every 32-byte seed is an ed25519 key"),
    }
}

/// Deterministic secp256k1 private key derived from `seed`.
///
/// A zero seed maps to 1 so the scalar is always valid.
#[must_use]
pub fn ecdsa_private_key(seed: u8) -> PrivateKey {
    let mut bytes = [0u8; 32];
    bytes[31] = seed.max(1);
    match PrivateKey::from_bytes_ecdsa(&bytes) {
        Ok(key) => key,
        Err(_) => unreachable!("scalars 1..=255 are below the curve order"),
    }
}
