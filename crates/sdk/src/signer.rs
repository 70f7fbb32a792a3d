//! Signer handles passed to the execution engine.

use std::{fmt, sync::Arc};

use hgraph_ledger_types::{PrivateKey, PublicKey};

type SignFn = dyn Fn(&[u8]) -> Vec<u8> + Send + Sync;

/// Produces signatures for one public key.
///
/// Cloning is cheap and shares both the key material and the signing
/// function, so a signer handed to the engine stays valid for as long as the
/// engine holds it.
#[derive(Clone)]
pub struct Signer {
    public_key: PublicKey,
    sign: Arc<SignFn>,
}

impl Signer {
    /// Creates a signer from a public key and a signing function.
    pub fn new<F>(public_key: PublicKey, sign: F) -> Self
    where
        F: Fn(&[u8]) -> Vec<u8> + Send + Sync + 'static,
    {
        Self { public_key, sign: Arc::new(sign) }
    }

    /// Signs with `key`. ECDSA keys sign the Keccak-256 digest of the message.
    #[must_use]
    pub fn private_key(key: PrivateKey) -> Self {
        Self::new(key.public_key(), move |message| key.sign(message))
    }

    /// Public key matching the signatures this signer produces.
    #[must_use]
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Signs `message`.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        (self.sign)(message)
    }
}

impl From<PrivateKey> for Signer {
    fn from(key: PrivateKey) -> Self {
        Self::private_key(key)
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer").field("public_key", &self.public_key).finish_non_exhaustive()
    }
}
