//! Ed25519 and ECDSA(secp256k1) private keys.

use std::{fmt, str::FromStr, sync::Arc};

use ed25519_dalek::Signer as _;
use k256::ecdsa::signature::DigestSigner as _;
use rand::rngs::OsRng;
use sha3::{Digest, Keccak256};

use super::public_key::{KeyKind, PublicKey};
use crate::error::{LedgerError, Result};

const ED25519_PKCS8_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04, 0x20,
];

const ECDSA_SECP256K1_PKCS8_PREFIX: [u8; 18] = [
    0x30, 0x30, 0x02, 0x01, 0x00, 0x30, 0x07, 0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x0a, 0x04, 0x22,
    0x04, 0x20,
];

enum Material {
    Ed25519(ed25519_dalek::SigningKey),
    Ecdsa(k256::ecdsa::SigningKey),
}

/// A private key.
///
/// Like [`PublicKey`], the secret is reference counted: clones share it, and
/// both signing key types wipe their bytes when the last clone drops. `Debug`
/// only shows the public half.
#[derive(Clone)]
pub struct PrivateKey(Arc<Material>);

impl PrivateKey {
    fn ed25519(key: ed25519_dalek::SigningKey) -> Self {
        Self(Arc::new(Material::Ed25519(key)))
    }

    fn ecdsa(key: k256::ecdsa::SigningKey) -> Self {
        Self(Arc::new(Material::Ecdsa(key)))
    }

    /// Generates a new Ed25519 key from the operating system's RNG.
    #[must_use]
    pub fn generate_ed25519() -> Self {
        Self::ed25519(ed25519_dalek::SigningKey::generate(&mut OsRng))
    }

    /// Generates a new ECDSA(secp256k1) key from the operating system's RNG.
    #[must_use]
    pub fn generate_ecdsa() -> Self {
        Self::ecdsa(k256::ecdsa::SigningKey::random(&mut OsRng))
    }

    /// Decodes a key: 32 bytes are a raw Ed25519 key, anything else DER.
    ///
    /// Raw secp256k1 scalars are also 32 bytes, so they need
    /// [`Self::from_bytes_ecdsa`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyParse`] if the bytes are not a valid key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            32 | 64 => Self::from_bytes_ed25519(bytes),
            _ => Self::from_bytes_der(bytes),
        }
    }

    /// Decodes an Ed25519 key from its 32-byte seed, a 64-byte keypair or DER.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyParse`] if the bytes are not an Ed25519 key.
    pub fn from_bytes_ed25519(bytes: &[u8]) -> Result<Self> {
        if let Ok(seed) = <&[u8; 32]>::try_from(bytes) {
            return Ok(Self::ed25519(ed25519_dalek::SigningKey::from_bytes(seed)));
        }
        if let Ok(keypair) = <&[u8; 64]>::try_from(bytes) {
            return ed25519_dalek::SigningKey::from_keypair_bytes(keypair)
                .map(Self::ed25519)
                .map_err(|e| key_parse(format!("invalid ed25519 keypair: {e}")));
        }
        let key = Self::from_bytes_der(bytes)?;
        if !key.is_ed25519() {
            return Err(key_parse("expected an ed25519 key, found ecdsa"));
        }
        Ok(key)
    }

    /// Decodes an ECDSA(secp256k1) key from its 32-byte scalar or DER.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyParse`] if the bytes are not a secp256k1 key.
    pub fn from_bytes_ecdsa(bytes: &[u8]) -> Result<Self> {
        if bytes.len() == 32 {
            return k256::ecdsa::SigningKey::from_slice(bytes)
                .map(Self::ecdsa)
                .map_err(|e| key_parse(format!("invalid ecdsa key: {e}")));
        }
        let key = Self::from_bytes_der(bytes)?;
        if !key.is_ecdsa() {
            return Err(key_parse("expected an ecdsa key, found ed25519"));
        }
        Ok(key)
    }

    /// Decodes a DER private key.
    ///
    /// Accepts the short PKCS#8 forms [`Self::to_bytes_der`] writes, standard
    /// PKCS#8 for either algorithm and SEC1 `ECPrivateKey`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyParse`] if the structure or algorithm is not supported.
    pub fn from_bytes_der(bytes: &[u8]) -> Result<Self> {
        if let Some(seed) = bytes.strip_prefix(&ED25519_PKCS8_PREFIX[..]) {
            if let Ok(seed) = <&[u8; 32]>::try_from(seed) {
                return Ok(Self::ed25519(ed25519_dalek::SigningKey::from_bytes(seed)));
            }
        }
        if let Some(scalar) = bytes.strip_prefix(&ECDSA_SECP256K1_PKCS8_PREFIX[..]) {
            return Self::from_bytes_ecdsa(scalar);
        }
        if let Ok(key) =
            <ed25519_dalek::SigningKey as ed25519_dalek::pkcs8::DecodePrivateKey>::from_pkcs8_der(bytes)
        {
            return Ok(Self::ed25519(key));
        }
        if let Ok(key) = <k256::ecdsa::SigningKey as k256::pkcs8::DecodePrivateKey>::from_pkcs8_der(bytes) {
            return Ok(Self::ecdsa(key));
        }
        k256::SecretKey::from_sec1_der(bytes)
            .map(|key| Self::ecdsa(k256::ecdsa::SigningKey::from(key)))
            .map_err(|e| key_parse(format!("unsupported DER private key: {e}")))
    }

    /// Parses a DER key from hex.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyParse`] on invalid hex or key.
    pub fn from_str_der(s: &str) -> Result<Self> {
        Self::from_bytes_der(&decode_hex(s)?)
    }

    /// Parses an Ed25519 key (seed, keypair or DER) from hex.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyParse`] on invalid hex or key.
    pub fn from_str_ed25519(s: &str) -> Result<Self> {
        Self::from_bytes_ed25519(&decode_hex(s)?)
    }

    /// Parses an ECDSA key (scalar or DER) from hex.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyParse`] on invalid hex or key.
    pub fn from_str_ecdsa(s: &str) -> Result<Self> {
        Self::from_bytes_ecdsa(&decode_hex(s)?)
    }

    /// Algorithm of this key.
    #[must_use]
    pub fn kind(&self) -> KeyKind {
        match &*self.0 {
            Material::Ed25519(_) => KeyKind::Ed25519,
            Material::Ecdsa(_) => KeyKind::Ecdsa,
        }
    }

    /// Returns `true` for Ed25519 keys.
    #[must_use]
    pub fn is_ed25519(&self) -> bool {
        self.kind() == KeyKind::Ed25519
    }

    /// Returns `true` for ECDSA keys.
    #[must_use]
    pub fn is_ecdsa(&self) -> bool {
        self.kind() == KeyKind::Ecdsa
    }

    /// Public key matching this private key.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        match &*self.0 {
            Material::Ed25519(key) => PublicKey::from(key.verifying_key()),
            Material::Ecdsa(key) => PublicKey::from(k256::ecdsa::VerifyingKey::from(key)),
        }
    }

    /// Signs `message`, returning a 64-byte signature.
    ///
    /// ECDSA signs the Keccak-256 digest of the message, which is what
    /// [`PublicKey::verify`] checks.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        match &*self.0 {
            Material::Ed25519(key) => key.sign(message).to_bytes().to_vec(),
            Material::Ecdsa(key) => {
                let signature: k256::ecdsa::Signature = key.sign_digest(Keccak256::new_with_prefix(message));
                signature.to_bytes().to_vec()
            },
        }
    }

    /// The 32-byte Ed25519 seed or secp256k1 scalar.
    #[must_use]
    pub fn to_bytes_raw(&self) -> Vec<u8> {
        match &*self.0 {
            Material::Ed25519(key) => key.to_bytes().to_vec(),
            Material::Ecdsa(key) => key.to_bytes().to_vec(),
        }
    }

    /// Short PKCS#8 encoding: the algorithm identifier followed by the raw key.
    #[must_use]
    pub fn to_bytes_der(&self) -> Vec<u8> {
        let prefix: &[u8] = match self.kind() {
            KeyKind::Ed25519 => &ED25519_PKCS8_PREFIX,
            KeyKind::Ecdsa => &ECDSA_SECP256K1_PKCS8_PREFIX,
        };
        let mut bytes = prefix.to_vec();
        bytes.extend_from_slice(&self.to_bytes_raw());
        bytes
    }

    /// Raw bytes for Ed25519, DER for ECDSA.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        match self.kind() {
            KeyKind::Ed25519 => self.to_bytes_raw(),
            KeyKind::Ecdsa => self.to_bytes_der(),
        }
    }

    /// Hex of [`Self::to_bytes_der`].
    #[must_use]
    pub fn to_string_der(&self) -> String {
        hex::encode(self.to_bytes_der())
    }

    /// Hex of [`Self::to_bytes_raw`].
    #[must_use]
    pub fn to_string_raw(&self) -> String {
        hex::encode(self.to_bytes_raw())
    }
}

impl From<ed25519_dalek::SigningKey> for PrivateKey {
    fn from(key: ed25519_dalek::SigningKey) -> Self {
        Self::ed25519(key)
    }
}

impl From<k256::ecdsa::SigningKey> for PrivateKey {
    fn from(key: k256::ecdsa::SigningKey) -> Self {
        Self::ecdsa(key)
    }
}

fn key_parse(reason: impl Into<String>) -> LedgerError {
    LedgerError::KeyParse { reason: reason.into() }
}

fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| key_parse(format!("invalid hex: {e}")))
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").field("public_key", &self.public_key()).finish_non_exhaustive()
    }
}

/// DER hex.
impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_der())
    }
}

impl FromStr for PrivateKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_bytes(&decode_hex(s)?)
    }
}
