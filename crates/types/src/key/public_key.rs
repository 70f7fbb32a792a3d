//! Ed25519 and ECDSA(secp256k1) public keys.

use std::{fmt, hash, str::FromStr, sync::Arc};

use ed25519_dalek::Verifier as _;
use k256::{
    ecdsa::signature::hazmat::PrehashVerifier as _, elliptic_curve::sec1::ToEncodedPoint as _,
    pkcs8::DecodePublicKey as _,
};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use sha3::{Digest, Keccak256};

use crate::{
    account_id::AccountId,
    error::{LedgerError, Result},
    evm_address::EvmAddress,
};

const ED25519_DER_PREFIX: [u8; 12] = [
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00,
];

const ECDSA_SECP256K1_DER_PREFIX: [u8; 23] = [
    0x30, 0x36, 0x30, 0x10, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x05,
    0x2b, 0x81, 0x04, 0x00, 0x0a, 0x03, 0x22, 0x00,
];

/// Signature algorithm of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Ed25519.
    Ed25519,
    /// ECDSA over secp256k1.
    Ecdsa,
}

#[derive(Debug)]
enum Material {
    Ed25519(ed25519_dalek::VerifyingKey),
    Ecdsa(k256::ecdsa::VerifyingKey),
}

/// A public key.
///
/// Key material is reference counted: clones (including the ones held by
/// signers passed to the execution engine) share it, and it is released when
/// the last owner drops.
#[derive(Clone, SerializeDisplay, DeserializeFromStr)]
pub struct PublicKey(Arc<Material>);

impl PublicKey {
    fn ed25519(key: ed25519_dalek::VerifyingKey) -> Self {
        Self(Arc::new(Material::Ed25519(key)))
    }

    fn ecdsa(key: k256::ecdsa::VerifyingKey) -> Self {
        Self(Arc::new(Material::Ecdsa(key)))
    }

    /// Decodes a key, detecting the encoding from the length.
    ///
    /// 32 bytes are a raw Ed25519 key, 33 or 65 bytes a SEC1 ECDSA point;
    /// anything else is parsed as a DER `SubjectPublicKeyInfo`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyParse`] if the bytes are not a valid key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            32 => Self::from_bytes_ed25519(bytes),
            33 | 65 => Self::from_bytes_ecdsa(bytes),
            _ => Self::from_bytes_der(bytes),
        }
    }

    /// Decodes an Ed25519 key from raw (32 bytes) or DER form.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyParse`] if the bytes are not an Ed25519 key.
    pub fn from_bytes_ed25519(bytes: &[u8]) -> Result<Self> {
        if let Ok(raw) = <&[u8; 32]>::try_from(bytes) {
            return ed25519_dalek::VerifyingKey::from_bytes(raw)
                .map(Self::ed25519)
                .map_err(|e| key_parse(format!("invalid ed25519 key: {e}")));
        }
        let key = Self::from_bytes_der(bytes)?;
        if !key.is_ed25519() {
            return Err(key_parse("expected an ed25519 key, found ecdsa"));
        }
        Ok(key)
    }

    /// Decodes an ECDSA(secp256k1) key from SEC1 (33 or 65 bytes) or DER form.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyParse`] if the bytes are not a secp256k1 key.
    pub fn from_bytes_ecdsa(bytes: &[u8]) -> Result<Self> {
        if matches!(bytes.len(), 33 | 65) {
            return k256::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
                .map(Self::ecdsa)
                .map_err(|e| key_parse(format!("invalid ecdsa key: {e}")));
        }
        let key = Self::from_bytes_der(bytes)?;
        if !key.is_ecdsa() {
            return Err(key_parse("expected an ecdsa key, found ed25519"));
        }
        Ok(key)
    }

    /// Decodes a DER `SubjectPublicKeyInfo`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyParse`] if the structure or algorithm is not supported.
    pub fn from_bytes_der(bytes: &[u8]) -> Result<Self> {
        if let Ok(key) =
            <ed25519_dalek::VerifyingKey as ed25519_dalek::pkcs8::DecodePublicKey>::from_public_key_der(bytes)
        {
            return Ok(Self::ed25519(key));
        }
        k256::PublicKey::from_public_key_der(bytes)
            .map(|key| Self::ecdsa(k256::ecdsa::VerifyingKey::from(&key)))
            .map_err(|e| key_parse(format!("unsupported DER public key: {e}")))
    }

    /// Parses a DER key from hex.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyParse`] on invalid hex or key.
    pub fn from_str_der(s: &str) -> Result<Self> {
        Self::from_bytes_der(&decode_hex(s)?)
    }

    /// Parses an Ed25519 key (raw or DER) from hex.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyParse`] on invalid hex or key.
    pub fn from_str_ed25519(s: &str) -> Result<Self> {
        Self::from_bytes_ed25519(&decode_hex(s)?)
    }

    /// Parses an ECDSA key (SEC1 or DER) from hex.
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

    /// Raw key bytes: 32 for Ed25519, 33 (compressed point) for ECDSA.
    #[must_use]
    pub fn to_bytes_raw(&self) -> Vec<u8> {
        match &*self.0 {
            Material::Ed25519(key) => key.to_bytes().to_vec(),
            Material::Ecdsa(key) => key.to_encoded_point(true).as_bytes().to_vec(),
        }
    }

    /// Canonical DER `SubjectPublicKeyInfo`, ECDSA points compressed.
    #[must_use]
    pub fn to_bytes_der(&self) -> Vec<u8> {
        let prefix: &[u8] = match self.kind() {
            KeyKind::Ed25519 => &ED25519_DER_PREFIX,
            KeyKind::Ecdsa => &ECDSA_SECP256K1_DER_PREFIX,
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

    /// Verifies `signature` over `message`.
    ///
    /// ECDSA signatures are checked against the Keccak-256 digest of the
    /// message.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::SignatureVerify`] if the signature is malformed
    /// or does not match.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        let verified = match &*self.0 {
            Material::Ed25519(key) => ed25519_dalek::Signature::from_slice(signature)
                .and_then(|signature| key.verify(message, &signature))
                .map_err(|e| e.to_string()),
            Material::Ecdsa(key) => k256::ecdsa::Signature::from_slice(signature)
                .and_then(|signature| key.verify_prehash(&Keccak256::digest(message), &signature))
                .map_err(|e| e.to_string()),
        };
        verified.map_err(|reason| LedgerError::SignatureVerify { reason })
    }

    /// EVM address derived from an ECDSA key: the last 20 bytes of the
    /// Keccak-256 hash of the uncompressed point without its `0x04` tag.
    ///
    /// Ed25519 keys have no EVM address.
    #[must_use]
    pub fn to_evm_address(&self) -> Option<EvmAddress> {
        let Material::Ecdsa(key) = &*self.0 else {
            return None;
        };
        let point = key.to_encoded_point(false);
        let hash = Keccak256::digest(&point.as_bytes()[1..]);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[12..]);
        Some(EvmAddress::from(bytes))
    }

    /// Account id aliased to this key.
    #[must_use]
    pub fn to_account_id(&self, shard: u64, realm: u64) -> AccountId {
        AccountId::from_alias(shard, realm, self.clone())
    }
}

impl From<ed25519_dalek::VerifyingKey> for PublicKey {
    fn from(key: ed25519_dalek::VerifyingKey) -> Self {
        Self::ed25519(key)
    }
}

impl From<k256::ecdsa::VerifyingKey> for PublicKey {
    fn from(key: k256::ecdsa::VerifyingKey) -> Self {
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

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.to_bytes_raw() == other.to_bytes_raw()
    }
}

impl Eq for PublicKey {}

impl hash::Hash for PublicKey {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.to_bytes_raw().hash(state);
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey(\"{self}\")")
    }
}

/// DER hex.
impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_der())
    }
}

impl FromStr for PublicKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_bytes(&decode_hex(s)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use ed25519_dalek::Signer as _;
    use k256::ecdsa::signature::hazmat::PrehashSigner as _;

    use super::*;

    fn ed25519_signing() -> ed25519_dalek::SigningKey {
        ed25519_dalek::SigningKey::from_bytes(&[7u8; 32])
    }

    fn ecdsa_signing() -> k256::ecdsa::SigningKey {
        k256::ecdsa::SigningKey::from_slice(&[7u8; 32]).unwrap()
    }

    fn ed25519_key() -> PublicKey {
        PublicKey::from_bytes(ed25519_signing().verifying_key().as_bytes()).unwrap()
    }

    fn ecdsa_key() -> PublicKey {
        let point = ecdsa_signing().verifying_key().to_encoded_point(true);
        PublicKey::from_bytes(point.as_bytes()).unwrap()
    }

    #[test]
    fn test_from_bytes_detects_kind() {
        assert!(ed25519_key().is_ed25519());
        assert!(ecdsa_key().is_ecdsa());
    }

    #[test]
    fn test_ed25519_canonical_encodings() {
        let key = ed25519_key();
        assert_eq!(key.to_bytes().len(), 32);
        assert_eq!(key.to_bytes(), key.to_bytes_raw());
        let der = key.to_bytes_der();
        assert_eq!(&der[..12], &ED25519_DER_PREFIX);
        assert_eq!(PublicKey::from_bytes(&der).unwrap(), key);
        assert_eq!(PublicKey::from_bytes_ed25519(&der).unwrap(), key);
    }

    #[test]
    fn test_ecdsa_canonical_encodings() {
        let key = ecdsa_key();
        assert_eq!(key.to_bytes_raw().len(), 33);
        assert_eq!(key.to_bytes(), key.to_bytes_der());
        assert_eq!(&key.to_bytes_der()[..23], &ECDSA_SECP256K1_DER_PREFIX);
        assert_eq!(PublicKey::from_bytes(&key.to_bytes()).unwrap(), key);
    }

    #[test]
    fn test_ecdsa_uncompressed_input_is_canonicalized() {
        let uncompressed = ecdsa_signing().verifying_key().to_encoded_point(false);
        let key = PublicKey::from_bytes(uncompressed.as_bytes()).unwrap();
        assert_eq!(key, ecdsa_key());
        assert_eq!(key.to_bytes_raw().len(), 33);
    }

    #[test]
    fn test_string_round_trip_uses_der_hex() {
        for key in [ed25519_key(), ecdsa_key()] {
            let text = key.to_string();
            assert_eq!(text, key.to_string_der());
            assert_eq!(text.parse::<PublicKey>().unwrap(), key);
            assert_eq!(PublicKey::from_str_der(&format!("0x{text}")).unwrap(), key);
        }
    }

    #[test]
    fn test_random_keys_round_trip_der_text() {
        let mut rng = rand::rngs::OsRng;
        for _ in 0..16 {
            let ed = ed25519_dalek::SigningKey::generate(&mut rng);
            let ed = PublicKey::from_bytes(ed.verifying_key().as_bytes()).unwrap();
            assert_eq!(ed.to_string().parse::<PublicKey>().unwrap(), ed);

            let ec = k256::ecdsa::SigningKey::random(&mut rng);
            let ec = PublicKey::from_bytes(ec.verifying_key().to_encoded_point(true).as_bytes()).unwrap();
            assert_eq!(ec.to_string().parse::<PublicKey>().unwrap(), ec);
        }
    }

    #[test]
    fn test_typed_parsers_reject_other_kind() {
        let ed = ed25519_key();
        let ec = ecdsa_key();
        assert!(PublicKey::from_str_ecdsa(&ed.to_string_der()).is_err());
        assert!(PublicKey::from_str_ed25519(&ec.to_string_der()).is_err());
        assert_eq!(PublicKey::from_str_ed25519(&ed.to_string_raw()).unwrap(), ed);
        assert_eq!(PublicKey::from_str_ecdsa(&ec.to_string_raw()).unwrap(), ec);
    }

    #[test]
    fn test_garbage_is_key_parse_error() {
        let err = PublicKey::from_bytes(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, LedgerError::KeyParse { .. }));
        assert!("not-hex".parse::<PublicKey>().is_err());
    }

    #[test]
    fn test_verify_ed25519_signature() {
        let signing = ed25519_signing();
        let signature = signing.sign(b"hello");
        let key = ed25519_key();
        key.verify(b"hello", &signature.to_bytes()).unwrap();
        let err = key.verify(b"other", &signature.to_bytes()).unwrap_err();
        assert!(matches!(err, LedgerError::SignatureVerify { .. }));
    }

    #[test]
    fn test_verify_ecdsa_signature_over_keccak_digest() {
        let signing = ecdsa_signing();
        let digest = Keccak256::digest(b"hello");
        let signature: k256::ecdsa::Signature = signing.sign_prehash(&digest).unwrap();
        let key = ecdsa_key();
        key.verify(b"hello", &signature.to_bytes()).unwrap();
        assert!(key.verify(b"other", &signature.to_bytes()).is_err());
    }

    #[test]
    fn test_evm_address_only_for_ecdsa() {
        assert!(ed25519_key().to_evm_address().is_none());
        let address = ecdsa_key().to_evm_address().unwrap();
        assert_eq!(address.as_bytes().len(), 20);
    }

    #[test]
    fn test_clones_share_material() {
        let key = ed25519_key();
        let clone = key.clone();
        assert!(Arc::ptr_eq(&key.0, &clone.0));
        drop(key);
        assert!(clone.is_ed25519());
    }

    #[test]
    fn test_to_account_id_uses_alias() {
        let key = ed25519_key();
        let account = key.to_account_id(0, 0);
        assert_eq!(account.alias(), Some(&key));
        assert_eq!(account.num(), 0);
    }
}
