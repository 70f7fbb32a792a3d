//! Network identity that checksums and transaction ids are scoped to.

use std::{borrow::Cow, fmt, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{
    error::{LedgerError, Result},
};

/// Identifies a ledger network.
///
/// The three public networks have one-byte ids and are displayed by name;
/// any other id is displayed and parsed as hex.
#[derive(Clone, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct LedgerId(Cow<'static, [u8]>);

impl LedgerId {
    /// Public mainnet, `[0]`.
    pub const MAINNET: Self = Self(Cow::Borrowed(&[0]));
    /// Public testnet, `[1]`.
    pub const TESTNET: Self = Self(Cow::Borrowed(&[1]));
    /// Public previewnet, `[2]`.
    pub const PREVIEWNET: Self = Self(Cow::Borrowed(&[2]));

    /// Creates a ledger id from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Cow::Owned(bytes.into()))
    }

    /// Raw id bytes, as fed into checksum generation.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns `true` for mainnet.
    #[must_use]
    pub fn is_mainnet(&self) -> bool {
        *self == Self::MAINNET
    }

    /// Returns `true` for testnet.
    #[must_use]
    pub fn is_testnet(&self) -> bool {
        *self == Self::TESTNET
    }

    /// Returns `true` for previewnet.
    #[must_use]
    pub fn is_previewnet(&self) -> bool {
        *self == Self::PREVIEWNET
    }

    fn name(&self) -> Option<&'static str> {
        match self.as_bytes() {
            [0] => Some("mainnet"),
            [1] => Some("testnet"),
            [2] => Some("previewnet"),
            _ => None,
        }
    }
}

impl fmt::Debug for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LedgerId(\"{self}\")")
    }
}

impl fmt::Display for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => f.write_str(&hex::encode(self.as_bytes())),
        }
    }
}

impl FromStr for LedgerId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mainnet" => Ok(Self::MAINNET),
            "testnet" => Ok(Self::TESTNET),
            "previewnet" => Ok(Self::PREVIEWNET),
            _ => {
                let bytes = hex::decode(s).map_err(|e| LedgerError::parse(s, e.to_string()))?;
                if bytes.is_empty() {
                    return Err(LedgerError::parse(s, "ledger id must not be empty"));
                }
                Ok(Self::from_bytes(bytes))
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_named_networks_display_and_parse() {
        for (id, name) in [
            (LedgerId::MAINNET, "mainnet"),
            (LedgerId::TESTNET, "testnet"),
            (LedgerId::PREVIEWNET, "previewnet"),
        ] {
            assert_eq!(id.to_string(), name);
            assert_eq!(name.parse::<LedgerId>().unwrap(), id);
        }
    }

    #[test]
    fn test_known_bytes_equal_named_constant() {
        assert_eq!(LedgerId::from_bytes(vec![1]), LedgerId::TESTNET);
        assert!(LedgerId::from_bytes(vec![2]).is_previewnet());
    }

    #[test]
    fn test_custom_ledger_displays_hex() {
        let id: LedgerId = "00ff00ff".parse().unwrap();
        assert_eq!(id.as_bytes(), &[0x00, 0xff, 0x00, 0xff]);
        assert_eq!(id.to_string(), "00ff00ff");
        assert!(!id.is_mainnet());
    }

    #[test]
    fn test_invalid_ledger_id_rejected() {
        assert!("devnet".parse::<LedgerId>().is_err());
        assert!("".parse::<LedgerId>().is_err());
    }

    #[test]
    fn test_serde_uses_string_form() {
        assert_eq!(serde_json::to_string(&LedgerId::MAINNET).unwrap(), r#""mainnet""#);
        let id: LedgerId = serde_json::from_str(r#""0a0b""#).unwrap();
        assert_eq!(id.as_bytes(), &[0x0a, 0x0b]);
    }
}
