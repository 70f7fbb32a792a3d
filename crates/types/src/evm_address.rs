//! 20-byte EVM addresses.

use std::{fmt, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{
    error::{LedgerError, Result},
};

/// An EVM-compatible account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct EvmAddress([u8; 20]);

impl EvmAddress {
    /// Creates an address from exactly 20 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidArgument`] for any other length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 20] = bytes.try_into().map_err(|_| LedgerError::InvalidArgument {
            message: format!("evm address must be 20 bytes, got {}", bytes.len()),
        })?;
        Ok(Self(bytes))
    }

    /// The raw address bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase hex without `0x`, as used inside account ids.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; 20]> for EvmAddress {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EvmAddress(\"{self}\")")
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl FromStr for EvmAddress {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 40 {
            return Err(LedgerError::parse(s, "evm address must be 40 hex characters"));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|e| LedgerError::parse(s, e.to_string()))?;
        Ok(Self(bytes))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_prefix() {
        let text = "302a300506032b6570032100114e6abc371b82da";
        let bare: EvmAddress = text.parse().unwrap();
        let prefixed: EvmAddress = format!("0x{text}").parse().unwrap();
        assert_eq!(bare, prefixed);
        assert_eq!(bare.to_string(), format!("0x{text}"));
        assert_eq!(bare.to_hex(), text);
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!("0x1234".parse::<EvmAddress>().is_err());
        assert!(EvmAddress::from_bytes(&[0u8; 19]).is_err());
    }

    #[test]
    fn test_non_hex_rejected() {
        assert!("zz2a300506032b6570032100114e6abc371b82da".parse::<EvmAddress>().is_err());
    }
}
