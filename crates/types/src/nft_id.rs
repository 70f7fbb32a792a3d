//! Identifiers of individual non-fungible tokens.

use std::{fmt, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{
    checksum::ValidateChecksums,
    entity_id::{TokenId, parse_decimal},
    error::{LedgerError, Result},
    ledger_id::LedgerId,
};

/// A single NFT: a token id and a serial number.
///
/// Parsed from `token/serial` or `token@serial`; always displayed with `/`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct NftId {
    /// The NFT's token type.
    pub token_id: TokenId,
    /// Serial number within the token type.
    pub serial: u64,
}

impl NftId {
    /// Creates an NFT id.
    #[must_use]
    pub const fn new(token_id: TokenId, serial: u64) -> Self {
        Self { token_id, serial }
    }

    /// Formats the id with the token checksum for `ledger_id`.
    #[must_use]
    pub fn to_string_with_checksum(&self, ledger_id: &LedgerId) -> String {
        format!("{}/{}", self.token_id.to_string_with_checksum(ledger_id), self.serial)
    }
}

impl TokenId {
    /// The NFT with `serial` of this token.
    #[must_use]
    pub const fn nft(self, serial: u64) -> NftId {
        NftId::new(self, serial)
    }
}

impl From<(TokenId, u64)> for NftId {
    fn from((token_id, serial): (TokenId, u64)) -> Self {
        Self::new(token_id, serial)
    }
}

impl fmt::Debug for NftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NftId(\"{self}\")")
    }
}

impl fmt::Display for NftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.token_id, self.serial)
    }
}

impl FromStr for NftId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let (token, serial) = s
            .rsplit_once(['/', '@'])
            .ok_or_else(|| LedgerError::parse(s, "expected `token/serial` or `token@serial`"))?;
        let serial = parse_decimal(s, serial)?;
        Ok(Self { token_id: token.parse()?, serial })
    }
}

impl ValidateChecksums for NftId {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.token_id.validate_checksums(ledger_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slash_and_at_forms() {
        let expected = NftId::new(TokenId::new(1415, 314, 123), 456);
        assert_eq!("1415.314.123/456".parse::<NftId>().unwrap(), expected);
        assert_eq!("1415.314.123@456".parse::<NftId>().unwrap(), expected);
    }

    #[test]
    fn test_display_always_uses_slash() {
        let id: NftId = "1415.314.123@456".parse().unwrap();
        assert_eq!(id.to_string(), "1415.314.123/456");
    }

    #[test]
    fn test_parse_with_token_checksum() {
        let id: NftId = "1415.314.123-srwyb/456".parse().unwrap();
        id.validate_checksums(&LedgerId::MAINNET).unwrap();
        assert!(id.validate_checksums(&LedgerId::TESTNET).is_err());
        assert_eq!(id.to_string(), "1415.314.123-srwyb/456");
    }

    #[test]
    fn test_to_string_with_checksum() {
        let id = TokenId::new(1415, 314, 123).nft(456);
        assert_eq!(id.to_string_with_checksum(&LedgerId::TESTNET), "1415.314.123-cfifk/456");
    }

    #[test]
    fn test_parse_rejects_missing_serial() {
        for input in ["1415.314.123", "1415.314.123/", "1415.314.123/x", "/5", "0.0.5/+7"] {
            assert!(input.parse::<NftId>().is_err(), "{input} should not parse");
        }
    }
}
