//! Account identifiers.
//!
//! Accounts are addressed by number (`shard.realm.num[-checksum]`), by an
//! alias public key (`shard.realm.<DER hex>`) or by an EVM address
//! (`shard.realm.<40 hex chars>`). When an alias or EVM address is present
//! `num` is 0 and not part of the identity. Checksums only apply to the
//! numeric form.

use std::{fmt, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{
    checksum::{self, Checksum, ValidateChecksums},
    entity_id::{self, parse_decimal, parse_entity},
    error::{LedgerError, Result},
    evm_address::EvmAddress,
    key::PublicKey,
    ledger_id::LedgerId,
};

/// Identifies an account.
///
/// Fields are only reachable through the constructors, so at most one of
/// alias and EVM address is set, and `num` and `checksum` are unset when
/// either is.
#[derive(Clone, PartialEq, Eq, Hash, Default, SerializeDisplay, DeserializeFromStr)]
pub struct AccountId {
    shard: u64,
    realm: u64,
    num: u64,
    alias: Option<PublicKey>,
    evm_address: Option<EvmAddress>,
    checksum: Option<Checksum>,
}

impl AccountId {
    /// Creates a numeric account id without a checksum.
    #[must_use]
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num, alias: None, evm_address: None, checksum: None }
    }

    /// Creates an account id aliased to `key`.
    #[must_use]
    pub fn from_alias(shard: u64, realm: u64, key: PublicKey) -> Self {
        Self { alias: Some(key), ..Self::new(shard, realm, 0) }
    }

    /// Creates an account id addressed by an EVM address.
    #[must_use]
    pub fn from_evm_address(shard: u64, realm: u64, address: EvmAddress) -> Self {
        Self { evm_address: Some(address), ..Self::new(shard, realm, 0) }
    }

    /// Attaches a checksum to a numeric id. Alias and EVM forms never carry
    /// one, so they are returned unchanged.
    #[must_use]
    pub fn with_checksum(mut self, checksum: Checksum) -> Self {
        if self.is_numeric() {
            self.checksum = Some(checksum);
        }
        self
    }

    /// Shard number.
    #[must_use]
    pub const fn shard(&self) -> u64 {
        self.shard
    }

    /// Realm number.
    #[must_use]
    pub const fn realm(&self) -> u64 {
        self.realm
    }

    /// Account number, 0 for alias and EVM forms.
    #[must_use]
    pub const fn num(&self) -> u64 {
        self.num
    }

    /// Public key the account is aliased to.
    #[must_use]
    pub const fn alias(&self) -> Option<&PublicKey> {
        self.alias.as_ref()
    }

    /// EVM address the account is addressed by.
    #[must_use]
    pub const fn evm_address(&self) -> Option<&EvmAddress> {
        self.evm_address.as_ref()
    }

    /// Checksum carried from the parsed string, if any.
    #[must_use]
    pub const fn checksum(&self) -> Option<Checksum> {
        self.checksum
    }

    /// Decodes a long-zero EVM address into a numeric account id.
    #[must_use]
    pub fn from_solidity_address(address: &EvmAddress) -> Self {
        let (shard, realm, num) = entity_id::from_solidity_address(address);
        Self::new(shard, realm, num)
    }

    /// EVM address of the account: its own EVM address when it has one,
    /// otherwise the long-zero encoding of the numeric id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidArgument`] for alias ids or shards wider than 32 bits.
    pub fn to_solidity_address(&self) -> Result<EvmAddress> {
        if let Some(address) = self.evm_address {
            return Ok(address);
        }
        if self.alias.is_some() {
            return Err(LedgerError::InvalidArgument {
                message: "alias account ids have no solidity address".to_string(),
            });
        }
        entity_id::to_solidity_address(self.shard, self.realm, self.num)
    }

    /// Returns `true` when the account is addressed by number.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.alias.is_none() && self.evm_address.is_none()
    }

    /// Formats the id with the checksum for `ledger_id` appended.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidArgument`] for alias and EVM forms,
    /// which never carry checksums.
    pub fn to_string_with_checksum(&self, ledger_id: &LedgerId) -> Result<String> {
        if !self.is_numeric() {
            return Err(LedgerError::InvalidArgument {
                message: format!("cannot derive a checksum for {self}"),
            });
        }
        let base = format!("{}.{}.{}", self.shard, self.realm, self.num);
        let checksum = Checksum::generate(&base, ledger_id);
        Ok(format!("{base}-{checksum}"))
    }

    /// Validates the carried checksum, if any, against `ledger_id`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ChecksumMismatch`] on mismatch.
    pub fn validate_checksum(&self, ledger_id: &LedgerId) -> Result<()> {
        checksum::validate(self.shard, self.realm, self.num, self.checksum, ledger_id)
    }
}

impl From<u64> for AccountId {
    fn from(num: u64) -> Self {
        Self::new(0, 0, num)
    }
}

impl From<PublicKey> for AccountId {
    fn from(key: PublicKey) -> Self {
        Self::from_alias(0, 0, key)
    }
}

impl From<EvmAddress> for AccountId {
    fn from(address: EvmAddress) -> Self {
        Self::from_evm_address(0, 0, address)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId(\"{self}\")")
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(alias) = &self.alias {
            return write!(f, "{}.{}.{alias}", self.shard, self.realm);
        }
        if let Some(address) = &self.evm_address {
            return write!(f, "{}.{}.{}", self.shard, self.realm, address.to_hex());
        }
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)?;
        if let Some(checksum) = &self.checksum {
            write!(f, "-{checksum}")?;
        }
        Ok(())
    }
}

impl FromStr for AccountId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        if let [shard, realm, last] = s.splitn(3, '.').collect::<Vec<_>>()[..] {
            let numeric = last
                .split('-')
                .next()
                .is_some_and(|n| !n.is_empty() && n.len() != 40 && n.bytes().all(|b| b.is_ascii_digit()));
            if !numeric {
                return parse_aliased(s, shard, realm, last);
            }
        }
        let (shard, realm, num, checksum) = parse_entity(s)?;
        Ok(Self { checksum, ..Self::new(shard, realm, num) })
    }
}

fn parse_aliased(s: &str, shard: &str, realm: &str, last: &str) -> Result<AccountId> {
    let (shard, realm) = (parse_decimal(s, shard)?, parse_decimal(s, realm)?);
    let digits = last.strip_prefix("0x").unwrap_or(last);
    if digits.len() == 40 {
        return Ok(AccountId::from_evm_address(shard, realm, digits.parse()?));
    }
    let key = PublicKey::from_str(digits)
        .map_err(|_| LedgerError::parse(s, "expected an account number, alias key or evm address"))?;
    Ok(AccountId::from_alias(shard, realm, key))
}

impl ValidateChecksums for AccountId {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.validate_checksum(ledger_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    const ALIAS_DER: &str =
        "302a300506032b6570032100e0c8ec2758a5879ffac226a13c0c516b799e72e35141a0dd828f94d37988a4b7";

    #[test]
    fn test_parse_numeric_forms() {
        assert_eq!("0.0.1001".parse::<AccountId>().unwrap(), AccountId::new(0, 0, 1001));
        assert_eq!("1001".parse::<AccountId>().unwrap(), AccountId::new(0, 0, 1001));

        let with_checksum: AccountId = "0.0.1001-urkbk".parse().unwrap();
        assert_eq!(with_checksum.num(), 1001);
        assert_eq!(with_checksum.to_string(), "0.0.1001-urkbk");
    }

    #[test]
    fn test_parse_alias_form() {
        let id: AccountId = format!("0.0.{ALIAS_DER}").parse().unwrap();
        assert_eq!(id.num(), 0);
        assert!(id.alias().is_some_and(PublicKey::is_ed25519));
        assert_eq!(id.to_string(), format!("0.0.{ALIAS_DER}"));
    }

    #[test]
    fn test_parse_evm_form() {
        let id: AccountId = "1.2.0x302a300506032b6570032100114e6abc371b82da".parse().unwrap();
        assert_eq!((id.shard(), id.realm()), (1, 2));
        assert!(id.evm_address().is_some());
        assert_eq!(id.to_string(), "1.2.302a300506032b6570032100114e6abc371b82da");
        assert_eq!(id.to_string().parse::<AccountId>().unwrap(), id);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let signed_evm = "+0.0.302a300506032b6570032100114e6abc371b82da";
        for input in ["0.0.xyz", "0.0.1.2", "a.0.1", "0.0.1-abc", "", "+0.+0.+5", signed_evm] {
            assert!(input.parse::<AccountId>().is_err(), "{input} should not parse");
        }
    }

    #[test]
    fn test_checksum_not_derived_for_alias() {
        let id: AccountId = format!("0.0.{ALIAS_DER}").parse().unwrap();
        assert!(id.to_string_with_checksum(&LedgerId::MAINNET).is_err());
        id.validate_checksum(&LedgerId::MAINNET).unwrap();
    }

    #[test]
    fn test_to_string_with_checksum() {
        let id = AccountId::new(0, 0, 1001);
        assert_eq!(id.to_string_with_checksum(&LedgerId::TESTNET).unwrap(), "0.0.1001-eevit");
    }

    #[test]
    fn test_validate_checksum() {
        let id: AccountId = "0.0.1001-eevit".parse().unwrap();
        id.validate_checksums(&LedgerId::TESTNET).unwrap();
        assert!(id.validate_checksums(&LedgerId::MAINNET).is_err());
    }

    #[test]
    fn test_solidity_address() {
        let id = AccountId::new(0, 0, 1001);
        let address = id.to_solidity_address().unwrap();
        assert_eq!(AccountId::from_solidity_address(&address), id);

        let evm: AccountId = "0.0.302a300506032b6570032100114e6abc371b82da".parse().unwrap();
        assert_eq!(evm.to_solidity_address().unwrap().to_hex(), "302a300506032b6570032100114e6abc371b82da");
    }

    #[test]
    fn test_alias_form_keeps_no_number_or_checksum() {
        let key: PublicKey = ALIAS_DER.parse().unwrap();
        let checksum = Checksum::generate("0.0.77", &LedgerId::MAINNET);
        let id = AccountId::from_alias(0, 0, key).with_checksum(checksum);
        assert_eq!((id.num(), id.checksum()), (0, None));
        assert_eq!(id.to_string(), format!("0.0.{ALIAS_DER}"));
        assert_eq!(id.to_string().parse::<AccountId>().unwrap(), id);

        let numeric = AccountId::new(0, 0, 77).with_checksum(checksum);
        assert_eq!(numeric.to_string(), format!("0.0.77-{checksum}"));
        assert_eq!(numeric.to_string().parse::<AccountId>().unwrap(), numeric);
    }
}
