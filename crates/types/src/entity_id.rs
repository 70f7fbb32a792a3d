//! Entity identifiers of the form `shard.realm.num[-checksum]`.
//!
//! [`EntityId`] is the untyped shape; [`TokenId`], [`TopicId`],
//! [`ContractId`], [`FileId`] and [`ScheduleId`] are typed newtypes sharing
//! it. Accounts additionally support alias and EVM forms and live in
//! [`crate::account_id`].

use std::fmt;

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{
    checksum::{self, Checksum, ValidateChecksums},
    error::{LedgerError, Result},
    evm_address::EvmAddress,
    ledger_id::LedgerId,
};

/// Parses `shard.realm.num[-checksum]` or the short form `num`.
pub(crate) fn parse_entity(s: &str) -> Result<(u64, u64, u64, Option<Checksum>)> {
    let (body, checksum) = match s.split_once('-') {
        Some((body, checksum)) => (body, Some(checksum.parse::<Checksum>()?)),
        None => (s, None),
    };

    let number = |part: &str| parse_decimal(s, part);

    let mut parts = body.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(num), None, None, None) => Ok((0, 0, number(num)?, checksum)),
        (Some(shard), Some(realm), Some(num), None) => {
            Ok((number(shard)?, number(realm)?, number(num)?, checksum))
        },
        _ => Err(LedgerError::parse(s, "expected `shard.realm.num` or `num`")),
    }
}

/// Parses one `u64` component; only ASCII digits are accepted.
pub(crate) fn parse_decimal(input: &str, part: &str) -> Result<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LedgerError::parse(input, format!("invalid number '{part}'")));
    }
    part.parse::<u64>().map_err(|e| LedgerError::parse(input, format!("invalid number '{part}': {e}")))
}

/// Long-zero EVM address: 4 bytes shard, 8 bytes realm, 8 bytes num.
pub(crate) fn to_solidity_address(shard: u64, realm: u64, num: u64) -> Result<EvmAddress> {
    let shard = u32::try_from(shard).map_err(|_| LedgerError::InvalidArgument {
        message: format!("shard {shard} does not fit a solidity address"),
    })?;
    let mut bytes = [0u8; 20];
    bytes[..4].copy_from_slice(&shard.to_be_bytes());
    bytes[4..12].copy_from_slice(&realm.to_be_bytes());
    bytes[12..].copy_from_slice(&num.to_be_bytes());
    Ok(EvmAddress::from(bytes))
}

pub(crate) fn from_solidity_address(address: &EvmAddress) -> (u64, u64, u64) {
    let bytes = address.as_bytes();
    let mut shard = [0u8; 4];
    let mut realm = [0u8; 8];
    let mut num = [0u8; 8];
    shard.copy_from_slice(&bytes[..4]);
    realm.copy_from_slice(&bytes[4..12]);
    num.copy_from_slice(&bytes[12..]);
    (u64::from(u32::from_be_bytes(shard)), u64::from_be_bytes(realm), u64::from_be_bytes(num))
}

/// Generates an entity id type with parsing, display, checksum and
/// solidity-address support.
macro_rules! define_entity_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, SerializeDisplay, DeserializeFromStr)]
        pub struct $name {
            /// Shard number.
            pub shard: u64,
            /// Realm number.
            pub realm: u64,
            /// Entity number.
            pub num: u64,
            /// Checksum carried from the parsed string, if any.
            pub checksum: Option<Checksum>,
        }

        impl $name {
            /// Creates an id without a checksum.
            #[inline]
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self { shard, realm, num, checksum: None }
            }

            /// Formats the id with the checksum for `ledger_id` appended.
            #[must_use]
            pub fn to_string_with_checksum(&self, ledger_id: &LedgerId) -> String {
                let base = format!("{}.{}.{}", self.shard, self.realm, self.num);
                let checksum = Checksum::generate(&base, ledger_id);
                format!("{base}-{checksum}")
            }

            /// Validates the carried checksum, if any, against `ledger_id`.
            ///
            /// # Errors
            ///
            /// Returns [`LedgerError::ChecksumMismatch`] on mismatch.
            pub fn validate_checksum(&self, ledger_id: &LedgerId) -> Result<()> {
                checksum::validate(self.shard, self.realm, self.num, self.checksum, ledger_id)
            }

            /// Decodes a long-zero EVM address.
            #[must_use]
            pub fn from_solidity_address(address: &EvmAddress) -> Self {
                let (shard, realm, num) = from_solidity_address(address);
                Self::new(shard, realm, num)
            }

            /// Encodes the id as a long-zero EVM address.
            ///
            /// # Errors
            ///
            /// Returns [`LedgerError::InvalidArgument`] if the shard exceeds 32 bits.
            pub fn to_solidity_address(&self) -> Result<EvmAddress> {
                to_solidity_address(self.shard, self.realm, self.num)
            }
        }

        impl From<u64> for $name {
            #[inline]
            fn from(num: u64) -> Self {
                Self::new(0, 0, num)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(\"{}\")", stringify!($name), self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}.{}", self.shard, self.realm, self.num)?;
                if let Some(checksum) = &self.checksum {
                    write!(f, "-{checksum}")?;
                }
                Ok(())
            }
        }

        impl std::str::FromStr for $name {
            type Err = LedgerError;

            fn from_str(s: &str) -> Result<Self> {
                let (shard, realm, num, checksum) = parse_entity(s)?;
                Ok(Self { shard, realm, num, checksum })
            }
        }

        impl ValidateChecksums for $name {
            fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
                self.validate_checksum(ledger_id)
            }
        }
    };
}

/// Conversions between a typed id and [`EntityId`].
macro_rules! typed_entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        define_entity_id!($(#[$meta])* $name);

        impl From<EntityId> for $name {
            fn from(id: EntityId) -> Self {
                Self { shard: id.shard, realm: id.realm, num: id.num, checksum: id.checksum }
            }
        }

        impl From<$name> for EntityId {
            fn from(id: $name) -> Self {
                Self { shard: id.shard, realm: id.realm, num: id.num, checksum: id.checksum }
            }
        }
    };
}

define_entity_id!(
    /// Untyped `shard.realm.num` entity identifier.
    EntityId
);

typed_entity_id!(
    /// Identifies a token.
    TokenId
);

typed_entity_id!(
    /// Identifies a consensus topic.
    TopicId
);

typed_entity_id!(
    /// Identifies a smart contract.
    ContractId
);

typed_entity_id!(
    /// Identifies a file.
    FileId
);

typed_entity_id!(
    /// Identifies a scheduled transaction.
    ScheduleId
);
