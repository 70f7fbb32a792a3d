//! Key model: public and private keys, key lists and the [`Key`] sum type.

mod key_list;
mod private_key;
mod public_key;

pub use key_list::KeyList;
pub use private_key::PrivateKey;
pub use public_key::{KeyKind, PublicKey};
use serde::{Deserialize, Serialize};

use crate::{checksum::ValidateChecksums, entity_id::ContractId, error::Result, ledger_id::LedgerId};

/// Any key that can authorize an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Key {
    /// A single public key.
    Single(PublicKey),
    /// A contract, authorizing calls it makes directly.
    ContractId(ContractId),
    /// A contract, authorizing calls it makes directly or through delegate calls.
    DelegatableContractId(ContractId),
    /// A list of keys, optionally with a threshold.
    KeyList(KeyList),
}

impl From<PublicKey> for Key {
    fn from(key: PublicKey) -> Self {
        Self::Single(key)
    }
}

impl From<ContractId> for Key {
    fn from(id: ContractId) -> Self {
        Self::ContractId(id)
    }
}

impl From<KeyList> for Key {
    fn from(list: KeyList) -> Self {
        Self::KeyList(list)
    }
}

impl ValidateChecksums for Key {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        match self {
            Self::Single(_) => Ok(()),
            Self::ContractId(id) | Self::DelegatableContractId(id) => id.validate_checksums(ledger_id),
            Self::KeyList(list) => list.validate_checksums(ledger_id),
        }
    }
}
