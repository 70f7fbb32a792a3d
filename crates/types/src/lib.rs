//! Core types for the hgraph ledger client.
//!
//! Provides the identifier model (entity, account, NFT and transaction ids),
//! entity checksums scoped to a [`LedgerId`], the key model, allowance
//! entries and the local error taxonomy shared by the SDK.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;

pub mod account_id;
pub mod allowance;
pub mod checksum;
pub mod entity_id;
pub mod error;
pub mod evm_address;
pub mod hbar;
pub mod key;
pub mod ledger_id;
pub mod nft_id;
pub mod transaction_id;

pub use account_id::AccountId;
pub use allowance::{HbarAllowance, TokenAllowance, TokenNftAllowance};
pub use checksum::{Checksum, ValidateChecksums};
pub use codec::{CodecError, decode, encode};
pub use entity_id::{ContractId, EntityId, FileId, ScheduleId, TokenId, TopicId};
pub use error::{ErrorCode, LedgerError, Result};
pub use evm_address::EvmAddress;
pub use hbar::Hbar;
pub use key::{Key, KeyKind, KeyList, PrivateKey, PublicKey};
pub use ledger_id::LedgerId;
pub use nft_id::NftId;
pub use transaction_id::TransactionId;
