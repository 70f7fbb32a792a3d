//! Proptest strategies for ledger identifier and key types.
//!
//! Strategies produce well-formed values across every identifier form
//! (numeric, checksummed, alias, EVM) so display/parse properties cover the
//! whole grammar.
//!
//! # Usage
//!
//! ```no_run
//! use hgraph_ledger_test_utils::strategies;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn account_id_round_trips(id in strategies::arb_account_id()) {
//!         prop_assert_eq!(id.to_string().parse::<hgraph_ledger_types::AccountId>().unwrap(), id);
//!     }
//! }
//! ```

use chrono::{DateTime, Utc};
use hgraph_ledger_types::{
    AccountId, Checksum, EntityId, EvmAddress, LedgerId, NftId, PrivateKey, PublicKey, TokenId, TransactionId,
};
use proptest::prelude::*;

/// Generates one of the three named ledgers or 1-8 arbitrary bytes.
pub fn arb_ledger_id() -> impl Strategy<Value = LedgerId> {
    prop_oneof![
        Just(LedgerId::MAINNET),
        Just(LedgerId::TESTNET),
        Just(LedgerId::PREVIEWNET),
        proptest::collection::vec(any::<u8>(), 1..8).prop_map(LedgerId::from_bytes),
    ]
}

/// Generates a `(shard, realm, num)` triple.
///
/// Shard and realm stay small, as on real networks; `num` spans the full range.
pub fn arb_entity_parts() -> impl Strategy<Value = (u64, u64, u64)> {
    (0u64..=8, 0u64..=8, any::<u64>())
}

/// Generates an entity id, with a checksum for a random ledger half of the time.
pub fn arb_entity_id() -> impl Strategy<Value = EntityId> {
    (arb_entity_parts(), proptest::option::of(arb_ledger_id())).prop_map(|((shard, realm, num), ledger)| {
        let mut id = EntityId::new(shard, realm, num);
        id.checksum = ledger.map(|ledger| Checksum::generate(&id.to_string(), &ledger));
        id
    })
}

/// Generates a token id without a checksum.
pub fn arb_token_id() -> impl Strategy<Value = TokenId> {
    arb_entity_parts().prop_map(|(shard, realm, num)| TokenId::new(shard, realm, num))
}

/// Generates an entity id carrying the valid checksum for `ledger_id`.
pub fn arb_checksummed_entity_id(ledger_id: LedgerId) -> impl Strategy<Value = EntityId> {
    arb_entity_parts().prop_map(move |(shard, realm, num)| {
        let mut id = EntityId::new(shard, realm, num);
        id.checksum = Some(Checksum::generate(&id.to_string(), &ledger_id));
        id
    })
}

/// Generates an Ed25519 public key.
pub fn arb_ed25519_public_key() -> impl Strategy<Value = PublicKey> {
    any::<[u8; 32]>().prop_filter_map("invalid seed", |seed| {
        PrivateKey::from_bytes_ed25519(&seed).ok().map(|key| key.public_key())
    })
}

/// Generates a secp256k1 public key.
pub fn arb_ecdsa_public_key() -> impl Strategy<Value = PublicKey> {
    any::<[u8; 32]>().prop_filter_map("scalar out of range", |seed| {
        PrivateKey::from_bytes_ecdsa(&seed).ok().map(|key| key.public_key())
    })
}

/// Generates a public key of either kind.
pub fn arb_public_key() -> impl Strategy<Value = PublicKey> {
    prop_oneof![arb_ed25519_public_key(), arb_ecdsa_public_key()]
}

/// Generates a 20-byte EVM address.
pub fn arb_evm_address() -> impl Strategy<Value = EvmAddress> {
    any::<[u8; 20]>().prop_map(EvmAddress::from)
}

/// Generates an account id in any of its forms: numeric (optionally
/// checksummed), alias key, or EVM address.
pub fn arb_account_id() -> impl Strategy<Value = AccountId> {
    prop_oneof![
        3 => (arb_entity_parts(), proptest::option::of(arb_ledger_id())).prop_map(|((shard, realm, num), ledger)| {
            let id = AccountId::new(shard, realm, num);
            match ledger {
                Some(ledger) => {
                    let checksum = Checksum::generate(&id.to_string(), &ledger);
                    id.with_checksum(checksum)
                },
                None => id,
            }
        }),
        1 => (0u64..=8, 0u64..=8, arb_public_key())
            .prop_map(|(shard, realm, key)| AccountId::from_alias(shard, realm, key)),
        1 => (0u64..=8, 0u64..=8, arb_evm_address())
            .prop_map(|(shard, realm, address)| AccountId::from_evm_address(shard, realm, address)),
    ]
}

/// Generates an NFT id.
pub fn arb_nft_id() -> impl Strategy<Value = NftId> {
    (arb_token_id(), any::<u64>()).prop_map(|(token_id, serial)| NftId::new(token_id, serial))
}

/// Generates a UTC timestamp between 1970 and roughly 2096 with nanosecond precision.
pub fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_000_000_000, 0u32..1_000_000_000)
        .prop_filter_map("timestamp out of range", |(secs, nanos)| DateTime::from_timestamp(secs, nanos))
}

/// Generates a transaction id with random scheduled flag and nonce.
pub fn arb_transaction_id() -> impl Strategy<Value = TransactionId> {
    (arb_account_id(), arb_timestamp(), any::<bool>(), proptest::option::of(0i32..=i32::MAX)).prop_map(
        |(account_id, valid_start, scheduled, nonce)| {
            let id = TransactionId::new(account_id, valid_start).with_scheduled(scheduled);
            match nonce {
                Some(nonce) => id.with_nonce(nonce),
                None => id,
            }
        },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use proptest::strategy::ValueTree;

    use super::*;

    #[test]
    fn test_checksummed_ids_validate_for_their_ledger() {
        let mut runner = proptest::test_runner::TestRunner::deterministic();
        for _ in 0..32 {
            let id = arb_checksummed_entity_id(LedgerId::TESTNET).new_tree(&mut runner).unwrap().current();
            assert!(id.validate_checksum(&LedgerId::TESTNET).is_ok(), "{id}");
        }
    }

    #[test]
    fn test_alias_accounts_have_no_checksum() {
        let mut runner = proptest::test_runner::TestRunner::deterministic();
        for _ in 0..32 {
            let id = arb_account_id().new_tree(&mut runner).unwrap().current();
            if id.alias().is_some() || id.evm_address().is_some() {
                assert!(id.checksum().is_none());
                assert_eq!(id.num(), 0);
            }
        }
    }
}
