//! Property tests for identifier text forms and operation envelopes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::disallowed_methods)]

use hgraph_ledger_sdk::{TokenBurnTransaction, TokenWipeTransaction, TopicMessageSubmitTransaction};
use hgraph_ledger_test_utils::strategies::{
    arb_account_id, arb_checksummed_entity_id, arb_entity_id, arb_ledger_id, arb_nft_id, arb_token_id,
    arb_transaction_id,
};
use hgraph_ledger_types::{AccountId, EntityId, LedgerError, NftId, TransactionId};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_entity_id_text_round_trips(id in arb_entity_id()) {
        prop_assert_eq!(id.to_string().parse::<EntityId>().unwrap(), id);
    }

    #[test]
    fn prop_account_id_text_round_trips(id in arb_account_id()) {
        prop_assert_eq!(id.to_string().parse::<AccountId>().unwrap(), id);
    }

    #[test]
    fn prop_nft_id_text_round_trips(id in arb_nft_id()) {
        prop_assert_eq!(id.to_string().parse::<NftId>().unwrap(), id);
    }

    #[test]
    fn prop_transaction_id_text_round_trips(id in arb_transaction_id()) {
        prop_assert_eq!(id.to_string().parse::<TransactionId>().unwrap(), id);
    }

    #[test]
    fn prop_checksum_valid_only_for_its_ledger(
        ledger in arb_ledger_id(),
        other in arb_ledger_id(),
        (shard, realm, num) in (0u64..=8, 0u64..=8, any::<u64>()),
    ) {
        let plain = EntityId::new(shard, realm, num);
        let with_checksum = plain.to_string_with_checksum(&ledger).parse::<EntityId>().unwrap();
        prop_assert!(with_checksum.validate_checksum(&ledger).is_ok());
        prop_assert!(plain.validate_checksum(&other).is_ok());

        let expected = plain.to_string_with_checksum(&other);
        if expected != with_checksum.to_string() {
            let is_mismatch = matches!(
                with_checksum.validate_checksum(&other),
                Err(LedgerError::ChecksumMismatch { .. })
            );
            prop_assert!(is_mismatch);
        }
    }

    #[test]
    fn prop_generated_checksums_validate(id in arb_checksummed_entity_id(hgraph_ledger_types::LedgerId::PREVIEWNET)) {
        prop_assert!(id.validate_checksum(&hgraph_ledger_types::LedgerId::PREVIEWNET).is_ok());
    }

    #[test]
    fn prop_token_burn_envelope_round_trips(
        token_id in arb_token_id(),
        amount in any::<u64>(),
        serials in proptest::collection::vec(any::<u64>(), 0..8),
        transaction_id in proptest::option::of(arb_transaction_id()),
        memo in "[a-z ]{0,20}",
    ) {
        let mut tx = TokenBurnTransaction::new();
        tx.set_token_id(token_id).unwrap().set_amount(amount).unwrap().set_serials(serials.clone()).unwrap();
        tx.set_transaction_memo(memo.clone()).unwrap();
        if let Some(transaction_id) = transaction_id.clone() {
            tx.set_transaction_id(transaction_id).unwrap();
        }

        let decoded = TokenBurnTransaction::from_envelope(&tx.to_envelope().unwrap()).unwrap();
        prop_assert_eq!(decoded.token_id(), Some(token_id));
        prop_assert_eq!(decoded.amount(), amount);
        prop_assert_eq!(decoded.serials(), serials.as_slice());
        prop_assert_eq!(decoded.transaction_memo(), memo.as_str());
        prop_assert_eq!(decoded.transaction_id(), transaction_id.as_ref());
        prop_assert!(!decoded.is_frozen());
    }

    #[test]
    fn prop_topic_message_bytes_survive_envelope(message in proptest::collection::vec(any::<u8>(), 0..256)) {
        let mut tx = TopicMessageSubmitTransaction::new();
        tx.set_message(message.clone()).unwrap();

        let decoded = TopicMessageSubmitTransaction::from_envelope(&tx.to_envelope().unwrap()).unwrap();
        prop_assert_eq!(decoded.message(), Some(message.as_slice()));
        prop_assert_eq!((decoded.chunk_number(), decoded.chunk_total()), (1, 1));
    }

    #[test]
    fn prop_frozen_wipe_rejects_every_setter(account_id in arb_account_id(), token_id in arb_token_id()) {
        let mut tx = TokenWipeTransaction::new();
        tx.freeze();

        let frozen = |result: hgraph_ledger_types::Result<&mut TokenWipeTransaction>| {
            matches!(result, Err(LedgerError::FrozenMutation { .. }))
        };
        prop_assert!(frozen(tx.set_account_id(account_id)));
        prop_assert!(frozen(tx.set_token_id(token_id)));
        prop_assert!(frozen(tx.set_amount(1)));
        prop_assert_eq!(tx.account_id(), None);
    }
}
