//! Receipt of a submitted transaction.

use hgraph_ledger_types::{
    AccountId, ContractId, FileId, LedgerId, Result, ScheduleId, TokenId, TopicId, TransactionId, ValidateChecksums,
};
use serde::{Deserialize, Serialize};

use super::{Query, QueryData};

/// Fetches the receipt of a transaction by id.
pub type TransactionReceiptQuery = Query<TransactionReceiptQueryData>;

/// Fields of a [`TransactionReceiptQuery`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceiptQueryData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transaction_id: Option<TransactionId>,
    #[serde(default)]
    include_children: bool,
    #[serde(default)]
    include_duplicates: bool,
}

impl QueryData for TransactionReceiptQueryData {
    const KIND: &'static str = "transactionReceipt";
    type Response = TransactionReceipt;
}

impl ValidateChecksums for TransactionReceiptQueryData {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.transaction_id.validate_checksums(ledger_id)
    }
}

impl TransactionReceiptQuery {
    /// Transaction whose receipt is requested.
    #[must_use]
    pub fn transaction_id(&self) -> Option<&TransactionId> {
        self.data().transaction_id.as_ref()
    }

    /// Sets the transaction whose receipt is requested.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the query is frozen.
    pub fn set_transaction_id(&mut self, transaction_id: TransactionId) -> Result<&mut Self> {
        self.data_mut("transaction_id")?.transaction_id = Some(transaction_id);
        Ok(self)
    }

    /// Whether receipts of child transactions are included.
    #[must_use]
    pub fn include_children(&self) -> bool {
        self.data().include_children
    }

    /// Includes receipts of child transactions.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the query is frozen.
    pub fn set_include_children(&mut self, include: bool) -> Result<&mut Self> {
        self.data_mut("include_children")?.include_children = include;
        Ok(self)
    }

    /// Whether receipts of duplicate submissions are included.
    #[must_use]
    pub fn include_duplicates(&self) -> bool {
        self.data().include_duplicates
    }

    /// Includes receipts of duplicate submissions.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the query is frozen.
    pub fn set_include_duplicates(&mut self, include: bool) -> Result<&mut Self> {
        self.data_mut("include_duplicates")?.include_duplicates = include;
        Ok(self)
    }
}

/// Outcome of a transaction as recorded by the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Consensus status, e.g. `SUCCESS`.
    pub status: String,
    /// Account created by the transaction.
    #[serde(default)]
    pub account_id: Option<AccountId>,
    /// File created by the transaction.
    #[serde(default)]
    pub file_id: Option<FileId>,
    /// Contract created by the transaction.
    #[serde(default)]
    pub contract_id: Option<ContractId>,
    /// Topic created by the transaction.
    #[serde(default)]
    pub topic_id: Option<TopicId>,
    /// Token created by the transaction.
    #[serde(default)]
    pub token_id: Option<TokenId>,
    /// Schedule created by the transaction.
    #[serde(default)]
    pub schedule_id: Option<ScheduleId>,
    /// Sequence number of a submitted topic message.
    #[serde(default)]
    pub topic_sequence_number: u64,
    /// Running hash of the topic after a submitted message.
    #[serde(default, with = "hex::serde")]
    pub topic_running_hash: Vec<u8>,
    /// Token supply after a mint, burn or wipe.
    #[serde(default)]
    pub total_supply: u64,
    /// Serials of minted NFTs.
    #[serde(default)]
    pub serials: Vec<u64>,
    /// Scheduled transaction triggered by this one.
    #[serde(default)]
    pub scheduled_transaction_id: Option<TransactionId>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_defaults() {
        let receipt: TransactionReceipt = serde_json::from_str(r#"{"status":"SUCCESS"}"#).unwrap();
        assert_eq!(receipt.status, "SUCCESS");
        assert_eq!(receipt.topic_sequence_number, 0);
        assert!(receipt.serials.is_empty());
        assert!(receipt.topic_running_hash.is_empty());
    }

    #[test]
    fn test_receipt_with_created_topic() {
        let receipt: TransactionReceipt = serde_json::from_str(
            r#"{"status":"SUCCESS","topicId":"0.0.4040","topicSequenceNumber":3,"topicRunningHash":"0aff"}"#,
        )
        .unwrap();
        assert_eq!(receipt.topic_id, Some(TopicId::new(0, 0, 4040)));
        assert_eq!(receipt.topic_sequence_number, 3);
        assert_eq!(receipt.topic_running_hash, vec![0x0a, 0xff]);
    }

    #[test]
    fn test_transaction_id_rejected_after_freeze() {
        let mut query = TransactionReceiptQuery::new();
        query.freeze();
        assert!(query.set_transaction_id(TransactionId::generate(AccountId::new(0, 0, 2))).is_err());
        assert!(query.set_include_children(true).is_err());
        assert!(!query.include_children());
    }
}
