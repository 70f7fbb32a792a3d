//! Submits a message (or one chunk of a message) to a topic.

use hgraph_ledger_types::{LedgerId, Result, TopicId, TransactionId, ValidateChecksums, error::InvalidArgumentSnafu};
use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};
use snafu::ensure;

use super::{Transaction, TransactionData};

/// Submits a message to a topic.
///
/// Large messages are split by the caller into chunks that share an
/// `initial_transaction_id`; each chunk carries its 1-based `chunk_number`
/// out of `chunk_total`.
pub type TopicMessageSubmitTransaction = Transaction<TopicMessageSubmitTransactionData>;

/// Fields of a [`TopicMessageSubmitTransaction`].
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMessageSubmitTransactionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    topic_id: Option<TopicId>,
    #[serde_as(as = "Option<Base64>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    initial_transaction_id: Option<TransactionId>,
    #[serde(default = "one")]
    chunk_total: u32,
    #[serde(default = "one")]
    chunk_number: u32,
}

fn one() -> u32 {
    1
}

impl Default for TopicMessageSubmitTransactionData {
    fn default() -> Self {
        Self { topic_id: None, message: None, initial_transaction_id: None, chunk_total: 1, chunk_number: 1 }
    }
}

impl TransactionData for TopicMessageSubmitTransactionData {
    const KIND: &'static str = "topicMessageSubmit";

    fn validate(&self) -> Result<()> {
        ensure!(
            self.chunk_number >= 1 && self.chunk_number <= self.chunk_total,
            InvalidArgumentSnafu {
                message: format!("chunk number {} is not within 1..={}", self.chunk_number, self.chunk_total),
            }
        );
        Ok(())
    }
}

impl ValidateChecksums for TopicMessageSubmitTransactionData {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.topic_id.validate_checksums(ledger_id)?;
        self.initial_transaction_id.validate_checksums(ledger_id)
    }
}

impl TopicMessageSubmitTransaction {
    /// Topic the message is submitted to.
    #[must_use]
    pub fn topic_id(&self) -> Option<TopicId> {
        self.data().topic_id
    }

    /// Sets the topic.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_topic_id(&mut self, topic_id: impl Into<TopicId>) -> Result<&mut Self> {
        self.data_mut("topic_id")?.topic_id = Some(topic_id.into());
        Ok(self)
    }

    /// Message bytes.
    #[must_use]
    pub fn message(&self) -> Option<&[u8]> {
        self.data().message.as_deref()
    }

    /// Sets the message bytes.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_message(&mut self, message: impl Into<Vec<u8>>) -> Result<&mut Self> {
        self.data_mut("message")?.message = Some(message.into());
        Ok(self)
    }

    /// Transaction id of the first chunk.
    #[must_use]
    pub fn initial_transaction_id(&self) -> Option<&TransactionId> {
        self.data().initial_transaction_id.as_ref()
    }

    /// Sets the transaction id of the first chunk.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_initial_transaction_id(&mut self, transaction_id: TransactionId) -> Result<&mut Self> {
        self.data_mut("initial_transaction_id")?.initial_transaction_id = Some(transaction_id);
        Ok(self)
    }

    /// Total number of chunks.
    #[must_use]
    pub fn chunk_total(&self) -> u32 {
        self.data().chunk_total
    }

    /// Sets the total number of chunks.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_chunk_total(&mut self, total: u32) -> Result<&mut Self> {
        self.data_mut("chunk_total")?.chunk_total = total;
        Ok(self)
    }

    /// 1-based position of this chunk.
    #[must_use]
    pub fn chunk_number(&self) -> u32 {
        self.data().chunk_number
    }

    /// Sets the position of this chunk.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_chunk_number(&mut self, number: u32) -> Result<&mut Self> {
        self.data_mut("chunk_number")?.chunk_number = number;
        Ok(self)
    }
}
