//! Transaction base shared by every transaction builder.
//!
//! A [`Transaction`] starts mutable. Every setter checks the frozen flag and
//! fails with [`hgraph_ledger_types::LedgerError::FrozenMutation`] once the transaction is frozen,
//! either explicitly through [`Transaction::freeze`] or implicitly by
//! [`Transaction::execute`]. A frozen transaction never becomes mutable again.
//!
//! # Example
//!
//! ```no_run
//! # use hgraph_ledger_sdk::{Client, TokenBurnTransaction};
//! # async fn example(client: &Client) -> hgraph_ledger_sdk::Result<()> {
//! let mut burn = TokenBurnTransaction::new();
//! burn.set_token_id("0.0.5005".parse::<hgraph_ledger_types::TokenId>()?)?.set_amount(10)?;
//!
//! let response = burn.execute(client).await?;
//! let receipt = response.get_receipt(client).await?;
//! # let _ = receipt;
//! # Ok(())
//! # }
//! ```

mod allowance_approve;
mod contract_update;
mod token_burn;
mod token_freeze;
mod token_revoke_kyc;
mod token_unpause;
mod token_wipe;
mod topic_create;
mod topic_message_submit;
mod topic_update;

use std::{fmt::Debug, time::Duration};

pub use allowance_approve::{AccountAllowanceApproveTransaction, AccountAllowanceApproveTransactionData};
pub use contract_update::{ContractUpdateTransaction, ContractUpdateTransactionData};
use hgraph_ledger_types::{
    AccountId, Hbar, LedgerId, TransactionId, ValidateChecksums,
    error::FrozenMutationSnafu,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_with::{DurationSeconds, serde_as};
use snafu::ensure;
pub use token_burn::{TokenBurnTransaction, TokenBurnTransactionData};
pub use token_freeze::{TokenFreezeTransaction, TokenFreezeTransactionData};
pub use token_revoke_kyc::{TokenRevokeKycTransaction, TokenRevokeKycTransactionData};
pub use token_unpause::{TokenUnpauseTransaction, TokenUnpauseTransactionData};
pub use token_wipe::{TokenWipeTransaction, TokenWipeTransactionData};
pub use topic_create::{DEFAULT_TOPIC_AUTO_RENEW_PERIOD, TopicCreateTransaction, TopicCreateTransactionData};
pub use topic_message_submit::{TopicMessageSubmitTransaction, TopicMessageSubmitTransactionData};
pub use topic_update::{TopicUpdateTransaction, TopicUpdateTransactionData};

use crate::{
    client::Client,
    config::check_transaction_valid_duration,
    error::Result,
    execute::{Execute, decode_envelope, encode_envelope, execute},
    query::{TransactionReceipt, TransactionReceiptQuery},
    signer::Signer,
};

/// Operation-specific fields of a transaction.
pub trait TransactionData:
    Clone + Debug + Default + Serialize + DeserializeOwned + ValidateChecksums + Send + Sync + 'static
{
    /// Envelope tag, e.g. `tokenBurn`.
    const KIND: &'static str;

    /// Cross-field validation run before submission.
    ///
    /// # Errors
    ///
    /// Returns a [`hgraph_ledger_types::LedgerError`] describing the first violated rule.
    fn validate(&self) -> hgraph_ledger_types::Result<()> {
        Ok(())
    }
}

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionBody<D> {
    #[serde(flatten)]
    data: D,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    node_account_ids: Option<Vec<AccountId>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    transaction_id: Option<TransactionId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_transaction_fee: Option<Hbar>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    transaction_memo: String,

    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    transaction_valid_duration: Option<Duration>,
}

impl<D: ValidateChecksums> ValidateChecksums for TransactionBody<D> {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> hgraph_ledger_types::Result<()> {
        self.data.validate_checksums(ledger_id)?;
        self.node_account_ids.validate_checksums(ledger_id)?;
        self.transaction_id.validate_checksums(ledger_id)
    }
}

/// A transaction under construction or after execution.
#[derive(Debug, Clone)]
pub struct Transaction<D> {
    body: TransactionBody<D>,
    signers: Vec<Signer>,
    frozen: bool,
}

impl<D: TransactionData> Default for Transaction<D> {
    fn default() -> Self {
        Self { body: TransactionBody::default(), signers: Vec::new(), frozen: false }
    }
}

impl<D: TransactionData> Transaction<D> {
    /// Creates an empty, mutable transaction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the transaction is frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freezes the transaction. Calling it again has no effect.
    pub fn freeze(&mut self) -> &mut Self {
        if !self.frozen {
            self.frozen = true;
            tracing::debug!(kind = D::KIND, "Froze transaction");
        }
        self
    }

    /// Adds a signer handle passed to the engine on execution.
    ///
    /// Signing is allowed after freezing.
    pub fn sign(&mut self, signer: Signer) -> &mut Self {
        self.signers.push(signer);
        self
    }

    /// Signer handles collected so far.
    #[must_use]
    pub fn signers(&self) -> &[Signer] {
        &self.signers
    }

    /// Nodes the engine may submit to, if explicitly chosen or recorded after execution.
    #[must_use]
    pub fn node_account_ids(&self) -> Option<&[AccountId]> {
        self.body.node_account_ids.as_deref()
    }

    /// Restricts the nodes the engine may submit to.
    ///
    /// # Errors
    ///
    /// Returns [`hgraph_ledger_types::LedgerError::FrozenMutation`] if the transaction is frozen.
    pub fn set_node_account_ids(
        &mut self,
        node_account_ids: impl IntoIterator<Item = AccountId>,
    ) -> hgraph_ledger_types::Result<&mut Self> {
        self.ensure_not_frozen("node_account_ids")?;
        self.body.node_account_ids = Some(node_account_ids.into_iter().collect());
        Ok(self)
    }

    /// Explicit or recorded transaction id.
    #[must_use]
    pub fn transaction_id(&self) -> Option<&TransactionId> {
        self.body.transaction_id.as_ref()
    }

    /// Sets an explicit transaction id.
    ///
    /// # Errors
    ///
    /// Returns [`hgraph_ledger_types::LedgerError::FrozenMutation`] if the transaction is frozen.
    pub fn set_transaction_id(&mut self, transaction_id: TransactionId) -> hgraph_ledger_types::Result<&mut Self> {
        self.ensure_not_frozen("transaction_id")?;
        self.body.transaction_id = Some(transaction_id);
        Ok(self)
    }

    /// Maximum fee the payer is willing to pay.
    #[must_use]
    pub fn max_transaction_fee(&self) -> Option<Hbar> {
        self.body.max_transaction_fee
    }

    /// Sets the maximum fee.
    ///
    /// # Errors
    ///
    /// Returns [`hgraph_ledger_types::LedgerError::FrozenMutation`] if the transaction is frozen.
    pub fn set_max_transaction_fee(&mut self, fee: Hbar) -> hgraph_ledger_types::Result<&mut Self> {
        self.ensure_not_frozen("max_transaction_fee")?;
        self.body.max_transaction_fee = Some(fee);
        Ok(self)
    }

    /// How long the transaction stays valid after its valid start.
    #[must_use]
    pub fn transaction_valid_duration(&self) -> Option<Duration> {
        self.body.transaction_valid_duration
    }

    /// Sets the valid duration.
    ///
    /// # Errors
    ///
    /// Returns [`hgraph_ledger_types::LedgerError::FrozenMutation`] if the transaction is frozen
    /// and [`hgraph_ledger_types::LedgerError::InvalidArgument`] unless `duration` is whole
    /// seconds within 1..=180.
    pub fn set_transaction_valid_duration(&mut self, duration: Duration) -> hgraph_ledger_types::Result<&mut Self> {
        self.ensure_not_frozen("transaction_valid_duration")?;
        check_transaction_valid_duration(duration)?;
        self.body.transaction_valid_duration = Some(duration);
        Ok(self)
    }

    /// Memo attached to the transaction.
    #[must_use]
    pub fn transaction_memo(&self) -> &str {
        &self.body.transaction_memo
    }

    /// Sets the memo.
    ///
    /// # Errors
    ///
    /// Returns [`hgraph_ledger_types::LedgerError::FrozenMutation`] if the transaction is frozen.
    pub fn set_transaction_memo(&mut self, memo: impl Into<String>) -> hgraph_ledger_types::Result<&mut Self> {
        self.ensure_not_frozen("transaction_memo")?;
        self.body.transaction_memo = memo.into();
        Ok(self)
    }

    /// Executes the transaction, freezing it first.
    ///
    /// On success the engine-allocated transaction id and node id are
    /// recorded if they were unset.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SdkError::Local`] if a checksum does not match the
    /// client's ledger or a field rule is violated, and the engine's error
    /// otherwise.
    pub async fn execute(&mut self, client: &Client) -> Result<TransactionResponse> {
        self.execute_inner(client, None).await
    }

    /// Executes the transaction with an advisory timeout passed to the engine.
    ///
    /// # Errors
    ///
    /// Same as [`Transaction::execute`].
    pub async fn execute_with_timeout(&mut self, client: &Client, timeout: Duration) -> Result<TransactionResponse> {
        self.execute_inner(client, Some(timeout)).await
    }

    async fn execute_inner(&mut self, client: &Client, timeout: Option<Duration>) -> Result<TransactionResponse> {
        let response = execute(self, client, timeout).await?;
        // Recorded after freezing, so the guard is bypassed.
        if self.body.transaction_id.is_none() {
            self.body.transaction_id = Some(response.transaction_id.clone());
        }
        if self.body.node_account_ids.is_none() {
            self.body.node_account_ids = Some(vec![response.node_account_id.clone()]);
        }
        Ok(response)
    }

    /// Parses a transaction from its request envelope. The result is mutable.
    ///
    /// # Errors
    ///
    /// Returns an error if the envelope is not tagged with this kind or its
    /// body does not decode.
    pub fn from_envelope(json: &str) -> Result<Self> {
        let body = decode_envelope::<TransactionBody<D>>(D::KIND, json)?;
        Ok(Self { body, signers: Vec::new(), frozen: false })
    }

    /// Request envelope exactly as set, without client defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SdkError::Encode`] if serialization fails.
    pub fn to_envelope(&self) -> Result<String> {
        encode_envelope(D::KIND, &self.body)
    }

    pub(crate) fn data(&self) -> &D {
        &self.body.data
    }

    pub(crate) fn data_mut(&mut self, field: &'static str) -> hgraph_ledger_types::Result<&mut D> {
        self.ensure_not_frozen(field)?;
        Ok(&mut self.body.data)
    }

    fn ensure_not_frozen(&self, field: &'static str) -> hgraph_ledger_types::Result<()> {
        ensure!(!self.frozen, FrozenMutationSnafu { field });
        Ok(())
    }
}

impl<D: TransactionData> Execute for Transaction<D> {
    type Response = TransactionResponse;

    fn kind(&self) -> &'static str {
        D::KIND
    }

    fn freeze_for_execution(&mut self) {
        self.freeze();
    }

    fn validate_for_execution(&self, ledger_id: &LedgerId) -> hgraph_ledger_types::Result<()> {
        if let Some(duration) = self.body.transaction_valid_duration {
            check_transaction_valid_duration(duration)?;
        }
        self.body.data.validate()?;
        self.body.validate_checksums(ledger_id)
    }

    fn request_envelope(&self, client: &Client) -> Result<String> {
        let config = client.config();
        let mut body = self.body.clone();
        if body.max_transaction_fee.is_none() {
            body.max_transaction_fee = config.default_max_transaction_fee();
        }
        if body.transaction_valid_duration.is_none() {
            body.transaction_valid_duration = Some(config.default_transaction_valid_duration());
        }
        encode_envelope(D::KIND, &body)
    }

    fn signer_handles(&self) -> Vec<Signer> {
        self.signers.clone()
    }
}

/// Engine acknowledgement of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Node the transaction was submitted to.
    pub node_account_id: AccountId,
    /// Id the transaction was submitted under.
    pub transaction_id: TransactionId,
    /// Hash of the signed transaction bytes.
    #[serde(with = "hex::serde")]
    pub transaction_hash: Vec<u8>,
}

impl TransactionResponse {
    /// Fetches the receipt for this transaction.
    ///
    /// # Errors
    ///
    /// Returns the receipt query's execution error.
    pub async fn get_receipt(&self, client: &Client) -> Result<TransactionReceipt> {
        let mut query = TransactionReceiptQuery::new();
        query.set_transaction_id(self.transaction_id.clone())?;
        query.execute(client).await
    }
}
