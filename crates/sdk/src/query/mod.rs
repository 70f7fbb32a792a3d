//! Query base shared by every query.
//!
//! Queries follow the same freeze rules as transactions. Their node ids and
//! payment settings live in a [`PaymentTransaction`] serialized under
//! `"payment"` in the request envelope.

mod account_balance;
mod account_info;
mod transaction_receipt;

use std::{fmt::Debug, time::Duration};

pub use account_balance::{AccountBalance, AccountBalanceQuery, AccountBalanceQueryData};
pub use account_info::{AccountInfo, AccountInfoQuery, AccountInfoQueryData};
use hgraph_ledger_types::{
    AccountId, Hbar, LedgerId, TransactionId, ValidateChecksums, error::FrozenMutationSnafu,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_with::{DurationSeconds, serde_as};
use snafu::ensure;
pub use transaction_receipt::{TransactionReceipt, TransactionReceiptQuery, TransactionReceiptQueryData};

use crate::{
    client::Client,
    config::check_transaction_valid_duration,
    error::Result,
    execute::{Execute, decode_envelope, encode_envelope, execute},
    signer::Signer,
};

/// Operation-specific fields of a query.
pub trait QueryData:
    Clone + Debug + Default + Serialize + DeserializeOwned + ValidateChecksums + Send + Sync + 'static
{
    /// Envelope tag, e.g. `accountBalance`.
    const KIND: &'static str;

    /// Decoded response.
    type Response: DeserializeOwned + Send;

    /// Cross-field validation run before submission.
    ///
    /// # Errors
    ///
    /// Returns a [`hgraph_ledger_types::LedgerError`] describing the first violated rule.
    fn validate(&self) -> hgraph_ledger_types::Result<()> {
        Ok(())
    }
}

/// Payment settings attached to a query.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTransaction {
    /// Nodes the engine may query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_account_ids: Option<Vec<AccountId>>,
    /// Exact payment; the engine computes the cost when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Hbar>,
    /// Upper bound on a computed payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<Hbar>,
    /// Fee cap for the payment transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_transaction_fee: Option<Hbar>,
    /// Memo of the payment transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_memo: Option<String>,
    /// Account paying for the query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_account_id: Option<AccountId>,
    /// Explicit payment transaction id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    /// Valid duration of the payment transaction.
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_valid_duration: Option<Duration>,
}

impl ValidateChecksums for PaymentTransaction {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> hgraph_ledger_types::Result<()> {
        self.node_account_ids.validate_checksums(ledger_id)?;
        self.payer_account_id.validate_checksums(ledger_id)?;
        self.transaction_id.validate_checksums(ledger_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryBody<D> {
    #[serde(flatten)]
    data: D,
    #[serde(default)]
    payment: PaymentTransaction,
}

/// A query under construction or after execution.
#[derive(Debug, Clone)]
pub struct Query<D> {
    body: QueryBody<D>,
    frozen: bool,
}

impl<D: QueryData> Default for Query<D> {
    fn default() -> Self {
        Self { body: QueryBody::default(), frozen: false }
    }
}

macro_rules! payment_setter {
    ($(#[$doc:meta])* $setter:ident, $field:ident: $ty:ty) => {
        $(#[$doc])*
        ///
        /// # Errors
        ///
        /// Returns `FrozenMutation` if the query is frozen.
        pub fn $setter(&mut self, value: $ty) -> hgraph_ledger_types::Result<&mut Self> {
            self.ensure_not_frozen(stringify!($field))?;
            self.body.payment.$field = Some(value);
            Ok(self)
        }
    };
}

impl<D: QueryData> Query<D> {
    /// Creates an empty, mutable query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the query is frozen.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freezes the query. Calling it again has no effect.
    pub fn freeze(&mut self) -> &mut Self {
        if !self.frozen {
            self.frozen = true;
            tracing::debug!(kind = D::KIND, "Froze query");
        }
        self
    }

    /// Payment settings.
    #[must_use]
    pub fn payment(&self) -> &PaymentTransaction {
        &self.body.payment
    }

    /// Nodes the engine may query.
    #[must_use]
    pub fn node_account_ids(&self) -> Option<&[AccountId]> {
        self.body.payment.node_account_ids.as_deref()
    }

    /// Restricts the nodes the engine may query.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the query is frozen.
    pub fn set_node_account_ids(
        &mut self,
        node_account_ids: impl IntoIterator<Item = AccountId>,
    ) -> hgraph_ledger_types::Result<&mut Self> {
        self.ensure_not_frozen("node_account_ids")?;
        self.body.payment.node_account_ids = Some(node_account_ids.into_iter().collect());
        Ok(self)
    }

    payment_setter!(
        /// Sets an exact payment amount.
        set_payment_amount, amount: Hbar
    );
    payment_setter!(
        /// Sets the upper bound on a computed payment.
        set_max_payment_amount, max_amount: Hbar
    );
    payment_setter!(
        /// Sets the fee cap of the payment transaction.
        set_payment_max_transaction_fee, max_transaction_fee: Hbar
    );
    payment_setter!(
        /// Sets the memo of the payment transaction.
        set_payment_transaction_memo, transaction_memo: String
    );
    payment_setter!(
        /// Sets the account paying for the query.
        set_payer_account_id, payer_account_id: AccountId
    );
    payment_setter!(
        /// Sets an explicit payment transaction id.
        set_payment_transaction_id, transaction_id: TransactionId
    );

    /// Sets the valid duration of the payment transaction.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the query is frozen and `InvalidArgument`
    /// unless `duration` is whole seconds within 1..=180.
    pub fn set_payment_transaction_valid_duration(
        &mut self,
        duration: Duration,
    ) -> hgraph_ledger_types::Result<&mut Self> {
        self.ensure_not_frozen("transaction_valid_duration")?;
        check_transaction_valid_duration(duration)?;
        self.body.payment.transaction_valid_duration = Some(duration);
        Ok(self)
    }

    /// Executes the query, freezing it first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SdkError::Local`] on checksum or field-rule failures
    /// and the engine's error otherwise.
    pub async fn execute(&mut self, client: &Client) -> Result<D::Response> {
        execute(self, client, None).await
    }

    /// Executes the query with an advisory timeout passed to the engine.
    ///
    /// # Errors
    ///
    /// Same as [`Query::execute`].
    pub async fn execute_with_timeout(&mut self, client: &Client, timeout: Duration) -> Result<D::Response> {
        execute(self, client, Some(timeout)).await
    }

    /// Asks the engine what this query would cost. Does not freeze the query.
    ///
    /// # Errors
    ///
    /// Same as [`Query::execute`].
    pub async fn get_cost(&self, client: &Client) -> Result<Hbar> {
        execute(&mut QueryCost { query: self }, client, None).await
    }

    /// Parses a query from its request envelope. The result is mutable.
    ///
    /// # Errors
    ///
    /// Returns an error if the envelope is not tagged with this kind or its
    /// body does not decode.
    pub fn from_envelope(json: &str) -> Result<Self> {
        let body = decode_envelope::<QueryBody<D>>(D::KIND, json)?;
        Ok(Self { body, frozen: false })
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

    fn validate_local(&self, ledger_id: &LedgerId) -> hgraph_ledger_types::Result<()> {
        if let Some(duration) = self.body.payment.transaction_valid_duration {
            check_transaction_valid_duration(duration)?;
        }
        self.body.data.validate()?;
        self.body.data.validate_checksums(ledger_id)?;
        self.body.payment.validate_checksums(ledger_id)
    }

    fn body_with_defaults(&self, client: &Client) -> QueryBody<D> {
        let config = client.config();
        let mut body = self.body.clone();
        let payment = &mut body.payment;
        if payment.max_amount.is_none() {
            payment.max_amount = config.default_max_query_payment();
        }
        if payment.max_transaction_fee.is_none() {
            payment.max_transaction_fee = config.default_max_transaction_fee();
        }
        if payment.transaction_valid_duration.is_none() {
            payment.transaction_valid_duration = Some(config.default_transaction_valid_duration());
        }
        body
    }
}

impl<D: QueryData> Execute for Query<D> {
    type Response = D::Response;

    fn kind(&self) -> &'static str {
        D::KIND
    }

    fn freeze_for_execution(&mut self) {
        self.freeze();
    }

    fn validate_for_execution(&self, ledger_id: &LedgerId) -> hgraph_ledger_types::Result<()> {
        self.validate_local(ledger_id)
    }

    fn request_envelope(&self, client: &Client) -> Result<String> {
        encode_envelope(D::KIND, &self.body_with_defaults(client))
    }

    fn signer_handles(&self) -> Vec<Signer> {
        Vec::new()
    }
}

/// Cost request wrapping a query: `{"queryCost": {"query": <query envelope>}}`.
struct QueryCost<'a, D> {
    query: &'a Query<D>,
}

#[derive(Serialize)]
struct QueryCostBody<'a, D> {
    query: crate::execute::Envelope<'a, QueryBody<D>>,
}

const QUERY_COST_KIND: &str = "queryCost";

impl<D: QueryData> Execute for QueryCost<'_, D> {
    type Response = Hbar;

    fn kind(&self) -> &'static str {
        QUERY_COST_KIND
    }

    fn freeze_for_execution(&mut self) {}

    fn validate_for_execution(&self, ledger_id: &LedgerId) -> hgraph_ledger_types::Result<()> {
        self.query.validate_local(ledger_id)
    }

    fn request_envelope(&self, client: &Client) -> Result<String> {
        let body = self.query.body_with_defaults(client);
        let cost =
            QueryCostBody { query: crate::execute::Envelope { kind: D::KIND, body: &body } };
        encode_envelope(QUERY_COST_KIND, &cost)
    }

    fn signer_handles(&self) -> Vec<Signer> {
        Vec::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use hgraph_ledger_types::LedgerError;

    use super::*;

    #[test]
    fn test_payment_setters_rejected_after_freeze() {
        let mut query = AccountBalanceQuery::new();
        query.freeze();

        let account = AccountId::new(0, 0, 2);
        let results = [
            ("node_account_ids", query.set_node_account_ids([account.clone()]).map(|_| ())),
            ("amount", query.set_payment_amount(Hbar::new(1)).map(|_| ())),
            ("max_amount", query.set_max_payment_amount(Hbar::new(1)).map(|_| ())),
            ("max_transaction_fee", query.set_payment_max_transaction_fee(Hbar::new(1)).map(|_| ())),
            ("transaction_memo", query.set_payment_transaction_memo("memo".to_string()).map(|_| ())),
            ("payer_account_id", query.set_payer_account_id(account.clone()).map(|_| ())),
            ("transaction_id", query.set_payment_transaction_id(TransactionId::generate(account)).map(|_| ())),
            (
                "transaction_valid_duration",
                query.set_payment_transaction_valid_duration(Duration::from_secs(5)).map(|_| ()),
            ),
        ];
        for (expected, result) in results {
            match result {
                Err(LedgerError::FrozenMutation { field }) => assert_eq!(field, expected),
                other => panic!("{expected}: expected FrozenMutation, got {other:?}"),
            }
        }
        assert_eq!(query.payment(), &PaymentTransaction::default());
    }

    #[test]
    fn test_payment_nested_in_envelope() {
        let mut query = AccountBalanceQuery::new();
        query
            .set_account_id(AccountId::new(0, 0, 3))
            .unwrap()
            .set_node_account_ids([AccountId::new(0, 0, 4)])
            .unwrap()
            .set_payment_amount(Hbar::from_tinybars(10))
            .unwrap();

        let json: serde_json::Value = serde_json::from_str(&query.to_envelope().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"accountBalance": {
                "accountId": "0.0.3",
                "payment": {"nodeAccountIds": ["0.0.4"], "amount": 10}
            }})
        );
    }

    #[test]
    fn test_payment_checksums_validated() {
        let mut query = AccountBalanceQuery::new();
        query.set_payer_account_id("0.0.123-esxsf".parse().unwrap()).unwrap();

        assert!(query.validate_local(&LedgerId::TESTNET).is_ok());
        assert!(matches!(
            query.validate_local(&LedgerId::MAINNET),
            Err(LedgerError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_payment_valid_duration_bounds() {
        let mut query = AccountBalanceQuery::new();
        for duration in [Duration::from_millis(500), Duration::from_secs(100_000)] {
            let err = query.set_payment_transaction_valid_duration(duration).map(|_| ()).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidArgument { .. }), "{duration:?}");
        }
        query.set_payment_transaction_valid_duration(Duration::from_secs(30)).unwrap();
        query.validate_local(&LedgerId::TESTNET).unwrap();

        query.body.payment.transaction_valid_duration = Some(Duration::from_secs(181));
        assert!(matches!(query.validate_local(&LedgerId::TESTNET), Err(LedgerError::InvalidArgument { .. })));
    }
}
