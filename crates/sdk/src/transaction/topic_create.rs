//! Creates a consensus topic.

use std::time::Duration;

use hgraph_ledger_types::{AccountId, Key, LedgerId, Result, ValidateChecksums};
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};

use super::{Transaction, TransactionData};
use crate::config::check_whole_seconds;

/// Auto-renew period applied to new topics (90 days).
pub const DEFAULT_TOPIC_AUTO_RENEW_PERIOD: Duration = Duration::from_secs(7_890_000);

/// Creates a topic that messages can be submitted to.
pub type TopicCreateTransaction = Transaction<TopicCreateTransactionData>;

/// Fields of a [`TopicCreateTransaction`].
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicCreateTransactionData {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    topic_memo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    admin_key: Option<Key>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    submit_key: Option<Key>,
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auto_renew_period: Option<Duration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auto_renew_account_id: Option<AccountId>,
}

impl Default for TopicCreateTransactionData {
    fn default() -> Self {
        Self {
            topic_memo: String::new(),
            admin_key: None,
            submit_key: None,
            auto_renew_period: Some(DEFAULT_TOPIC_AUTO_RENEW_PERIOD),
            auto_renew_account_id: None,
        }
    }
}

impl TransactionData for TopicCreateTransactionData {
    const KIND: &'static str = "topicCreate";
}

impl ValidateChecksums for TopicCreateTransactionData {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.admin_key.validate_checksums(ledger_id)?;
        self.submit_key.validate_checksums(ledger_id)?;
        self.auto_renew_account_id.validate_checksums(ledger_id)
    }
}

impl TopicCreateTransaction {
    /// Short publicly visible memo.
    #[must_use]
    pub fn topic_memo(&self) -> &str {
        &self.data().topic_memo
    }

    /// Sets the topic memo.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_topic_memo(&mut self, memo: impl Into<String>) -> Result<&mut Self> {
        self.data_mut("topic_memo")?.topic_memo = memo.into();
        Ok(self)
    }

    /// Key allowed to update or delete the topic.
    #[must_use]
    pub fn admin_key(&self) -> Option<&Key> {
        self.data().admin_key.as_ref()
    }

    /// Sets the admin key.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_admin_key(&mut self, key: impl Into<Key>) -> Result<&mut Self> {
        self.data_mut("admin_key")?.admin_key = Some(key.into());
        Ok(self)
    }

    /// Key required to submit messages.
    #[must_use]
    pub fn submit_key(&self) -> Option<&Key> {
        self.data().submit_key.as_ref()
    }

    /// Sets the submit key. Without one, anyone may submit.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_submit_key(&mut self, key: impl Into<Key>) -> Result<&mut Self> {
        self.data_mut("submit_key")?.submit_key = Some(key.into());
        Ok(self)
    }

    /// Interval at which the auto-renew account is charged.
    #[must_use]
    pub fn auto_renew_period(&self) -> Option<Duration> {
        self.data().auto_renew_period
    }

    /// Sets the auto-renew period.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen and
    /// `InvalidArgument` if `period` has a sub-second part.
    pub fn set_auto_renew_period(&mut self, period: Duration) -> Result<&mut Self> {
        let data = self.data_mut("auto_renew_period")?;
        check_whole_seconds("auto renew period", period)?;
        data.auto_renew_period = Some(period);
        Ok(self)
    }

    /// Account charged to extend the topic's lifetime.
    #[must_use]
    pub fn auto_renew_account_id(&self) -> Option<&AccountId> {
        self.data().auto_renew_account_id.as_ref()
    }

    /// Sets the auto-renew account.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_auto_renew_account_id(&mut self, account_id: AccountId) -> Result<&mut Self> {
        self.data_mut("auto_renew_account_id")?.auto_renew_account_id = Some(account_id);
        Ok(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_default_auto_renew_period() {
        let tx = TopicCreateTransaction::new();
        assert_eq!(tx.auto_renew_period(), Some(DEFAULT_TOPIC_AUTO_RENEW_PERIOD));

        let json: serde_json::Value = serde_json::from_str(&tx.to_envelope().unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"topicCreate": {"autoRenewPeriod": 7_890_000}}));
    }

    #[test]
    fn test_contract_admin_key() {
        let mut tx = TopicCreateTransaction::new();
        tx.set_admin_key(hgraph_ledger_types::ContractId::new(0, 0, 42)).unwrap().set_topic_memo("news").unwrap();

        let json: serde_json::Value = serde_json::from_str(&tx.to_envelope().unwrap()).unwrap();
        assert_eq!(json["topicCreate"]["adminKey"], serde_json::json!({"contractId": "0.0.42"}));
        assert_eq!(json["topicCreate"]["topicMemo"], "news");
    }

    #[test]
    fn test_fractional_auto_renew_period_rejected() {
        let mut tx = TopicCreateTransaction::new();
        let err = tx.set_auto_renew_period(Duration::from_millis(1_500)).map(|_| ()).unwrap_err();
        assert!(matches!(err, hgraph_ledger_types::LedgerError::InvalidArgument { .. }), "{err}");
        assert_eq!(tx.auto_renew_period(), Some(DEFAULT_TOPIC_AUTO_RENEW_PERIOD));
    }
}
