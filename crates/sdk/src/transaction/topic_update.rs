//! Updates the properties of an existing topic.
//!
//! Every field is optional; unset fields are left unchanged by the network.

use std::time::Duration;

use chrono::{DateTime, Utc};
use hgraph_ledger_types::{AccountId, Key, LedgerId, Result, TopicId, ValidateChecksums};
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};

use super::{Transaction, TransactionData};
use crate::config::check_whole_seconds;

/// Changes the memo, keys, expiry or renewal settings of a topic.
pub type TopicUpdateTransaction = Transaction<TopicUpdateTransactionData>;

/// Fields of a [`TopicUpdateTransaction`].
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicUpdateTransactionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    topic_id: Option<TopicId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiration_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    topic_memo: Option<String>,
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

impl TransactionData for TopicUpdateTransactionData {
    const KIND: &'static str = "topicUpdate";
}

impl ValidateChecksums for TopicUpdateTransactionData {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.topic_id.validate_checksums(ledger_id)?;
        self.admin_key.validate_checksums(ledger_id)?;
        self.submit_key.validate_checksums(ledger_id)?;
        self.auto_renew_account_id.validate_checksums(ledger_id)
    }
}

impl TopicUpdateTransaction {
    /// Topic to update.
    #[must_use]
    pub fn topic_id(&self) -> Option<TopicId> {
        self.data().topic_id
    }

    /// Sets the topic to update.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_topic_id(&mut self, topic_id: impl Into<TopicId>) -> Result<&mut Self> {
        self.data_mut("topic_id")?.topic_id = Some(topic_id.into());
        Ok(self)
    }

    /// New expiration time.
    #[must_use]
    pub fn expiration_time(&self) -> Option<DateTime<Utc>> {
        self.data().expiration_time
    }

    /// Sets a new expiration time.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_expiration_time(&mut self, expiration_time: DateTime<Utc>) -> Result<&mut Self> {
        self.data_mut("expiration_time")?.expiration_time = Some(expiration_time);
        Ok(self)
    }

    /// New memo.
    #[must_use]
    pub fn topic_memo(&self) -> Option<&str> {
        self.data().topic_memo.as_deref()
    }

    /// Sets a new memo.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_topic_memo(&mut self, memo: impl Into<String>) -> Result<&mut Self> {
        self.data_mut("topic_memo")?.topic_memo = Some(memo.into());
        Ok(self)
    }

    /// Unsets the memo so it is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn clear_topic_memo(&mut self) -> Result<&mut Self> {
        self.data_mut("topic_memo")?.topic_memo = None;
        Ok(self)
    }

    /// New admin key.
    #[must_use]
    pub fn admin_key(&self) -> Option<&Key> {
        self.data().admin_key.as_ref()
    }

    /// Sets a new admin key.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_admin_key(&mut self, key: impl Into<Key>) -> Result<&mut Self> {
        self.data_mut("admin_key")?.admin_key = Some(key.into());
        Ok(self)
    }

    /// Unsets the admin key so it is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn clear_admin_key(&mut self) -> Result<&mut Self> {
        self.data_mut("admin_key")?.admin_key = None;
        Ok(self)
    }

    /// New submit key.
    #[must_use]
    pub fn submit_key(&self) -> Option<&Key> {
        self.data().submit_key.as_ref()
    }

    /// Sets a new submit key.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_submit_key(&mut self, key: impl Into<Key>) -> Result<&mut Self> {
        self.data_mut("submit_key")?.submit_key = Some(key.into());
        Ok(self)
    }

    /// Unsets the submit key so it is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn clear_submit_key(&mut self) -> Result<&mut Self> {
        self.data_mut("submit_key")?.submit_key = None;
        Ok(self)
    }

    /// New auto-renew period.
    #[must_use]
    pub fn auto_renew_period(&self) -> Option<Duration> {
        self.data().auto_renew_period
    }

    /// Sets a new auto-renew period.
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

    /// New auto-renew account.
    #[must_use]
    pub fn auto_renew_account_id(&self) -> Option<&AccountId> {
        self.data().auto_renew_account_id.as_ref()
    }

    /// Sets a new auto-renew account.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_auto_renew_account_id(&mut self, account_id: AccountId) -> Result<&mut Self> {
        self.data_mut("auto_renew_account_id")?.auto_renew_account_id = Some(account_id);
        Ok(self)
    }

    /// Unsets the auto-renew account so it is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn clear_auto_renew_account_id(&mut self) -> Result<&mut Self> {
        self.data_mut("auto_renew_account_id")?.auto_renew_account_id = None;
        Ok(self)
    }
}
