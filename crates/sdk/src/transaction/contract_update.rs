//! Updates the properties of a smart contract instance.
//!
//! Staking targets are mutually exclusive: setting `staked_account_id`
//! clears `staked_node_id` and the other way round. Every `clear_*` method
//! unsets its field, so the network leaves that property unchanged.

use std::time::Duration;

use chrono::{DateTime, Utc};
use hgraph_ledger_types::{AccountId, ContractId, Key, LedgerId, Result, ValidateChecksums};
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};

use super::{Transaction, TransactionData};
use crate::config::check_whole_seconds;

/// Modifies a contract's admin key, expiry, renewal, memo or staking settings.
pub type ContractUpdateTransaction = Transaction<ContractUpdateTransactionData>;

/// Fields of a [`ContractUpdateTransaction`].
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractUpdateTransactionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    contract_id: Option<ContractId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiration_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    admin_key: Option<Key>,
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auto_renew_period: Option<Duration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    contract_memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_automatic_token_associations: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auto_renew_account_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    proxy_account_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    staked_account_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    staked_node_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decline_staking_reward: Option<bool>,
}

impl TransactionData for ContractUpdateTransactionData {
    const KIND: &'static str = "contractUpdate";
}

impl ValidateChecksums for ContractUpdateTransactionData {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.contract_id.validate_checksums(ledger_id)?;
        self.admin_key.validate_checksums(ledger_id)?;
        self.auto_renew_account_id.validate_checksums(ledger_id)?;
        self.proxy_account_id.validate_checksums(ledger_id)?;
        self.staked_account_id.validate_checksums(ledger_id)
    }
}

impl ContractUpdateTransaction {
    /// Contract to update.
    #[must_use]
    pub fn contract_id(&self) -> Option<ContractId> {
        self.data().contract_id
    }

    /// Sets the contract to update.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_contract_id(&mut self, contract_id: impl Into<ContractId>) -> Result<&mut Self> {
        self.data_mut("contract_id")?.contract_id = Some(contract_id.into());
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

    /// New memo.
    #[must_use]
    pub fn contract_memo(&self) -> Option<&str> {
        self.data().contract_memo.as_deref()
    }

    /// Sets a new memo. An empty memo is distinct from an unset one.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_contract_memo(&mut self, memo: impl Into<String>) -> Result<&mut Self> {
        self.data_mut("contract_memo")?.contract_memo = Some(memo.into());
        Ok(self)
    }

    /// Unsets the memo.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn clear_contract_memo(&mut self) -> Result<&mut Self> {
        self.data_mut("contract_memo")?.contract_memo = None;
        Ok(self)
    }

    /// New limit on automatic token associations.
    #[must_use]
    pub fn max_automatic_token_associations(&self) -> Option<u32> {
        self.data().max_automatic_token_associations
    }

    /// Sets the limit on automatic token associations.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_max_automatic_token_associations(&mut self, max: u32) -> Result<&mut Self> {
        self.data_mut("max_automatic_token_associations")?.max_automatic_token_associations = Some(max);
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

    /// Unsets the auto-renew account.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn clear_auto_renew_account_id(&mut self) -> Result<&mut Self> {
        self.data_mut("auto_renew_account_id")?.auto_renew_account_id = None;
        Ok(self)
    }

    /// Proxy account (deprecated by the network, still accepted).
    #[must_use]
    pub fn proxy_account_id(&self) -> Option<&AccountId> {
        self.data().proxy_account_id.as_ref()
    }

    /// Sets the proxy account.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_proxy_account_id(&mut self, account_id: AccountId) -> Result<&mut Self> {
        self.data_mut("proxy_account_id")?.proxy_account_id = Some(account_id);
        Ok(self)
    }

    /// Account the contract stakes to.
    #[must_use]
    pub fn staked_account_id(&self) -> Option<&AccountId> {
        self.data().staked_account_id.as_ref()
    }

    /// Stakes to an account. Clears any staked node id.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_staked_account_id(&mut self, account_id: AccountId) -> Result<&mut Self> {
        let data = self.data_mut("staked_account_id")?;
        data.staked_account_id = Some(account_id);
        data.staked_node_id = None;
        Ok(self)
    }

    /// Unsets the staked account id.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn clear_staked_account_id(&mut self) -> Result<&mut Self> {
        self.data_mut("staked_account_id")?.staked_account_id = None;
        Ok(self)
    }

    /// Node the contract stakes to.
    #[must_use]
    pub fn staked_node_id(&self) -> Option<u64> {
        self.data().staked_node_id
    }

    /// Stakes to a node. Clears any staked account id.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_staked_node_id(&mut self, node_id: u64) -> Result<&mut Self> {
        let data = self.data_mut("staked_node_id")?;
        data.staked_node_id = Some(node_id);
        data.staked_account_id = None;
        Ok(self)
    }

    /// Unsets the staked node id.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn clear_staked_node_id(&mut self) -> Result<&mut Self> {
        self.data_mut("staked_node_id")?.staked_node_id = None;
        Ok(self)
    }

    /// Whether the contract declines staking rewards.
    #[must_use]
    pub fn decline_staking_reward(&self) -> Option<bool> {
        self.data().decline_staking_reward
    }

    /// Sets whether the contract declines staking rewards.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_decline_staking_reward(&mut self, decline: bool) -> Result<&mut Self> {
        self.data_mut("decline_staking_reward")?.decline_staking_reward = Some(decline);
        Ok(self)
    }

    /// Unsets the staking reward preference.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn clear_decline_staking_reward(&mut self) -> Result<&mut Self> {
        self.data_mut("decline_staking_reward")?.decline_staking_reward = None;
        Ok(self)
    }
}
