//! Account metadata.

use std::time::Duration;

use chrono::{DateTime, Utc};
use hgraph_ledger_types::{AccountId, Hbar, Key, LedgerId, PublicKey, Result, ValidateChecksums};
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};

use super::{Query, QueryData};

/// Fetches the current state of an account.
pub type AccountInfoQuery = Query<AccountInfoQueryData>;

/// Fields of an [`AccountInfoQuery`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfoQueryData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    account_id: Option<AccountId>,
}

impl QueryData for AccountInfoQueryData {
    const KIND: &'static str = "accountInfo";
    type Response = AccountInfo;
}

impl ValidateChecksums for AccountInfoQueryData {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.account_id.validate_checksums(ledger_id)
    }
}

impl AccountInfoQuery {
    /// Account to describe.
    #[must_use]
    pub fn account_id(&self) -> Option<&AccountId> {
        self.data().account_id.as_ref()
    }

    /// Sets the account to describe.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the query is frozen.
    pub fn set_account_id(&mut self, account_id: AccountId) -> Result<&mut Self> {
        self.data_mut("account_id")?.account_id = Some(account_id);
        Ok(self)
    }
}

/// Current state of an account.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// The account described.
    pub account_id: AccountId,
    /// Solidity address of the account as hex.
    #[serde(default)]
    pub contract_account_id: String,
    /// Whether the account has been deleted.
    #[serde(default)]
    pub is_deleted: bool,
    /// Proxy account, if any.
    #[serde(default)]
    pub proxy_account_id: Option<AccountId>,
    /// Hbar proxy-staked to this account.
    #[serde(default)]
    pub proxy_received: Hbar,
    /// Key that must sign for the account.
    #[serde(default)]
    pub key: Option<Key>,
    /// Current balance.
    #[serde(default)]
    pub balance: Hbar,
    /// Whether transfers into the account need its signature.
    #[serde(default)]
    pub is_receiver_signature_required: bool,
    /// When the account expires.
    #[serde(default)]
    pub expiration_time: Option<DateTime<Utc>>,
    /// Auto-renew interval.
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    #[serde(default)]
    pub auto_renew_period: Option<Duration>,
    /// Account memo.
    #[serde(default)]
    pub account_memo: String,
    /// Number of NFTs owned.
    #[serde(default)]
    pub owned_nfts: u64,
    /// Limit on automatic token associations.
    #[serde(default)]
    pub max_automatic_token_associations: u32,
    /// Alias key, if the account was created from one.
    #[serde(default)]
    pub alias_key: Option<PublicKey>,
    /// Ethereum transaction nonce.
    #[serde(default)]
    pub ethereum_nonce: u64,
    /// Ledger the information came from.
    #[serde(default)]
    pub ledger_id: Option<LedgerId>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_response_decodes() {
        let info: AccountInfo = serde_json::from_str(r#"{"accountId":"0.0.1001"}"#).unwrap();
        assert_eq!(info.account_id, AccountId::new(0, 0, 1001));
        assert_eq!(info.balance, Hbar::ZERO);
        assert!(info.key.is_none());
        assert!(info.auto_renew_period.is_none());
    }

    #[test]
    fn test_full_response_decodes() {
        let info: AccountInfo = serde_json::from_str(
            r#"{
                "accountId": "0.0.1001",
                "isDeleted": false,
                "key": {"contractId": "0.0.4"},
                "balance": 2500,
                "autoRenewPeriod": 7776000,
                "accountMemo": "treasury",
                "ledgerId": "testnet",
                "somethingNew": [1, 2]
            }"#,
        )
        .unwrap();
        assert_eq!(info.balance, Hbar::from_tinybars(2500));
        assert_eq!(info.auto_renew_period, Some(Duration::from_secs(7_776_000)));
        assert_eq!(info.ledger_id, Some(LedgerId::TESTNET));
        assert_eq!(info.account_memo, "treasury");
    }
}
