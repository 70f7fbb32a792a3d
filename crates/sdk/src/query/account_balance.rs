//! Balance of an account or contract.

use std::collections::HashMap;

use hgraph_ledger_types::{AccountId, ContractId, Hbar, LedgerId, Result, TokenId, ValidateChecksums};
use serde::{Deserialize, Serialize};

use super::{Query, QueryData};

/// Fetches the hbar and token balances of an account or contract.
///
/// `account_id` and `contract_id` are mutually exclusive; setting one
/// clears the other.
pub type AccountBalanceQuery = Query<AccountBalanceQueryData>;

/// Fields of an [`AccountBalanceQuery`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalanceQueryData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    account_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    contract_id: Option<ContractId>,
}

impl QueryData for AccountBalanceQueryData {
    const KIND: &'static str = "accountBalance";
    type Response = AccountBalance;
}

impl ValidateChecksums for AccountBalanceQueryData {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.account_id.validate_checksums(ledger_id)?;
        self.contract_id.validate_checksums(ledger_id)
    }
}

impl AccountBalanceQuery {
    /// Account whose balance is requested.
    #[must_use]
    pub fn account_id(&self) -> Option<&AccountId> {
        self.data().account_id.as_ref()
    }

    /// Requests the balance of an account. Clears any contract id.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the query is frozen.
    pub fn set_account_id(&mut self, account_id: AccountId) -> Result<&mut Self> {
        let data = self.data_mut("account_id")?;
        data.account_id = Some(account_id);
        data.contract_id = None;
        Ok(self)
    }

    /// Contract whose balance is requested.
    #[must_use]
    pub fn contract_id(&self) -> Option<ContractId> {
        self.data().contract_id
    }

    /// Requests the balance of a contract. Clears any account id.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the query is frozen.
    pub fn set_contract_id(&mut self, contract_id: impl Into<ContractId>) -> Result<&mut Self> {
        let data = self.data_mut("contract_id")?;
        data.contract_id = Some(contract_id.into());
        data.account_id = None;
        Ok(self)
    }
}

/// Balances held by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    /// Account the balances belong to.
    pub account_id: AccountId,
    /// Hbar balance.
    #[serde(default)]
    pub hbars: Hbar,
    /// Fungible token balances by token.
    #[serde(default)]
    pub tokens: HashMap<TokenId, u64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_account_and_contract_exclusive() {
        let mut query = AccountBalanceQuery::new();
        query.set_account_id(AccountId::new(0, 0, 5)).unwrap().set_contract_id(ContractId::new(0, 0, 6)).unwrap();
        assert_eq!(query.account_id(), None);
        assert_eq!(query.contract_id(), Some(ContractId::new(0, 0, 6)));

        query.set_account_id(AccountId::new(0, 0, 5)).unwrap();
        assert_eq!(query.contract_id(), None);
    }

    #[test]
    fn test_response_defaults_missing_fields() {
        let balance: AccountBalance = serde_json::from_str(r#"{"accountId":"0.0.5","extra":true}"#).unwrap();
        assert_eq!(balance.hbars, Hbar::ZERO);
        assert!(balance.tokens.is_empty());

        let balance: AccountBalance =
            serde_json::from_str(r#"{"accountId":"0.0.5","hbars":100,"tokens":{"0.0.9":7}}"#).unwrap();
        assert_eq!(balance.hbars, Hbar::from_tinybars(100));
        assert_eq!(balance.tokens.get(&TokenId::new(0, 0, 9)), Some(&7));
    }
}
