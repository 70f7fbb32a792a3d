//! Revokes KYC for an account on a token.

use hgraph_ledger_types::{AccountId, LedgerId, Result, TokenId, ValidateChecksums};
use serde::{Deserialize, Serialize};

use super::{Transaction, TransactionData};

/// Revokes an account's KYC grant for a token.
pub type TokenRevokeKycTransaction = Transaction<TokenRevokeKycTransactionData>;

/// Fields of a [`TokenRevokeKycTransaction`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRevokeKycTransactionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    account_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_id: Option<TokenId>,
}

impl TransactionData for TokenRevokeKycTransactionData {
    const KIND: &'static str = "tokenRevokeKyc";
}

impl ValidateChecksums for TokenRevokeKycTransactionData {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.account_id.validate_checksums(ledger_id)?;
        self.token_id.validate_checksums(ledger_id)
    }
}

impl TokenRevokeKycTransaction {
    /// Target account.
    #[must_use]
    pub fn account_id(&self) -> Option<&AccountId> {
        self.data().account_id.as_ref()
    }

    /// Sets the target account.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_account_id(&mut self, account_id: AccountId) -> Result<&mut Self> {
        self.data_mut("account_id")?.account_id = Some(account_id);
        Ok(self)
    }

    /// Target token.
    #[must_use]
    pub fn token_id(&self) -> Option<TokenId> {
        self.data().token_id
    }

    /// Sets the target token.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_token_id(&mut self, token_id: impl Into<TokenId>) -> Result<&mut Self> {
        self.data_mut("token_id")?.token_id = Some(token_id.into());
        Ok(self)
    }
}
