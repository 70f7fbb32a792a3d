//! Wipes token balance from a non-treasury account.

use hgraph_ledger_types::{AccountId, LedgerId, Result, TokenId, ValidateChecksums};
use serde::{Deserialize, Serialize};

use super::{Transaction, TransactionData};

/// Wipes fungible units or NFT serials held by an account.
pub type TokenWipeTransaction = Transaction<TokenWipeTransactionData>;

/// Fields of a [`TokenWipeTransaction`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenWipeTransactionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_id: Option<TokenId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    account_id: Option<AccountId>,
    #[serde(default)]
    amount: u64,
    #[serde(default)]
    serials: Vec<u64>,
}

impl TransactionData for TokenWipeTransactionData {
    const KIND: &'static str = "tokenWipe";
}

impl ValidateChecksums for TokenWipeTransactionData {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.token_id.validate_checksums(ledger_id)?;
        self.account_id.validate_checksums(ledger_id)
    }
}

impl TokenWipeTransaction {
    /// Token to wipe.
    #[must_use]
    pub fn token_id(&self) -> Option<TokenId> {
        self.data().token_id
    }

    /// Sets the token to wipe.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_token_id(&mut self, token_id: impl Into<TokenId>) -> Result<&mut Self> {
        self.data_mut("token_id")?.token_id = Some(token_id.into());
        Ok(self)
    }

    /// Account whose balance is wiped.
    #[must_use]
    pub fn account_id(&self) -> Option<&AccountId> {
        self.data().account_id.as_ref()
    }

    /// Sets the account whose balance is wiped.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_account_id(&mut self, account_id: AccountId) -> Result<&mut Self> {
        self.data_mut("account_id")?.account_id = Some(account_id);
        Ok(self)
    }

    /// Fungible units to wipe.
    #[must_use]
    pub fn amount(&self) -> u64 {
        self.data().amount
    }

    /// Sets the fungible units to wipe.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_amount(&mut self, amount: u64) -> Result<&mut Self> {
        self.data_mut("amount")?.amount = amount;
        Ok(self)
    }

    /// NFT serials to wipe.
    #[must_use]
    pub fn serials(&self) -> &[u64] {
        &self.data().serials
    }

    /// Replaces the NFT serials to wipe.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_serials(&mut self, serials: impl IntoIterator<Item = u64>) -> Result<&mut Self> {
        self.data_mut("serials")?.serials = serials.into_iter().collect();
        Ok(self)
    }

    /// Appends one NFT serial.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn add_serial(&mut self, serial: u64) -> Result<&mut Self> {
        self.data_mut("serials")?.serials.push(serial);
        Ok(self)
    }
}
