//! Burns fungible units or NFT serials from a token's treasury.

use hgraph_ledger_types::{LedgerId, Result, TokenId, ValidateChecksums};
use serde::{Deserialize, Serialize};

use super::{Transaction, TransactionData};

/// Burns tokens from the treasury account.
///
/// Fungible tokens use `amount`; non-fungible tokens list `serials`.
pub type TokenBurnTransaction = Transaction<TokenBurnTransactionData>;

/// Fields of a [`TokenBurnTransaction`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBurnTransactionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_id: Option<TokenId>,
    #[serde(default)]
    amount: u64,
    #[serde(default)]
    serials: Vec<u64>,
}

impl TransactionData for TokenBurnTransactionData {
    const KIND: &'static str = "tokenBurn";
}

impl ValidateChecksums for TokenBurnTransactionData {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.token_id.validate_checksums(ledger_id)
    }
}

impl TokenBurnTransaction {
    /// Token to burn.
    #[must_use]
    pub fn token_id(&self) -> Option<TokenId> {
        self.data().token_id
    }

    /// Sets the token to burn.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_token_id(&mut self, token_id: impl Into<TokenId>) -> Result<&mut Self> {
        self.data_mut("token_id")?.token_id = Some(token_id.into());
        Ok(self)
    }

    /// Fungible units to burn.
    #[must_use]
    pub fn amount(&self) -> u64 {
        self.data().amount
    }

    /// Sets the fungible units to burn.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_amount(&mut self, amount: u64) -> Result<&mut Self> {
        self.data_mut("amount")?.amount = amount;
        Ok(self)
    }

    /// NFT serials to burn.
    #[must_use]
    pub fn serials(&self) -> &[u64] {
        &self.data().serials
    }

    /// Replaces the NFT serials to burn.
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
