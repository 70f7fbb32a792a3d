//! Unpauses a token.

use hgraph_ledger_types::{LedgerId, Result, TokenId, ValidateChecksums};
use serde::{Deserialize, Serialize};

use super::{Transaction, TransactionData};

/// Resumes operations on a paused token. Requires the token's pause key.
pub type TokenUnpauseTransaction = Transaction<TokenUnpauseTransactionData>;

/// Fields of a [`TokenUnpauseTransaction`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUnpauseTransactionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_id: Option<TokenId>,
}

impl TransactionData for TokenUnpauseTransactionData {
    const KIND: &'static str = "tokenUnpause";
}

impl ValidateChecksums for TokenUnpauseTransactionData {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.token_id.validate_checksums(ledger_id)
    }
}

impl TokenUnpauseTransaction {
    /// Token to unpause.
    #[must_use]
    pub fn token_id(&self) -> Option<TokenId> {
        self.data().token_id
    }

    /// Sets the token to unpause.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn set_token_id(&mut self, token_id: impl Into<TokenId>) -> Result<&mut Self> {
        self.data_mut("token_id")?.token_id = Some(token_id.into());
        Ok(self)
    }
}
