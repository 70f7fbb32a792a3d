//! Grants hbar, fungible token and NFT allowances from owners to spenders.
//!
//! NFT approvals aggregate: approving another serial for the same
//! (token, owner, spender) appends to the existing serial-list entry instead
//! of adding a new one. Approve-all and revoke-all grants are always kept as
//! independent entries.

use hgraph_ledger_types::{
    AccountId, Hbar, HbarAllowance, LedgerId, NftId, Result, TokenAllowance, TokenId, TokenNftAllowance,
    ValidateChecksums,
};
use serde::{Deserialize, Serialize};

use super::{Transaction, TransactionData};

/// Creates or updates allowances for one or more spenders.
pub type AccountAllowanceApproveTransaction = Transaction<AccountAllowanceApproveTransactionData>;

/// Fields of an [`AccountAllowanceApproveTransaction`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAllowanceApproveTransactionData {
    #[serde(default)]
    hbar_allowances: Vec<HbarAllowance>,
    #[serde(default)]
    token_allowances: Vec<TokenAllowance>,
    #[serde(default)]
    nft_allowances: Vec<TokenNftAllowance>,
}

impl TransactionData for AccountAllowanceApproveTransactionData {
    const KIND: &'static str = "accountAllowanceApprove";
}

impl ValidateChecksums for AccountAllowanceApproveTransactionData {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.hbar_allowances.validate_checksums(ledger_id)?;
        self.token_allowances.validate_checksums(ledger_id)?;
        self.nft_allowances.validate_checksums(ledger_id)
    }
}

impl AccountAllowanceApproveTransaction {
    /// Approves `spender` to spend up to `amount` of `owner`'s hbar.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn approve_hbar_allowance(
        &mut self,
        owner_account_id: AccountId,
        spender_account_id: AccountId,
        amount: Hbar,
    ) -> Result<&mut Self> {
        self.data_mut("hbar_allowances")?.hbar_allowances.push(HbarAllowance {
            owner_account_id,
            spender_account_id,
            amount,
        });
        Ok(self)
    }

    /// Approves `spender` to spend up to `amount` units of `owner`'s `token_id`.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn approve_token_allowance(
        &mut self,
        token_id: TokenId,
        owner_account_id: AccountId,
        spender_account_id: AccountId,
        amount: u64,
    ) -> Result<&mut Self> {
        self.data_mut("token_allowances")?.token_allowances.push(TokenAllowance {
            token_id,
            owner_account_id,
            spender_account_id,
            amount,
        });
        Ok(self)
    }

    /// Approves `spender` to transfer one NFT of `owner`.
    ///
    /// Appends the serial to an existing serial-list entry for the same
    /// token, owner and spender; otherwise adds a new entry.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn approve_token_nft_allowance(
        &mut self,
        nft_id: NftId,
        owner_account_id: AccountId,
        spender_account_id: AccountId,
    ) -> Result<&mut Self> {
        let allowances = &mut self.data_mut("nft_allowances")?.nft_allowances;

        let existing = allowances.iter_mut().find(|allowance| {
            allowance.token_id == nft_id.token_id
                && allowance.owner_account_id == owner_account_id
                && allowance.spender_account_id == spender_account_id
                && allowance.approved_for_all.is_none()
        });

        match existing {
            Some(allowance) => allowance.serials.push(nft_id.serial),
            None => allowances.push(TokenNftAllowance {
                token_id: nft_id.token_id,
                owner_account_id,
                spender_account_id,
                serials: vec![nft_id.serial],
                approved_for_all: None,
                delegating_spender_account_id: None,
            }),
        }
        Ok(self)
    }

    /// Approves `spender` for every NFT of `token_id` held by `owner`, now and in the future.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn approve_token_nft_allowance_all_serials(
        &mut self,
        token_id: TokenId,
        owner_account_id: AccountId,
        spender_account_id: AccountId,
    ) -> Result<&mut Self> {
        self.push_all_serials(token_id, owner_account_id, spender_account_id, true)
    }

    /// Revokes a previous approve-all grant.
    ///
    /// # Errors
    ///
    /// Returns `FrozenMutation` if the transaction is frozen.
    pub fn delete_token_nft_allowance_all_serials(
        &mut self,
        token_id: TokenId,
        owner_account_id: AccountId,
        spender_account_id: AccountId,
    ) -> Result<&mut Self> {
        self.push_all_serials(token_id, owner_account_id, spender_account_id, false)
    }

    fn push_all_serials(
        &mut self,
        token_id: TokenId,
        owner_account_id: AccountId,
        spender_account_id: AccountId,
        approved: bool,
    ) -> Result<&mut Self> {
        self.data_mut("nft_allowances")?.nft_allowances.push(TokenNftAllowance {
            token_id,
            owner_account_id,
            spender_account_id,
            serials: Vec::new(),
            approved_for_all: Some(approved),
            delegating_spender_account_id: None,
        });
        Ok(self)
    }

    /// Hbar allowances in insertion order.
    #[must_use]
    pub fn hbar_approvals(&self) -> &[HbarAllowance] {
        &self.data().hbar_allowances
    }

    /// Fungible token allowances in insertion order.
    #[must_use]
    pub fn token_approvals(&self) -> &[TokenAllowance] {
        &self.data().token_allowances
    }

    /// NFT allowances in insertion order.
    #[must_use]
    pub fn nft_approvals(&self) -> &[TokenNftAllowance] {
        &self.data().nft_allowances
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use hgraph_ledger_types::{LedgerError, LedgerId};

    use super::*;
    use crate::execute::Execute;

    fn owner() -> AccountId {
        AccountId::new(0, 0, 1001)
    }

    fn spender() -> AccountId {
        AccountId::new(0, 0, 1002)
    }

    #[test]
    fn test_nft_serials_aggregate_into_one_entry() {
        let token = TokenId::new(0, 0, 500);
        let mut tx = AccountAllowanceApproveTransaction::new();
        for serial in 1..=3 {
            tx.approve_token_nft_allowance(token.nft(serial), owner(), spender()).unwrap();
        }

        assert_eq!(tx.nft_approvals().len(), 1);
        assert_eq!(tx.nft_approvals()[0].serials, vec![1, 2, 3]);
        assert_eq!(tx.nft_approvals()[0].approved_for_all, None);
    }

    #[test]
    fn test_approve_all_is_independent_entry() {
        let token = TokenId::new(0, 0, 500);
        let mut tx = AccountAllowanceApproveTransaction::new();
        tx.approve_token_nft_allowance(token.nft(1), owner(), spender())
            .unwrap()
            .approve_token_nft_allowance_all_serials(token, owner(), spender())
            .unwrap()
            .approve_token_nft_allowance(token.nft(2), owner(), spender())
            .unwrap();

        let approvals = tx.nft_approvals();
        assert_eq!(approvals.len(), 2);
        assert_eq!(approvals[0].serials, vec![1, 2]);
        assert_eq!(approvals[1].serials, Vec::<u64>::new());
        assert_eq!(approvals[1].approved_for_all, Some(true));
    }

    #[test]
    fn test_different_spender_gets_new_entry() {
        let token = TokenId::new(0, 0, 500);
        let mut tx = AccountAllowanceApproveTransaction::new();
        tx.approve_token_nft_allowance(token.nft(1), owner(), spender())
            .unwrap()
            .approve_token_nft_allowance(token.nft(2), owner(), AccountId::new(0, 0, 7))
            .unwrap()
            .approve_token_nft_allowance(TokenId::new(0, 0, 501).nft(3), owner(), spender())
            .unwrap();
        assert_eq!(tx.nft_approvals().len(), 3);
    }

    #[test]
    fn test_delete_all_serials_pushes_revoke() {
        let token = TokenId::new(0, 0, 500);
        let mut tx = AccountAllowanceApproveTransaction::new();
        tx.delete_token_nft_allowance_all_serials(token, owner(), spender()).unwrap();
        assert_eq!(tx.nft_approvals()[0].approved_for_all, Some(false));
    }

    #[test]
    fn test_aggregation_rejected_after_freeze() {
        let token = TokenId::new(0, 0, 500);
        let mut tx = AccountAllowanceApproveTransaction::new();
        tx.approve_token_nft_allowance(token.nft(1), owner(), spender()).unwrap();
        tx.freeze();

        let err = tx.approve_token_nft_allowance(token.nft(2), owner(), spender()).map(|_| ()).unwrap_err();
        assert!(matches!(err, LedgerError::FrozenMutation { field: "nft_allowances" }));
        assert!(tx.approve_hbar_allowance(owner(), spender(), Hbar::new(1)).is_err());
        assert!(tx.approve_token_allowance(token, owner(), spender(), 1).is_err());
        assert!(tx.approve_token_nft_allowance_all_serials(token, owner(), spender()).is_err());
        assert!(tx.delete_token_nft_allowance_all_serials(token, owner(), spender()).is_err());
        assert_eq!(tx.nft_approvals()[0].serials, vec![1]);
    }

    #[test]
    fn test_checksums_validated_in_every_allowance_list() {
        let mut tx = AccountAllowanceApproveTransaction::new();
        tx.approve_hbar_allowance(owner(), "0.0.123-vfmkw".parse().unwrap(), Hbar::new(5)).unwrap();

        assert!(tx.validate_for_execution(&LedgerId::MAINNET).is_ok());
        let err = tx.validate_for_execution(&LedgerId::TESTNET).unwrap_err();
        assert!(matches!(err, LedgerError::ChecksumMismatch { .. }));
    }
}
