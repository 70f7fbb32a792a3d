//! Allowance entries granted by an owner account to a spender.

use serde::{Deserialize, Serialize};

use crate::{
    account_id::AccountId, checksum::ValidateChecksums, entity_id::TokenId, error::Result, hbar::Hbar,
    ledger_id::LedgerId,
};

/// Right for `spender` to spend up to `amount` of `owner`'s hbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HbarAllowance {
    /// Account granting the allowance.
    pub owner_account_id: AccountId,
    /// Account receiving the allowance.
    pub spender_account_id: AccountId,
    /// Maximum amount spendable.
    #[serde(default)]
    pub amount: Hbar,
}

/// Right for `spender` to spend up to `amount` units of `owner`'s fungible token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAllowance {
    /// Token the allowance applies to.
    pub token_id: TokenId,
    /// Account granting the allowance.
    pub owner_account_id: AccountId,
    /// Account receiving the allowance.
    pub spender_account_id: AccountId,
    /// Maximum units spendable.
    #[serde(default)]
    pub amount: u64,
}

/// Right for `spender` to transfer some or all of `owner`'s NFTs of one token.
///
/// `approved_for_all` is `None` for entries that list explicit serials,
/// `Some(true)` to grant every serial and `Some(false)` to revoke that grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenNftAllowance {
    /// Token the allowance applies to.
    pub token_id: TokenId,
    /// Account granting the allowance.
    pub owner_account_id: AccountId,
    /// Account receiving the allowance.
    pub spender_account_id: AccountId,
    /// Explicitly approved serials.
    #[serde(default)]
    pub serials: Vec<u64>,
    /// Grant or revoke of the whole collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_for_all: Option<bool>,
    /// Spender holding an approve-for-all grant that delegates this allowance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegating_spender_account_id: Option<AccountId>,
}

impl ValidateChecksums for HbarAllowance {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.owner_account_id.validate_checksums(ledger_id)?;
        self.spender_account_id.validate_checksums(ledger_id)
    }
}

impl ValidateChecksums for TokenAllowance {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.token_id.validate_checksums(ledger_id)?;
        self.owner_account_id.validate_checksums(ledger_id)?;
        self.spender_account_id.validate_checksums(ledger_id)
    }
}

impl ValidateChecksums for TokenNftAllowance {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.token_id.validate_checksums(ledger_id)?;
        self.owner_account_id.validate_checksums(ledger_id)?;
        self.spender_account_id.validate_checksums(ledger_id)?;
        self.delegating_spender_account_id.validate_checksums(ledger_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let entry: TokenNftAllowance = serde_json::from_str(
            r#"{"tokenId":"0.0.5","ownerAccountId":"0.0.6","spenderAccountId":"0.0.7","unknown":1}"#,
        )
        .unwrap();
        assert!(entry.serials.is_empty());
        assert_eq!(entry.approved_for_all, None);

        let token: TokenAllowance =
            serde_json::from_str(r#"{"tokenId":"0.0.5","ownerAccountId":"0.0.6","spenderAccountId":"0.0.7"}"#)
                .unwrap();
        assert_eq!(token.amount, 0);
    }

    #[test]
    fn test_unset_optionals_omitted() {
        let entry = TokenNftAllowance {
            token_id: TokenId::new(0, 0, 5),
            owner_account_id: AccountId::new(0, 0, 6),
            spender_account_id: AccountId::new(0, 0, 7),
            serials: vec![1],
            approved_for_all: None,
            delegating_spender_account_id: None,
        };
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"tokenId":"0.0.5","ownerAccountId":"0.0.6","spenderAccountId":"0.0.7","serials":[1]}"#
        );
    }

    #[test]
    fn test_checksums_cover_every_account() {
        let entry = HbarAllowance {
            owner_account_id: AccountId::new(0, 0, 6),
            spender_account_id: "0.0.123-vfmkw".parse().unwrap(),
            amount: Hbar::new(1),
        };
        entry.validate_checksums(&LedgerId::MAINNET).unwrap();
        assert!(entry.validate_checksums(&LedgerId::TESTNET).is_err());
    }
}
