//! Transaction identifiers: `account@seconds.nanos[?scheduled][/nonce]`.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Timelike, Utc};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{
    account_id::AccountId,
    checksum::ValidateChecksums,
    error::{LedgerError, Result},
    ledger_id::LedgerId,
};

/// Identifies a transaction by its payer and valid-start time.
#[derive(Clone, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct TransactionId {
    /// Account paying for the transaction.
    pub account_id: AccountId,
    /// Start of the transaction's validity window.
    pub valid_start: DateTime<Utc>,
    /// Whether this is the id of a scheduled transaction.
    pub scheduled: bool,
    /// Nonce of an internal (child) transaction.
    pub nonce: Option<i32>,
}

impl TransactionId {
    /// Creates a transaction id for `account_id` starting at `valid_start`.
    #[must_use]
    pub fn new(account_id: AccountId, valid_start: DateTime<Utc>) -> Self {
        Self { account_id, valid_start, scheduled: false, nonce: None }
    }

    /// Creates a transaction id for `account_id` starting now.
    #[must_use]
    pub fn generate(account_id: AccountId) -> Self {
        Self::new(account_id, Utc::now())
    }

    /// Marks the id as scheduled.
    #[must_use]
    pub fn with_scheduled(mut self, scheduled: bool) -> Self {
        self.scheduled = scheduled;
        self
    }

    /// Attaches a child nonce.
    #[must_use]
    pub fn with_nonce(mut self, nonce: i32) -> Self {
        self.nonce = Some(nonce);
        self
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId(\"{self}\")")
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}.{:09}",
            self.account_id,
            self.valid_start.timestamp(),
            self.valid_start.nanosecond()
        )?;
        if self.scheduled {
            f.write_str("?scheduled")?;
        }
        if let Some(nonce) = self.nonce {
            write!(f, "/{nonce}")?;
        }
        Ok(())
    }
}

impl FromStr for TransactionId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let (rest, nonce) = match s.rsplit_once('/') {
            Some((rest, nonce)) => {
                let nonce = nonce
                    .parse::<i32>()
                    .map_err(|e| LedgerError::parse(s, format!("invalid nonce '{nonce}': {e}")))?;
                (rest, Some(nonce))
            },
            None => (s, None),
        };
        let (rest, scheduled) = match rest.strip_suffix("?scheduled") {
            Some(rest) => (rest, true),
            None => (rest, false),
        };
        let (account, timestamp) = rest
            .split_once('@')
            .ok_or_else(|| LedgerError::parse(s, "expected `account@seconds.nanos`"))?;
        let (seconds, nanos) = timestamp
            .split_once('.')
            .ok_or_else(|| LedgerError::parse(s, "expected `seconds.nanos` after `@`"))?;
        let seconds = seconds
            .parse::<i64>()
            .map_err(|e| LedgerError::parse(s, format!("invalid seconds '{seconds}': {e}")))?;
        let nanos = Some(nanos)
            .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n < 1_000_000_000)
            .ok_or_else(|| LedgerError::parse(s, format!("invalid nanoseconds '{nanos}'")))?;
        let valid_start = DateTime::from_timestamp(seconds, nanos)
            .ok_or_else(|| LedgerError::parse(s, "timestamp out of range"))?;

        Ok(Self { account_id: account.parse()?, valid_start, scheduled, nonce })
    }
}

impl ValidateChecksums for TransactionId {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.account_id.validate_checksums(ledger_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    fn valid_start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_640_995_200, 123).unwrap()
    }

    #[test]
    fn test_display_pads_nanos() {
        let id = TransactionId::new(AccountId::new(0, 0, 1001), valid_start());
        assert_eq!(id.to_string(), "0.0.1001@1640995200.000000123");
    }

    #[test]
    fn test_display_with_scheduled_and_nonce() {
        let id = TransactionId::new(AccountId::new(0, 0, 1001), valid_start()).with_scheduled(true).with_nonce(4);
        assert_eq!(id.to_string(), "0.0.1001@1640995200.000000123?scheduled/4");
    }

    #[test]
    fn test_parse_round_trip() {
        for text in [
            "0.0.1001@1640995200.000000123",
            "0.0.1001@1640995200.000000123?scheduled",
            "0.0.1001@1640995200.000000123/7",
            "0.0.1001-urkbk@1640995200.000000123?scheduled/-1",
        ] {
            let id: TransactionId = text.parse().unwrap();
            assert_eq!(id.to_string(), text);
        }
    }

    #[test]
    fn test_parse_unpadded_nanos() {
        let id: TransactionId = "0.0.5@10.5".parse().unwrap();
        assert_eq!(id.valid_start.nanosecond(), 5);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["0.0.5", "0.0.5@10", "0.0.5@x.1", "0.0.5@10.1000000000", "0.0.5@10.1/x", "x@10.1", "0.0.5@10.+1"] {
            assert!(input.parse::<TransactionId>().is_err(), "{input} should not parse");
        }
    }

    #[test]
    fn test_checksum_follows_payer() {
        let id: TransactionId = "0.0.1001-urkbk@1.0".parse().unwrap();
        id.validate_checksums(&LedgerId::MAINNET).unwrap();
        assert!(id.validate_checksums(&LedgerId::TESTNET).is_err());
    }
}
