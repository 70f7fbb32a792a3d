//! Native currency amounts.

use std::{fmt, ops, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};

/// Tinybars per hbar.
pub const TINYBARS_PER_HBAR: i64 = 100_000_000;

/// A signed amount of hbar, stored in tinybars.
///
/// Serialized as the tinybar count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hbar(i64);

impl Hbar {
    /// Zero hbar.
    pub const ZERO: Self = Self(0);
    /// Largest representable amount.
    pub const MAX: Self = Self(i64::MAX);

    /// Whole hbars, saturating at the `i64` tinybar range.
    #[must_use]
    pub const fn new(hbars: i64) -> Self {
        Self(hbars.saturating_mul(TINYBARS_PER_HBAR))
    }

    /// Exact tinybar amount.
    #[must_use]
    pub const fn from_tinybars(tinybars: i64) -> Self {
        Self(tinybars)
    }

    /// Amount in tinybars.
    #[must_use]
    pub const fn to_tinybars(self) -> i64 {
        self.0
    }

    /// Returns `true` for negative amounts.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl ops::Neg for Hbar {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

/// Whole amounts print as `N ℏ`, fractional ones as `N tℏ`.
impl fmt::Display for Hbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % TINYBARS_PER_HBAR == 0 {
            write!(f, "{} ℏ", self.0 / TINYBARS_PER_HBAR)
        } else {
            write!(f, "{} tℏ", self.0)
        }
    }
}

impl FromStr for Hbar {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let (amount, unit) = s.trim().split_once(' ').unwrap_or((s.trim(), "ℏ"));
        let amount = amount
            .parse::<i64>()
            .map_err(|e| LedgerError::parse(s, format!("invalid amount '{amount}': {e}")))?;
        match unit {
            "ℏ" => Ok(Self::new(amount)),
            "tℏ" => Ok(Self::from_tinybars(amount)),
            other => Err(LedgerError::parse(s, format!("unknown unit '{other}'"))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Hbar::new(2).to_tinybars(), 200_000_000);
        assert_eq!(Hbar::from_tinybars(5).to_tinybars(), 5);
        assert_eq!(Hbar::new(i64::MAX), Hbar::MAX);
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(Hbar::new(3).to_string(), "3 ℏ");
        assert_eq!(Hbar::from_tinybars(150).to_string(), "150 tℏ");
        assert_eq!("3 ℏ".parse::<Hbar>().unwrap(), Hbar::new(3));
        assert_eq!("150 tℏ".parse::<Hbar>().unwrap(), Hbar::from_tinybars(150));
        assert_eq!("7".parse::<Hbar>().unwrap(), Hbar::new(7));
        assert!("7 btc".parse::<Hbar>().is_err());
    }

    #[test]
    fn test_serializes_as_tinybars() {
        assert_eq!(serde_json::to_string(&Hbar::new(1)).unwrap(), "100000000");
        assert_eq!(serde_json::from_str::<Hbar>("-5").unwrap(), -Hbar::from_tinybars(5));
    }
}
