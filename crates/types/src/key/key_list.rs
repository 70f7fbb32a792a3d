//! Lists of keys with an optional signing threshold.

use serde::{Deserialize, Serialize};
use snafu::ensure;

use super::Key;
use crate::{
    checksum::ValidateChecksums,
    error::{InvalidKeyListSnafu, LedgerError, Result},
    ledger_id::LedgerId,
};

/// A list of keys.
///
/// Without a threshold every key must sign. With a threshold `k`, any `k`
/// of them suffice; `k` is always within `1..=len`. Lists may nest through
/// [`Key::KeyList`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "KeyListRepr", into = "KeyListRepr")]
pub struct KeyList {
    keys: Vec<Key>,
    threshold: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct KeyListRepr {
    #[serde(default)]
    keys: Vec<Key>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    threshold: Option<u32>,
}

impl KeyList {
    /// Creates an empty list with no threshold.
    #[must_use]
    pub const fn new() -> Self {
        Self { keys: Vec::new(), threshold: None }
    }

    /// Creates a list requiring every key.
    #[must_use]
    pub fn from_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        Self { keys: keys.into_iter().collect(), threshold: None }
    }

    /// Creates a threshold list requiring any `threshold` of `keys`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidKeyList`] unless `1 <= threshold <= keys.len()`.
    pub fn with_threshold(keys: impl IntoIterator<Item = Key>, threshold: u32) -> Result<Self> {
        let keys: Vec<Key> = keys.into_iter().collect();
        check_threshold(threshold, keys.len())?;
        Ok(Self { keys, threshold: Some(threshold) })
    }

    /// Keys in the list.
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Signing threshold, `None` when all keys must sign.
    #[must_use]
    pub const fn threshold(&self) -> Option<u32> {
        self.threshold
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the list holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Appends a key. A valid threshold stays valid as the list grows.
    pub fn push(&mut self, key: impl Into<Key>) {
        self.keys.push(key.into());
    }

    /// Replaces the threshold.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidKeyList`] if `Some(k)` is outside `1..=len`.
    pub fn set_threshold(&mut self, threshold: Option<u32>) -> Result<()> {
        if let Some(threshold) = threshold {
            check_threshold(threshold, self.keys.len())?;
        }
        self.threshold = threshold;
        Ok(())
    }

    /// Iterates over the keys.
    pub fn iter(&self) -> std::slice::Iter<'_, Key> {
        self.keys.iter()
    }
}

fn check_threshold(threshold: u32, key_count: usize) -> Result<()> {
    let in_range = threshold >= 1 && usize::try_from(threshold).is_ok_and(|t| t <= key_count);
    ensure!(in_range, InvalidKeyListSnafu { threshold, key_count });
    Ok(())
}

impl TryFrom<KeyListRepr> for KeyList {
    type Error = LedgerError;

    fn try_from(repr: KeyListRepr) -> Result<Self> {
        if let Some(threshold) = repr.threshold {
            check_threshold(threshold, repr.keys.len())?;
        }
        Ok(Self { keys: repr.keys, threshold: repr.threshold })
    }
}

impl From<KeyList> for KeyListRepr {
    fn from(list: KeyList) -> Self {
        Self { keys: list.keys, threshold: list.threshold }
    }
}

impl FromIterator<Key> for KeyList {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self::from_keys(iter)
    }
}

impl<'a> IntoIterator for &'a KeyList {
    type Item = &'a Key;
    type IntoIter = std::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

impl ValidateChecksums for KeyList {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.keys.validate_checksums(ledger_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::entity_id::ContractId;

    fn contract_keys(n: u64) -> Vec<Key> {
        (1..=n).map(|num| Key::ContractId(ContractId::new(0, 0, num))).collect()
    }

    #[test]
    fn test_from_keys_has_no_threshold() {
        let list = KeyList::from_keys(contract_keys(3));
        assert_eq!(list.len(), 3);
        assert_eq!(list.threshold(), None);
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(KeyList::with_threshold(contract_keys(3), 1).is_ok());
        assert!(KeyList::with_threshold(contract_keys(3), 3).is_ok());

        let zero = KeyList::with_threshold(contract_keys(3), 0).unwrap_err();
        assert!(matches!(zero, LedgerError::InvalidKeyList { threshold: 0, key_count: 3 }));

        let too_big = KeyList::with_threshold(contract_keys(3), 4).unwrap_err();
        assert!(matches!(too_big, LedgerError::InvalidKeyList { threshold: 4, key_count: 3 }));
    }

    #[test]
    fn test_set_threshold_validates() {
        let mut list = KeyList::from_keys(contract_keys(2));
        list.set_threshold(Some(2)).unwrap();
        assert!(list.set_threshold(Some(3)).is_err());
        assert_eq!(list.threshold(), Some(2));
        list.set_threshold(None).unwrap();
        assert_eq!(list.threshold(), None);
    }

    #[test]
    fn test_decoding_enforces_threshold() {
        let ok: KeyList =
            serde_json::from_str(r#"{"keys":[{"contractId":"0.0.1"},{"contractId":"0.0.2"}],"threshold":2}"#)
                .unwrap();
        assert_eq!(ok.threshold(), Some(2));

        let zero = serde_json::from_str::<KeyList>(r#"{"keys":[{"contractId":"0.0.1"}],"threshold":0}"#);
        assert!(zero.is_err());

        let too_big = serde_json::from_str::<KeyList>(r#"{"keys":[{"contractId":"0.0.1"}],"threshold":2}"#);
        assert!(too_big.is_err());
    }

    #[test]
    fn test_encoding_omits_missing_threshold() {
        let list = KeyList::from_keys(contract_keys(1));
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"{"keys":[{"contractId":"0.0.1"}]}"#);
    }

    #[test]
    fn test_nested_lists() {
        let inner = KeyList::with_threshold(contract_keys(2), 1).unwrap();
        let mut outer = KeyList::new();
        outer.push(inner.clone());
        outer.push(Key::ContractId(ContractId::new(0, 0, 9)));
        assert_eq!(outer.len(), 2);
        assert_eq!(outer.keys()[0], Key::KeyList(inner));
        let json = serde_json::to_string(&outer).unwrap();
        assert_eq!(serde_json::from_str::<KeyList>(&json).unwrap(), outer);
    }

    #[test]
    fn test_checksums_validated_recursively() {
        let bad: ContractId = "0.0.123-vfmkw".parse().unwrap();
        let inner = KeyList::from_keys([Key::ContractId(bad)]);
        let outer = KeyList::from_keys([Key::KeyList(inner)]);
        assert!(outer.validate_checksums(&LedgerId::MAINNET).is_ok());
        assert!(outer.validate_checksums(&LedgerId::TESTNET).is_err());
    }
}
