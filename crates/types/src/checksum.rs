//! Entity checksums.
//!
//! A checksum is a five-letter suffix derived from an entity's
//! `shard.realm.num` string and the ledger id. It catches identifiers pasted
//! from the wrong network. Validation runs locally before any operation
//! reaches the execution engine.

use std::{
    fmt::{self, Write as _},
    str::FromStr,
};

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{
    error::{ChecksumMismatchSnafu, LedgerError, Result},
    ledger_id::LedgerId,
};

const P3: u64 = 26 * 26 * 26;
const P5: u64 = 26 * 26 * 26 * 26 * 26;
const WEIGHT: u64 = 31;
const MULTIPLIER: u64 = 1_000_003;

/// Five lowercase ASCII letters.
///
/// Stored as the base-26 value of the letters, always below 26^5, so every
/// value renders as exactly five letters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct Checksum(u32);

impl Checksum {
    /// Computes the checksum of `entity` (`shard.realm.num`) for `ledger_id`.
    #[must_use]
    pub fn generate(entity: &str, ledger_id: &LedgerId) -> Self {
        let digits: Vec<u64> = entity
            .bytes()
            .map(|b| if b == b'.' { 10 } else { u64::from(b.wrapping_sub(b'0')) })
            .collect();

        let mut s = 0;
        let mut s0 = 0;
        let mut s1 = 0;
        for (i, &d) in digits.iter().enumerate() {
            s = (WEIGHT * s + d) % P3;
            if i % 2 == 0 {
                s0 = (s0 + d) % 11;
            } else {
                s1 = (s1 + d) % 11;
            }
        }

        let mut sh = 0;
        for &b in ledger_id.as_bytes().iter().chain([0u8; 6].iter()) {
            sh = (WEIGHT * sh + u64::from(b)) % P5;
        }

        let len = digits.len() as u64;
        let c = ((((len % 5) * 11 + s0) * 11 + s1) * P3 + s + sh) % P5;
        Self::from_value((c * MULTIPLIER) % P5)
    }

    fn from_value(value: u64) -> Self {
        // 26^5 < 2^24
        Self((value % P5) as u32)
    }

    /// The five letters, most significant first.
    #[must_use]
    pub fn letters(&self) -> [char; 5] {
        let mut value = self.0;
        let mut letters = ['a'; 5];
        for slot in letters.iter_mut().rev() {
            *slot = char::from(b'a' + (value % 26) as u8);
            value /= 26;
        }
        letters
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum(\"{self}\")")
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.letters().iter().try_for_each(|letter| f.write_char(*letter))
    }
}

impl FromStr for Checksum {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes: [u8; 5] = s
            .as_bytes()
            .try_into()
            .map_err(|_| LedgerError::parse(s, "checksum must be exactly 5 characters"))?;
        if !bytes.iter().all(u8::is_ascii_lowercase) {
            return Err(LedgerError::parse(s, "checksum must be lowercase ascii letters"));
        }
        let value = bytes.iter().fold(0u64, |value, b| value * 26 + u64::from(b - b'a'));
        Ok(Self::from_value(value))
    }
}

/// Checks a carried checksum for `shard.realm.num` against `ledger_id`.
///
/// Entities without a checksum are valid for every ledger.
///
/// # Errors
///
/// Returns [`LedgerError::ChecksumMismatch`] if the carried checksum was
/// computed for another ledger.
pub fn validate(shard: u64, realm: u64, num: u64, checksum: Option<Checksum>, ledger_id: &LedgerId) -> Result<()> {
    let Some(actual) = checksum else {
        return Ok(());
    };
    let entity_id = format!("{shard}.{realm}.{num}");
    let expected = Checksum::generate(&entity_id, ledger_id);
    snafu::ensure!(
        expected == actual,
        ChecksumMismatchSnafu { entity_id, expected, actual, ledger_id: ledger_id.clone() }
    );
    Ok(())
}

/// Recursive checksum validation for anything that carries entity ids.
pub trait ValidateChecksums {
    /// Validates every checksum reachable from `self` against `ledger_id`.
    ///
    /// # Errors
    ///
    /// Returns the first [`LedgerError::ChecksumMismatch`] encountered.
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()>;
}

impl<T: ValidateChecksums> ValidateChecksums for Option<T> {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        match self {
            Some(value) => value.validate_checksums(ledger_id),
            None => Ok(()),
        }
    }
}

impl<T: ValidateChecksums> ValidateChecksums for [T] {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.iter().try_for_each(|value| value.validate_checksums(ledger_id))
    }
}

impl<T: ValidateChecksums> ValidateChecksums for Vec<T> {
    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<()> {
        self.as_slice().validate_checksums(ledger_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    fn generate(entity: &str, ledger_id: &LedgerId) -> String {
        Checksum::generate(entity, ledger_id).to_string()
    }

    #[test]
    fn test_known_checksums_per_network() {
        let cases = [
            ("0.0.123", "vfmkw", "esxsf", "ogizo"),
            ("0.0.1001", "urkbk", "eevit", "nsgqc"),
            ("1.2.3", "islfi", "sfwmr", "bthua"),
            ("0.0.3", "tzfmz", "dmqui", "nacbr"),
            ("1415.314.123", "srwyb", "cfifk", "lstmt"),
        ];
        for (entity, mainnet, testnet, previewnet) in cases {
            assert_eq!(generate(entity, &LedgerId::MAINNET), mainnet, "{entity} mainnet");
            assert_eq!(generate(entity, &LedgerId::TESTNET), testnet, "{entity} testnet");
            assert_eq!(generate(entity, &LedgerId::PREVIEWNET), previewnet, "{entity} previewnet");
        }
    }

    #[test]
    fn test_custom_ledger_checksum() {
        let ledger: LedgerId = "00ff00ff".parse().unwrap();
        assert_eq!(generate("0.0.123", &ledger), "umhjw");
    }

    #[test]
    fn test_validate_accepts_matching_checksum() {
        let checksum = Some("esxsf".parse().unwrap());
        validate(0, 0, 123, checksum, &LedgerId::TESTNET).unwrap();
    }

    #[test]
    fn test_validate_reports_expected_and_actual() {
        let checksum = Some("esxsf".parse().unwrap());
        let err = validate(0, 0, 123, checksum, &LedgerId::MAINNET).unwrap_err();
        match err {
            LedgerError::ChecksumMismatch { entity_id, expected, actual, ledger_id } => {
                assert_eq!(entity_id, "0.0.123");
                assert_eq!(expected.to_string(), "vfmkw");
                assert_eq!(actual.to_string(), "esxsf");
                assert_eq!(ledger_id, LedgerId::MAINNET);
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_without_checksum_passes_any_ledger() {
        for ledger in [LedgerId::MAINNET, LedgerId::TESTNET, LedgerId::from_bytes(vec![9, 9])] {
            validate(0, 0, 123, None, &ledger).unwrap();
        }
    }

    #[test]
    fn test_checksum_parse_rejects_bad_input() {
        assert!("abcd".parse::<Checksum>().is_err());
        assert!("abcdef".parse::<Checksum>().is_err());
        assert!("ABCDE".parse::<Checksum>().is_err());
        assert!("ab1de".parse::<Checksum>().is_err());
        assert_eq!("abcde".parse::<Checksum>().unwrap().to_string(), "abcde");
    }

    #[test]
    fn test_letters_cover_both_ends_of_the_alphabet() {
        for text in ["aaaaa", "zzzzz", "azbyc"] {
            let checksum: Checksum = text.parse().unwrap();
            assert_eq!(checksum.letters().iter().collect::<String>(), text);
            assert_eq!(format!("{checksum:?}"), format!("Checksum(\"{text}\")"));
        }
    }
}
