//! Local error taxonomy for the ledger client model using snafu.
//!
//! Every failure that can be detected without talking to the execution engine
//! lives here: parse failures, checksum mismatches, key decoding, key list
//! invariants and mutation of frozen operations. None of them are retryable;
//! each requires the caller to change its input.
//!
//! Each variant maps to an [`ErrorCode`] with a unique numeric identifier and
//! a suggested recovery action.

use core::fmt;

use snafu::Snafu;

use crate::{checksum::Checksum, ledger_id::LedgerId};

/// Unified result type for local ledger operations.
pub type Result<T, E = LedgerError> = std::result::Result<T, E>;

/// Machine-readable error codes for local failures.
///
/// | Range     | Domain      | Examples                              |
/// |-----------|-------------|---------------------------------------|
/// | 4000–4099 | Operation   | Frozen mutation, invalid argument     |
/// | 4100–4199 | Identifiers | Parse failure, checksum mismatch      |
/// | 4200–4299 | Keys        | Key decoding, key lists, signatures   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // --- Operation errors (4000–4099) ---
    /// A setter was called on a frozen operation.
    OperationFrozen = 4000,
    /// An argument was outside its valid domain.
    OperationInvalidArgument = 4001,

    // --- Identifier errors (4100–4199) ---
    /// Textual input could not be parsed.
    IdParse = 4100,
    /// Entity checksum does not match the target ledger.
    IdChecksumMismatch = 4101,

    // --- Key errors (4200–4299) ---
    /// Key bytes or text could not be decoded.
    KeyParse = 4200,
    /// Key list threshold outside `1..=len`.
    KeyListThreshold = 4201,
    /// Signature did not verify against the public key.
    KeySignatureVerify = 4202,
}

impl ErrorCode {
    /// Returns the numeric code value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Converts a numeric code to an `ErrorCode`, returning `None` for unknown values.
    #[must_use]
    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            4000 => Some(Self::OperationFrozen),
            4001 => Some(Self::OperationInvalidArgument),
            4100 => Some(Self::IdParse),
            4101 => Some(Self::IdChecksumMismatch),
            4200 => Some(Self::KeyParse),
            4201 => Some(Self::KeyListThreshold),
            4202 => Some(Self::KeySignatureVerify),
            _ => None,
        }
    }

    /// Whether this error is retryable.
    ///
    /// Local errors are deterministic functions of the caller's input, so
    /// repeating the same call yields the same failure.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        match self {
            Self::OperationFrozen
            | Self::OperationInvalidArgument
            | Self::IdParse
            | Self::IdChecksumMismatch
            | Self::KeyParse
            | Self::KeyListThreshold
            | Self::KeySignatureVerify => false,
        }
    }

    /// Suggested recovery action for this error code.
    #[must_use]
    pub const fn suggested_action(self) -> &'static str {
        match self {
            Self::OperationFrozen => {
                "Build a new operation. Frozen operations never become mutable again."
            },
            Self::OperationInvalidArgument => "Fix the argument and call again.",
            Self::IdParse => {
                "Use the canonical form shard.realm.num[-checksum], or the alias/EVM form for accounts."
            },
            Self::IdChecksumMismatch => {
                "The identifier was copied from a different network. Verify the id and the client's ledger id."
            },
            Self::KeyParse => "Provide a raw Ed25519/ECDSA key or a DER SubjectPublicKeyInfo, hex encoded.",
            Self::KeyListThreshold => "Pick a threshold between 1 and the number of keys, or omit it.",
            Self::KeySignatureVerify => "Check that the message and signature belong to this key.",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Top-level error type for local ledger operations.
///
/// # Recovery Guide
///
/// | Variant            | Retryable | Recovery Action                                      |
/// | ------------------ | --------- | ---------------------------------------------------- |
/// | `FrozenMutation`   | No        | Build a new operation                                |
/// | `ChecksumMismatch` | No        | Id belongs to another network; fix id or ledger id   |
/// | `Parse`            | No        | Fix the textual input                                |
/// | `KeyParse`         | No        | Supply a supported key encoding                      |
/// | `InvalidKeyList`   | No        | Use a threshold in `1..=len`                         |
/// | `InvalidArgument`  | No        | Fix the argument                                     |
/// | `SignatureVerify`  | No        | Check message, signature and key                     |
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum LedgerError {
    /// A field was modified after the operation was frozen.
    ///
    /// **Recovery**: Not retryable. Freezing is one-way; construct a new
    /// operation with the desired fields.
    #[snafu(display("Cannot set {field}: operation is frozen"))]
    FrozenMutation {
        /// Name of the field the caller tried to change.
        field: &'static str,
    },

    /// An entity checksum was computed for a different ledger.
    ///
    /// **Recovery**: Not retryable. Raised before anything is sent.
    #[snafu(display(
        "Checksum mismatch for {entity_id} on {ledger_id}: expected {expected}, got {actual}"
    ))]
    ChecksumMismatch {
        /// Entity in `shard.realm.num` form.
        entity_id: String,
        /// Checksum computed for the client's ledger.
        expected: Checksum,
        /// Checksum carried by the entity.
        actual: Checksum,
        /// Ledger the validation ran against.
        ledger_id: LedgerId,
    },

    /// Textual input could not be parsed into the requested type.
    #[snafu(display("Failed to parse '{input}': {reason}"))]
    Parse {
        /// The offending input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Key material could not be decoded.
    #[snafu(display("Failed to parse key: {reason}"))]
    KeyParse {
        /// Decoder failure description.
        reason: String,
    },

    /// Key list threshold outside `1..=key_count`.
    #[snafu(display("Invalid key list: threshold {threshold} not in 1..={key_count}"))]
    InvalidKeyList {
        /// Requested threshold.
        threshold: u32,
        /// Number of keys in the list.
        key_count: usize,
    },

    /// Argument outside its valid domain.
    #[snafu(display("Invalid argument: {message}"))]
    InvalidArgument {
        /// Description of the violation.
        message: String,
    },

    /// Signature did not verify.
    #[snafu(display("Signature verification failed: {reason}"))]
    SignatureVerify {
        /// Verifier failure description.
        reason: String,
    },
}

impl LedgerError {
    /// Returns the machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::FrozenMutation { .. } => ErrorCode::OperationFrozen,
            Self::InvalidArgument { .. } => ErrorCode::OperationInvalidArgument,
            Self::Parse { .. } => ErrorCode::IdParse,
            Self::ChecksumMismatch { .. } => ErrorCode::IdChecksumMismatch,
            Self::KeyParse { .. } => ErrorCode::KeyParse,
            Self::InvalidKeyList { .. } => ErrorCode::KeyListThreshold,
            Self::SignatureVerify { .. } => ErrorCode::KeySignatureVerify,
        }
    }

    /// Whether the error is retryable. Always false for local errors.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }

    /// Suggested recovery action, delegated to [`ErrorCode::suggested_action`].
    #[must_use]
    pub const fn suggested_action(&self) -> &'static str {
        self.code().suggested_action()
    }

    pub(crate) fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse { input: input.into(), reason: reason.into() }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    fn all_error_codes() -> Vec<ErrorCode> {
        vec![
            ErrorCode::OperationFrozen,
            ErrorCode::OperationInvalidArgument,
            ErrorCode::IdParse,
            ErrorCode::IdChecksumMismatch,
            ErrorCode::KeyParse,
            ErrorCode::KeyListThreshold,
            ErrorCode::KeySignatureVerify,
        ]
    }

    #[test]
    fn test_error_code_numeric_uniqueness() {
        let mut codes: Vec<u16> = all_error_codes().iter().map(|c| c.as_u16()).collect();
        let len = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), len, "error codes must be unique");
    }

    #[test]
    fn test_error_code_round_trip() {
        for code in all_error_codes() {
            assert_eq!(ErrorCode::from_u16(code.as_u16()), Some(code));
        }
    }

    #[test]
    fn test_error_code_unknown_value_returns_none() {
        assert_eq!(ErrorCode::from_u16(0), None);
        assert_eq!(ErrorCode::from_u16(4999), None);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::IdChecksumMismatch.to_string(), "4101");
    }

    #[test]
    fn test_no_local_error_is_retryable() {
        for code in all_error_codes() {
            assert!(!code.is_retryable(), "{code:?} must not be retryable");
            assert!(!code.suggested_action().is_empty());
        }
    }

    #[test]
    fn test_frozen_mutation_display_names_field() {
        let err = LedgerError::FrozenMutation { field: "transaction_memo" };
        assert_eq!(err.to_string(), "Cannot set transaction_memo: operation is frozen");
        assert_eq!(err.code(), ErrorCode::OperationFrozen);
    }

    #[test]
    fn test_checksum_mismatch_display() {
        let err = LedgerError::ChecksumMismatch {
            entity_id: "0.0.123".to_string(),
            expected: "esxsf".parse().unwrap(),
            actual: "vfmkw".parse().unwrap(),
            ledger_id: LedgerId::TESTNET,
        };
        assert_eq!(
            err.to_string(),
            "Checksum mismatch for 0.0.123 on testnet: expected esxsf, got vfmkw"
        );
        assert!(!err.is_retryable());
    }
}
