//! SDK error types.
//!
//! Provides a two-tier error model:
//! - **Local errors**: parse, checksum and frozen-mutation failures raised
//!   before anything reaches the execution engine
//! - **Engine errors**: failures reported by the engine through the
//!   completion, surfaced verbatim
//!
//! Decode failures (the engine succeeded but its payload does not match the
//! declared response type) and completion contract violations are reported
//! as their own variants so callers can tell them apart from engine errors.

use hgraph_ledger_types::{CodecError, LedgerError};
use snafu::{Location, Snafu};

use crate::engine::{EngineError, EngineErrorCode};

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK error types with context-rich error messages.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SdkError {
    /// Local validation failure. Nothing was sent to the engine.
    #[snafu(display("{source}"))]
    Local {
        /// Underlying local error.
        source: LedgerError,
    },

    /// The operation could not be serialized into a request envelope.
    #[snafu(display("Failed to encode {kind} request at {location}: {source}"))]
    Encode {
        /// Operation kind.
        kind: &'static str,
        /// Codec failure.
        source: CodecError,
        /// Source location.
        #[snafu(implicit)]
        location: Location,
    },

    /// The execution engine reported a failure.
    #[snafu(display("Engine error ({code}): {message}"))]
    Engine {
        /// Engine error code.
        code: EngineErrorCode,
        /// Engine-provided message, unmodified.
        message: String,
    },

    /// The engine succeeded but its payload did not decode into the response type.
    #[snafu(display("Failed to decode {expected_type} from {kind} response: {source}"))]
    Decode {
        /// Operation kind.
        kind: &'static str,
        /// Declared response type.
        expected_type: &'static str,
        /// Codec failure.
        source: CodecError,
    },

    /// The engine released the completion without signalling it.
    #[snafu(display("Execution engine dropped the completion for {kind} without a result"))]
    CompletionDropped {
        /// Operation kind.
        kind: &'static str,
    },

    /// Configuration validation error.
    #[snafu(display("Configuration error: {message}"))]
    Config {
        /// Error description.
        message: String,
    },
}

impl SdkError {
    /// Returns the engine error code if this is an engine error.
    #[must_use]
    pub fn engine_code(&self) -> Option<EngineErrorCode> {
        match self {
            Self::Engine { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns the local error if this failure was raised before submission.
    #[must_use]
    pub fn as_local(&self) -> Option<&LedgerError> {
        match self {
            Self::Local { source } => Some(source),
            _ => None,
        }
    }

    /// Whether the engine reported a timeout.
    ///
    /// The SDK never retries; the engine owns retry policy and has already
    /// exhausted it when a failure reaches the caller.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Engine { code: EngineErrorCode::TimedOut, .. })
    }
}

impl From<LedgerError> for SdkError {
    fn from(source: LedgerError) -> Self {
        Self::Local { source }
    }
}

impl From<EngineError> for SdkError {
    fn from(error: EngineError) -> Self {
        Self::Engine { code: error.code, message: error.message }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_local_error_passes_through_display() {
        let err = SdkError::from(LedgerError::FrozenMutation { field: "transaction_memo" });
        assert_eq!(err.to_string(), "Cannot set transaction_memo: operation is frozen");
        assert!(matches!(err.as_local(), Some(LedgerError::FrozenMutation { field: "transaction_memo" })));
        assert_eq!(err.engine_code(), None);
    }

    #[test]
    fn test_engine_error_keeps_message_verbatim() {
        let err = SdkError::from(EngineError::new(EngineErrorCode::ReceiptStatus, "INSUFFICIENT_PAYER_BALANCE"));
        assert_eq!(err.engine_code(), Some(EngineErrorCode::ReceiptStatus));
        assert!(err.to_string().ends_with("INSUFFICIENT_PAYER_BALANCE"));
    }

    #[test]
    fn test_timeout_classification() {
        let timed_out = SdkError::from(EngineError::new(EngineErrorCode::TimedOut, "deadline"));
        assert!(timed_out.is_timeout());
        assert!(!SdkError::CompletionDropped { kind: "tokenBurn" }.is_timeout());
    }
}
