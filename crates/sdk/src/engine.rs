//! Boundary to the external execution engine.
//!
//! The engine signs, transmits and retries requests against ledger nodes.
//! The SDK hands it a serialized request together with the signer handles
//! and a [`Completion`], and suspends until the engine signals that
//! completion. A completion is consumed by its first signal, so the engine
//! can resume a caller at most once; dropping it unsignalled is reported to
//! the caller as [`crate::SdkError::CompletionDropped`].

use std::{fmt, time::Duration};

use tokio::sync::oneshot;

use crate::signer::Signer;

/// Stable error codes reported by the execution engine.
///
/// Numeric values are part of the engine contract. Codes this SDK does not
/// know yet are preserved as [`EngineErrorCode::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineErrorCode {
    /// The request did not complete before its deadline.
    TimedOut,
    /// Transport-level status from a node.
    GrpcStatus,
    /// A node response could not be decoded.
    FromProtobuf,
    /// Pre-check rejected the transaction.
    TransactionPreCheckStatus,
    /// Pre-check rejected a transaction that had no id.
    TransactionNoIdPreCheckStatus,
    /// Pre-check rejected the query.
    QueryPreCheckStatus,
    /// Pre-check rejected the query payment.
    QueryPaymentPreCheckStatus,
    /// Pre-check rejected a query sent without payment.
    QueryNoPaymentPreCheckStatus,
    /// A value in the request failed basic parsing.
    BasicParse,
    /// Key material failed to parse.
    KeyParse,
    /// Key derivation failed.
    KeyDerive,
    /// Neither a payer account nor a transaction id was available.
    NoPayerAccountOrTransactionId,
    /// The query cost exceeded the maximum payment.
    MaxQueryPaymentExceeded,
    /// A node account id was not in the engine's address book.
    NodeAccountUnknown,
    /// A node returned a status the engine does not recognize.
    ResponseStatusUnrecognized,
    /// The receipt carried a failure status.
    ReceiptStatus,
    /// A signer failed to produce a signature.
    Signature,
    /// The request envelope could not be parsed.
    RequestParse,
    /// Signature verification failed.
    SignatureVerify,
    /// An entity id was invalid for the target network.
    BadEntityId,
    /// A key of the wrong algorithm was supplied.
    WrongKeyType,
    /// Freezing required node account ids that were not set.
    FreezeUnsetNodeAccountIds,
    /// A code not known to this SDK.
    Unknown(u16),
}

impl EngineErrorCode {
    /// Returns the numeric code value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::TimedOut => 1,
            Self::GrpcStatus => 2,
            Self::FromProtobuf => 3,
            Self::TransactionPreCheckStatus => 4,
            Self::TransactionNoIdPreCheckStatus => 5,
            Self::QueryPreCheckStatus => 6,
            Self::QueryPaymentPreCheckStatus => 7,
            Self::QueryNoPaymentPreCheckStatus => 8,
            Self::BasicParse => 9,
            Self::KeyParse => 10,
            Self::KeyDerive => 11,
            Self::NoPayerAccountOrTransactionId => 12,
            Self::MaxQueryPaymentExceeded => 13,
            Self::NodeAccountUnknown => 14,
            Self::ResponseStatusUnrecognized => 15,
            Self::ReceiptStatus => 16,
            Self::Signature => 17,
            Self::RequestParse => 18,
            Self::SignatureVerify => 19,
            Self::BadEntityId => 20,
            Self::WrongKeyType => 21,
            Self::FreezeUnsetNodeAccountIds => 22,
            Self::Unknown(code) => code,
        }
    }

    /// Maps a numeric code, keeping unknown values as [`Self::Unknown`].
    #[must_use]
    pub const fn from_u16(code: u16) -> Self {
        match code {
            1 => Self::TimedOut,
            2 => Self::GrpcStatus,
            3 => Self::FromProtobuf,
            4 => Self::TransactionPreCheckStatus,
            5 => Self::TransactionNoIdPreCheckStatus,
            6 => Self::QueryPreCheckStatus,
            7 => Self::QueryPaymentPreCheckStatus,
            8 => Self::QueryNoPaymentPreCheckStatus,
            9 => Self::BasicParse,
            10 => Self::KeyParse,
            11 => Self::KeyDerive,
            12 => Self::NoPayerAccountOrTransactionId,
            13 => Self::MaxQueryPaymentExceeded,
            14 => Self::NodeAccountUnknown,
            15 => Self::ResponseStatusUnrecognized,
            16 => Self::ReceiptStatus,
            17 => Self::Signature,
            18 => Self::RequestParse,
            19 => Self::SignatureVerify,
            20 => Self::BadEntityId,
            21 => Self::WrongKeyType,
            22 => Self::FreezeUnsetNodeAccountIds,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for EngineErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "unknown code {code}"),
            known => write!(f, "{known:?}"),
        }
    }
}

/// Failure reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    /// Stable error code.
    pub code: EngineErrorCode,
    /// Human-readable detail, passed to the caller unmodified.
    pub message: String,
}

impl EngineError {
    /// Creates an engine error.
    pub fn new(code: EngineErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Creates an engine error from a raw numeric code.
    pub fn from_raw(code: u16, message: impl Into<String>) -> Self {
        Self::new(EngineErrorCode::from_u16(code), message)
    }
}

/// A serialized operation ready for the engine.
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// Operation kind, the envelope's top-level tag.
    pub kind: &'static str,
    /// JSON request envelope.
    pub envelope: String,
    /// Signer handles. Each shares the key material of its public key.
    pub signers: Vec<Signer>,
    /// Advisory deadline. The engine enforces it and still completes exactly once.
    pub timeout: Option<Duration>,
}

pub(crate) type Outcome = Result<Vec<u8>, EngineError>;

/// One-shot handle through which the engine resumes the waiting caller.
///
/// Every method consumes the handle, so at most one result is ever
/// delivered.
#[derive(Debug)]
pub struct Completion {
    kind: &'static str,
    sender: oneshot::Sender<Outcome>,
}

impl Completion {
    pub(crate) fn channel(kind: &'static str) -> (Self, oneshot::Receiver<Outcome>) {
        let (sender, receiver) = oneshot::channel();
        (Self { kind, sender }, receiver)
    }

    /// Resumes the caller with a UTF-8 JSON payload.
    pub fn succeed(self, payload: impl Into<Vec<u8>>) {
        self.complete(Ok(payload.into()));
    }

    /// Resumes the caller with an engine failure.
    pub fn fail(self, error: EngineError) {
        self.complete(Err(error));
    }

    /// Resumes the caller with `outcome`.
    pub fn complete(self, outcome: Result<Vec<u8>, EngineError>) {
        if self.sender.send(outcome).is_err() {
            tracing::debug!(kind = self.kind, "Caller stopped waiting before completion");
        }
    }

    /// Whether the caller has stopped waiting.
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        self.sender.is_closed()
    }

    /// Operation kind this completion belongs to.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }
}

/// The execution engine's single entry point.
///
/// `submit` must not block. The engine signals `completion` exactly once,
/// possibly from another thread, after applying its own retry policy and
/// the request's timeout.
pub trait ExecutionEngine: Send + Sync + fmt::Debug {
    /// Accepts a request for asynchronous execution.
    fn submit(&self, request: EngineRequest, completion: Completion);
}
