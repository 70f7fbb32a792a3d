//! Execution bridge between operations and the engine.
//!
//! One execution runs as:
//! 1. freeze the operation (idempotent)
//! 2. validate every checksum against the client's ledger id
//! 3. serialize the request envelope `{"<kind>": {...}}`
//! 4. submit to the engine with the signer handles and advisory timeout
//! 5. suspend until the engine signals the one-shot completion
//! 6. decode the payload into the declared response type
//!
//! Steps 1-3 fail locally and never reach the engine. The SDK does not
//! retry; the engine owns retry policy.

use std::{collections::BTreeMap, time::Duration};

use hgraph_ledger_types::{LedgerError, LedgerId, decode, encode};
use serde::{Serialize, de::DeserializeOwned, ser::SerializeMap};
use snafu::ResultExt;
use tokio::time::Instant;

use crate::{
    client::Client,
    engine::{Completion, EngineRequest},
    error::{CompletionDroppedSnafu, EncodeSnafu, Result, SdkError},
    metrics::ExecutionStatus,
    signer::Signer,
};

/// An operation the bridge can execute.
pub(crate) trait Execute {
    /// Declared response type.
    type Response: DeserializeOwned;

    /// Envelope tag.
    fn kind(&self) -> &'static str;

    /// Freezes the operation if it is still mutable.
    fn freeze_for_execution(&mut self);

    /// Local validation run before submission.
    fn validate_for_execution(&self, ledger_id: &LedgerId) -> hgraph_ledger_types::Result<()>;

    /// Serializes the request envelope, applying client defaults to unset fields.
    fn request_envelope(&self, client: &Client) -> Result<String>;

    /// Signer handles passed to the engine.
    fn signer_handles(&self) -> Vec<Signer>;
}

/// `{"<kind>": body}`.
pub(crate) struct Envelope<'a, T> {
    pub(crate) kind: &'static str,
    pub(crate) body: &'a T,
}

impl<T: Serialize> Serialize for Envelope<'_, T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.kind, self.body)?;
        map.end()
    }
}

pub(crate) fn encode_envelope<T: Serialize>(kind: &'static str, body: &T) -> Result<String> {
    encode(&Envelope { kind, body }).context(EncodeSnafu { kind })
}

/// Parses `{"<kind>": body}`, rejecting any other tag.
pub(crate) fn decode_envelope<T: DeserializeOwned>(kind: &'static str, json: &str) -> Result<T> {
    let mut tagged: BTreeMap<String, serde_json::Value> =
        decode(json.as_bytes()).map_err(|source| SdkError::Decode {
            kind,
            expected_type: std::any::type_name::<T>(),
            source,
        })?;
    if tagged.len() != 1 {
        return Err(LedgerError::Parse {
            input: json.to_owned(),
            reason: format!("expected a single `{kind}` entry"),
        }
        .into());
    }
    let body = tagged.remove(kind).ok_or_else(|| LedgerError::Parse {
        input: json.to_owned(),
        reason: format!("expected a `{kind}` envelope"),
    })?;
    serde_json::from_value(body).map_err(|source| SdkError::Decode {
        kind,
        expected_type: std::any::type_name::<T>(),
        source: hgraph_ledger_types::CodecError::Decode { source },
    })
}

/// Runs the full execution pipeline for `operation`.
pub(crate) async fn execute<E: Execute>(
    operation: &mut E,
    client: &Client,
    timeout: Option<Duration>,
) -> Result<E::Response> {
    let kind = operation.kind();
    operation.freeze_for_execution();

    let ledger_id = client.ledger_id();
    if let Err(error) = operation.validate_for_execution(&ledger_id) {
        tracing::warn!(kind, %ledger_id, error = %error, "Rejected operation before submission");
        client.metrics().record_local_rejection(kind, error.code());
        return Err(error.into());
    }

    let envelope = operation.request_envelope(client)?;
    submit(client, kind, envelope, operation.signer_handles(), timeout).await
}

/// Submits an encoded envelope and waits for the single completion.
pub(crate) async fn submit<R: DeserializeOwned>(
    client: &Client,
    kind: &'static str,
    envelope: String,
    signers: Vec<Signer>,
    timeout: Option<Duration>,
) -> Result<R> {
    let timeout = timeout.or(client.config().request_timeout());
    let (completion, receiver) = Completion::channel(kind);

    tracing::debug!(kind, ?timeout, signers = signers.len(), "Submitting request to execution engine");
    tracing::trace!(kind, %envelope, "Request envelope");

    let start = Instant::now();
    client.engine().submit(EngineRequest { kind, envelope, signers, timeout }, completion);
    let outcome = receiver.await;
    let elapsed = start.elapsed();

    let (result, status) = match outcome {
        Ok(Ok(payload)) => match decode::<R>(&payload) {
            Ok(response) => {
                tracing::debug!(kind, elapsed_ms = elapsed.as_millis() as u64, "Execution completed");
                (Ok(response), ExecutionStatus::Success)
            },
            Err(source) => {
                tracing::warn!(kind, error = %source, "Engine payload did not match the response type");
                let error =
                    SdkError::Decode { kind, expected_type: std::any::type_name::<R>(), source };
                (Err(error), ExecutionStatus::DecodeError)
            },
        },
        Ok(Err(error)) => {
            tracing::debug!(kind, code = %error.code, message = %error.message, "Engine reported failure");
            (Err(error.into()), ExecutionStatus::EngineError)
        },
        Err(_) => {
            tracing::error!(kind, "Execution engine dropped the completion without signalling");
            (CompletionDroppedSnafu { kind }.fail(), ExecutionStatus::CompletionDropped)
        },
    };

    client.metrics().record_execution(kind, elapsed, status);
    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Body {
        token_id: String,
        amount: u64,
    }

    #[test]
    fn test_envelope_is_single_tagged_object() {
        let body = Body { token_id: "0.0.5".to_string(), amount: 3 };
        let json = encode_envelope("tokenBurn", &body).unwrap();
        assert_eq!(json, r#"{"tokenBurn":{"tokenId":"0.0.5","amount":3}}"#);
        assert_eq!(decode_envelope::<Body>("tokenBurn", &json).unwrap(), body);
    }

    #[test]
    fn test_decode_envelope_rejects_other_kind() {
        let err = decode_envelope::<Body>("tokenWipe", r#"{"tokenBurn":{"tokenId":"0.0.5","amount":3}}"#)
            .unwrap_err();
        assert!(matches!(err, SdkError::Local { source: LedgerError::Parse { .. } }));
    }

    #[test]
    fn test_decode_envelope_rejects_malformed_body() {
        let err = decode_envelope::<Body>("tokenBurn", r#"{"tokenBurn":{"amount":"x"}}"#).unwrap_err();
        assert!(matches!(err, SdkError::Decode { kind: "tokenBurn", .. }));
    }
}
