//! In-process execution engine for SDK testing.
//!
//! [`MockEngine`] implements [`ExecutionEngine`] without any network. It lets
//! tests drive the execution bridge end to end:
//!
//! - **Request recording**: every submitted envelope, signer and timeout is kept
//! - **Id allocation**: transactions without an explicit id get one generated
//!   from the operator account, and node `0.0.3` when no node was chosen
//! - **Scripted responses**: fixed payloads or failures per operation kind
//! - **Failure injection**: engine errors, delays, and dropped completions
//! - **Request counting**
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hgraph_ledger_sdk::{Client, ClientConfig, TokenUnpauseTransaction, mock::MockEngine};
//! use hgraph_ledger_types::{AccountId, TokenId};
//!
//! # async fn example() -> hgraph_ledger_sdk::Result<()> {
//! let engine = Arc::new(MockEngine::new());
//! engine.set_operator_account_id(AccountId::new(0, 0, 2));
//! let client = Client::new(ClientConfig::for_testnet(), engine.clone());
//!
//! let mut tx = TokenUnpauseTransaction::new();
//! tx.set_token_id(TokenId::new(0, 0, 77))?;
//! let response = tx.execute(&client).await?;
//!
//! assert_eq!(engine.request_count(), 1);
//! assert_eq!(tx.transaction_id(), Some(&response.transaction_id));
//! # Ok(())
//! # }
//! ```

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
    time::Duration,
};

use hgraph_ledger_types::{AccountId, PublicKey, TransactionId};
use parking_lot::RwLock;
use sha2::{Digest, Sha384};

use crate::{
    engine::{Completion, EngineError, EngineErrorCode, EngineRequest, ExecutionEngine},
    transaction::TransactionResponse,
};

/// Node reported for transactions that did not choose one.
pub const DEFAULT_NODE_ACCOUNT_ID: AccountId = AccountId::new(0, 0, 3);

/// A request as the engine received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Envelope tag.
    pub kind: &'static str,
    /// Serialized envelope.
    pub envelope: String,
    /// Public keys of the attached signers.
    pub signers: Vec<PublicKey>,
    /// Advisory timeout.
    pub timeout: Option<Duration>,
}

impl RecordedRequest {
    /// Envelope parsed as JSON.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the envelope is not valid JSON.
    pub fn envelope_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.envelope)
    }

    /// The operation body inside the envelope.
    #[must_use]
    pub fn body(&self) -> Option<serde_json::Value> {
        self.envelope_json().ok().and_then(|mut json| json.get_mut(self.kind).map(serde_json::Value::take))
    }
}

/// Shared state for the mock engine.
#[derive(Debug, Default)]
struct MockState {
    /// Requests in submission order.
    requests: RwLock<Vec<RecordedRequest>>,

    /// Fixed outcomes by operation kind.
    responses: RwLock<HashMap<String, Result<Vec<u8>, EngineError>>>,

    /// Account transaction ids are generated from.
    operator_account_id: RwLock<Option<AccountId>>,

    /// Error returned for the next `injected_error_count` requests.
    injected_error: RwLock<Option<EngineError>>,
    injected_error_count: AtomicUsize,

    /// Number of upcoming completions to drop without signalling.
    drop_count: AtomicUsize,

    /// Delay applied before every completion (milliseconds).
    delay_ms: AtomicU64,

    /// Total requests received.
    request_count: AtomicUsize,
}

impl MockState {
    /// Decrements `counter` if positive, returning whether it was.
    fn take_one(counter: &AtomicUsize) -> bool {
        loop {
            let current = counter.load(Ordering::SeqCst);
            if current == 0 {
                return false;
            }
            if counter.compare_exchange(current, current - 1, Ordering::SeqCst, Ordering::SeqCst).is_ok() {
                return true;
            }
        }
    }

    async fn maybe_delay(&self) {
        let delay_ms = self.delay_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }

    fn injected_error(&self) -> Option<EngineError> {
        if Self::take_one(&self.injected_error_count) { self.injected_error.read().clone() } else { None }
    }

    fn respond(&self, request: &EngineRequest) -> Result<Vec<u8>, EngineError> {
        if let Some(outcome) = self.responses.read().get(request.kind) {
            return outcome.clone();
        }

        let body = serde_json::from_str::<serde_json::Value>(&request.envelope)
            .ok()
            .and_then(|mut json| json.get_mut(request.kind).map(serde_json::Value::take))
            .ok_or_else(|| {
                EngineError::new(EngineErrorCode::RequestParse, format!("malformed {} envelope", request.kind))
            })?;

        match request.kind {
            "queryCost" => Ok(b"0".to_vec()),
            "transactionReceipt" => Ok(br#"{"status":"SUCCESS"}"#.to_vec()),
            _ if body.get("payment").is_some() => Err(EngineError::new(
                EngineErrorCode::QueryNoPaymentPreCheckStatus,
                format!("no scripted response for {} query", request.kind),
            )),
            _ => self.transaction_response(request, &body),
        }
    }

    fn transaction_response(
        &self,
        request: &EngineRequest,
        body: &serde_json::Value,
    ) -> Result<Vec<u8>, EngineError> {
        let explicit_id = body
            .get("transactionId")
            .and_then(serde_json::Value::as_str)
            .map(|id| id.parse::<TransactionId>())
            .transpose()
            .map_err(|e| EngineError::new(EngineErrorCode::BasicParse, e.to_string()))?;

        let transaction_id = match explicit_id {
            Some(id) => id,
            None => match self.operator_account_id.read().clone() {
                Some(operator) => TransactionId::generate(operator),
                None => {
                    return Err(EngineError::new(
                        EngineErrorCode::NoPayerAccountOrTransactionId,
                        "transaction id unset and no operator configured",
                    ));
                },
            },
        };

        let node_account_id = body
            .get("nodeAccountIds")
            .and_then(|ids| ids.get(0))
            .and_then(serde_json::Value::as_str)
            .map(|id| id.parse::<AccountId>())
            .transpose()
            .map_err(|e| EngineError::new(EngineErrorCode::BasicParse, e.to_string()))?
            .unwrap_or(DEFAULT_NODE_ACCOUNT_ID);

        let response = TransactionResponse {
            node_account_id,
            transaction_id,
            transaction_hash: Sha384::digest(request.envelope.as_bytes()).to_vec(),
        };
        serde_json::to_vec(&response).map_err(|e| EngineError::new(EngineErrorCode::FromProtobuf, e.to_string()))
    }
}

/// Mock implementation of the execution engine.
///
/// Cloning shares state, so a test can keep a handle after passing one to
/// the client.
#[derive(Debug, Clone, Default)]
pub struct MockEngine {
    state: Arc<MockState>,
}

impl MockEngine {
    /// Creates an engine with no operator, no scripts and no injected failures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine whose operator matches `config`.
    #[must_use]
    pub fn for_config(config: &crate::ClientConfig) -> Self {
        let engine = Self::new();
        if let Some(operator) = config.operator_account_id() {
            engine.set_operator_account_id(operator.clone());
        }
        engine
    }

    /// Sets the account transaction ids are generated from.
    pub fn set_operator_account_id(&self, account_id: AccountId) {
        *self.state.operator_account_id.write() = Some(account_id);
    }

    /// Replies to every `kind` request with `payload`.
    pub fn set_response(&self, kind: &str, payload: impl Into<Vec<u8>>) {
        self.state.responses.write().insert(kind.to_string(), Ok(payload.into()));
    }

    /// Fails every `kind` request with `error`.
    pub fn set_failure(&self, kind: &str, error: EngineError) {
        self.state.responses.write().insert(kind.to_string(), Err(error));
    }

    /// Fails the next `count` requests with `code`.
    pub fn inject_error(&self, code: EngineErrorCode, count: usize) {
        *self.state.injected_error.write() = Some(EngineError::new(code, format!("injected {code}")));
        self.state.injected_error_count.store(count, Ordering::SeqCst);
    }

    /// Drops the completion of the next `count` requests without signalling.
    pub fn drop_completions(&self, count: usize) {
        self.state.drop_count.store(count, Ordering::SeqCst);
    }

    /// Delays every completion. Sets to 0 to disable.
    pub fn inject_delay(&self, millis: u64) {
        self.state.delay_ms.store(millis, Ordering::SeqCst);
    }

    /// Total requests received.
    pub fn request_count(&self) -> usize {
        self.state.request_count.load(Ordering::SeqCst)
    }

    /// Requests received, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.read().clone()
    }

    /// Most recent request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.requests.read().last().cloned()
    }

    /// Resets all state to initial values.
    pub fn reset(&self) {
        self.state.requests.write().clear();
        self.state.responses.write().clear();
        *self.state.operator_account_id.write() = None;
        *self.state.injected_error.write() = None;
        self.state.injected_error_count.store(0, Ordering::SeqCst);
        self.state.drop_count.store(0, Ordering::SeqCst);
        self.state.delay_ms.store(0, Ordering::SeqCst);
        self.state.request_count.store(0, Ordering::SeqCst);
    }
}

impl ExecutionEngine for MockEngine {
    fn submit(&self, request: EngineRequest, completion: Completion) {
        self.state.request_count.fetch_add(1, Ordering::SeqCst);
        self.state.requests.write().push(RecordedRequest {
            kind: request.kind,
            envelope: request.envelope.clone(),
            signers: request.signers.iter().map(|signer| signer.public_key().clone()).collect(),
            timeout: request.timeout,
        });

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.maybe_delay().await;

            if MockState::take_one(&state.drop_count) {
                tracing::debug!(kind = request.kind, "Dropping completion");
                drop(completion);
                return;
            }
            if let Some(error) = state.injected_error() {
                completion.fail(error);
                return;
            }
            let outcome = state.respond(&request);
            completion.complete(outcome);
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::disallowed_methods)]
mod tests {
    use super::*;

    fn request(kind: &'static str, envelope: &str) -> EngineRequest {
        EngineRequest { kind, envelope: envelope.to_string(), signers: Vec::new(), timeout: None }
    }

    #[tokio::test]
    async fn test_generates_transaction_id_from_operator() {
        let engine = MockEngine::new();
        engine.set_operator_account_id(AccountId::new(0, 0, 2));

        let (completion, receiver) = Completion::channel("tokenUnpause");
        engine.submit(request("tokenUnpause", r#"{"tokenUnpause":{"tokenId":"0.0.7"}}"#), completion);

        let payload = receiver.await.unwrap().unwrap();
        let response: TransactionResponse = serde_json::from_slice(&payload).unwrap();
        assert_eq!(response.transaction_id.account_id, AccountId::new(0, 0, 2));
        assert_eq!(response.node_account_id, DEFAULT_NODE_ACCOUNT_ID);
        assert_eq!(response.transaction_hash.len(), 48);
    }

    #[tokio::test]
    async fn test_explicit_ids_echoed() {
        let engine = MockEngine::new();
        let envelope = r#"{"tokenUnpause":{"transactionId":"0.0.9@1700000000.000000001","nodeAccountIds":["0.0.5"]}}"#;

        let (completion, receiver) = Completion::channel("tokenUnpause");
        engine.submit(request("tokenUnpause", envelope), completion);

        let response: TransactionResponse = serde_json::from_slice(&receiver.await.unwrap().unwrap()).unwrap();
        assert_eq!(response.transaction_id.to_string(), "0.0.9@1700000000.000000001");
        assert_eq!(response.node_account_id, AccountId::new(0, 0, 5));
    }

    #[tokio::test]
    async fn test_no_operator_and_no_id_fails() {
        let engine = MockEngine::new();
        let (completion, receiver) = Completion::channel("tokenUnpause");
        engine.submit(request("tokenUnpause", r#"{"tokenUnpause":{}}"#), completion);

        let error = receiver.await.unwrap().unwrap_err();
        assert_eq!(error.code, EngineErrorCode::NoPayerAccountOrTransactionId);
    }

    #[tokio::test]
    async fn test_injected_errors_are_counted_down() {
        let engine = MockEngine::new();
        engine.set_response("accountBalance", r#"{"accountId":"0.0.3"}"#);
        engine.inject_error(EngineErrorCode::TimedOut, 1);

        let (completion, receiver) = Completion::channel("accountBalance");
        engine.submit(request("accountBalance", r#"{"accountBalance":{}}"#), completion);
        assert_eq!(receiver.await.unwrap().unwrap_err().code, EngineErrorCode::TimedOut);

        let (completion, receiver) = Completion::channel("accountBalance");
        engine.submit(request("accountBalance", r#"{"accountBalance":{}}"#), completion);
        assert!(receiver.await.unwrap().is_ok());
        assert_eq!(engine.request_count(), 2);
    }

    #[tokio::test]
    async fn test_dropped_completion_closes_channel() {
        let engine = MockEngine::new();
        engine.drop_completions(1);

        let (completion, receiver) = Completion::channel("tokenUnpause");
        engine.submit(request("tokenUnpause", r#"{"tokenUnpause":{}}"#), completion);
        assert!(receiver.await.is_err());
    }

    #[test]
    fn test_reset_clears_state() {
        let engine = MockEngine::new();
        engine.state.request_count.store(3, Ordering::SeqCst);
        engine.set_response("x", "1");
        engine.reset();
        assert_eq!(engine.request_count(), 0);
        assert!(engine.state.responses.read().is_empty());
    }
}
