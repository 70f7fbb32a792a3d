//! Client-side operation model for the hgraph ledger.
//!
//! This SDK builds, validates and executes ledger operations (transactions
//! and queries). Signing, transport, node selection and retry belong to an
//! external [`ExecutionEngine`]; the SDK hands it a serialized request and
//! waits for exactly one completion.
//!
//! # Features
//!
//! - **Freeze state machine**: builders are mutable until frozen, then every
//!   setter fails with a typed error
//! - **Checksum validation**: entity ids carrying a checksum are checked
//!   against the client's ledger before anything is submitted
//! - **Execution bridge**: one submission, one completion, typed response
//! - **Mock engine**: an in-process engine for tests
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hgraph_ledger_sdk::{Client, ClientConfig, TopicMessageSubmitTransaction, mock::MockEngine};
//! use hgraph_ledger_types::{AccountId, LedgerId, TopicId};
//!
//! # async fn example() -> hgraph_ledger_sdk::Result<()> {
//! let config = ClientConfig::builder()
//!     .ledger_id(LedgerId::TESTNET)
//!     .operator_account_id(AccountId::new(0, 0, 2))
//!     .build()?;
//! let client = Client::new(config.clone(), Arc::new(MockEngine::for_config(&config)));
//!
//! let mut submit = TopicMessageSubmitTransaction::new();
//! submit.set_topic_id("0.0.4040".parse::<TopicId>()?)?.set_message("hello")?;
//!
//! let response = submit.execute(&client).await?;
//! let receipt = response.get_receipt(&client).await?;
//! println!("sequence number = {}", receipt.topic_sequence_number);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │          Transaction<D> / Query<D> (Public API)             │
//! │   set_*() │ freeze() │ execute() │ get_cost()               │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   Execution Bridge                          │
//! │   Checksum validation │ Envelope encoding │ Decoding        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   ExecutionEngine (external)                │
//! │   Signing │ Node selection │ Retry │ Completion             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod engine;
mod error;
mod execute;
mod metrics;
pub mod mock;
mod query;
mod signer;
mod transaction;

pub use client::Client;
pub use config::{ClientConfig, DEFAULT_TRANSACTION_VALID_DURATION, MAX_TRANSACTION_VALID_DURATION};
pub use engine::{Completion, EngineError, EngineErrorCode, EngineRequest, ExecutionEngine};
pub use error::{Result, SdkError};
pub use metrics::{ExecutionStatus, MetricsSdkMetrics, NoopSdkMetrics, SdkMetrics};
pub use query::{
    AccountBalance, AccountBalanceQuery, AccountBalanceQueryData, AccountInfo, AccountInfoQuery,
    AccountInfoQueryData, PaymentTransaction, Query, QueryData, TransactionReceipt, TransactionReceiptQuery,
    TransactionReceiptQueryData,
};
pub use signer::Signer;
pub use transaction::{
    AccountAllowanceApproveTransaction, AccountAllowanceApproveTransactionData, ContractUpdateTransaction,
    ContractUpdateTransactionData, TokenBurnTransaction, TokenBurnTransactionData, TokenFreezeTransaction,
    TokenFreezeTransactionData, TokenRevokeKycTransaction, TokenRevokeKycTransactionData, TokenUnpauseTransaction,
    TokenUnpauseTransactionData, TokenWipeTransaction, TokenWipeTransactionData, TopicCreateTransaction,
    TopicCreateTransactionData, TopicMessageSubmitTransaction, TopicMessageSubmitTransactionData,
    DEFAULT_TOPIC_AUTO_RENEW_PERIOD, TopicUpdateTransaction, TopicUpdateTransactionData, Transaction, TransactionData,
    TransactionResponse,
};
