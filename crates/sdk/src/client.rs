//! Client handle shared by every execution.

use std::sync::Arc;

use hgraph_ledger_types::LedgerId;
use parking_lot::RwLock;

use crate::{config::ClientConfig, engine::ExecutionEngine, metrics::SdkMetrics};

/// Entry point for executing operations.
///
/// Cloning is cheap; clones share configuration, engine and ledger id.
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    config: ClientConfig,
    engine: Arc<dyn ExecutionEngine>,
    ledger_id: RwLock<LedgerId>,
}

impl Client {
    /// Creates a client that submits to `engine`.
    pub fn new(config: ClientConfig, engine: Arc<dyn ExecutionEngine>) -> Self {
        let ledger_id = RwLock::new(config.ledger_id().clone());
        tracing::debug!(ledger_id = %config.ledger_id(), "Created ledger client");
        Self { inner: Arc::new(ClientInner { config, engine, ledger_id }) }
    }

    /// Ledger that checksums are validated against.
    #[must_use]
    pub fn ledger_id(&self) -> LedgerId {
        self.inner.ledger_id.read().clone()
    }

    /// Switches the ledger checksums are validated against.
    pub fn set_ledger_id(&self, ledger_id: LedgerId) {
        tracing::debug!(%ledger_id, "Switching client ledger id");
        *self.inner.ledger_id.write() = ledger_id;
    }

    /// Client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub(crate) fn engine(&self) -> &dyn ExecutionEngine {
        self.inner.engine.as_ref()
    }

    pub(crate) fn metrics(&self) -> &dyn SdkMetrics {
        self.inner.config.metrics().as_ref()
    }
}
