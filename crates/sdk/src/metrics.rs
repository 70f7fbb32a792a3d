//! SDK-side metrics for observability and operational monitoring.
//!
//! This module provides a pluggable metrics trait (`SdkMetrics`) that SDK users
//! can implement to collect telemetry from executions. Two implementations are
//! included:
//!
//! - [`NoopSdkMetrics`]: Zero-overhead default that discards all metrics.
//! - [`MetricsSdkMetrics`]: Integration with the [`metrics`](https://docs.rs/metrics) crate facade,
//!   automatically forwarding to whatever recorder is installed (Prometheus, StatsD, etc.).
//!
//! # Metric Names
//!
//! All metrics follow the `hgraph_ledger_sdk_` prefix convention:
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `hgraph_ledger_sdk_executions_total` | Counter | `kind`, `status` | Executions by operation kind and outcome |
//! | `hgraph_ledger_sdk_execution_duration_seconds` | Histogram | `kind` | Submission-to-completion latency |
//! | `hgraph_ledger_sdk_local_rejections_total` | Counter | `kind`, `code` | Operations rejected before submission |
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hgraph_ledger_sdk::{ClientConfig, MetricsSdkMetrics};
//! use hgraph_ledger_types::LedgerId;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::builder()
//!     .ledger_id(LedgerId::TESTNET)
//!     .metrics(Arc::new(MetricsSdkMetrics))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use std::{fmt, sync::Arc, time::Duration};

use hgraph_ledger_types::ErrorCode;

/// Outcome of one execution, as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// The engine succeeded and the payload decoded.
    Success,
    /// The engine reported a failure.
    EngineError,
    /// The engine succeeded but the payload did not decode.
    DecodeError,
    /// The engine dropped the completion without signalling.
    CompletionDropped,
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::EngineError => write!(f, "engine_error"),
            Self::DecodeError => write!(f, "decode_error"),
            Self::CompletionDropped => write!(f, "completion_dropped"),
        }
    }
}

/// Trait for SDK-side metrics collection.
///
/// Implement this trait to integrate with your metrics backend of choice.
/// All methods have default no-op implementations, so you only need to
/// override the metrics you care about.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` since the SDK shares a single
/// metrics instance across all client clones and concurrent executions.
pub trait SdkMetrics: Send + Sync + fmt::Debug {
    /// Records the outcome of an execution that reached the engine.
    ///
    /// - `kind`: Operation kind (e.g., "tokenBurn", "accountBalance").
    /// - `duration`: Wall-clock time from submission to completion.
    /// - `status`: How the execution ended.
    fn record_execution(&self, kind: &str, duration: Duration, status: ExecutionStatus) {
        let _ = (kind, duration, status);
    }

    /// Records an operation rejected locally, before submission.
    fn record_local_rejection(&self, kind: &str, code: ErrorCode) {
        let _ = (kind, code);
    }
}

/// No-op metrics implementation with zero overhead.
///
/// This is the default when no metrics backend is configured.
#[derive(Debug, Clone, Copy)]
pub struct NoopSdkMetrics;

impl SdkMetrics for NoopSdkMetrics {}

/// Metrics implementation using the [`metrics`](https://docs.rs/metrics) crate facade.
///
/// All metric names use the `hgraph_ledger_sdk_` prefix.
#[derive(Debug, Clone, Copy)]
pub struct MetricsSdkMetrics;

/// Metric name constants for the `metrics` crate facade.
mod metric_names {
    /// Executions by kind and outcome.
    pub const EXECUTIONS_TOTAL: &str = "hgraph_ledger_sdk_executions_total";
    /// Execution duration distribution.
    pub const EXECUTION_DURATION: &str = "hgraph_ledger_sdk_execution_duration_seconds";
    /// Local rejections by kind and error code.
    pub const LOCAL_REJECTIONS_TOTAL: &str = "hgraph_ledger_sdk_local_rejections_total";
}

impl SdkMetrics for MetricsSdkMetrics {
    fn record_execution(&self, kind: &str, duration: Duration, status: ExecutionStatus) {
        metrics::counter!(
            metric_names::EXECUTIONS_TOTAL,
            "kind" => kind.to_owned(),
            "status" => status.to_string(),
        )
        .increment(1);
        metrics::histogram!(metric_names::EXECUTION_DURATION, "kind" => kind.to_owned())
            .record(duration.as_secs_f64());
    }

    fn record_local_rejection(&self, kind: &str, code: ErrorCode) {
        metrics::counter!(
            metric_names::LOCAL_REJECTIONS_TOTAL,
            "kind" => kind.to_owned(),
            "code" => code.to_string(),
        )
        .increment(1);
    }
}

/// Creates the default metrics instance (no-op).
pub(crate) fn default_metrics() -> Arc<dyn SdkMetrics> {
    Arc::new(NoopSdkMetrics)
}
