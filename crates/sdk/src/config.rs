//! Client configuration with builder pattern.
//!
//! Provides validated configuration for SDK clients including:
//! - The ledger id checksums are validated against
//! - Defaults applied to operations that leave fees or durations unset
//! - The operator account used by engines to allocate transaction ids
//! - The metrics sink

use std::{sync::Arc, time::Duration};

use hgraph_ledger_types::{AccountId, Hbar, LedgerId, error::InvalidArgumentSnafu};
use snafu::ensure;

use crate::{
    error::{ConfigSnafu, Result},
    metrics::{SdkMetrics, default_metrics},
};

/// Default transaction valid duration (120 seconds).
pub const DEFAULT_TRANSACTION_VALID_DURATION: Duration = Duration::from_secs(120);

/// Longest transaction valid duration the network accepts (180 seconds).
pub const MAX_TRANSACTION_VALID_DURATION: Duration = Duration::from_secs(180);

/// Shortest transaction valid duration (1 second).
pub const MIN_TRANSACTION_VALID_DURATION: Duration = Duration::from_secs(1);

/// Checks that `duration` has no sub-second part. Envelopes carry durations
/// as whole seconds.
pub(crate) fn check_whole_seconds(field: &str, duration: Duration) -> hgraph_ledger_types::Result<()> {
    ensure!(
        duration.subsec_nanos() == 0,
        InvalidArgumentSnafu { message: format!("{field} must be whole seconds, got {duration:?}") }
    );
    Ok(())
}

/// Checks a transaction valid duration: whole seconds within 1..=180.
pub(crate) fn check_transaction_valid_duration(duration: Duration) -> hgraph_ledger_types::Result<()> {
    check_whole_seconds("transaction valid duration", duration)?;
    ensure!(
        (MIN_TRANSACTION_VALID_DURATION..=MAX_TRANSACTION_VALID_DURATION).contains(&duration),
        InvalidArgumentSnafu {
            message: format!(
                "transaction valid duration must be within 1..=180 seconds, got {}s",
                duration.as_secs()
            ),
        }
    );
    Ok(())
}

/// Configuration for the ledger SDK client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    ledger_id: LedgerId,
    operator_account_id: Option<AccountId>,
    default_max_transaction_fee: Option<Hbar>,
    default_max_query_payment: Option<Hbar>,
    default_transaction_valid_duration: Duration,
    request_timeout: Option<Duration>,
    metrics: Arc<dyn SdkMetrics>,
}

#[bon::bon]
impl ClientConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SdkError::Config`] if:
    /// - the transaction valid duration is outside 1..=180 seconds
    /// - a default fee or payment is negative
    /// - the request timeout is zero
    #[builder]
    pub fn new(
        ledger_id: LedgerId,
        operator_account_id: Option<AccountId>,
        default_max_transaction_fee: Option<Hbar>,
        default_max_query_payment: Option<Hbar>,
        #[builder(default = DEFAULT_TRANSACTION_VALID_DURATION)] default_transaction_valid_duration: Duration,
        request_timeout: Option<Duration>,
        #[builder(default = default_metrics())] metrics: Arc<dyn SdkMetrics>,
    ) -> Result<Self> {
        let config = Self {
            ledger_id,
            operator_account_id,
            default_max_transaction_fee,
            default_max_query_payment,
            default_transaction_valid_duration,
            request_timeout,
            metrics,
        };
        config.validate()?;
        Ok(config)
    }
}

impl ClientConfig {
    /// Mainnet configuration with default settings.
    #[must_use]
    pub fn for_mainnet() -> Self {
        Self::with_defaults(LedgerId::MAINNET)
    }

    /// Testnet configuration with default settings.
    #[must_use]
    pub fn for_testnet() -> Self {
        Self::with_defaults(LedgerId::TESTNET)
    }

    /// Previewnet configuration with default settings.
    #[must_use]
    pub fn for_previewnet() -> Self {
        Self::with_defaults(LedgerId::PREVIEWNET)
    }

    fn with_defaults(ledger_id: LedgerId) -> Self {
        Self {
            ledger_id,
            operator_account_id: None,
            default_max_transaction_fee: None,
            default_max_query_payment: None,
            default_transaction_valid_duration: DEFAULT_TRANSACTION_VALID_DURATION,
            request_timeout: None,
            metrics: default_metrics(),
        }
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SdkError::Config`] if any value is out of range.
    pub fn validate(&self) -> Result<()> {
        if let Err(err) = check_transaction_valid_duration(self.default_transaction_valid_duration) {
            return ConfigSnafu { message: err.to_string() }.fail();
        }
        ensure!(
            !self.default_max_transaction_fee.is_some_and(Hbar::is_negative),
            ConfigSnafu { message: "default max transaction fee must not be negative" }
        );
        ensure!(
            !self.default_max_query_payment.is_some_and(Hbar::is_negative),
            ConfigSnafu { message: "default max query payment must not be negative" }
        );
        ensure!(
            self.request_timeout.is_none_or(|timeout| !timeout.is_zero()),
            ConfigSnafu { message: "request timeout must be non-zero" }
        );
        Ok(())
    }

    /// Ledger the client targets.
    #[must_use]
    pub fn ledger_id(&self) -> &LedgerId {
        &self.ledger_id
    }

    /// Operator account, if configured.
    #[must_use]
    pub fn operator_account_id(&self) -> Option<&AccountId> {
        self.operator_account_id.as_ref()
    }

    /// Fee applied to transactions that leave `max_transaction_fee` unset.
    #[must_use]
    pub fn default_max_transaction_fee(&self) -> Option<Hbar> {
        self.default_max_transaction_fee
    }

    /// Payment cap applied to queries that leave `max_amount` unset.
    #[must_use]
    pub fn default_max_query_payment(&self) -> Option<Hbar> {
        self.default_max_query_payment
    }

    /// Valid duration applied to transactions that leave it unset.
    #[must_use]
    pub fn default_transaction_valid_duration(&self) -> Duration {
        self.default_transaction_valid_duration
    }

    /// Timeout passed to the engine when an execution does not set one.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Metrics sink.
    #[must_use]
    pub fn metrics(&self) -> &Arc<dyn SdkMetrics> {
        &self.metrics
    }
}
