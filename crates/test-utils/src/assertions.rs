//! Polling assertions for async tests.

use std::time::Duration;

use tokio::time::{Instant, sleep};

/// Interval between condition checks.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Polls `condition` until it holds or `timeout` elapses.
///
/// Returns whether the condition held. Use it to wait for work the mock
/// engine completes on a spawned task instead of sleeping a fixed time.
///
/// # Example
///
/// ```no_run
/// use std::{
///     sync::{
///         Arc,
///         atomic::{AtomicUsize, Ordering},
///     },
///     time::Duration,
/// };
///
/// use hgraph_ledger_test_utils::assert_eventually;
///
/// # async fn example() {
/// let requests = Arc::new(AtomicUsize::new(0));
/// let writer = Arc::clone(&requests);
/// tokio::spawn(async move { writer.fetch_add(1, Ordering::SeqCst) });
///
/// let seen = assert_eventually(Duration::from_millis(200), || requests.load(Ordering::SeqCst) == 1).await;
/// assert!(seen, "spawned task should have run");
/// # }
/// ```
pub async fn assert_eventually<F>(timeout: Duration, condition: F) -> bool
where
    F: Fn() -> bool,
{
    let start = Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        sleep(POLL_INTERVAL).await;
    }
    condition()
}
