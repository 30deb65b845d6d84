use crate::core::errors::ExchangeError;
use std::future::Future;
use std::time::Duration;
use tokio_retry::strategy::FixedInterval;
use tracing::warn;

/// Fixed-delay retry policy for exchange calls
///
/// When the exchange errors, the same call is made again after waiting a
/// fixed delay, up to `max_retries` additional attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub delay: Duration,
    pub max_retries: usize,
}

impl RetryPolicy {
    pub const fn new(delay: Duration, max_retries: usize) -> Self {
        Self { delay, max_retries }
    }

    /// Policy for order placement. Placing an order is critical: retrying for
    /// long risks posting an out-of-date order to the book, so only a single
    /// retry is attempted.
    pub const fn order_placement() -> Self {
        Self::new(Duration::from_secs(10), 1)
    }

    /// Disable retries entirely
    pub const fn none() -> Self {
        Self::new(Duration::ZERO, 0)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(10), 3)
    }
}

/// Run `op`, retrying after the policy's fixed delay while it keeps failing.
///
/// The operation is recreated for every attempt, so request-scoped values
/// such as nonces are regenerated.
pub async fn with_retry<T, F, Fut>(
    call: &str,
    policy: RetryPolicy,
    mut op: F,
) -> Result<T, ExchangeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ExchangeError>>,
{
    let mut delays = FixedInterval::new(policy.delay).take(policy.max_retries);

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => match delays.next() {
                Some(delay) => {
                    warn!(call, error = %err, delay_ms = delay.as_millis() as u64, "exchange returned an error, retrying");
                    tokio::time::sleep(delay).await;
                }
                None => return Err(err),
            },
        }
    }
}
