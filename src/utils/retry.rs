//! Opt-in retry for remote calls
//!
//! Nothing in the transport or the services retries on its own. Callers wrap
//! a call in a [`RetryExecutor`] when they want it, and only idempotent
//! operations are ever repeated: a second POST can create a second resource.

use crate::api::endpoints::Operation;
use crate::error::ApiError;
use backoff::{ExponentialBackoff, backoff::Backoff};
use std::future::Future;
use std::time::Duration;

/// How often and how patiently a read is repeated
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    pub attempts: u32,
    pub first_delay: Duration,
    pub delay_cap: Duration,
    pub growth: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            first_delay: Duration::from_millis(200),
            delay_cap: Duration::from_secs(5),
            growth: 2.0,
        }
    }
}

impl RetryPolicy {
    fn schedule(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.first_delay,
            initial_interval: self.first_delay,
            max_interval: self.delay_cap,
            multiplier: self.growth,
            randomization_factor: 0.2,
            max_elapsed_time: None,
            ..Default::default()
        }
    }
}

/// Failures worth a second attempt: the server hiccuped or never answered.
/// Client errors, rejected credentials and malformed bodies come back the same.
fn is_transient(error: &ApiError) -> bool {
    match error {
        ApiError::Timeout { .. } | ApiError::Network { .. } => true,
        ApiError::Http { status, .. } => (500..600).contains(status),
        ApiError::Unauthorized { .. } | ApiError::Decode { .. } => false,
    }
}

pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Repeat `call` on transient failures until it succeeds or the policy runs out
    pub async fn execute<F, Fut, T>(&self, call: F) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut schedule = self.policy.schedule();
        let mut attempt = 1;

        loop {
            let error = match call().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !is_transient(&error) || attempt >= self.policy.attempts {
                return Err(error);
            }

            let Some(delay) = schedule.next_backoff() else {
                return Err(error);
            };

            log::warn!(
                "{} failed on attempt {}/{} ({}), retrying in {:?}",
                error.endpoint(),
                attempt,
                self.policy.attempts,
                error,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Run `call` with retries when `operation` is idempotent, exactly once otherwise
    pub async fn execute_for<F, Fut, T>(&self, operation: Operation, call: F) -> Result<T, ApiError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if operation.is_idempotent() {
            self.execute(call).await
        } else {
            log::debug!("{} is not idempotent, running once", operation);
            call().await
        }
    }
}
