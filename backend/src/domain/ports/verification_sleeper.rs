//! Sleeping abstraction used between verification poll attempts.

use std::time::Duration;

use async_trait::async_trait;

/// Async, clock-independent sleep.
///
/// ```rust,no_run
/// use std::time::Duration;
/// use project_domains::domain::ports::{TokioSleeper, VerificationSleeper};
///
/// # async fn demo() {
/// TokioSleeper.sleep(Duration::from_millis(25)).await;
/// # }
/// ```
#[async_trait]
pub trait VerificationSleeper: Send + Sync {
    /// Suspend execution for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Tokio timer backed sleeper.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl VerificationSleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSleeper;

#[async_trait]
impl VerificationSleeper for NoopSleeper {
    async fn sleep(&self, _duration: Duration) {}
}
