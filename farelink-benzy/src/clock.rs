use std::time::{Duration, Instant};

use async_trait::async_trait;

/// Time source for the polling loop and credential expiry. Injected so
/// backoff and deadline behavior can be tested without real waiting.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
