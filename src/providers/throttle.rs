use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Cooperative rate limiter granting one call per configured interval.
///
/// The mutex is held across the sleep so that concurrent callers sharing one
/// client instance serialize through the same spacing check; the interval is
/// measured between actual dispatch times, not between acquire attempts.
pub struct IntervalThrottle {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl IntervalThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Suspends the caller until the configured spacing since the previous
    /// call has elapsed, then records the new dispatch time.
    pub async fn acquire(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(last) = *last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }

        *last_call = Some(Instant::now());
    }
}
