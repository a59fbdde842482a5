use std::time::Duration;
use tracing::debug;

/// Fixed pause inserted between requests to bound the request rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    delay: Duration,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    pub async fn pause(&self) {
        if self.delay.is_zero() {
            return;
        }
        debug!("Throttling for {:?}", self.delay);
        tokio::time::sleep(self.delay).await;
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::from_millis(500)
    }
}
