use std::time::Duration;

/// Trait for defining reconnection strategies
///
/// The connection layer never gives up: a strategy only decides how long to
/// wait before the next attempt, not whether to make it.
pub trait ReconnectionStrategy: Send + Sync {
    /// Get the delay before the next reconnection attempt
    ///
    /// # Arguments
    /// * `attempt` - Consecutive failed attempts since the last successful open (0-indexed)
    fn next_delay(&self, attempt: usize) -> Duration;
}

/// Fixed delay reconnection strategy
///
/// Always waits the same amount of time between reconnection attempts,
/// with no growth and no cap on the number of attempts.
#[derive(Debug, Clone)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    /// Default delay between reconnects
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(3);

    /// Create a new fixed delay strategy
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl ReconnectionStrategy for FixedDelay {
    fn next_delay(&self, _attempt: usize) -> Duration {
        self.delay
    }
}
