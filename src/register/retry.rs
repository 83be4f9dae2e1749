//! Retry policy for status register reads

use std::time::Duration;

/// How often, and how patiently, a CSR read is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Create a policy; `attempts` below 1 is raised to 1
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// One attempt, no waiting
    pub fn single() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    /// Three attempts 20ms apart: an instance may still be settling after a
    /// control action.
    fn default() -> Self {
        Self::new(3, Duration::from_millis(20))
    }
}
