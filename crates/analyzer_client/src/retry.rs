use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Policy that surfaces the first transport error immediately.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }
}

/// One granted reconnect attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryAttempt {
    /// 1-based attempt number, for "retrying (n/max)" display.
    pub attempt: u32,
    pub max_retries: u32,
    pub delay: Duration,
}

/// Backoff state for one session's transport attempts.
///
/// The counter resets only when a status event actually decodes; a
/// connection that opens but delivers nothing has not proven itself.
#[derive(Debug, Clone)]
pub struct RetryController {
    policy: RetryPolicy,
    attempt: u32,
}

impl RetryController {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy, attempt: 0 }
    }

    pub fn record_success(&mut self) {
        self.attempt = 0;
    }

    /// Grants the next attempt with its exponential delay
    /// (`base, base*2, base*4, ...`), or `None` once the ceiling is hit.
    pub fn next_attempt(&mut self) -> Option<RetryAttempt> {
        if self.attempt >= self.policy.max_retries {
            return None;
        }
        self.attempt += 1;
        let factor = 2u32.saturating_pow(self.attempt - 1);
        Some(RetryAttempt {
            attempt: self.attempt,
            max_retries: self.policy.max_retries,
            delay: self.policy.base_delay.saturating_mul(factor),
        })
    }
}
