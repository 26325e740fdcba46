use std::time::Duration;

use rand::Rng;

use crate::BackoffPolicy;

/// Exponential reconnect delay with jitter.
///
/// The ceiling doubles on every attempt, starting at `base_delay_ms` and
/// capped at `max_delay_ms`. The returned delay is drawn from the upper half
/// of the ceiling, so concurrent mirrors spread out while every wait stays
/// at least half the ceiling.
#[derive(Debug, Clone)]
pub(crate) struct Backoff {
    base: Duration,
    max: Duration,
    max_retries: usize,
    attempts: u32,
}

impl Backoff {
    pub(crate) fn new(policy: &BackoffPolicy) -> Self {
        Self {
            base: Duration::from_millis(policy.base_delay_ms),
            max: Duration::from_millis(policy.max_delay_ms),
            max_retries: policy.max_retries,
            attempts: 0,
        }
    }

    /// Upper bound of the delay for the current attempt
    pub(crate) fn ceiling(&self) -> Duration {
        let factor = 1u32.checked_shl(self.attempts.min(31)).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor).min(self.max)
    }

    /// Delay before the next attempt; advances the attempt counter
    pub(crate) fn next_delay(&mut self) -> Duration {
        let ceiling = self.ceiling();
        self.attempts = self.attempts.saturating_add(1);

        let half = ceiling / 2;
        let jitter_ms = rand::thread_rng().gen_range(0..=half.as_millis() as u64);
        half + Duration::from_millis(jitter_ms)
    }

    /// `true` once a bounded policy has used all its retries
    pub(crate) fn exhausted(&self) -> bool {
        self.max_retries != 0 && self.attempts as usize >= self.max_retries
    }

    pub(crate) fn attempts(&self) -> u32 {
        self.attempts
    }

    pub(crate) fn reset(&mut self) {
        self.attempts = 0;
    }
}
