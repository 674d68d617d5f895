// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Exponential backoff for socket reconnect attempts.
//!
//! The schedule is chosen to bound the retry span to roughly one minute:
//! starting at one second and growing by half each step, ten steps reach
//! about 38 seconds, after which the last duration repeats. A successful
//! connect resets the schedule to its initial parameters.

use std::time::Duration;

/// Initial delay between reconnect attempts.
const INITIAL: Duration = Duration::from_secs(1);
/// Multiplicative growth per step.
const FACTOR: f64 = 1.5;
/// Number of growth steps before the delay plateaus.
const STEPS: u32 = 10;
/// Additive jitter as a fraction of the current delay.
const JITTER: f64 = 0.1;

/// Backoff schedule state.
#[derive(Debug, Clone)]
pub struct Backoff {
    current: Duration,
    attempt: u32,
}

impl Backoff {
    pub fn new() -> Self {
        Backoff {
            current: INITIAL,
            attempt: 0,
        }
    }

    /// Returns the next delay and advances the schedule.
    ///
    /// Jitter is additive, up to `JITTER` of the current delay, derived
    /// from the attempt counter so the schedule stays reproducible under
    /// test.
    pub fn step(&mut self) -> Duration {
        let fraction = (f64::from(self.attempt) * 0.7).fract();
        let delay = self.current + self.current.mul_f64(JITTER * fraction);

        if self.attempt + 1 < STEPS {
            self.current = self.current.mul_f64(FACTOR);
        }
        self.attempt += 1;

        delay
    }

    /// Restores the initial parameters.
    pub fn reset(&mut self) {
        *self = Backoff::new();
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::new()
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
