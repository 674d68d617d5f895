// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the backoff schedule.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use super::Backoff;

#[test]
fn first_step_starts_at_the_initial_delay() {
    let mut backoff = Backoff::new();

    let first = backoff.step();

    assert!(first >= Duration::from_secs(1));
    assert!(first <= Duration::from_millis(1100));
}

#[test]
fn steps_grow_strictly_until_the_plateau() {
    let mut backoff = Backoff::new();

    let mut previous = backoff.step();
    for _ in 1..10 {
        let next = backoff.step();
        assert!(next > previous, "{next:?} should exceed {previous:?}");
        previous = next;
    }
}

#[test]
fn jitter_stays_within_ten_percent() {
    let mut backoff = Backoff::new();

    let mut base = Duration::from_secs(1);
    for _ in 0..10 {
        let delay = backoff.step();
        assert!(delay >= base);
        assert!(delay <= base.mul_f64(1.1));
        base = base.mul_f64(1.5);
    }
}

#[test]
fn exhausted_steps_repeat_the_last_delay() {
    let mut backoff = Backoff::new();

    for _ in 0..10 {
        backoff.step();
    }

    // 1s * 1.5^9, the tenth and final distinct delay.
    let plateau = Duration::from_secs(1).mul_f64(1.5_f64.powi(9));
    for _ in 0..3 {
        let delay = backoff.step();
        assert!(delay >= plateau);
        assert!(delay <= plateau.mul_f64(1.1));
    }
}

#[test]
fn reset_restores_the_initial_delay() {
    let mut backoff = Backoff::new();

    for _ in 0..5 {
        backoff.step();
    }
    backoff.reset();

    let delay = backoff.step();
    assert!(delay >= Duration::from_secs(1));
    assert!(delay <= Duration::from_millis(1100));
}

#[test]
fn total_span_before_the_plateau_is_bounded() {
    let mut backoff = Backoff::new();

    let total: Duration = (0..10).map(|_| backoff.step()).sum();

    // Roughly two minutes at most, even with full jitter.
    assert!(total <= Duration::from_secs(125));
}
