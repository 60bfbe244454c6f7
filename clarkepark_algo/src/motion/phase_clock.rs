// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use core::f64::consts::TAU;
use core::time::Duration;

/// PhaseClock turns wall-clock timestamps into electrical angle increments.
pub struct PhaseClock {
    last_timestamp: Option<Duration>, // Baseline of the previous tick, none before the first one
}

impl PhaseClock {
    /// Creates new clock without a timestamp baseline
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
        }
    }

    /// Records `now` as the new baseline and returns seconds elapsed since the previous tick.
    ///
    /// The very first tick only stores the baseline and returns `None`.
    /// Timestamps going backwards are treated as zero elapsed time.
    pub fn tick(&mut self, now: Duration) -> Option<f64> {
        let elapsed = self
            .last_timestamp
            .map(|prev| now.saturating_sub(prev).as_secs_f64());
        self.last_timestamp = Some(now);
        elapsed
    }

    /// Advances `angle` by `speed` revolutions per second over `dt` seconds.
    ///
    /// Result is always inside `[0, 2π)`, also for negative speed. A non-finite
    /// result leaves the angle untouched.
    pub fn advance(angle: f64, speed: f64, dt: f64) -> f64 {
        let next = angle + speed * TAU * dt;
        if next.is_finite() {
            wrap_angle(next)
        } else {
            angle
        }
    }

    /// Getter for the last recorded timestamp
    pub fn last_timestamp(&self) -> Option<Duration> {
        self.last_timestamp
    }
}

impl Default for PhaseClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduces any finite angle into `[0, 2π)` using euclidean modulo.
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
