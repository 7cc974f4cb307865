// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A monotonic stopwatch built on [`Instant`].

use std::time::{Duration, Instant};

/// Measures time elapsed since it was started.
///
/// Backed by the monotonic clock, so wall-clock adjustments never make
/// the reading go backwards.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started_at: Instant,
}

impl Stopwatch {
    /// Creates a stopwatch that starts counting immediately.
    #[inline]
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    /// Resets the stopwatch to zero and returns the time it had accumulated.
    pub fn restart(&mut self) -> Duration {
        let now = Instant::now();
        let lap = now.saturating_duration_since(self.started_at);
        self.started_at = now;
        lap
    }

    /// Returns the elapsed time as a [`Duration`].
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Returns the elapsed time in whole milliseconds.
    ///
    /// Saturates at `u64::MAX`, which no realistic run gets near.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Returns the elapsed time in whole microseconds.
    #[inline]
    pub fn elapsed_us(&self) -> u64 {
        u64::try_from(self.elapsed().as_micros()).unwrap_or(u64::MAX)
    }

    /// Returns the elapsed time in seconds.
    #[inline]
    pub fn elapsed_secs_f64(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const SLEEP_MS: u64 = 50;
    const MARGIN_MS: u64 = 250;

    #[test]
    fn fresh_stopwatch_reads_close_to_zero() {
        let watch = Stopwatch::start();
        assert!(
            watch.elapsed_ms() < 15,
            "a fresh stopwatch should read near zero, got {} ms",
            watch.elapsed_ms()
        );
    }

    #[test]
    fn elapsed_is_a_lower_bound_on_sleep() {
        let watch = Stopwatch::start();
        thread::sleep(Duration::from_millis(SLEEP_MS));

        let elapsed_ms = watch.elapsed_ms();
        assert!(
            elapsed_ms >= SLEEP_MS,
            "elapsed ({elapsed_ms} ms) should be >= slept ({SLEEP_MS} ms)"
        );
        assert!(
            elapsed_ms < SLEEP_MS + MARGIN_MS,
            "elapsed ({elapsed_ms} ms) should stay within the margin"
        );
        assert!(watch.elapsed_us() >= SLEEP_MS * 1000);
        assert!(watch.elapsed_secs_f64() >= SLEEP_MS as f64 / 1000.0);
    }

    #[test]
    fn restart_returns_lap_and_resets() {
        let mut watch = Stopwatch::start();
        thread::sleep(Duration::from_millis(20));

        let lap = watch.restart();
        assert!(lap >= Duration::from_millis(20));
        assert!(
            watch.elapsed() < lap,
            "after restart the reading should start over"
        );
    }

    #[test]
    fn copies_share_the_same_origin() {
        let original = Stopwatch::start();
        thread::sleep(Duration::from_millis(10));
        let copy = original;

        let diff = original.elapsed_us().abs_diff(copy.elapsed_us());
        assert!(diff < 1000, "copies drifted by {diff} us");
    }
}
