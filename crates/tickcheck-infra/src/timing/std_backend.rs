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

//! Standard-library implementation of the [`TimingBackend`] trait.

use std::thread;
use std::time::Duration;

use tickcheck_core::{Stopwatch, TimingBackend, TimingError};

use super::lifecycle::Lifecycle;

/// A timing backend over [`std::time::Instant`] and [`std::thread::sleep`].
///
/// The tick epoch is pinned at `init`, mirroring a timing library whose
/// counter starts when its subsystem comes up. Before `init` (or after
/// `shutdown`) the counter reads zero.
#[derive(Debug, Default)]
pub struct StdTimingBackend {
    epoch: Lifecycle<Stopwatch>,
}

impl StdTimingBackend {
    /// Creates a backend that has not been initialized yet.
    pub fn new() -> Self {
        Self {
            epoch: Lifecycle::Idle,
        }
    }

    /// Whether the backend is between `init` and `shutdown`.
    pub fn is_running(&self) -> bool {
        self.epoch.is_running()
    }
}

impl TimingBackend for StdTimingBackend {
    fn name(&self) -> &'static str {
        "std"
    }

    fn init(&mut self) -> Result<(), TimingError> {
        if self.epoch.is_running() {
            log::warn!("[StdTimingBackend] init called twice, keeping the original epoch");
            return Ok(());
        }
        self.epoch.record_init(Ok(Stopwatch::start()))
    }

    fn ticks_ms(&self) -> u64 {
        self.epoch
            .running()
            .map(|epoch| epoch.elapsed_ms())
            .unwrap_or(0)
    }

    fn delay_ms(&self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }

    fn shutdown(&mut self) {
        // Nothing to release beyond the epoch itself.
        let _ = self.epoch.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_read_zero_outside_the_lifecycle() {
        let mut backend = StdTimingBackend::new();
        assert!(!backend.is_running());
        assert_eq!(backend.ticks_ms(), 0);

        backend.init().unwrap();
        assert!(backend.is_running());
        backend.shutdown();
        assert_eq!(backend.ticks_ms(), 0);
    }

    #[test]
    fn ticks_start_near_zero_after_init() {
        let mut backend = StdTimingBackend::new();
        backend.init().unwrap();
        assert!(backend.ticks_ms() < 15);
        backend.shutdown();
    }

    #[test]
    fn delay_advances_ticks_by_at_least_the_request() {
        let mut backend = StdTimingBackend::new();
        backend.init().unwrap();

        let start = backend.ticks_ms();
        backend.delay_ms(40);
        let end = backend.ticks_ms();

        assert!(end - start >= 40, "only {} ms elapsed", end - start);
        backend.shutdown();
    }

    #[test]
    fn second_init_keeps_the_epoch() {
        let mut backend = StdTimingBackend::new();
        backend.init().unwrap();
        backend.delay_ms(20);
        backend.init().unwrap();
        assert!(backend.ticks_ms() >= 20);
    }
}
