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

//! The timed-delay check.
//!
//! One run initializes the timing subsystem, reads its tick counter,
//! blocks for the configured delay, reads the counter again and releases
//! the subsystem. What happens when initialization fails is governed by
//! [`InitFailurePolicy`].

mod measurement;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use measurement::DelayMeasurement;

use crate::error::{CheckError, ParseOptionError};
use crate::platform::timing::{SubsystemGuard, TimingBackend};

/// The delay used when nothing else is configured.
pub const DEFAULT_DELAY_MS: u64 = 2000;

/// What to do when the timing subsystem fails to initialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitFailurePolicy {
    /// Log the failure and measure anyway. The reported value is then
    /// whatever the uninitialized backend returns.
    #[default]
    Ignore,
    /// Stop before taking any timestamp and report the failure.
    Abort,
}

impl InitFailurePolicy {
    const EXPECTED: &'static str = "ignore, abort";

    /// The canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            InitFailurePolicy::Ignore => "ignore",
            InitFailurePolicy::Abort => "abort",
        }
    }
}

impl fmt::Display for InitFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InitFailurePolicy {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(InitFailurePolicy::Ignore),
            "abort" => Ok(InitFailurePolicy::Abort),
            _ => Err(ParseOptionError {
                kind: "init failure policy",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

/// Measures a blocking delay against a timing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedDelayCheck {
    delay_ms: u64,
    policy: InitFailurePolicy,
}

impl TimedDelayCheck {
    /// Creates a check for `delay_ms` with the default (ignore) policy.
    /// ## Arguments
    /// * `delay_ms` - How long the check blocks, in milliseconds.
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            policy: InitFailurePolicy::default(),
        }
    }

    /// Replaces the init failure policy.
    pub fn with_policy(mut self, policy: InitFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The configured delay in milliseconds.
    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// The active init failure policy.
    pub fn policy(&self) -> InitFailurePolicy {
        self.policy
    }

    /// Runs the check once.
    ///
    /// The subsystem is released before this returns, on success and on
    /// abort alike.
    /// ## Arguments
    /// * `backend` - The timing library to initialize, read and delay on.
    /// ## Returns
    /// The two tick readings around the delay, or [`CheckError::Init`] when
    /// init failed under [`InitFailurePolicy::Abort`].
    pub fn run<B: TimingBackend + ?Sized>(
        &self,
        backend: &mut B,
    ) -> Result<DelayMeasurement, CheckError> {
        let mut guard = SubsystemGuard::acquire(backend);

        if let Some(err) = guard.take_init_error() {
            match self.policy {
                InitFailurePolicy::Ignore => {
                    log::warn!(
                        "{err}; continuing with `{}` anyway, timings may be meaningless",
                        guard.backend_name()
                    );
                }
                InitFailurePolicy::Abort => {
                    log::error!("{err}; aborting the delay check");
                    return Err(CheckError::Init(err));
                }
            }
        }

        let start_ms = guard.ticks_ms();
        log::debug!("Delaying for {} ms (start tick {start_ms})", self.delay_ms);
        guard.delay_ms(self.delay_ms);
        let end_ms = guard.ticks_ms();

        let measurement = DelayMeasurement {
            requested_ms: self.delay_ms,
            start_ms,
            end_ms,
            initialized: guard.is_initialized(),
        };
        if !measurement.meets_lower_bound() {
            log::warn!(
                "`{}` woke up early: {} ms elapsed for a {} ms delay",
                guard.backend_name(),
                measurement.elapsed_ms(),
                self.delay_ms
            );
        }
        Ok(measurement)
    }
}

impl Default for TimedDelayCheck {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimingError;
    use std::cell::Cell;

    /// A simulated clock: delays advance the tick counter instantly.
    struct SimulatedBackend {
        fail_init: bool,
        epoch_offset: u64,
        now: Cell<u64>,
        shutdowns: u32,
    }

    impl SimulatedBackend {
        fn new(epoch_offset: u64) -> Self {
            Self {
                fail_init: false,
                epoch_offset,
                now: Cell::new(0),
                shutdowns: 0,
            }
        }
    }

    impl TimingBackend for SimulatedBackend {
        fn name(&self) -> &'static str {
            "simulated"
        }

        fn init(&mut self) -> Result<(), TimingError> {
            self.now.set(self.epoch_offset);
            if self.fail_init {
                Err(TimingError::InitFailed("no timer".into()))
            } else {
                Ok(())
            }
        }

        fn ticks_ms(&self) -> u64 {
            self.now.get()
        }

        fn delay_ms(&self, ms: u64) {
            // Simulated scheduler overshoot of 1 ms.
            self.now.set(self.now.get() + ms + 1);
        }

        fn shutdown(&mut self) {
            self.shutdowns += 1;
        }
    }

    #[test]
    fn default_check_uses_two_seconds_and_ignore() {
        let check = TimedDelayCheck::default();
        assert_eq!(check.delay_ms(), DEFAULT_DELAY_MS);
        assert_eq!(check.delay_ms(), 2000);
        assert_eq!(check.policy(), InitFailurePolicy::Ignore);
    }

    #[test]
    fn run_measures_delay_from_backend_ticks() {
        let mut backend = SimulatedBackend::new(40);
        let m = TimedDelayCheck::new(2000).run(&mut backend).unwrap();

        assert_eq!(m.start_ms, 40);
        assert_eq!(m.end_ms, 2041);
        assert_eq!(m.elapsed_ms(), 2001);
        assert!(m.meets_lower_bound());
        assert!(m.initialized);
        assert_eq!(backend.shutdowns, 1);
    }

    #[test]
    fn zero_delay_still_produces_a_measurement() {
        let mut backend = SimulatedBackend::new(0);
        let m = TimedDelayCheck::new(0).run(&mut backend).unwrap();
        assert!(m.meets_lower_bound());
        assert_eq!(m.to_string(), "Elapsed time: 1 ms");
    }

    #[test]
    fn ignore_policy_measures_despite_init_failure() {
        let mut backend = SimulatedBackend::new(0);
        backend.fail_init = true;

        let m = TimedDelayCheck::new(10).run(&mut backend).unwrap();
        assert!(!m.initialized);
        assert_eq!(m.elapsed_ms(), 11);
        assert_eq!(backend.shutdowns, 1);
    }

    #[test]
    fn abort_policy_surfaces_init_failure_and_still_shuts_down() {
        let mut backend = SimulatedBackend::new(0);
        backend.fail_init = true;

        let err = TimedDelayCheck::new(10)
            .with_policy(InitFailurePolicy::Abort)
            .run(&mut backend)
            .unwrap_err();
        assert!(matches!(err, CheckError::Init(TimingError::InitFailed(_))));
        assert_eq!(backend.now.get(), 0, "no delay should have been issued");
        assert_eq!(backend.shutdowns, 1);
    }

    #[test]
    fn repeated_runs_are_independent() {
        let mut backend = SimulatedBackend::new(0);
        let check = TimedDelayCheck::new(25);

        let first = check.run(&mut backend).unwrap();
        let second = check.run(&mut backend).unwrap();
        assert_eq!(first, second);
        assert_eq!(backend.shutdowns, 2);
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Abort".parse::<InitFailurePolicy>(), Ok(InitFailurePolicy::Abort));
        assert_eq!("ignore".parse::<InitFailurePolicy>(), Ok(InitFailurePolicy::Ignore));
        assert!("retry".parse::<InitFailurePolicy>().is_err());
        assert_eq!(InitFailurePolicy::Abort.to_string(), "abort");
    }
}
