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

use std::fmt;

/// The result of one timed delay: the requested duration and the two
/// backend timestamps taken around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayMeasurement {
    /// The delay that was asked for, in milliseconds.
    pub requested_ms: u64,
    /// Backend ticks read right before the delay.
    pub start_ms: u64,
    /// Backend ticks read right after the delay.
    pub end_ms: u64,
    /// Whether the subsystem reported a successful init for this run.
    pub initialized: bool,
}

impl DelayMeasurement {
    /// Elapsed ticks between the two readings.
    ///
    /// Saturates at zero so a backend that went backwards (e.g. one that
    /// never initialized) reports 0 instead of wrapping.
    pub fn elapsed_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// How far past the requested delay the measurement landed.
    pub fn overshoot_ms(&self) -> u64 {
        self.elapsed_ms().saturating_sub(self.requested_ms)
    }

    /// True when the elapsed time is at least the requested delay.
    pub fn meets_lower_bound(&self) -> bool {
        self.elapsed_ms() >= self.requested_ms
    }
}

/// Renders the report line, without the trailing newline.
impl fmt::Display for DelayMeasurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Elapsed time: {} ms", self.elapsed_ms())
    }
}
