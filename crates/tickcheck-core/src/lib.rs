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

//! # Tickcheck Core
//!
//! Foundational crate containing the timing backend contract, the scoped
//! subsystem guard, and the timed-delay check built on top of them.
//!
//! Concrete backends live in `tickcheck-infra`; this crate holds no
//! platform code.

#![warn(missing_docs)]

pub mod check;
pub mod error;
pub mod platform;
pub mod utils;

pub use check::{DelayMeasurement, InitFailurePolicy, TimedDelayCheck, DEFAULT_DELAY_MS};
pub use error::{CheckError, TimingError};
pub use platform::timing::{BackendKind, SubsystemGuard, TimingBackend};
pub use utils::timer::Stopwatch;
