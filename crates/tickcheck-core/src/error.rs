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

//! Error types shared by the timing backends and the delay check.

use thiserror::Error;

/// Errors reported by a [`TimingBackend`](crate::TimingBackend).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimingError {
    /// The underlying timing subsystem could not be initialized.
    #[error("timing subsystem initialization failed: {0}")]
    InitFailed(String),
    /// The requested backend is not compiled into this build.
    #[error("timing backend `{0}` is not available in this build")]
    Unsupported(&'static str),
}

/// Errors surfaced by [`TimedDelayCheck::run`](crate::TimedDelayCheck::run).
#[derive(Debug, Error)]
pub enum CheckError {
    /// Initialization failed and the active policy asked to abort.
    #[error("delay check aborted")]
    Init(#[source] TimingError),
}

/// Failure to parse a textual option (policy or backend name).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct ParseOptionError {
    pub(crate) kind: &'static str,
    pub(crate) value: String,
    pub(crate) expected: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn check_error_exposes_timing_error_as_source() {
        let err = CheckError::Init(TimingError::InitFailed("no driver".into()));
        let source = err.source().expect("Init should carry a source");
        assert_eq!(
            source.to_string(),
            "timing subsystem initialization failed: no driver"
        );
    }

    #[test]
    fn parse_option_error_lists_expected_values() {
        let err = ParseOptionError {
            kind: "backend",
            value: "sdl2".into(),
            expected: "std, sdl3",
        };
        assert_eq!(
            err.to_string(),
            "unknown backend `sdl2` (expected one of: std, sdl3)"
        );
    }
}
