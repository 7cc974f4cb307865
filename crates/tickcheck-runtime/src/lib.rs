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

//! Library half of the `tickcheck` binary: CLI, configuration and the
//! run loop, kept out of `main.rs` so they can be tested directly.

pub mod cli;
pub mod config;
pub mod runner;

pub use cli::Cli;
pub use config::{CheckConfig, FileConfig};
pub use runner::{execute, run_checks};

/// Exit code for completed runs, including an ignored init failure.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit code for a check aborted by the `abort` init policy.
pub const EXIT_ABORTED: u8 = 1;
/// Exit code for invalid configuration (bad file, unavailable backend).
pub const EXIT_CONFIG: u8 = 2;
