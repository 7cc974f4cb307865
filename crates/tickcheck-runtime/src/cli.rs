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

//! Command-line interface of the `tickcheck` binary.

use std::path::PathBuf;

use clap::Parser;
use tickcheck_core::{BackendKind, InitFailurePolicy};

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV: &str = "TICKCHECK_CONFIG";
/// Environment variable overriding the delay.
pub const DELAY_ENV: &str = "TICKCHECK_DELAY_MS";

/// Initializes the timing library, measures a blocking delay and prints
/// `Elapsed time: <N> ms`.
///
/// Every option is optional; with none given the check waits 2000 ms once.
#[derive(Debug, Default, Parser)]
#[command(name = "tickcheck", version, about)]
pub struct Cli {
    /// Delay to measure, in milliseconds.
    #[arg(long, value_name = "MS", env = DELAY_ENV)]
    pub delay_ms: Option<u64>,

    /// Number of independent runs; one report line each.
    #[arg(long, value_name = "N")]
    pub runs: Option<u32>,

    /// What to do when the timing subsystem fails to initialize.
    #[arg(long, value_name = "ignore|abort")]
    pub on_init_failure: Option<InitFailurePolicy>,

    /// Timing library to measure against.
    #[arg(long, value_name = "std|sdl3")]
    pub backend: Option<BackendKind>,

    /// TOML file with default settings; flags still win over it.
    #[arg(long, value_name = "PATH", env = CONFIG_ENV)]
    pub config: Option<PathBuf>,
}
