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

//! Run configuration.
//!
//! Settings are layered, lowest precedence first: built-in defaults, the
//! TOML file, then the command line (which already folds in the
//! `TICKCHECK_DELAY_MS` / `TICKCHECK_CONFIG` environment variables).

use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use tickcheck_core::{BackendKind, InitFailurePolicy, TimedDelayCheck, DEFAULT_DELAY_MS};

use crate::cli::Cli;

/// The optional settings a config file may carry.
///
/// ```toml
/// delay_ms = 500
/// runs = 3
/// on_init_failure = "abort"
/// backend = "std"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Delay to measure, in milliseconds.
    pub delay_ms: Option<u64>,
    /// Number of runs.
    pub runs: Option<u32>,
    /// Init failure policy.
    pub on_init_failure: Option<InitFailurePolicy>,
    /// Timing backend.
    pub backend: Option<BackendKind>,
}

impl FileConfig {
    /// Parses a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Reads and parses a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckConfig {
    /// Delay to measure, in milliseconds.
    pub delay_ms: u64,
    /// Number of independent runs, at least one.
    pub runs: u32,
    /// What to do when init fails.
    pub on_init_failure: InitFailurePolicy,
    /// Which timing library to use.
    pub backend: BackendKind,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            runs: 1,
            on_init_failure: InitFailurePolicy::default(),
            backend: BackendKind::default(),
        }
    }
}

impl CheckConfig {
    /// Resolves the configuration from the parsed command line, loading
    /// the config file it points at, if any.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = &cli.config {
            log::debug!("Loading config file {}", path.display());
            config.merge_file(FileConfig::from_file(path)?);
        }
        config.merge_cli(cli);
        config.validate()?;
        log::debug!("Resolved configuration: {config:?}");
        Ok(config)
    }

    fn merge_file(&mut self, file: FileConfig) {
        let FileConfig {
            delay_ms,
            runs,
            on_init_failure,
            backend,
        } = file;
        self.delay_ms = delay_ms.unwrap_or(self.delay_ms);
        self.runs = runs.unwrap_or(self.runs);
        self.on_init_failure = on_init_failure.unwrap_or(self.on_init_failure);
        self.backend = backend.unwrap_or(self.backend);
    }

    fn merge_cli(&mut self, cli: &Cli) {
        self.delay_ms = cli.delay_ms.unwrap_or(self.delay_ms);
        self.runs = cli.runs.unwrap_or(self.runs);
        self.on_init_failure = cli.on_init_failure.unwrap_or(self.on_init_failure);
        self.backend = cli.backend.unwrap_or(self.backend);
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.runs >= 1, "runs must be at least 1, got {}", self.runs);
        Ok(())
    }

    /// Builds the delay check these settings describe.
    pub fn check(&self) -> TimedDelayCheck {
        TimedDelayCheck::new(self.delay_ms).with_policy(self.on_init_failure)
    }
}
