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

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tickcheck_infra::create_backend;
use tickcheck_runtime::{execute, CheckConfig, Cli, EXIT_CONFIG};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries nothing but the report lines.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match CheckConfig::resolve(&cli) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e:#}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let mut backend = match create_backend(config.backend).context("cannot select timing backend")
    {
        Ok(backend) => backend,
        Err(e) => {
            log::error!("{e:#}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let stdout = io::stdout();
    ExitCode::from(execute(&config, &mut backend, &mut stdout.lock()))
}
