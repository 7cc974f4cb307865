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

//! Drives the configured number of runs and writes the report lines.

use std::io::{self, Write};

use anyhow::{Context, Result};
use tickcheck_core::{CheckError, Stopwatch, TimingBackend};

use crate::config::CheckConfig;
use crate::{EXIT_ABORTED, EXIT_SUCCESS};

/// Runs the check `config.runs` times against `backend`, writing one
/// report line per run to `out` as soon as it is measured.
///
/// Each run acquires and releases the subsystem on its own. Stops at the
/// first aborted run; the returned error then wraps the
/// [`CheckError`](tickcheck_core::CheckError).
/// ## Arguments
/// * `config` - The resolved delay, run count and init policy.
/// * `backend` - The timing backend every run acquires.
/// * `out` - Where the `Elapsed time: <N> ms` lines go.
/// ## Returns
/// The number of runs that completed and were reported.
pub fn run_checks<B, W>(config: &CheckConfig, backend: &mut B, out: &mut W) -> Result<u32>
where
    B: TimingBackend + ?Sized,
    W: Write,
{
    let check = config.check();
    let mut completed = 0u32;

    for run in 1..=config.runs {
        let wall = Stopwatch::start();
        let measurement = check
            .run(backend)
            .with_context(|| format!("run {run}/{} failed", config.runs))?;
        log::info!(
            "Run {run}/{}: `{}` reported {} ms for a {} ms delay (wall clock {} ms)",
            config.runs,
            backend.name(),
            measurement.elapsed_ms(),
            measurement.requested_ms,
            wall.elapsed_ms()
        );

        writeln!(out, "{measurement}").context("failed to write the report line")?;
        out.flush().context("failed to flush the report")?;
        completed = run;
    }

    Ok(completed)
}

/// Runs every check and maps the outcome to the process exit code.
///
/// An aborted check yields [`EXIT_ABORTED`]; the check has already logged
/// the cause. A report that cannot be written (closed pipe, full disk)
/// is logged as a warning and still exits with [`EXIT_SUCCESS`], since
/// the delay itself completed.
/// ## Arguments
/// * `config` - The resolved delay, run count and init policy.
/// * `backend` - The timing backend every run acquires.
/// * `out` - Where the report lines go.
/// ## Returns
/// The exit code for the process.
pub fn execute<B, W>(config: &CheckConfig, backend: &mut B, out: &mut W) -> u8
where
    B: TimingBackend + ?Sized,
    W: Write,
{
    match run_checks(config, backend, out) {
        Ok(completed) => {
            log::debug!("{completed} run(s) reported");
            EXIT_SUCCESS
        }
        Err(e) if e.downcast_ref::<CheckError>().is_some() => {
            log::debug!("{e:#}");
            EXIT_ABORTED
        }
        Err(e) if e.downcast_ref::<io::Error>().is_some() => {
            log::warn!("{e:#}");
            EXIT_SUCCESS
        }
        Err(e) => {
            log::error!("{e:#}");
            EXIT_ABORTED
        }
    }
}
