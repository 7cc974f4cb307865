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

//! Init/shutdown bookkeeping shared by the concrete backends.

/// Where a backend stands between `init` and `shutdown`.
///
/// `C` is whatever the running subsystem owns (an SDL context, a clock
/// epoch). A failed init is remembered so `shutdown` can still release
/// whatever the library set up half-way.
#[derive(Debug)]
pub(crate) enum Lifecycle<C> {
    Idle,
    Running(C),
    InitFailed,
}

/// What `shutdown` has to release.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Teardown<C> {
    /// Never initialized, or already shut down.
    Nothing,
    /// Drop the running context.
    Release(C),
    /// Init failed; the library still expects its quit call.
    QuitAfterFailure,
}

impl<C> Default for Lifecycle<C> {
    fn default() -> Self {
        Lifecycle::Idle
    }
}

impl<C> Lifecycle<C> {
    /// Records the outcome of an init attempt.
    pub(crate) fn record_init<E>(&mut self, outcome: Result<C, E>) -> Result<(), E> {
        match outcome {
            Ok(context) => {
                *self = Lifecycle::Running(context);
                Ok(())
            }
            Err(e) => {
                *self = Lifecycle::InitFailed;
                Err(e)
            }
        }
    }

    pub(crate) fn running(&self) -> Option<&C> {
        match self {
            Lifecycle::Running(context) => Some(context),
            _ => None,
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running().is_some()
    }

    /// Moves back to `Idle` and says what needs releasing.
    pub(crate) fn finish(&mut self) -> Teardown<C> {
        match std::mem::take(self) {
            Lifecycle::Idle => Teardown::Nothing,
            Lifecycle::Running(context) => Teardown::Release(context),
            Lifecycle::InitFailed => Teardown::QuitAfterFailure,
        }
    }
}
