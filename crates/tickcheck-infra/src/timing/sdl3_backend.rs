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

//! SDL3-based implementation of the [`TimingBackend`] trait.

use tickcheck_core::platform::delay_chunks;
use tickcheck_core::{TimingBackend, TimingError};

use super::lifecycle::{Lifecycle, Teardown};

/// A timing backend over SDL3's tick counter and `SDL_Delay`.
///
/// `init` is `SDL_Init(0)`: no video, audio or event subsystems are
/// requested. `shutdown` drops the context, which runs `SDL_Quit`; after
/// a failed init there is no context, so `SDL_Quit` is called directly.
#[derive(Default)]
pub struct Sdl3TimingBackend {
    context: Lifecycle<sdl3::Sdl>,
}

impl Sdl3TimingBackend {
    /// Creates a backend that has not touched SDL yet.
    pub fn new() -> Self {
        Self {
            context: Lifecycle::Idle,
        }
    }
}

impl TimingBackend for Sdl3TimingBackend {
    fn name(&self) -> &'static str {
        "sdl3"
    }

    fn init(&mut self) -> Result<(), TimingError> {
        if self.context.is_running() {
            return Ok(());
        }
        let outcome = sdl3::init().map_err(|e| TimingError::InitFailed(e.to_string()));
        self.context.record_init(outcome)?;
        log::info!("[Sdl3TimingBackend] SDL initialized with no subsystems.");
        Ok(())
    }

    fn ticks_ms(&self) -> u64 {
        sdl3::timer::ticks()
    }

    fn delay_ms(&self, ms: u64) {
        for chunk in delay_chunks(ms) {
            sdl3::timer::delay(chunk);
        }
    }

    fn shutdown(&mut self) {
        match self.context.finish() {
            Teardown::Nothing => {}
            Teardown::Release(context) => {
                drop(context);
                log::debug!("[Sdl3TimingBackend] SDL context released.");
            }
            Teardown::QuitAfterFailure => {
                // SAFETY: SDL_Quit is documented as safe to call after a
                // failed SDL_Init, and no SDL object outlives this point.
                unsafe { sdl3::sys::init::SDL_Quit() };
                log::debug!("[Sdl3TimingBackend] SDL_Quit called after failed init.");
            }
        }
    }
}
