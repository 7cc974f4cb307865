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

//! Timing backends and the factory that picks one at runtime.

mod lifecycle;
mod std_backend;

#[cfg(feature = "sdl3")]
mod sdl3_backend;

pub use std_backend::StdTimingBackend;

#[cfg(feature = "sdl3")]
pub use sdl3_backend::Sdl3TimingBackend;

use tickcheck_core::{BackendKind, TimingBackend, TimingError};

/// Builds the backend selected by `kind`.
/// ## Arguments
/// * `kind` - Which timing library to wrap.
/// ## Returns
/// A boxed, not yet initialized backend, or [`TimingError::Unsupported`]
/// when that backend was not compiled into this build.
pub fn create_backend(kind: BackendKind) -> Result<Box<dyn TimingBackend>, TimingError> {
    log::debug!("Creating `{kind}` timing backend");
    match kind {
        BackendKind::Std => Ok(Box::new(StdTimingBackend::new())),
        #[cfg(feature = "sdl3")]
        BackendKind::Sdl3 => Ok(Box::new(Sdl3TimingBackend::new())),
        #[cfg(not(feature = "sdl3"))]
        BackendKind::Sdl3 => Err(TimingError::Unsupported("sdl3")),
    }
}
