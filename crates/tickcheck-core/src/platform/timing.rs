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

//! The timing backend contract and its scoped lifecycle guard.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseOptionError, TimingError};

/// A platform timing library seen as an opaque capability set.
///
/// Implementations wrap process-wide state: `init` and `shutdown` must be
/// paired, which [`SubsystemGuard`] takes care of. Tick values are
/// milliseconds since the subsystem's own epoch and must never decrease
/// between `init` and `shutdown`.
pub trait TimingBackend {
    /// A short, stable identifier used in logs.
    fn name(&self) -> &'static str;

    /// Brings the timing subsystem up with no optional features.
    fn init(&mut self) -> Result<(), TimingError>;

    /// Returns the current monotonic tick count in milliseconds.
    fn ticks_ms(&self) -> u64;

    /// Blocks the calling thread for at least `ms` milliseconds.
    ///
    /// There is no way to wake up early or cancel the call.
    fn delay_ms(&self, ms: u64);

    /// Tears the subsystem down. Called once per `init`, whether or not
    /// `init` succeeded.
    fn shutdown(&mut self);
}

impl<B: TimingBackend + ?Sized> TimingBackend for Box<B> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn init(&mut self) -> Result<(), TimingError> {
        (**self).init()
    }

    fn ticks_ms(&self) -> u64 {
        (**self).ticks_ms()
    }

    fn delay_ms(&self, ms: u64) {
        (**self).delay_ms(ms)
    }

    fn shutdown(&mut self) {
        (**self).shutdown()
    }
}

/// Holds a timing subsystem between its `init` and `shutdown`.
///
/// The subsystem is initialized on construction and shut down when the
/// guard is dropped, on every exit path including early returns and
/// panics. Holding `&mut B` keeps any other code from acquiring the same
/// backend concurrently.
pub struct SubsystemGuard<'a, B: TimingBackend + ?Sized> {
    backend: &'a mut B,
    initialized: bool,
    init_error: Option<TimingError>,
}

impl<'a, B: TimingBackend + ?Sized> SubsystemGuard<'a, B> {
    /// Initializes `backend` and returns a guard over it.
    ///
    /// An initialization failure does not prevent the guard from being
    /// built; it is kept for the caller to inspect through
    /// [`take_init_error`](Self::take_init_error).
    /// ## Arguments
    /// * `backend` - The backend to initialize; borrowed until the guard drops.
    /// ## Returns
    /// A guard that calls `shutdown` on the backend when dropped.
    pub fn acquire(backend: &'a mut B) -> Self {
        log::debug!("Initializing timing subsystem `{}`...", backend.name());
        let init_error = backend.init().err();
        let initialized = init_error.is_none();
        if initialized {
            log::info!("Timing subsystem `{}` initialized.", backend.name());
        }
        Self {
            backend,
            initialized,
            init_error,
        }
    }

    /// Whether `init` reported success.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Takes the initialization error, if any. Later calls return `None`.
    pub fn take_init_error(&mut self) -> Option<TimingError> {
        self.init_error.take()
    }

    /// Reads the backend's tick counter.
    pub fn ticks_ms(&self) -> u64 {
        self.backend.ticks_ms()
    }

    /// Blocks for at least `ms` milliseconds.
    pub fn delay_ms(&self, ms: u64) {
        self.backend.delay_ms(ms)
    }

    /// The name of the guarded backend.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}

impl<B: TimingBackend + ?Sized> Drop for SubsystemGuard<'_, B> {
    fn drop(&mut self) {
        self.backend.shutdown();
        log::debug!("Timing subsystem `{}` shut down.", self.backend.name());
    }
}

/// Splits a millisecond delay into chunks that fit a 32-bit delay call.
///
/// Libraries such as SDL take the delay as `u32`; issuing the chunks
/// back to back honors the full 64-bit request. A zero delay yields a
/// single zero chunk so the backend still gets a chance to yield.
/// ## Arguments
/// * `ms` - The full delay in milliseconds.
/// ## Returns
/// An iterator of `u32` chunks summing to `ms`.
pub fn delay_chunks(ms: u64) -> impl Iterator<Item = u32> {
    let full = ms / u64::from(u32::MAX);
    let rest = (ms % u64::from(u32::MAX)) as u32;
    let trailing = if rest > 0 || full == 0 { Some(rest) } else { None };
    std::iter::repeat(u32::MAX)
        .take(full as usize)
        .chain(trailing)
}

/// Selects which timing library backs the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The standard library's monotonic clock and thread sleep.
    #[default]
    Std,
    /// SDL3's tick counter and delay (requires the `sdl3` feature).
    Sdl3,
}

impl BackendKind {
    const EXPECTED: &'static str = "std, sdl3";

    /// The canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Std => "std",
            BackendKind::Sdl3 => "sdl3",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "std" => Ok(BackendKind::Std),
            "sdl3" | "sdl" => Ok(BackendKind::Sdl3),
            _ => Err(ParseOptionError {
                kind: "backend",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Counts lifecycle calls and fails `init` on demand.
    #[derive(Default)]
    struct CountingBackend {
        fail_init: bool,
        inits: u32,
        shutdowns: u32,
        delayed: Cell<u64>,
    }

    impl TimingBackend for CountingBackend {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn init(&mut self) -> Result<(), TimingError> {
            self.inits += 1;
            if self.fail_init {
                Err(TimingError::InitFailed("refused".into()))
            } else {
                Ok(())
            }
        }

        fn ticks_ms(&self) -> u64 {
            self.delayed.get()
        }

        fn delay_ms(&self, ms: u64) {
            self.delayed.set(self.delayed.get() + ms);
        }

        fn shutdown(&mut self) {
            self.shutdowns += 1;
        }
    }

    #[test]
    fn guard_pairs_init_with_shutdown() {
        let mut backend = CountingBackend::default();
        {
            let guard = SubsystemGuard::acquire(&mut backend);
            assert!(guard.is_initialized());
            guard.delay_ms(7);
            assert_eq!(guard.ticks_ms(), 7);
        }
        assert_eq!(backend.inits, 1);
        assert_eq!(backend.shutdowns, 1);
    }

    #[test]
    fn guard_shuts_down_even_when_init_failed() {
        let mut backend = CountingBackend {
            fail_init: true,
            ..Default::default()
        };
        {
            let mut guard = SubsystemGuard::acquire(&mut backend);
            assert!(!guard.is_initialized());
            assert_eq!(
                guard.take_init_error(),
                Some(TimingError::InitFailed("refused".into()))
            );
            assert_eq!(guard.take_init_error(), None);
            assert!(!guard.is_initialized(), "taking the error must not flip the state");
        }
        assert_eq!(backend.shutdowns, 1);
    }

    #[test]
    fn guard_shuts_down_on_panic() {
        let mut backend = CountingBackend::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = SubsystemGuard::acquire(&mut backend);
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(backend.shutdowns, 1);
    }

    #[test]
    fn guard_works_through_trait_objects() {
        let mut boxed: Box<dyn TimingBackend> = Box::new(CountingBackend::default());
        let guard = SubsystemGuard::acquire(&mut boxed);
        assert_eq!(guard.backend_name(), "counting");
    }

    #[test]
    fn delay_chunks_fit_in_u32() {
        assert_eq!(delay_chunks(0).collect::<Vec<_>>(), vec![0]);
        assert_eq!(delay_chunks(2000).collect::<Vec<_>>(), vec![2000]);

        let max = u64::from(u32::MAX);
        assert_eq!(delay_chunks(max).collect::<Vec<_>>(), vec![u32::MAX]);
        assert_eq!(
            delay_chunks(2 * max + 5).collect::<Vec<_>>(),
            vec![u32::MAX, u32::MAX, 5]
        );
        let total: u64 = delay_chunks(3 * max + 1).map(u64::from).sum();
        assert_eq!(total, 3 * max + 1);
    }

    #[test]
    fn backend_kind_parses_and_displays() {
        assert_eq!("std".parse::<BackendKind>(), Ok(BackendKind::Std));
        assert_eq!(" SDL3 ".parse::<BackendKind>(), Ok(BackendKind::Sdl3));
        assert_eq!("sdl".parse::<BackendKind>(), Ok(BackendKind::Sdl3));
        assert!("vulkan".parse::<BackendKind>().is_err());
        assert_eq!(BackendKind::Sdl3.to_string(), "sdl3");
        assert_eq!(BackendKind::default(), BackendKind::Std);
    }
}
