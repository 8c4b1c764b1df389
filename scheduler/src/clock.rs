/*
 *   Copyright (c) 2026 R3BL LLC
 *   All rights reserved.
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

//! A monotonic, millisecond-resolution wall clock shared by the coordinator and
//! every core worker.
//!
//! [`std::time::Instant`] is already monotonic on every platform Rust supports, but
//! its guarantee is "non-decreasing *as observed by a single process*" - some
//! platforms have historically shipped buggy clock sources where successive
//! [`Instant::now()`] calls could still compare as going backwards by a few
//! nanoseconds. [`Clock`] saturates against the last value it handed out so callers
//! never observe a decrease, matching the [`Clock::now`] contract.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Millisecond-resolution monotonic clock anchored at construction time.
pub struct Clock {
    epoch: Instant,
    high_water_mark: AtomicU64,
}

impl Clock {
    /// Starts a new clock; `now()` returns `0` immediately after this call.
    #[must_use]
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            high_water_mark: AtomicU64::new(0),
        }
    }

    /// Milliseconds elapsed since [`Clock::start`]. Cheap enough to call from a
    /// tight busy loop. Never returns a value smaller than a previous call's
    /// result, even if the underlying OS clock source regresses.
    pub fn now(&self) -> u64 {
        #[allow(clippy::cast_possible_truncation)]
        let elapsed_ms = self.epoch.elapsed().as_millis() as u64;

        // Saturate: publish the max of what we've seen so far and this reading.
        let mut observed = self.high_water_mark.load(Ordering::Relaxed);
        loop {
            if elapsed_ms <= observed {
                return observed;
            }
            match self.high_water_mark.compare_exchange_weak(
                observed,
                elapsed_ms,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return elapsed_ms,
                Err(actual) => observed = actual,
            }
        }
    }
}

impl Default for Clock {
    fn default() -> Self { Self::start() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn now_is_non_decreasing() {
        let clock = Clock::start();
        let mut last = clock.now();
        for _ in 0..50 {
            let next = clock.now();
            assert!(next >= last);
            last = next;
        }
    }

    #[test]
    fn now_advances_with_real_time() {
        let clock = Clock::start();
        let first = clock.now();
        thread::sleep(Duration::from_millis(20));
        let second = clock.now();
        assert!(second > first);
    }
}
