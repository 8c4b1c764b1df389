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

//! The per-core run loop: acquire a process, run it to its next yield point,
//! release it, repeat. See §4.5 of the design doc for the priority order of
//! yield conditions.

use crate::clock::Clock;
use crate::process::ProcessState;
use crate::scheduler_state::{self, ProcessId, SharedState};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Owns one virtual core's dispatch loop. Not `Clone` - exactly one thread
/// drives each `CoreWorker`.
pub struct CoreWorker {
    core_id: i32,
    clock: Arc<Clock>,
    state: SharedState,
    current: Option<ProcessId>,
    slice_start: u64,
}

impl CoreWorker {
    #[must_use]
    pub fn new(core_id: i32, clock: Arc<Clock>, state: SharedState) -> Self {
        Self { core_id, clock, state, current: None, slice_start: 0 }
    }

    /// Runs until the coordinator sets `all_terminated`. Intended to be handed
    /// to `std::thread::Builder::spawn`.
    pub fn run(mut self) {
        loop {
            if scheduler_state::lock(&self.state).all_terminated {
                break;
            }
            match self.current {
                None => self.try_dispatch(),
                Some(pid) => self.poll(pid),
            }
        }
        tracing::debug!(core = self.core_id, "worker exiting, all_terminated observed");
    }

    /// Step 2 of §4.5: pop the ready queue if non-empty, else idle briefly.
    fn try_dispatch(&mut self) {
        let now = self.clock.now();
        let mut guard = scheduler_state::lock(&self.state);
        if guard.all_terminated {
            return;
        }
        let Some(pid) = guard.ready_queue.pop_front() else {
            drop(guard);
            thread::sleep(Duration::from_millis(1));
            return;
        };
        let process = &mut guard.processes[pid];
        process
            .transition(ProcessState::Running, now)
            .unwrap_or_else(|err| panic!("{err}"));
        process.core = self.core_id;
        drop(guard);

        self.current = Some(pid);
        self.slice_start = now;
    }

    /// Step 3 of §4.5: evaluate the yield conditions, in priority order, for
    /// the process this worker currently owns.
    fn poll(&mut self, pid: ProcessId) {
        let now = self.clock.now();
        let mut guard = scheduler_state::lock(&self.state);
        let algorithm = guard.algorithm;
        let time_slice_ms = guard.time_slice_ms;
        let context_switch_ms = guard.context_switch_ms;

        guard.processes[pid].observe(now);

        // (a) Burst completed.
        if guard.processes[pid].burst_complete() {
            if guard.processes[pid].has_next_burst() {
                guard.processes[pid]
                    .transition(ProcessState::Io, now)
                    .unwrap_or_else(|err| panic!("{err}"));
                guard.processes[pid].advance_burst();
            } else {
                guard.processes[pid]
                    .transition(ProcessState::Terminated, now)
                    .unwrap_or_else(|err| panic!("{err}"));
                guard.terminated.push(pid);
            }
            drop(guard);
            self.current = None;
            self.spin_context_switch(context_switch_ms);
            return;
        }

        // (b) Time-slice expired (RR only).
        if algorithm.preempts_on_time_slice() && now.saturating_sub(self.slice_start) >= time_slice_ms {
            let delta = now.saturating_sub(self.slice_start);
            guard.processes[pid].reduce_current_burst(delta);
            guard.processes[pid]
                .transition(ProcessState::Ready, now)
                .unwrap_or_else(|err| panic!("{err}"));
            guard.ready_queue.push_back(pid);
            drop(guard);
            self.current = None;
            self.spin_context_switch(context_switch_ms);
            return;
        }

        // (c) Preempted by a higher-priority arrival (PP only).
        if algorithm.preempts_on_priority() {
            let preempt = guard
                .ready_queue
                .front()
                .is_some_and(|&head| guard.processes[head].priority < guard.processes[pid].priority);
            if preempt {
                let delta = now.saturating_sub(self.slice_start);
                guard.processes[pid].reduce_current_burst(delta);
                guard.processes[pid]
                    .transition(ProcessState::Ready, now)
                    .unwrap_or_else(|err| panic!("{err}"));
                guard.ready_queue.push_back(pid);
                drop(guard);
                self.current = None;
                self.spin_context_switch(context_switch_ms);
                return;
            }
        }
    }

    /// Busy-waits `ms` milliseconds with no lock held, modeling the simulated
    /// cost of releasing one process and acquiring the next. `all_terminated`
    /// is not polled here deliberately - the spin is bounded and short, so a
    /// shutdown request is noticed at worst one context-switch delay late.
    fn spin_context_switch(&self, ms: u64) {
        if ms == 0 {
            return;
        }
        let start = self.clock.now();
        while self.clock.now().saturating_sub(start) < ms {
            std::hint::spin_loop();
        }
    }
}
