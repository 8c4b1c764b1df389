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

//! The main-thread driver: spawns core workers, sweeps process arrivals and
//! I/O completions once per render frame, and detects global termination.

use crate::clock::Clock;
use crate::config::SchedulerConfig;
use crate::policy;
use crate::process::ProcessState;
use crate::reporter::Reporter;
use crate::scheduler_state::{self, SchedulerState, SharedState};
use crate::stats::RunSummary;
use crate::worker::CoreWorker;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// One render frame's worth of sleep between coordinator sweeps. Not a
/// correctness constraint - just how often the ready queue gets re-sorted and
/// the snapshot redrawn.
const SWEEP_INTERVAL: Duration = Duration::from_millis(16);

pub struct Coordinator {
    state: SharedState,
    clock: Arc<Clock>,
    cores: u8,
    reporter: Reporter,
}

impl Coordinator {
    #[must_use]
    pub fn new(config: &SchedulerConfig, clock: Arc<Clock>) -> Self {
        let program_start = clock.now();
        let state = Arc::new(std::sync::Mutex::new(SchedulerState::new(config, program_start)));
        Self { state, clock, cores: config.cores, reporter: Reporter::new() }
    }

    /// Spawns one worker thread per core, sweeps until every process has
    /// terminated, joins the workers, and returns the final statistics.
    ///
    /// # Panics
    /// Panics if a worker thread cannot be spawned (`thiserror`/`miette` would
    /// make this a recoverable `SchedulerError` if it were expected in normal
    /// operation, but an OS refusing to spawn a handful of threads indicates
    /// resource exhaustion the simulator has no sane way to recover from).
    pub fn run(self) -> RunSummary {
        let handles = self.spawn_workers();

        loop {
            self.sweep();
            if let Err(e) = self.reporter.render(&self.state) {
                tracing::warn!(error = %e, "reporter failed to render a frame");
            }
            if scheduler_state::lock(&self.state).all_terminated {
                break;
            }
            std::thread::sleep(SWEEP_INTERVAL);
        }

        for handle in handles {
            handle.join().expect("worker thread panicked");
        }

        self.summarize()
    }

    fn spawn_workers(&self) -> Vec<JoinHandle<()>> {
        (0..self.cores)
            .map(|core_id| {
                let worker = CoreWorker::new(i32::from(core_id), Arc::clone(&self.clock), Arc::clone(&self.state));
                std::thread::Builder::new()
                    .name(format!("core-worker-{core_id}"))
                    .spawn(move || worker.run())
                    .expect("failed to spawn core worker thread")
            })
            .collect()
    }

    /// One sweep: arrivals, I/O completions, a full `observe` refresh, a
    /// policy-driven re-sort, and termination bookkeeping. All under one
    /// critical section per §4.6.
    fn sweep(&self) {
        let now = self.clock.now();
        let mut guard = scheduler_state::lock(&self.state);
        let program_start = guard.program_start;
        let algorithm = guard.algorithm;

        let mut newly_ready = Vec::new();
        for (pid, process) in guard.processes.iter_mut().enumerate() {
            match process.state {
                ProcessState::NotStarted => {
                    if now.saturating_sub(program_start) >= process.arrival_offset {
                        process
                            .transition(ProcessState::Ready, now)
                            .unwrap_or_else(|err| panic!("{err}"));
                        newly_ready.push(pid);
                    }
                }
                ProcessState::Io => {
                    if process.burst_complete() {
                        process.advance_burst();
                        process
                            .transition(ProcessState::Ready, now)
                            .unwrap_or_else(|err| panic!("{err}"));
                        newly_ready.push(pid);
                    }
                }
                _ => {}
            }
            process.observe(now);
        }
        guard.ready_queue.extend(newly_ready);

        policy::sort_ready_queue(algorithm, &mut guard.ready_queue, &guard.processes);

        let total = guard.process_count();
        let done = guard.terminated.len();
        if guard.half_done_wallclock.is_none() && done >= total.div_ceil(2) {
            guard.half_done_wallclock = Some(now);
        }
        if done == total {
            guard.all_terminated = true;
            guard.end_wallclock = Some(now);
        }
    }

    fn summarize(&self) -> RunSummary {
        let guard = scheduler_state::lock(&self.state);
        let half_done = guard.half_done_wallclock.unwrap_or(guard.program_start);
        let end = guard.end_wallclock.unwrap_or_else(|| self.clock.now());
        RunSummary::compute(&guard.processes, self.cores, guard.program_start, half_done, end)
    }
}
