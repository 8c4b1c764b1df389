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

//! The single coordination record shared by the coordinator thread and every
//! core worker thread, guarded by one coarse [`Mutex`].
//!
//! Processes are owned for the run's lifetime by the [`SchedulerState::processes`]
//! vector, never moved out of it. The ready queue and terminated list hold
//! [`ProcessId`] indices - non-owning handles - so "a process is owned by exactly
//! one collection at a time" is enforced by construction: an index can sit in at
//! most one of `ready_queue` / `terminated` / "currently dispatched to a core" at
//! once, and every mutation of *who* holds it happens under this same lock.
//!
//! A single coarse mutex (rather than a lock per process) is deliberate: the
//! alternative invites TOCTOU bugs in the PP preemption check, which inspects the
//! ready-queue head's priority and the running process's priority together and
//! must see a consistent snapshot of both.

use crate::config::SchedulerConfig;
use crate::policy::Algorithm;
use crate::process::Process;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Opaque handle into [`SchedulerState::processes`]. Indices are preferred over
/// raw pointers or `Arc<Mutex<Process>>` per process: ownership is one-way (the
/// coordinator owns the backing `Vec` for the run's lifetime) and cross-thread
/// borrow checks become trivial - an index is `Copy` and carries no lifetime.
pub type ProcessId = usize;

/// The shared mutable coordination record. See the module docs for the locking
/// discipline.
pub struct SchedulerState {
    pub processes: Vec<Process>,
    pub ready_queue: VecDeque<ProcessId>,
    pub terminated: Vec<ProcessId>,
    pub all_terminated: bool,

    pub algorithm: Algorithm,
    pub context_switch_ms: u64,
    pub time_slice_ms: u64,

    pub program_start: u64,
    pub half_done_wallclock: Option<u64>,
    pub end_wallclock: Option<u64>,
}

impl SchedulerState {
    /// Builds the initial state from a validated configuration. Processes with
    /// `arrival_offset == 0` start in [`crate::process::ProcessState::Ready`] and
    /// are pre-populated into the ready queue in configuration order (FIFO);
    /// everything else starts [`crate::process::ProcessState::NotStarted`] and
    /// is picked up by the coordinator's arrival sweep.
    #[must_use]
    pub fn new(config: &SchedulerConfig, program_start: u64) -> Self {
        let mut processes = Vec::with_capacity(config.processes.len());
        let mut ready_queue = VecDeque::new();
        for details in &config.processes {
            let process = Process::new(details, program_start);
            if process.arrival_offset == 0 {
                ready_queue.push_back(processes.len());
            }
            processes.push(process);
        }
        Self {
            processes,
            ready_queue,
            terminated: Vec::new(),
            all_terminated: false,
            algorithm: config.algorithm,
            context_switch_ms: config.context_switch,
            time_slice_ms: config.time_slice,
            program_start,
            half_done_wallclock: None,
            end_wallclock: None,
        }
    }

    #[must_use]
    pub fn process_count(&self) -> usize { self.processes.len() }
}

/// Shared, lockable handle to the scheduler state - the single coarse mutex
/// cloned into the coordinator and every spawned core worker.
pub type SharedState = Arc<Mutex<SchedulerState>>;

/// Locks the shared state, treating mutex poisoning as the fatal condition it
/// is: a prior thread panicked while holding this lock, which per the error
/// design can only mean a runtime invariant was already violated elsewhere.
/// There is no recovery path - recovering the poisoned guard and carrying on
/// would let the caller observe a half-finished transition (e.g. a process
/// popped off `ready_queue` but never reinserted), which is exactly the kind
/// of inconsistency §7 calls an `InvariantViolation`. So this aborts rather
/// than propagating a `Result` through every caller, the same way the
/// teacher's `rrt.rs` treats `MutexPoisoned` as terminal rather than something
/// a caller retries past.
///
/// # Panics
/// Panics immediately if the mutex is poisoned.
pub fn lock(state: &SharedState) -> MutexGuard<'_, SchedulerState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(_poisoned) => {
            let err = crate::error::SchedulerError::invariant(
                "scheduler mutex poisoned - a worker thread panicked while holding it",
            );
            tracing::error!(%err, "aborting: scheduler mutex is poisoned");
            panic!("{err}");
        }
    }
}
