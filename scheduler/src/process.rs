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

//! The process record: a small state machine plus the accounting needed to report
//! turnaround, wait, and CPU time at any point in its life.
//!
//! Accounting follows one rule per field instead of the bespoke per-policy flags a
//! naive port would carry: [`Process::observe`] always recomputes `cpu_ms`,
//! `wait_ms`, and the current burst's remainder from a small set of "committed"
//! counters plus the live delta since the current episode started. The only other
//! mutation point is [`Process::reduce_current_burst`], called once by whichever
//! preemption path (RR slice expiry, PP priority preemption) interrupts a running
//! process, so the remainder survives the Running -> Ready -> Running round trip.

use crate::error::SchedulerError;
use serde::{Deserialize, Serialize};

/// One of the five states a process can be in. See the module docs for the
/// transition graph; [`Process::transition`] is the only way to move between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    NotStarted,
    Ready,
    Running,
    Io,
    Terminated,
}

impl ProcessState {
    /// The label used in the reporter snapshot (§6 of the design doc).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Io => "i/o",
            Self::Terminated => "terminated",
        }
    }
}

/// The immutable descriptor a process is built from - what the configuration file
/// supplies, before any simulation state exists.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProcessDetails {
    pub pid: u16,
    pub priority: u8,
    /// Milliseconds after program start at which the process first becomes ready.
    pub start_time: u64,
    /// Alternating CPU/IO burst durations in ms. Length is always odd: even
    /// indices are CPU bursts, odd indices are I/O bursts.
    pub burst_times: Vec<u64>,
}

impl ProcessDetails {
    /// Validates the shape invariants from §6/§7: at least one burst, an odd
    /// count, and a sane priority range.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.burst_times.is_empty() {
            return Err(SchedulerError::config_invalid(format!(
                "process {}: burst_times must have at least one entry",
                self.pid
            )));
        }
        if self.burst_times.len() % 2 == 0 {
            return Err(SchedulerError::config_invalid(format!(
                "process {}: burst_times length ({}) must be odd",
                self.pid,
                self.burst_times.len()
            )));
        }
        if self.priority > 4 {
            return Err(SchedulerError::config_invalid(format!(
                "process {}: priority {} is out of range 0..=4",
                self.pid, self.priority
            )));
        }
        Ok(())
    }
}

/// A process record: identity, burst plan, and the mutable state/accounting
/// fields described in the data model.
#[derive(Debug, Clone)]
pub struct Process {
    pub pid: u16,
    pub priority: u8,
    pub arrival_offset: u64,
    pub bursts: Vec<u64>,

    pub state: ProcessState,
    pub current_burst: usize,
    pub core: i32,
    pub launched: bool,
    pub launch_wallclock: Option<u64>,
    pub burst_phase_start: u64,
    pub enqueue_time: u64,

    // Committed accounting: only updated by `transition`, never by `observe`.
    cpu_ms_committed: u64,
    wait_ms_committed: u64,
    remaining_in_burst_committed: u64,
    turnaround_ms_frozen: Option<u64>,

    // Derived snapshot, refreshed by `observe`. Safe to read at any time.
    pub turnaround_ms: u64,
    pub wait_ms: u64,
    pub cpu_ms: u64,
    pub remaining_in_burst: u64,
    pub remaining_cpu_budget: u64,
    pub burst_elapsed: u64,
}

impl Process {
    /// Builds a process from its descriptor. `start_wallclock` is the
    /// program-start timestamp; if `arrival_offset == 0` the process starts in
    /// [`ProcessState::Ready`] with its turnaround anchor set to that timestamp,
    /// otherwise it starts in [`ProcessState::NotStarted`].
    #[must_use]
    pub fn new(details: &ProcessDetails, start_wallclock: u64) -> Self {
        let arrival_offset = details.start_time;
        let first_burst = details.burst_times[0];
        let starts_ready = arrival_offset == 0;

        let mut process = Self {
            pid: details.pid,
            priority: details.priority,
            arrival_offset,
            bursts: details.burst_times.clone(),
            state: if starts_ready { ProcessState::Ready } else { ProcessState::NotStarted },
            current_burst: 0,
            core: -1,
            launched: false,
            launch_wallclock: if starts_ready { Some(start_wallclock) } else { None },
            burst_phase_start: start_wallclock,
            enqueue_time: start_wallclock,
            cpu_ms_committed: 0,
            wait_ms_committed: 0,
            remaining_in_burst_committed: first_burst,
            turnaround_ms_frozen: None,
            turnaround_ms: 0,
            wait_ms: 0,
            cpu_ms: 0,
            remaining_in_burst: first_burst,
            remaining_cpu_budget: 0,
            burst_elapsed: 0,
        };
        process.observe(start_wallclock);
        process
    }

    /// Sum of the as-yet-unconsumed CPU bursts strictly after the one
    /// [`remaining_in_burst`] already accounts for.
    ///
    /// [`remaining_in_burst`]: field@Self::remaining_in_burst
    fn future_cpu_bursts_sum(&self) -> u64 {
        let start = if self.current_burst % 2 == 1 {
            // Currently in an I/O burst: the next CPU burst hasn't been touched
            // by `remaining_in_burst` at all yet.
            self.current_burst + 1
        } else {
            // Currently on (or about to start) a CPU burst: it's already
            // represented by `remaining_in_burst`, so skip it here.
            self.current_burst + 2
        };
        self.bursts.iter().skip(start).step_by(2).sum()
    }

    /// Recomputes every derived field from the committed counters and the
    /// current episode's live delta. Side-effect-free on the committed state -
    /// safe to call as often as needed (e.g. every coordinator sweep, every
    /// worker poll, every reporter read) without double-counting anything.
    pub fn observe(&mut self, now: u64) {
        match self.state {
            ProcessState::Running => {
                let delta = now.saturating_sub(self.burst_phase_start);
                self.cpu_ms = self.cpu_ms_committed + delta;
                self.wait_ms = self.wait_ms_committed;
                self.remaining_in_burst = self.remaining_in_burst_committed.saturating_sub(delta);
                self.burst_elapsed = delta;
            }
            ProcessState::Ready => {
                let delta = now.saturating_sub(self.enqueue_time);
                self.wait_ms = self.wait_ms_committed + delta;
                self.cpu_ms = self.cpu_ms_committed;
                self.remaining_in_burst = self.remaining_in_burst_committed;
                self.burst_elapsed = 0;
            }
            ProcessState::Io => {
                let delta = now.saturating_sub(self.burst_phase_start);
                self.burst_elapsed = delta;
                self.cpu_ms = self.cpu_ms_committed;
                self.wait_ms = self.wait_ms_committed;
                self.remaining_in_burst = self.remaining_in_burst_committed;
            }
            ProcessState::NotStarted => {
                self.cpu_ms = 0;
                self.wait_ms = 0;
                self.remaining_in_burst = self.remaining_in_burst_committed;
                self.burst_elapsed = 0;
            }
            ProcessState::Terminated => {
                self.cpu_ms = self.cpu_ms_committed;
                self.wait_ms = self.wait_ms_committed;
                self.remaining_in_burst = 0;
                self.burst_elapsed = 0;
            }
        }

        self.remaining_cpu_budget = self.remaining_in_burst + self.future_cpu_bursts_sum();

        self.turnaround_ms = match self.turnaround_ms_frozen {
            Some(frozen) => frozen,
            None => match self.launch_wallclock {
                Some(anchor) => now.saturating_sub(anchor),
                None => 0,
            },
        };
    }

    /// Validates and performs a state transition, committing the accounting for
    /// the episode being left before moving the state machine forward. Returns
    /// [`SchedulerError::InvariantViolation`] for any transition not in the
    /// allowed set (NotStarted->Ready, Ready->Running, Running->{Ready, Io,
    /// Terminated}, Io->Ready).
    pub fn transition(&mut self, new_state: ProcessState, now: u64) -> Result<(), SchedulerError> {
        use ProcessState::{Io, NotStarted, Ready, Running, Terminated};

        let allowed = matches!(
            (self.state, new_state),
            (NotStarted, Ready) | (Ready, Running) | (Running, Ready) | (Running, Io) |
            (Running, Terminated) | (Io, Ready)
        );
        if !allowed {
            return Err(SchedulerError::invariant(format!(
                "pid {}: illegal transition {:?} -> {new_state:?}",
                self.pid, self.state
            )));
        }

        // Commit the episode being left. cpu_ms always commits the elapsed
        // Running delta; remaining_in_burst only auto-commits to zero on a
        // natural burst completion (Running -> Io/Terminated). A preemption
        // (Running -> Ready) must have already called `reduce_current_burst`
        // before this call - that's the one external mutation of the committed
        // remainder.
        match self.state {
            Running => {
                let delta = now.saturating_sub(self.burst_phase_start);
                self.cpu_ms_committed += delta;
                if matches!(new_state, Io | Terminated) {
                    self.remaining_in_burst_committed = 0;
                }
            }
            Ready => {
                let delta = now.saturating_sub(self.enqueue_time);
                self.wait_ms_committed += delta;
            }
            _ => {}
        }

        self.state = new_state;
        match new_state {
            Ready => {
                self.enqueue_time = now;
                self.core = -1;
                if self.launch_wallclock.is_none() {
                    self.launch_wallclock = Some(now);
                }
            }
            Running => {
                self.burst_phase_start = now;
                self.launched = true;
                if self.launch_wallclock.is_none() {
                    self.launch_wallclock = Some(now);
                }
            }
            Io => {
                self.burst_phase_start = now;
                self.core = -1;
            }
            Terminated => {
                self.core = -1;
            }
            NotStarted => unreachable!("no transition ever targets NotStarted"),
        }

        self.observe(now);

        if new_state == Terminated {
            self.turnaround_ms_frozen = Some(self.turnaround_ms);
        }

        Ok(())
    }

    /// Advances to the next burst (CPU->IO or IO->CPU depending on direction).
    /// Called once per burst completion: *after* `transition(Io)` when a CPU
    /// burst just finished, but *before* `transition(Ready)` when an I/O burst
    /// just finished - the latter order matters, since `transition`'s Ready
    /// target never touches the committed remainder itself, so the next CPU
    /// burst's full duration must already be committed by the time `observe`
    /// runs inside `transition`.
    pub fn advance_burst(&mut self) {
        self.current_burst += 1;
        if self.current_burst % 2 == 0 {
            if let Some(&duration) = self.bursts.get(self.current_burst) {
                self.remaining_in_burst_committed = duration;
            }
        }
        self.burst_elapsed = 0;
    }

    /// Subtracts elapsed run time from the current CPU burst's remainder so it
    /// survives a preemption (RR time-slice expiry, PP priority preemption).
    /// Never produces a negative remainder.
    pub fn reduce_current_burst(&mut self, delta_ms: u64) {
        self.remaining_in_burst_committed = self.remaining_in_burst_committed.saturating_sub(delta_ms);
    }

    /// Whether the current CPU burst has run long enough to count as complete.
    #[must_use]
    pub fn burst_complete(&self) -> bool {
        self.bursts
            .get(self.current_burst)
            .is_some_and(|&duration| self.burst_elapsed >= duration)
    }

    /// Whether a CPU burst completion should move to I/O (`true`) or to
    /// [`ProcessState::Terminated`] (`false`).
    #[must_use]
    pub fn has_next_burst(&self) -> bool {
        self.current_burst + 1 < self.bursts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn details(pid: u16, priority: u8, start_time: u64, burst_times: Vec<u64>) -> ProcessDetails {
        ProcessDetails { pid, priority, start_time, burst_times }
    }

    #[test]
    fn arrival_offset_zero_starts_ready() {
        let p = Process::new(&details(1, 0, 0, vec![100]), 1_000);
        assert_eq!(p.state, ProcessState::Ready);
        assert_eq!(p.launch_wallclock, Some(1_000));
        assert_eq!(p.wait_ms, 0);
    }

    #[test]
    fn nonzero_arrival_starts_not_started() {
        let p = Process::new(&details(1, 0, 50, vec![100]), 1_000);
        assert_eq!(p.state, ProcessState::NotStarted);
        assert_eq!(p.launch_wallclock, None);
    }

    #[test]
    fn single_burst_never_visits_io() {
        let mut p = Process::new(&details(1, 0, 0, vec![100]), 0);
        p.transition(ProcessState::Running, 0).unwrap();
        assert!(!p.has_next_burst());
        p.observe(100);
        assert!(p.burst_complete());
        p.transition(ProcessState::Terminated, 100).unwrap();
        assert_eq!(p.state, ProcessState::Terminated);
        assert_eq!(p.remaining_in_burst, 0);
        assert_eq!(p.cpu_ms, 100);
    }

    #[test]
    fn remaining_burst_survives_preemption() {
        let mut p = Process::new(&details(1, 0, 0, vec![100]), 0);
        p.transition(ProcessState::Running, 0).unwrap();
        p.observe(30);
        p.reduce_current_burst(30);
        p.transition(ProcessState::Ready, 30).unwrap();
        assert_eq!(p.remaining_in_burst, 70);
        assert_eq!(p.cpu_ms, 30);

        p.transition(ProcessState::Running, 30).unwrap();
        p.observe(60);
        p.reduce_current_burst(30);
        p.transition(ProcessState::Ready, 60).unwrap();
        assert_eq!(p.remaining_in_burst, 40);
        assert_eq!(p.cpu_ms, 60);
    }

    #[test]
    fn cpu_ms_accumulates_across_io_episode() {
        let mut p = Process::new(&details(1, 0, 0, vec![50, 20, 30]), 0);
        p.transition(ProcessState::Running, 0).unwrap();
        p.observe(50);
        assert!(p.burst_complete());
        p.transition(ProcessState::Io, 50).unwrap();
        p.advance_burst();
        assert_eq!(p.current_burst, 1);
        p.observe(70);
        assert!(p.burst_complete());
        // IO -> Ready advances the burst index *before* the transition, so the
        // freshly-committed CPU burst remainder is visible once `transition`
        // calls `observe` internally.
        p.advance_burst();
        p.transition(ProcessState::Ready, 70).unwrap();
        assert_eq!(p.current_burst, 2);
        assert_eq!(p.remaining_in_burst, 30);

        p.transition(ProcessState::Running, 70).unwrap();
        p.observe(100);
        p.transition(ProcessState::Terminated, 100).unwrap();
        assert_eq!(p.cpu_ms, 80); // 50 + 30
        assert_eq!(p.remaining_cpu_budget, 0);
    }

    #[test]
    fn illegal_transition_is_rejected() {
        let mut p = Process::new(&details(1, 0, 0, vec![100]), 0);
        let err = p.transition(ProcessState::Io, 0).unwrap_err();
        assert!(matches!(err, SchedulerError::InvariantViolation { .. }));
    }

    #[test]
    fn wait_accumulates_across_multiple_ready_episodes() {
        let mut p = Process::new(&details(1, 0, 0, vec![100]), 0);
        p.observe(10);
        assert_eq!(p.wait_ms, 10);
        p.transition(ProcessState::Running, 10).unwrap();
        p.transition(ProcessState::Ready, 40).unwrap();
        p.observe(55);
        assert_eq!(p.wait_ms, 25); // 10 (pre-dispatch) + 15 (post-preemption)
    }
}
