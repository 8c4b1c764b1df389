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

//! Scheduling algorithms and the ready-queue ordering they impose.

use crate::error::SchedulerError;
use crate::process::Process;
use crate::scheduler_state::ProcessId;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::VecDeque;
use std::str::FromStr;

/// The four supported dispatch disciplines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// First-come, first-served. FIFO, no preemption.
    Fcfs,
    /// Shortest job first (non-preemptive). Ready queue ordered by ascending
    /// `remaining_cpu_budget`, ties broken by FIFO.
    Sjf,
    /// Round-robin. FIFO, preempted by time-slice expiry.
    Rr,
    /// Priority preemptive. Ready queue ordered by ascending `priority` (lower
    /// numeric value = higher priority), ties broken by FIFO. A running process
    /// is preempted by a strictly higher-priority arrival.
    Pp,
}

impl Algorithm {
    /// Whether this algorithm reorders the ready queue between drains. FCFS and
    /// RR never reorder - insertion order is the dispatch order.
    #[must_use]
    pub const fn reorders_ready_queue(self) -> bool {
        matches!(self, Self::Sjf | Self::Pp)
    }

    /// Whether a running process can be preempted by a higher-priority arrival.
    #[must_use]
    pub const fn preempts_on_priority(self) -> bool {
        matches!(self, Self::Pp)
    }

    /// Whether a running process can be preempted by time-slice expiry.
    #[must_use]
    pub const fn preempts_on_time_slice(self) -> bool {
        matches!(self, Self::Rr)
    }
}

impl FromStr for Algorithm {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FCFS" => Ok(Self::Fcfs),
            "SJF" => Ok(Self::Sjf),
            "RR" => Ok(Self::Rr),
            "PP" => Ok(Self::Pp),
            other => Err(SchedulerError::config_invalid(format!(
                "unknown algorithm {other:?}: expected one of FCFS, SJF, RR, PP"
            ))),
        }
    }
}

impl Algorithm {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fcfs => "FCFS",
            Self::Sjf => "SJF",
            Self::Rr => "RR",
            Self::Pp => "PP",
        }
    }
}

impl<'de> Deserialize<'de> for Algorithm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|e: SchedulerError| D::Error::custom(e.to_string()))
    }
}

impl Serialize for Algorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Re-sorts the ready queue in place according to `algorithm`. A no-op for
/// FCFS/RR. Stable (ties preserve FIFO/insertion order) because [`Vec::sort_by`]
/// is a stable sort.
///
/// Idempotent: calling this again with no intervening state change produces the
/// same order, since the sort key only depends on `priority` /
/// `remaining_cpu_budget`, neither of which `sort_ready_queue` itself mutates.
pub fn sort_ready_queue(algorithm: Algorithm, queue: &mut VecDeque<ProcessId>, processes: &[Process]) {
    if !algorithm.reorders_ready_queue() {
        return;
    }
    let mut as_vec: Vec<ProcessId> = queue.drain(..).collect();
    match algorithm {
        Algorithm::Sjf => {
            as_vec.sort_by_key(|&pid| processes[pid].remaining_cpu_budget);
        }
        Algorithm::Pp => {
            as_vec.sort_by_key(|&pid| processes[pid].priority);
        }
        Algorithm::Fcfs | Algorithm::Rr => unreachable!("guarded by reorders_ready_queue above"),
    }
    queue.extend(as_vec);
}
