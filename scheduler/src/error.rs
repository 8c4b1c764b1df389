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

//! Error kinds for the scheduler. There are exactly three failure modes, matching
//! the three ways this program can stop being correct: no config given, a config
//! that doesn't describe a runnable simulation, and a runtime invariant breach.

/// Errors produced by the scheduler, from argument parsing through simulation.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SchedulerError {
    /// No configuration path was given on the command line.
    #[error("no configuration file path was given")]
    #[diagnostic(
        code(scheduler::config_missing),
        help("pass the path to a JSON configuration file as the only argument")
    )]
    ConfigMissing,

    /// The configuration file could not be read, parsed, or validated.
    #[error("invalid configuration: {reason}")]
    #[diagnostic(
        code(scheduler::config_invalid),
        help("check that the file exists, is valid JSON, and satisfies: cores >= 1, \
              num_bursts is odd and >= 1, burst_times.len() == num_bursts, and \
              algorithm is one of FCFS, SJF, RR, PP")
    )]
    ConfigInvalid { reason: String },

    /// A transition or accounting invariant from the data model was breached at
    /// runtime. This is a programming defect, not a recoverable condition - the
    /// caller is expected to abort rather than continue the simulation.
    #[error("invariant violation: {detail}")]
    #[diagnostic(
        code(scheduler::invariant_violation),
        help("this indicates a bug in the dispatcher itself, not bad input; \
              file an issue with the reproduction steps")
    )]
    InvariantViolation { detail: String },
}

impl SchedulerError {
    #[must_use]
    pub fn config_invalid(reason: impl Into<String>) -> Self {
        Self::ConfigInvalid { reason: reason.into() }
    }

    #[must_use]
    pub fn invariant(detail: impl Into<String>) -> Self {
        Self::InvariantViolation { detail: detail.into() }
    }
}
