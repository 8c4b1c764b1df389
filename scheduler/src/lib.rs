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

//! A multi-core CPU scheduling simulator: given a workload of synthetic
//! processes (alternating CPU/I/O bursts) and a dispatch policy, emulates
//! wall-clock dispatch across a configurable number of virtual cores and
//! reports per-process and aggregate statistics.
//!
//! The dispatcher - [`scheduler_state`], [`process`], [`policy`], [`worker`],
//! [`coordinator`] - is this crate's core; [`config`] and [`reporter`] are
//! thin external-collaborator shims around it.

pub mod clock;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod logging;
pub mod policy;
pub mod process;
pub mod reporter;
pub mod scheduler_state;
pub mod stats;
pub mod worker;

pub use clock::Clock;
pub use config::SchedulerConfig;
pub use coordinator::Coordinator;
pub use error::SchedulerError;
pub use stats::RunSummary;
