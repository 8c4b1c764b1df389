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

//! Loads and validates the JSON workload description that drives one run.
//!
//! The wire format is not part of the core dispatcher's contract - only its
//! shape is (`cores`, `algorithm`, `context_switch`, `time_slice`, `processes`).
//! JSON via `serde_json` is this crate's concrete choice of external parser.

use crate::error::SchedulerError;
use crate::policy::Algorithm;
use crate::process::ProcessDetails;
use serde::Deserialize;
use std::path::Path;

/// One process entry as it appears in the configuration file. Carries
/// `num_bursts` redundantly with `burst_times.len()` as a cross-check against
/// transcription errors in hand-written configs; [`RawProcessEntry::into_details`]
/// is the only place that redundancy is resolved.
#[derive(Debug, Deserialize)]
struct RawProcessEntry {
    pid: u16,
    priority: u8,
    start_time: u64,
    num_bursts: usize,
    burst_times: Vec<u64>,
}

impl RawProcessEntry {
    fn into_details(self) -> Result<ProcessDetails, SchedulerError> {
        if self.num_bursts != self.burst_times.len() {
            return Err(SchedulerError::config_invalid(format!(
                "process {}: num_bursts ({}) does not match burst_times.len() ({})",
                self.pid,
                self.num_bursts,
                self.burst_times.len()
            )));
        }
        let details = ProcessDetails {
            pid: self.pid,
            priority: self.priority,
            start_time: self.start_time,
            burst_times: self.burst_times,
        };
        details.validate()?;
        Ok(details)
    }
}

/// The deserialized, validated configuration for one simulation run.
#[derive(Debug, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct SchedulerConfig {
    pub cores: u8,
    pub algorithm: Algorithm,
    pub context_switch: u64,
    pub time_slice: u64,
    pub processes: Vec<ProcessDetails>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    cores: u8,
    algorithm: Algorithm,
    #[serde(default)]
    context_switch: u64,
    #[serde(default)]
    time_slice: u64,
    processes: Vec<RawProcessEntry>,
}

impl TryFrom<RawConfig> for SchedulerConfig {
    type Error = SchedulerError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        if raw.cores < 1 {
            return Err(SchedulerError::config_invalid("cores must be >= 1"));
        }
        if raw.processes.is_empty() {
            return Err(SchedulerError::config_invalid("processes must be non-empty"));
        }
        let processes = raw
            .processes
            .into_iter()
            .map(RawProcessEntry::into_details)
            .collect::<Result<Vec<_>, _>>()?;

        let mut pids: Vec<u16> = processes.iter().map(|p| p.pid).collect();
        pids.sort_unstable();
        if pids.windows(2).any(|w| w[0] == w[1]) {
            return Err(SchedulerError::config_invalid("process pids must be unique"));
        }

        Ok(Self {
            cores: raw.cores,
            algorithm: raw.algorithm,
            context_switch: raw.context_switch,
            time_slice: raw.time_slice,
            processes,
        })
    }
}

impl SchedulerConfig {
    /// Reads and validates a configuration file from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchedulerError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SchedulerError::config_invalid(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| SchedulerError::config_invalid(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> Result<SchedulerConfig, SchedulerError> {
        serde_json::from_str(json).map_err(|e| SchedulerError::config_invalid(e.to_string()))
    }

    #[test]
    fn valid_config_parses() {
        let cfg = parse(
            r#"{
                "cores": 2, "algorithm": "PP", "context_switch": 0, "time_slice": 30,
                "processes": [
                    {"pid": 1, "priority": 2, "start_time": 0, "num_bursts": 1, "burst_times": [200]},
                    {"pid": 2, "priority": 0, "start_time": 50, "num_bursts": 1, "burst_times": [50]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.cores, 2);
        assert_eq!(cfg.algorithm, Algorithm::Pp);
        assert_eq!(cfg.processes.len(), 2);
    }

    #[test]
    fn zero_cores_is_rejected() {
        let err = parse(
            r#"{"cores": 0, "algorithm": "FCFS", "processes": [
                {"pid": 1, "priority": 0, "start_time": 0, "num_bursts": 1, "burst_times": [10]}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchedulerError::ConfigInvalid { .. }));
    }

    #[test]
    fn num_bursts_mismatch_is_rejected() {
        let err = parse(
            r#"{"cores": 1, "algorithm": "FCFS", "processes": [
                {"pid": 1, "priority": 0, "start_time": 0, "num_bursts": 2, "burst_times": [10]}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchedulerError::ConfigInvalid { .. }));
    }

    #[test]
    fn duplicate_pids_are_rejected() {
        let err = parse(
            r#"{"cores": 1, "algorithm": "FCFS", "processes": [
                {"pid": 1, "priority": 0, "start_time": 0, "num_bursts": 1, "burst_times": [10]},
                {"pid": 1, "priority": 0, "start_time": 0, "num_bursts": 1, "burst_times": [10]}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchedulerError::ConfigInvalid { .. }));
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let err = parse(
            r#"{"cores": 1, "algorithm": "XYZ", "processes": [
                {"pid": 1, "priority": 0, "start_time": 0, "num_bursts": 1, "burst_times": [10]}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchedulerError::ConfigInvalid { .. }));
    }
}
