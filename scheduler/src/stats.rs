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

//! Final aggregate statistics, computed once after every process has
//! terminated. Pure arithmetic over the finished process list - no locking,
//! no state of its own.

use crate::process::Process;

/// The aggregate figures printed to standard output after a run completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub cpu_utilization_pct: f64,
    pub throughput_overall: f64,
    pub throughput_first_half: f64,
    pub throughput_second_half: f64,
    pub avg_turnaround_s: f64,
    pub avg_wait_s: f64,
}

fn ms_to_s(ms: u64) -> f64 { ms as f64 / 1000.0 }

impl RunSummary {
    /// Computes the summary from the terminated process list and the three
    /// timestamps the coordinator records: `program_start`, `half_done_wallclock`
    /// (first moment at least half the processes had terminated), and
    /// `end_wallclock` (the moment the last process terminated).
    ///
    /// `cores` is used only for context; the formulas in §6 don't normalize by
    /// it directly, but a caller computing a comparable "ideal" utilization
    /// would need it, so it's threaded through for that purpose even though
    /// this function doesn't use it.
    #[must_use]
    pub fn compute(
        processes: &[Process],
        cores: u8,
        program_start: u64,
        half_done_wallclock: u64,
        end_wallclock: u64,
    ) -> Self {
        let _ = cores;
        let n = processes.len();
        debug_assert!(n > 0, "a run always has at least one process");

        let total_runtime_ms = end_wallclock.saturating_sub(program_start);
        let total_cpu_ms: u64 = processes.iter().map(|p| p.cpu_ms).sum();

        let cpu_utilization_pct = if total_runtime_ms == 0 {
            0.0
        } else {
            (total_cpu_ms as f64 / total_runtime_ms as f64) * 100.0
        };

        let throughput_overall = if total_runtime_ms == 0 {
            0.0
        } else {
            n as f64 / ms_to_s(total_runtime_ms)
        };

        let first_half_count = n / 2;
        let second_half_count = n - first_half_count;
        let first_half_span = half_done_wallclock.saturating_sub(program_start);
        let second_half_span = end_wallclock.saturating_sub(half_done_wallclock);

        let throughput_first_half = if first_half_span == 0 {
            0.0
        } else {
            first_half_count as f64 / ms_to_s(first_half_span)
        };
        let throughput_second_half = if second_half_span == 0 {
            0.0
        } else {
            second_half_count as f64 / ms_to_s(second_half_span)
        };

        let avg_turnaround_s =
            processes.iter().map(|p| ms_to_s(p.turnaround_ms)).sum::<f64>() / n as f64;
        let avg_wait_s = processes.iter().map(|p| ms_to_s(p.wait_ms)).sum::<f64>() / n as f64;

        Self {
            cpu_utilization_pct,
            throughput_overall,
            throughput_first_half,
            throughput_second_half,
            avg_turnaround_s,
            avg_wait_s,
        }
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "CPU utilization:       {:.1}%", self.cpu_utilization_pct)?;
        writeln!(f, "Throughput (overall):  {:.3} proc/s", self.throughput_overall)?;
        writeln!(f, "Throughput (1st half): {:.3} proc/s", self.throughput_first_half)?;
        writeln!(f, "Throughput (2nd half): {:.3} proc/s", self.throughput_second_half)?;
        writeln!(f, "Average turnaround:    {:.3} s", self.avg_turnaround_s)?;
        write!(f, "Average wait:          {:.3} s", self.avg_wait_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessDetails;

    fn terminated_process(pid: u16, cpu_ms: u64, turnaround_ms: u64, wait_ms: u64) -> Process {
        let mut p = Process::new(&ProcessDetails { pid, priority: 0, start_time: 0, burst_times: vec![cpu_ms] }, 0);
        p.transition(crate::process::ProcessState::Running, 0).unwrap();
        p.observe(cpu_ms);
        p.transition(crate::process::ProcessState::Terminated, turnaround_ms).unwrap();
        p.wait_ms = wait_ms;
        p
    }

    #[test]
    fn single_process_full_utilization() {
        let p = terminated_process(1, 100, 100, 0);
        let summary = RunSummary::compute(&[p], 1, 0, 100, 100);
        assert!((summary.cpu_utilization_pct - 100.0).abs() < 0.01);
        assert!((summary.avg_turnaround_s - 0.1).abs() < 0.001);
    }

    #[test]
    fn zero_runtime_does_not_divide_by_zero() {
        let p = terminated_process(1, 0, 0, 0);
        let summary = RunSummary::compute(&[p], 1, 0, 0, 0);
        assert_eq!(summary.cpu_utilization_pct, 0.0);
        assert_eq!(summary.throughput_overall, 0.0);
    }
}
