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

//! Renders a read-only snapshot of the scheduler state to the terminal.
//!
//! The reporter's only correctness obligation (§6) is acquiring the scheduler
//! mutex while reading - it neither mutates state nor blocks a worker for
//! longer than one field read. Output goes to a plain [`std::io::Stdout`], the
//! way the rest of this crate's ambient stack wraps an `Arc<Mutex<_>>`'d handle
//! to an output resource rather than writing through a bare global.

use crate::process::ProcessState;
use crate::scheduler_state::{self, SharedState};
use crossterm::{cursor, terminal, ExecutableCommand, QueueableCommand};
use std::io::{self, Stdout, Write as _};
use std::sync::{Arc, Mutex as StdMutex};

/// A handle to the terminal the snapshot table is drawn to, wrapped the same
/// way the rest of this crate's ambient stack wraps a shared I/O resource.
#[derive(Clone)]
pub struct Reporter {
    stdout: Arc<StdMutex<Stdout>>,
}

impl Reporter {
    #[must_use]
    pub fn new() -> Self {
        Self { stdout: Arc::new(StdMutex::new(io::stdout())) }
    }

    /// Locks the scheduler state, reads one snapshot, and redraws the table.
    /// Acquires the scheduler mutex only for the duration of the read; all
    /// terminal I/O happens after it's released.
    pub fn render(&self, state: &SharedState) -> io::Result<()> {
        let rows: Vec<Row> = {
            let guard = scheduler_state::lock(state);
            guard
                .processes
                .iter()
                .filter(|p| p.state != ProcessState::NotStarted)
                .map(Row::from_process)
                .collect()
        };
        self.draw(&rows)
    }

    fn draw(&self, rows: &[Row]) -> io::Result<()> {
        let Ok(mut out) = self.stdout.lock() else {
            return Ok(());
        };
        out.execute(terminal::Clear(terminal::ClearType::All))?;
        out.queue(cursor::MoveTo(0, 0))?;
        writeln!(
            out,
            "{:>4} {:>8} {:>11} {:>4} {:>12} {:>9} {:>8} {:>11}",
            "PID", "Priority", "State", "Core", "Turnaround(s)", "Wait(s)", "CPU(s)", "Remaining(s)"
        )?;
        for row in rows {
            writeln!(
                out,
                "{:>4} {:>8} {:>11} {:>4} {:>12.1} {:>9.1} {:>8.1} {:>11.1}",
                row.pid, row.priority, row.state, row.core, row.turnaround_s, row.wait_s, row.cpu_s, row.remaining_s
            )?;
        }
        out.flush()
    }
}

impl Default for Reporter {
    fn default() -> Self { Self::new() }
}

struct Row {
    pid: u16,
    priority: u8,
    state: &'static str,
    core: String,
    turnaround_s: f64,
    wait_s: f64,
    cpu_s: f64,
    remaining_s: f64,
}

impl Row {
    fn from_process(p: &crate::process::Process) -> Self {
        Self {
            pid: p.pid,
            priority: p.priority,
            state: p.state.label(),
            core: if p.core < 0 { "--".to_string() } else { p.core.to_string() },
            turnaround_s: p.turnaround_ms as f64 / 1000.0,
            wait_s: p.wait_ms as f64 / 1000.0,
            cpu_s: p.cpu_ms as f64 / 1000.0,
            remaining_s: p.remaining_cpu_budget as f64 / 1000.0,
        }
    }
}
