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

//! Entry point: parse arguments, load a configuration, run the simulation to
//! completion, print the final statistics.

use clap::Parser;
use r3bl_core_sched::{Clock, Coordinator, SchedulerConfig, SchedulerError};
use std::path::PathBuf;
use std::process::ExitCode;

/// Multi-core CPU scheduling simulator.
#[derive(Debug, Parser)]
#[command(name = "core_sched", version, about)]
struct Cli {
    /// Path to a JSON workload configuration file.
    config_path: Option<PathBuf>,

    /// `tracing` filter directive, e.g. "info" or "core_sched=debug".
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Directory the log file is written into.
    #[arg(long, default_value = ".")]
    log_dir: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = r3bl_core_sched::logging::try_init(&cli.log_dir, &cli.log_level)
        .inspect_err(|e| eprintln!("warning: logging not initialized: {e}"))
        .ok();

    run(cli)
}

fn run(cli: Cli) -> ExitCode {
    match try_run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}

fn try_run(cli: Cli) -> miette::Result<()> {
    let config_path = cli.config_path.ok_or(SchedulerError::ConfigMissing)?;
    let config = SchedulerConfig::load(&config_path)?;

    tracing::info!(
        cores = config.cores,
        algorithm = config.algorithm.as_str(),
        processes = config.processes.len(),
        "starting simulation"
    );

    let clock = std::sync::Arc::new(Clock::start());
    let coordinator = Coordinator::new(&config, clock);
    let summary = coordinator.run();

    println!("{summary}");
    Ok(())
}
