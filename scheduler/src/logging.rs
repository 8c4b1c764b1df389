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

//! Thin shim over `tracing` - initializes a non-blocking, rolling file
//! appender so structured logs don't collide with the reporter's terminal
//! output, and exposes a single entry point the binary calls once at startup.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initializes the global `tracing` subscriber. The returned [`WorkerGuard`]
/// must be held for the lifetime of `main` - dropping it flushes and stops the
/// background writer thread, so logs emitted after that point are lost.
pub fn try_init(log_dir: impl AsRef<std::path::Path>, level: &str) -> miette::Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(log_dir, "core_sched.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_new(level)
        .map_err(|e| miette::miette!("invalid log level filter {level:?}: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .try_init()
        .map_err(|e| miette::miette!("failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}
