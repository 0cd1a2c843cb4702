// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Logging
//!
//! Initializes `tracing` for the process using a
//! `tracing-subscriber` + `tracing-appender` combination: stderr always gets
//! a human-readable feed, and `-l/--logfile` additionally installs a
//! non-blocking file writer so the CLI never blocks on slow disk I/O.

use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Holds resources that must outlive the subscriber (the non-blocking file
/// appender's worker thread). Drop this only at process exit.
#[must_use = "dropping this guard stops the background log-flushing thread"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Installs the global tracing subscriber.
///
/// `verbose` raises the default level from `info` to `debug`; an explicit
/// `RUST_LOG` environment variable always takes precedence.
pub fn init(verbose: bool, logfile: Option<&Path>) -> LoggingGuard {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    let registry = tracing_subscriber::fmt().with_env_filter(env_filter).with_target(false);

    match logfile {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("routedb.log"));
            let file_appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            registry.with_writer(std::io::stderr.and(non_blocking)).init();
            LoggingGuard { _file_guard: Some(guard) }
        }
        None => {
            registry.init();
            LoggingGuard { _file_guard: None }
        }
    }
}
