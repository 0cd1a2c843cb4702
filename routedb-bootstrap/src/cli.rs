// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CLI Parser
//!
//! Command-line interface parsing using clap: a positional `output_dir`,
//! `-v/--verbose`, `-l/--logfile <path>`, and the mutually exclusive
//! `--record-traffic <path>` / `--replay-traffic <path>` pair.

use std::path::PathBuf;

use clap::Parser;

/// Build a consolidated climbing-route database from remote sources.
#[derive(Parser, Debug, Clone)]
#[command(name = "routedb")]
#[command(about = concat!("routedb v", env!("CARGO_PKG_VERSION"), " — climbing-route database builder"))]
#[command(version)]
pub struct Cli {
    /// Directory to create the route database file in
    pub output_dir: PathBuf,

    /// Activate more detailed debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to this file in addition to stderr
    #[arg(short = 'l', long = "logfile")]
    pub logfile: Option<PathBuf>,

    /// Record all HTTP traffic into this directory instead of hitting the
    /// network on a later run
    #[arg(long, conflicts_with = "replay_traffic")]
    pub record_traffic: Option<PathBuf>,

    /// Replay previously recorded HTTP traffic from this directory instead
    /// of making network calls
    #[arg(long, conflicts_with = "record_traffic")]
    pub replay_traffic: Option<PathBuf>,
}

impl Cli {
    /// Parses `std::env::args`, exiting the process with clap's usage error
    /// on failure.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
