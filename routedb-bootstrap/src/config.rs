// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Run Configuration
//!
//! Resolves the parsed [`Cli`](crate::cli::Cli) into a [`RunConfig`]: the
//! single value the composition root in `routedb-pipeline` needs to wire up
//! and execute a run. Keeping this resolution in `routedb-bootstrap` (rather
//! than letting `routedb-pipeline` parse `env::args` itself) keeps argument
//! parsing/config separate from the pipeline engine it configures.

use std::path::PathBuf;

use crate::cli::Cli;

/// Where a run reads previously-seen HTTP traffic from or records freshly
/// observed traffic to, if at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrafficMode {
    /// Issue real network requests; do not record them.
    Live,
    /// Issue real network requests and archive every response under the
    /// given directory.
    Record(PathBuf),
    /// Serve responses from a directory of previously recorded traffic;
    /// never touch the network.
    Replay(PathBuf),
}

/// The fully-resolved configuration for one run of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub output_dir: PathBuf,
    pub verbose: bool,
    pub logfile: Option<PathBuf>,
    pub traffic_mode: TrafficMode,
}

impl RunConfig {
    /// The path `WRITE` will create the consolidated database at
    /// (`routedb_v1.sqlite` inside `output_dir`).
    pub fn database_path(&self) -> PathBuf {
        self.output_dir.join("routedb_v1.sqlite")
    }
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        let traffic_mode = match (cli.record_traffic, cli.replay_traffic) {
            (Some(dir), None) => TrafficMode::Record(dir),
            (None, Some(dir)) => TrafficMode::Replay(dir),
            (None, None) => TrafficMode::Live,
            // Unreachable once past clap's `conflicts_with`, but resolved
            // deterministically rather than panicking if it ever were.
            (Some(dir), Some(_)) => TrafficMode::Record(dir),
        };
        RunConfig {
            output_dir: cli.output_dir,
            verbose: cli.verbose,
            logfile: cli.logfile,
            traffic_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(output_dir: &str) -> Cli {
        Cli::try_parse_from(["routedb", output_dir]).unwrap()
    }

    use clap::Parser;

    #[test]
    fn defaults_to_live_traffic() {
        let config: RunConfig = cli("/tmp/out").into();
        assert_eq!(config.traffic_mode, TrafficMode::Live);
    }

    #[test]
    fn database_path_is_output_dir_slash_routedb_v1_sqlite() {
        let config: RunConfig = cli("/tmp/out").into();
        assert_eq!(config.database_path(), PathBuf::from("/tmp/out/routedb_v1.sqlite"));
    }

    #[test]
    fn record_traffic_flag_resolves_to_record_mode() {
        let mut cli = cli("/tmp/out");
        cli.record_traffic = Some(PathBuf::from("/tmp/rec"));
        let config: RunConfig = cli.into();
        assert_eq!(config.traffic_mode, TrafficMode::Record(PathBuf::from("/tmp/rec")));
    }
}
