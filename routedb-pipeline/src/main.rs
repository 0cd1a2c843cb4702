// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # routedb — climbing-route database builder
//!
//! The composition root: one function builds every concrete instance —
//! CLI/config → network boundary → db boundary → filter list → pipeline —
//! and threads them through as explicit parameters. No hidden global state.

use std::collections::HashSet;
use std::sync::Arc;

use routedb_bootstrap::{Cli, ExitCode, RunConfig, TrafficMode};
use routedb_domain::RouteDbError;
use routedb_pipeline::boundaries::HttpClient;
use routedb_pipeline::filters::source::{GeoPositionSourceFilter, TeufelsturmSourceFilter};
use routedb_pipeline::filters::{AppIdentity, EntityMerger, RelationalSink, Validator};
use routedb_pipeline::infrastructure::{ReqwestHttpClient, SqliteDatabase, TrafficRecorder, TrafficReplayer};
use routedb_pipeline::Pipeline;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    let config = RunConfig::from(cli);
    let _logging_guard = routedb_bootstrap::logger::init(config.verbose, config.logfile.as_deref());

    match run(&config).await {
        Ok(()) => {
            tracing::info!("routedb run completed successfully");
            std::process::exit(ExitCode::Success.as_i32());
        }
        Err(err) => {
            let exit_code = ExitCode::from(&err);
            tracing::error!(error = %err, "routedb run failed");
            eprintln!("routedb: {err}");
            std::process::exit(exit_code.as_i32());
        }
    }
}

async fn run(config: &RunConfig) -> Result<(), RouteDbError> {
    std::fs::create_dir_all(&config.output_dir).map_err(|e| RouteDbError::data_retrieval(e.to_string()))?;

    let http: Arc<dyn HttpClient> = match &config.traffic_mode {
        TrafficMode::Live => Arc::new(ReqwestHttpClient::new()),
        TrafficMode::Record(dir) => Arc::new(TrafficRecorder::new(ReqwestHttpClient::new(), dir.clone()).await?),
        TrafficMode::Replay(dir) => Arc::new(TrafficReplayer::new(dir.clone()).await?),
    };

    let pipeline = Pipeline::new(
        vec![
            Box::new(TeufelsturmSourceFilter::new(http.clone(), HashSet::new())),
            Box::new(GeoPositionSourceFilter::new(http.clone(), HashSet::new())),
        ],
        vec![Box::new(EntityMerger::new())],
        vec![Box::new(Validator::new())],
        vec![Box::new(RelationalSink::new(
            Box::new(SqliteDatabase::new()),
            config.database_path().to_string_lossy().into_owned(),
            AppIdentity {
                name: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
            },
            chrono::Utc::now().to_rfc3339(),
        ))],
    );

    pipeline.run().await
}
