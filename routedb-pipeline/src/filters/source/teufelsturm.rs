// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stub `SourceFilter` for the "teufelsturm" community site, which delivers
//! one HTML route page per route — meaning the same summit is observed once
//! per route page and must be deduplicated via `ImportGuard` before
//! insertion.

use async_trait::async_trait;
use routedb_domain::{Pipe, RouteDbError};
use std::collections::HashSet;
use std::sync::Arc;

use crate::boundaries::http::HttpClient;
use crate::engine::SourceFilter;
use crate::filters::source::ImportGuard;

pub struct TeufelsturmSourceFilter {
    http: Arc<dyn HttpClient>,
    guard: ImportGuard,
}

impl TeufelsturmSourceFilter {
    pub fn new(http: Arc<dyn HttpClient>, deny_list: HashSet<String>) -> Self {
        Self {
            http,
            guard: ImportGuard::new(deny_list),
        }
    }
}

#[async_trait]
impl SourceFilter for TeufelsturmSourceFilter {
    #[tracing::instrument(skip(self, _output))]
    async fn run(&self, _output: &Pipe) -> Result<(), RouteDbError> {
        // Parsing teufelsturm's route-page HTML is out of scope here — the
        // real implementation would fetch each summit's index page via
        // `self.http`, extract Summit/Route/Post tuples, call
        // `self.guard.should_insert(&summit_name)` before the first
        // `output.add_summit`, and skip the page with a logged
        // `DataProcessing` error on a malformed response rather than
        // aborting the whole run.
        let _ = &self.http;
        Ok(())
    }
}
