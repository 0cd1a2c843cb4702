// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Stub `SourceFilter` for the geographic data service. That service
//! returns geometry for entity ids that are sometimes caves or stale
//! records rather than real climbing routes, so this filter applies a
//! hard-coded skip-list of such ids before insertion.

use async_trait::async_trait;
use routedb_domain::{Pipe, RouteDbError};
use std::collections::HashSet;
use std::sync::Arc;

use crate::boundaries::http::HttpClient;
use crate::engine::SourceFilter;

pub struct GeoPositionSourceFilter {
    http: Arc<dyn HttpClient>,
    non_route_entity_ids: HashSet<String>,
}

impl GeoPositionSourceFilter {
    pub fn new(http: Arc<dyn HttpClient>, non_route_entity_ids: HashSet<String>) -> Self {
        Self {
            http,
            non_route_entity_ids,
        }
    }

    fn is_climbable(&self, entity_id: &str) -> bool {
        !self.non_route_entity_ids.contains(entity_id)
    }
}

#[async_trait]
impl SourceFilter for GeoPositionSourceFilter {
    #[tracing::instrument(skip(self, _output))]
    async fn run(&self, _output: &Pipe) -> Result<(), RouteDbError> {
        // Parsing the geographic service's JSON response is out of scope
        // here — the real implementation would fetch entity geometry via
        // `self.http`, skip any id `!self.is_climbable(id)`, and raise
        // `DataRetrieval` on a transport failure, which aborts the whole
        // stage.
        let _ = &self.http;
        Ok(())
    }
}
