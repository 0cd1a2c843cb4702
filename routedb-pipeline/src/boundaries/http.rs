// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # HTTP boundary
//!
//! Boundary-only: `retrieve_text`/`retrieve_json`, each
//! raising `DataRetrieval` on any non-2xx response or transport failure.
//! User agent and timeout are implementation details of the concrete
//! binding (`infrastructure::http_client`), not of this trait.

use async_trait::async_trait;
use routedb_domain::RouteDbError;
use std::collections::HashMap;

pub type QueryParams = HashMap<String, String>;

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn retrieve_text(&self, url: &str, params: Option<&QueryParams>) -> Result<String, RouteDbError>;

    async fn retrieve_json(
        &self,
        url: &str,
        params: Option<&QueryParams>,
        body: Option<&str>,
    ) -> Result<String, RouteDbError>;
}
