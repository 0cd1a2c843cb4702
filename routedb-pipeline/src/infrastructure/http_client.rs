// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Live HTTP boundary
//!
//! The default `HttpClient` implementation, backed by `reqwest`. Used
//! directly when the run is neither recording nor replaying traffic (see
//! `infrastructure::traffic` for those two decorators).

use async_trait::async_trait;
use routedb_domain::RouteDbError;
use std::time::Duration;

use crate::boundaries::http::{HttpClient, QueryParams};

const USER_AGENT: &str = concat!("routedb/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("static reqwest client configuration is always valid");
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn retrieve_text(&self, url: &str, params: Option<&QueryParams>) -> Result<String, RouteDbError> {
        let mut request = self.client.get(url);
        if let Some(params) = params {
            request = request.query(params);
        }
        let response = request.send().await.map_err(|e| RouteDbError::data_retrieval(e.to_string()))?;
        let response = response.error_for_status().map_err(|e| RouteDbError::data_retrieval(e.to_string()))?;
        response.text().await.map_err(|e| RouteDbError::data_retrieval(e.to_string()))
    }

    async fn retrieve_json(
        &self,
        url: &str,
        params: Option<&QueryParams>,
        body: Option<&str>,
    ) -> Result<String, RouteDbError> {
        let mut request = match body {
            Some(body) => self.client.post(url).body(body.to_string()),
            None => self.client.get(url),
        };
        if let Some(params) = params {
            request = request.query(params);
        }
        let response = request.send().await.map_err(|e| RouteDbError::data_retrieval(e.to_string()))?;
        let response = response.error_for_status().map_err(|e| RouteDbError::data_retrieval(e.to_string()))?;
        response.text().await.map_err(|e| RouteDbError::data_retrieval(e.to_string()))
    }
}
