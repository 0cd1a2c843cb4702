// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Traffic recording and replay
//!
//! An optional HTTP transport decorator. A
//! `TrafficRecorder` wraps a live `HttpClient`, archives every response
//! under a directory (one file per response, named by a fresh UUIDv4), and
//! appends an entry to `index.json`. A `TrafficReplayer` reads that same
//! directory and serves responses from disk instead of touching the
//! network.

use async_trait::async_trait;
use routedb_domain::RouteDbError;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::boundaries::http::{HttpClient, QueryParams};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct TrafficRecord {
    url: String,
    params_hash: String,
    payload_hash: String,
    file_name: String,
}

fn sha1_hex(input: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

fn params_hash(params: Option<&QueryParams>) -> String {
    let mut pairs: Vec<(String, String)> = params.map(|p| p.iter().map(|(k, v)| (k.clone(), v.clone())).collect()).unwrap_or_default();
    pairs.sort();
    sha1_hex(&format!("{pairs:?}"))
}

fn payload_hash(body: Option<&str>) -> String {
    sha1_hex(body.unwrap_or(""))
}

async fn read_index(dir: &Path) -> Vec<TrafficRecord> {
    let index_path = dir.join("index.json");
    match tokio::fs::read_to_string(&index_path).await {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => Vec::new(),
    }
}

async fn write_index(dir: &Path, records: &[TrafficRecord]) -> Result<(), RouteDbError> {
    let content = serde_json::to_string_pretty(records).map_err(|e| RouteDbError::data_processing(e.to_string()))?;
    tokio::fs::write(dir.join("index.json"), content)
        .await
        .map_err(|e| RouteDbError::data_retrieval(e.to_string()))
}

/// Wraps an `HttpClient`, archiving every response it returns.
pub struct TrafficRecorder<C: HttpClient> {
    inner: C,
    dir: PathBuf,
    records: Arc<Mutex<Vec<TrafficRecord>>>,
}

impl<C: HttpClient> TrafficRecorder<C> {
    pub async fn new(inner: C, dir: impl Into<PathBuf>) -> Result<Self, RouteDbError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| RouteDbError::data_retrieval(e.to_string()))?;
        let records = read_index(&dir).await;
        Ok(Self {
            inner,
            dir,
            records: Arc::new(Mutex::new(records)),
        })
    }

    async fn record(&self, url: &str, params: Option<&QueryParams>, body: Option<&str>, payload: &str) -> Result<(), RouteDbError> {
        let file_name = uuid::Uuid::new_v4().simple().to_string();
        tokio::fs::write(self.dir.join(&file_name), payload)
            .await
            .map_err(|e| RouteDbError::data_retrieval(e.to_string()))?;

        let mut records = self.records.lock().await;
        records.push(TrafficRecord {
            url: url.to_string(),
            params_hash: params_hash(params),
            payload_hash: payload_hash(body),
            file_name,
        });
        write_index(&self.dir, &records).await
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for TrafficRecorder<C> {
    async fn retrieve_text(&self, url: &str, params: Option<&QueryParams>) -> Result<String, RouteDbError> {
        let payload = self.inner.retrieve_text(url, params).await?;
        self.record(url, params, None, &payload).await?;
        Ok(payload)
    }

    async fn retrieve_json(
        &self,
        url: &str,
        params: Option<&QueryParams>,
        body: Option<&str>,
    ) -> Result<String, RouteDbError> {
        let payload = self.inner.retrieve_json(url, params, body).await?;
        self.record(url, params, body, &payload).await?;
        Ok(payload)
    }
}

/// Serves previously recorded responses; never touches the network.
pub struct TrafficReplayer {
    dir: PathBuf,
    records: Vec<TrafficRecord>,
}

impl TrafficReplayer {
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, RouteDbError> {
        let dir = dir.into();
        let records = read_index(&dir).await;
        Ok(Self { dir, records })
    }

    async fn replay(&self, url: &str, params: Option<&QueryParams>, body: Option<&str>) -> Result<String, RouteDbError> {
        let wanted_params = params_hash(params);
        let wanted_payload = payload_hash(body);
        let record = self
            .records
            .iter()
            .find(|r| r.url == url && r.params_hash == wanted_params && r.payload_hash == wanted_payload)
            .ok_or_else(|| RouteDbError::data_retrieval(format!("no recorded traffic for {url}")))?;

        tokio::fs::read_to_string(self.dir.join(&record.file_name))
            .await
            .map_err(|e| RouteDbError::data_retrieval(e.to_string()))
    }
}

#[async_trait]
impl HttpClient for TrafficReplayer {
    async fn retrieve_text(&self, url: &str, params: Option<&QueryParams>) -> Result<String, RouteDbError> {
        self.replay(url, params, None).await
    }

    async fn retrieve_json(
        &self,
        url: &str,
        params: Option<&QueryParams>,
        body: Option<&str>,
    ) -> Result<String, RouteDbError> {
        self.replay(url, params, body).await
    }
}
