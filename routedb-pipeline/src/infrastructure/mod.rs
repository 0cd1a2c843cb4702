// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Concrete bindings of the boundaries declared in `crate::boundaries`.

pub mod http_client;
pub mod sqlite_database;
pub mod traffic;

pub use http_client::ReqwestHttpClient;
pub use sqlite_database::SqliteDatabase;
pub use traffic::{TrafficRecorder, TrafficReplayer};
