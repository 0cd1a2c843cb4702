// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # routedb-pipeline
//!
//! The pipeline engine, the MERGE/VALIDATE/WRITE filters, the relational-DB
//! and HTTP boundaries, and their concrete bindings. `routedb-domain`
//! supplies the entity model this crate threads through the engine;
//! `routedb-bootstrap` supplies the CLI/configuration/logging the binary
//! entry point (`main.rs`) wires up.

pub mod boundaries;
pub mod engine;
pub mod filters;
pub mod infrastructure;

pub use engine::{Pipeline, SinkFilter, SourceFilter, Stage, TransformFilter};
