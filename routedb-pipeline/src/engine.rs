// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline engine
//!
//! A four-stage filter scheduler: `IMPORTING → MERGING →
//! VALIDATION → WRITING`, run in that fixed order. Each stage is built from
//! filters of exactly one *shape* — the source's deep filter/pipe/table
//! class hierarchies collapse here into three small traits the engine
//! dispatches on, rather than one polymorphic base class.

use async_trait::async_trait;
use routedb_domain::{Pipe, RouteDbError};

/// Writes entities into an output Pipe only; never sees a predecessor's
/// output. Used by the IMPORTING stage.
#[async_trait]
pub trait SourceFilter: Send + Sync {
    async fn run(&self, output: &Pipe) -> Result<(), RouteDbError>;
}

/// Reads one Pipe and writes another. Used by MERGING and VALIDATION.
#[async_trait]
pub trait TransformFilter: Send + Sync {
    async fn run(&self, input: &Pipe, output: &Pipe) -> Result<(), RouteDbError>;
}

/// Reads an input Pipe and writes externally (to the database); produces no
/// further Pipe. Used by WRITING.
#[async_trait]
pub trait SinkFilter: Send + Sync {
    async fn run(&self, input: &Pipe) -> Result<(), RouteDbError>;
}

/// The four stages, in the fixed order the engine runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Importing,
    Merging,
    Validation,
    Writing,
}

impl Stage {
    fn label(self) -> &'static str {
        match self {
            Stage::Importing => "IMPORTING",
            Stage::Merging => "MERGING",
            Stage::Validation => "VALIDATION",
            Stage::Writing => "WRITING",
        }
    }
}

/// The assembled pipeline: one filter list per stage, in shape order. Built
/// once by the composition root (`main.rs`) and run exactly once.
pub struct Pipeline {
    import_filters: Vec<Box<dyn SourceFilter>>,
    merge_filters: Vec<Box<dyn TransformFilter>>,
    validate_filters: Vec<Box<dyn TransformFilter>>,
    write_filters: Vec<Box<dyn SinkFilter>>,
}

impl Pipeline {
    pub fn new(
        import_filters: Vec<Box<dyn SourceFilter>>,
        merge_filters: Vec<Box<dyn TransformFilter>>,
        validate_filters: Vec<Box<dyn TransformFilter>>,
        write_filters: Vec<Box<dyn SinkFilter>>,
    ) -> Self {
        Self {
            import_filters,
            merge_filters,
            validate_filters,
            write_filters,
        }
    }

    /// Runs all four stages in order. On any filter's error, the whole run
    /// aborts immediately — no partial output file may be written; the
    /// relational sink's overwrite-on-connect policy is what
    /// makes a subsequent retry safe.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> Result<(), RouteDbError> {
        let import_output = Pipe::new();
        tracing::debug!(stage = Stage::Importing.label(), filters = self.import_filters.len(), "entering stage");
        for filter in &self.import_filters {
            filter.run(&import_output).await?;
        }

        let merge_output = Pipe::new();
        tracing::debug!(stage = Stage::Merging.label(), filters = self.merge_filters.len(), "entering stage");
        for filter in &self.merge_filters {
            filter.run(&import_output, &merge_output).await?;
        }

        let validate_output = Pipe::new();
        tracing::debug!(stage = Stage::Validation.label(), filters = self.validate_filters.len(), "entering stage");
        for filter in &self.validate_filters {
            filter.run(&merge_output, &validate_output).await?;
        }

        tracing::debug!(stage = Stage::Writing.label(), filters = self.write_filters.len(), "entering stage");
        for filter in &self.write_filters {
            filter.run(&validate_output).await?;
        }

        tracing::info!(summits = validate_output.summit_count(), "pipeline run complete");
        Ok(())
    }
}
