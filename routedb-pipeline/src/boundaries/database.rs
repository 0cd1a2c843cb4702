// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Relational-DB boundary
//!
//! A thin abstraction over an embedded SQL engine, sufficient for the
//! relational sink: DDL, parameterized writes, scalar reads, and scoped
//! transactions. The trait is engine-agnostic; `routedb-pipeline`'s
//! infrastructure layer binds it once to SQLite (see
//! `infrastructure::sqlite_database`).

use async_trait::async_trait;
use routedb_domain::RouteDbError;
use std::collections::HashMap;

/// A single column value read back from the database. The domain has no
/// notion of a heterogeneous "object" value — this tagged enum is the
/// typed stand-in the boundary exposes to callers instead.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl DataValue {
    pub fn as_integer(&self) -> Result<i64, RouteDbError> {
        match self {
            DataValue::Integer(i) => Ok(*i),
            other => Err(RouteDbError::value_parse("integer", format!("{other:?}"))),
        }
    }
}

/// A query parameter bound positionally into a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Integer(i64),
    Text(String),
    Bool(bool),
    Null,
}

impl From<i64> for Param {
    fn from(v: i64) -> Self {
        Param::Integer(v)
    }
}

impl From<i32> for Param {
    fn from(v: i32) -> Self {
        Param::Integer(v as i64)
    }
}

impl From<&str> for Param {
    fn from(v: &str) -> Self {
        Param::Text(v.to_string())
    }
}

impl From<String> for Param {
    fn from(v: String) -> Self {
        Param::Text(v)
    }
}

impl From<bool> for Param {
    fn from(v: bool) -> Self {
        Param::Bool(v)
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Param::Null)
    }
}

/// A row read back from `execute_read`, keyed by column name.
pub type Row = HashMap<String, DataValue>;

/// The relational-DB boundary the pipeline's WRITE stage is built on.
#[async_trait]
pub trait RelationalDatabase: Send + Sync {
    /// Connects to `path`. Fails with `InvalidState` if the destination
    /// already exists and `overwrite` is false.
    async fn connect(&mut self, path: &str, overwrite: bool) -> Result<(), RouteDbError>;

    /// Idempotent; calling it twice, or before `connect`, is not an error.
    async fn disconnect(&mut self) -> Result<(), RouteDbError>;

    /// DDL and data-modification statements.
    async fn execute_write(&self, statement: &str, params: &[Param]) -> Result<(), RouteDbError>;

    /// Like `execute_write`, but returns the row id SQLite assigned to the
    /// inserted row (`last_insert_rowid`), needed to wire a summit's
    /// auto-increment id into its child `summit_names` rows.
    async fn execute_write_returning_id(&self, statement: &str, params: &[Param]) -> Result<i64, RouteDbError>;

    /// Read-only statements; rows are returned as column-name → value maps.
    async fn execute_read(&self, statement: &str, params: &[Param]) -> Result<Vec<Row>, RouteDbError>;

    /// Opens a transaction scope (`BEGIN`). Callers issue further
    /// `execute_write`/`execute_read` calls, then close the scope with
    /// `commit` or `rollback`. All operations outside an explicit scope
    /// auto-commit.
    async fn begin(&self) -> Result<(), RouteDbError> {
        self.execute_write("BEGIN", &[]).await
    }

    async fn commit(&self) -> Result<(), RouteDbError> {
        self.execute_write("COMMIT", &[]).await
    }

    async fn rollback(&self) -> Result<(), RouteDbError> {
        self.execute_write("ROLLBACK", &[]).await
    }
}
