// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # SQLite binding of the relational-DB boundary
//!
//! Binds `RelationalDatabase` to SQLite via `sqlx::SqlitePool`. `connect`
//! applies pragmas for throughput: foreign-key enforcement on, synchronous
//! commit off, journal kept in memory — crash-safety is traded for
//! throughput because a crashed run simply re-runs from scratch.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Column, Row as SqlxRow, SqlitePool};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::boundaries::database::{DataValue, Param, RelationalDatabase, Row};
use routedb_domain::RouteDbError;

fn db_error(context: &str, err: impl std::fmt::Display) -> RouteDbError {
    RouteDbError::data_retrieval(format!("{context}: {err}"))
}

pub struct SqliteDatabase {
    pool: Option<SqlitePool>,
}

impl Default for SqliteDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl SqliteDatabase {
    pub fn new() -> Self {
        Self { pool: None }
    }

    fn pool(&self) -> Result<&SqlitePool, RouteDbError> {
        self.pool.as_ref().ok_or_else(|| RouteDbError::invalid_state("database not connected"))
    }

    fn bind_all<'q>(
        mut query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
        params: &'q [Param],
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
        for param in params {
            query = match param {
                Param::Integer(i) => query.bind(*i),
                Param::Text(s) => query.bind(s.as_str()),
                Param::Bool(b) => query.bind(*b),
                Param::Null => query.bind(Option::<i64>::None),
            };
        }
        query
    }
}

#[async_trait]
impl RelationalDatabase for SqliteDatabase {
    async fn connect(&mut self, path: &str, overwrite: bool) -> Result<(), RouteDbError> {
        if !overwrite && path != ":memory:" && Path::new(path).exists() {
            return Err(RouteDbError::invalid_state(format!("{path} already exists")));
        }
        if overwrite && path != ":memory:" && Path::new(path).exists() {
            std::fs::remove_file(path).map_err(|e| db_error("removing existing database file", e))?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{path}"))
            .map_err(|e| db_error("parsing database path", e))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| db_error("connecting to database", e))?;

        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .map_err(|e| db_error("enabling foreign keys", e))?;
        sqlx::query("PRAGMA synchronous = OFF")
            .execute(&pool)
            .await
            .map_err(|e| db_error("disabling synchronous commit", e))?;
        sqlx::query("PRAGMA journal_mode = MEMORY")
            .execute(&pool)
            .await
            .map_err(|e| db_error("setting journal mode", e))?;

        self.pool = Some(pool);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), RouteDbError> {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
        }
        Ok(())
    }

    async fn execute_write(&self, statement: &str, params: &[Param]) -> Result<(), RouteDbError> {
        let pool = self.pool()?;
        let query = Self::bind_all(sqlx::query(statement), params);
        query.execute(pool).await.map_err(|e| db_error(statement, e))?;
        Ok(())
    }

    async fn execute_write_returning_id(&self, statement: &str, params: &[Param]) -> Result<i64, RouteDbError> {
        let pool = self.pool()?;
        let query = Self::bind_all(sqlx::query(statement), params);
        let result = query.execute(pool).await.map_err(|e| db_error(statement, e))?;
        Ok(result.last_insert_rowid())
    }

    async fn execute_read(&self, statement: &str, params: &[Param]) -> Result<Vec<Row>, RouteDbError> {
        let pool = self.pool()?;
        let query = Self::bind_all(sqlx::query(statement), params);
        let rows = query.fetch_all(pool).await.map_err(|e| db_error(statement, e))?;

        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let mut map: Row = HashMap::new();
            for column in row.columns() {
                let name = column.name().to_string();
                let value = row
                    .try_get::<i64, _>(column.ordinal())
                    .map(DataValue::Integer)
                    .or_else(|_| row.try_get::<f64, _>(column.ordinal()).map(DataValue::Real))
                    .or_else(|_| row.try_get::<String, _>(column.ordinal()).map(DataValue::Text))
                    .unwrap_or(DataValue::Null);
                map.insert(name, value);
            }
            result.push(map);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_then_ddl_then_insert_and_read_back() {
        let mut db = SqliteDatabase::new();
        db.connect(":memory:", true).await.unwrap();

        db.execute_write("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)", &[]).await.unwrap();
        let id = db
            .execute_write_returning_id("INSERT INTO t (name) VALUES (?)", &[Param::Text("hi".into())])
            .await
            .unwrap();
        assert_eq!(id, 1);

        let rows = db.execute_read("SELECT id, name FROM t", &[]).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some(&DataValue::Text("hi".to_string())));

        db.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn execute_write_before_connect_is_invalid_state() {
        let db = SqliteDatabase::new();
        let err = db.execute_write("SELECT 1", &[]).await.unwrap_err();
        assert!(matches!(err, RouteDbError::InvalidState(_)));
    }
}
