// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Relational sink (WRITE stage)
//!
//! Owns the entire output schema: five tables, created in a
//! fixed order, populated from the final validated Pipe inside a single
//! outer transaction, then finalized with `ANALYZE`/`VACUUM` once that
//! transaction has committed. The connection, the output file, and the
//! transaction are all acquired on entry and released on every exit path,
//! which is why `connect`/`begin`/`commit`-or-`rollback`/`disconnect`
//! bracket the whole `run` body rather than being managed by the caller.

use async_trait::async_trait;
use routedb_domain::{Pipe, RouteDbError};
use tokio::sync::Mutex;

use crate::boundaries::{Param, RelationalDatabase};
use crate::engine::SinkFilter;

const SCHEMA_VERSION_MAJOR: i64 = 1;
const SCHEMA_VERSION_MINOR: i64 = 0;

const USAGE_OFFICIAL: i64 = 0;
const USAGE_ALTERNATE: i64 = 1;

const CREATE_TABLES: &[&str] = &[
    r#"CREATE TABLE database_metadata (
        schema_version_major INTEGER NOT NULL,
        schema_version_minor INTEGER NOT NULL,
        compile_time TEXT NOT NULL,
        vendor TEXT NOT NULL
    )"#,
    r#"CREATE TABLE summits (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        latitude INTEGER NOT NULL,
        longitude INTEGER NOT NULL
    )"#,
    r#"CREATE TABLE summit_names (
        name TEXT NOT NULL,
        usage INTEGER NOT NULL,
        summit_id INTEGER NOT NULL,
        PRIMARY KEY (summit_id, usage, name),
        FOREIGN KEY (summit_id) REFERENCES summits(id) ON DELETE CASCADE
    )"#,
    r#"CREATE TABLE routes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        summit_id INTEGER NOT NULL,
        route_name TEXT NOT NULL,
        route_grade TEXT NOT NULL,
        grade_af INTEGER NOT NULL,
        grade_rp INTEGER NOT NULL,
        grade_ou INTEGER NOT NULL,
        grade_jump INTEGER NOT NULL,
        stars INTEGER NOT NULL,
        danger BOOLEAN NOT NULL,
        UNIQUE (summit_id, route_name, route_grade),
        FOREIGN KEY (summit_id) REFERENCES summits(id) ON DELETE CASCADE
    )"#,
    r#"CREATE TABLE posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        route_id INTEGER NOT NULL,
        user_name TEXT NOT NULL,
        post_date TEXT NOT NULL,
        comment TEXT NOT NULL,
        rating INTEGER NOT NULL,
        FOREIGN KEY (route_id) REFERENCES routes(id) ON DELETE CASCADE
    )"#,
];

const CREATE_INDICES: &[&str] = &[
    "CREATE INDEX idx_summit_names_name ON summit_names(name)",
    "CREATE INDEX idx_routes_route_name ON routes(route_name)",
];

/// Identifies the writing application in the `database_metadata` row.
pub struct AppIdentity {
    pub name: &'static str,
    pub version: &'static str,
}

pub struct RelationalSink {
    db: Mutex<Box<dyn RelationalDatabase>>,
    output_path: String,
    app: AppIdentity,
    compile_time: String,
}

impl RelationalSink {
    pub fn new(db: Box<dyn RelationalDatabase>, output_path: impl Into<String>, app: AppIdentity, compile_time_utc_rfc3339: String) -> Self {
        Self {
            db: Mutex::new(db),
            output_path: output_path.into(),
            app,
            compile_time: compile_time_utc_rfc3339,
        }
    }

    async fn create_schema(&self, db: &dyn RelationalDatabase) -> Result<(), RouteDbError> {
        for ddl in CREATE_TABLES {
            db.execute_write(ddl, &[]).await?;
        }
        for ddl in CREATE_INDICES {
            db.execute_write(ddl, &[]).await?;
        }
        Ok(())
    }

    async fn write_metadata(&self, db: &dyn RelationalDatabase) -> Result<(), RouteDbError> {
        db.execute_write(
            "INSERT OR IGNORE INTO database_metadata (schema_version_major, schema_version_minor, compile_time, vendor) VALUES (?, ?, ?, ?)",
            &[
                Param::Integer(SCHEMA_VERSION_MAJOR),
                Param::Integer(SCHEMA_VERSION_MINOR),
                Param::Text(self.compile_time.clone()),
                Param::Text(format!("{} {}", self.app.name, self.app.version)),
            ],
        )
        .await
    }

    async fn write_pipe(&self, db: &dyn RelationalDatabase, pipe: &Pipe) -> Result<(), RouteDbError> {
        for (summit_id, summit) in pipe.iter_summits().collect::<Vec<_>>() {
            // The schema has a single lat/lon pair per summit; the domain
            // carries two (high/low grade position) because routes are
            // anchored by grade extremes. The high position wins when set,
            // falling back to the low position, matching which one the
            // merge predicate treats as primary (see DESIGN.md).
            let position = if summit.high_grade_position().is_undefined() {
                summit.low_grade_position()
            } else {
                summit.high_grade_position()
            };
            let row_id = db
                .execute_write_returning_id(
                    "INSERT OR IGNORE INTO summits (latitude, longitude) VALUES (?, ?)",
                    &[Param::Integer(position.latitude() as i64), Param::Integer(position.longitude() as i64)],
                )
                .await?;

            match summit.official_name() {
                Some(official) => {
                    db.execute_write(
                        "INSERT OR IGNORE INTO summit_names (name, usage, summit_id) VALUES (?, ?, ?)",
                        &[Param::Text(official.to_string()), Param::Integer(USAGE_OFFICIAL), Param::Integer(row_id)],
                    )
                    .await?;
                }
                None => {
                    tracing::warn!(summit = summit.name(), "summit has no official name, falling back to derived name");
                    db.execute_write(
                        "INSERT OR IGNORE INTO summit_names (name, usage, summit_id) VALUES (?, ?, ?)",
                        &[Param::Text(summit.name().to_string()), Param::Integer(USAGE_OFFICIAL), Param::Integer(row_id)],
                    )
                    .await?;
                }
            }

            for alternate in summit.alternate_names() {
                db.execute_write(
                    "INSERT OR IGNORE INTO summit_names (name, usage, summit_id) VALUES (?, ?, ?)",
                    &[Param::Text(alternate.to_string()), Param::Integer(USAGE_ALTERNATE), Param::Integer(row_id)],
                )
                .await?;
            }

            let summit_key = summit.name().to_string();
            for (route_id, route) in pipe.iter_routes_of(summit_id).collect::<Vec<_>>() {
                db.execute_write(
                    "INSERT OR IGNORE INTO routes (summit_id, route_name, route_grade, grade_af, grade_rp, grade_ou, grade_jump, stars, danger) \
                     VALUES ((SELECT summit_id FROM summit_names WHERE name = ? AND usage = 0 LIMIT 1), ?, ?, ?, ?, ?, ?, ?, ?)",
                    &[
                        Param::Text(summit_key.clone()),
                        Param::Text(route.route_name().to_string()),
                        Param::Text(route.grade().to_string()),
                        Param::Integer(route.grade_af() as i64),
                        Param::Integer(route.grade_rp() as i64),
                        Param::Integer(route.grade_ou() as i64),
                        Param::Integer(route.grade_jump() as i64),
                        Param::Integer(route.star_count() as i64),
                        Param::Bool(route.dangerous()),
                    ],
                )
                .await?;

                for post in pipe.iter_posts_of(route_id).collect::<Vec<_>>() {
                    db.execute_write(
                        "INSERT OR IGNORE INTO posts (route_id, user_name, post_date, comment, rating) \
                         VALUES ((SELECT id FROM routes WHERE summit_id = (SELECT summit_id FROM summit_names WHERE name = ? AND usage = 0 LIMIT 1) AND route_name = ? LIMIT 1), ?, ?, ?, ?)",
                        &[
                            Param::Text(summit_key.clone()),
                            Param::Text(route.route_name().to_string()),
                            Param::Text(post.user_name().to_string()),
                            Param::Text(post.post_date().to_rfc3339()),
                            Param::Text(post.comment().to_string()),
                            Param::Integer(post.rating() as i64),
                        ],
                    )
                    .await?;
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SinkFilter for RelationalSink {
    #[tracing::instrument(skip(self, input))]
    async fn run(&self, input: &Pipe) -> Result<(), RouteDbError> {
        let mut db = self.db.lock().await;
        db.connect(&self.output_path, true).await?;

        // Everything between connect and disconnect runs inside this block so
        // disconnect always fires, whichever path below returns.
        let result = async {
            db.begin().await?;

            let write_result = async {
                self.create_schema(db.as_ref()).await?;
                self.write_metadata(db.as_ref()).await?;
                self.write_pipe(db.as_ref(), input).await?;
                Ok::<(), RouteDbError>(())
            }
            .await;

            match write_result {
                Ok(()) => {
                    db.commit().await?;
                    // ANALYZE/VACUUM run outside the transaction scope:
                    // SQLite refuses VACUUM while a transaction is open.
                    db.execute_write("ANALYZE", &[]).await?;
                    db.execute_write("VACUUM", &[]).await?;
                    Ok(())
                }
                Err(err) => {
                    db.rollback().await?;
                    Err(err)
                }
            }
        }
        .await;

        db.disconnect().await?;
        result
    }
}
