// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Drives the full IMPORT → MERGE → VALIDATE → WRITE pipeline against an
//! in-memory SQLite database, covering the scenario family laid out in
//! Each source stage is a small fixed-data stand-in for a
//! real source filter (HTML/JSON parsing is out of scope), so these tests
//! exercise the merger, validator, relational sink, and the engine that
//! sequences them, end to end.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use routedb_domain::{Pipe, Position, Post, Route, RouteDbError, Summit, UNDEFINED};
use routedb_pipeline::boundaries::{DataValue, RelationalDatabase};
use routedb_pipeline::filters::{AppIdentity, EntityMerger, RelationalSink, Validator};
use routedb_pipeline::infrastructure::SqliteDatabase;
use routedb_pipeline::{Pipeline, SourceFilter};

/// A source filter that replays a fixed list of summit/route observations
/// rather than fetching them from a real upstream.
struct FixedSourceFilter {
    summits: Mutex<Vec<(Summit, Vec<Route>)>>,
}

impl FixedSourceFilter {
    fn new(summits: Vec<(Summit, Vec<Route>)>) -> Self {
        Self {
            summits: Mutex::new(summits),
        }
    }
}

#[async_trait]
impl SourceFilter for FixedSourceFilter {
    async fn run(&self, output: &Pipe) -> Result<(), RouteDbError> {
        let observations = std::mem::take(&mut *self.summits.lock().unwrap());
        for (summit, routes) in observations {
            let summit_id = output.add_summit(summit);
            for route in routes {
                output.add_route(summit_id, route)?;
            }
        }
        Ok(())
    }
}

fn identity() -> AppIdentity {
    AppIdentity {
        name: "routedb",
        version: "0.1.0",
    }
}

fn route(name: &str) -> Route {
    Route::new(name, "II", 0, 0, 0, 0, 0, false).unwrap()
}

/// Runs the pipeline against a temp-file database and hands back an
/// already-connected reader for assertions.
async fn run_pipeline_against_file(summits: Vec<(Summit, Vec<Route>)>) -> (tempfile::TempDir, SqliteDatabase) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("routedb_v1.sqlite");
    let db_path_str = db_path.to_string_lossy().into_owned();

    let pipeline = Pipeline::new(
        vec![Box::new(FixedSourceFilter::new(summits))],
        vec![Box::new(EntityMerger::new())],
        vec![Box::new(Validator::new())],
        vec![Box::new(RelationalSink::new(
            Box::new(SqliteDatabase::new()),
            db_path_str.clone(),
            identity(),
            "2024-01-01T00:00:00Z".to_string(),
        ))],
    );
    pipeline.run().await.unwrap();

    let mut reader = SqliteDatabase::new();
    reader.connect(&db_path_str, false).await.unwrap();
    (dir, reader)
}

#[tokio::test]
async fn single_summit_route_and_post_land_in_their_tables() {
    let summit = Summit::new(Some("Falkenturm".into()), vec![], vec![], UNDEFINED, UNDEFINED).unwrap();
    let mut aw = route("AW");
    aw.push_post(Post::new("John Doe", Utc.with_ymd_and_hms(2024, 7, 15, 10, 0, 0).unwrap(), "Great route!", 2).unwrap());

    let (_dir, db) = run_pipeline_against_file(vec![(summit, vec![aw])]).await;

    let summits = db.execute_read("SELECT id FROM summits", &[]).await.unwrap();
    assert_eq!(summits.len(), 1);

    let names = db.execute_read("SELECT name, usage FROM summit_names", &[]).await.unwrap();
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].get("name"), Some(&DataValue::Text("Falkenturm".to_string())));

    let routes = db.execute_read("SELECT route_name FROM routes", &[]).await.unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].get("route_name"), Some(&DataValue::Text("AW".to_string())));

    let posts = db.execute_read("SELECT user_name, rating FROM posts", &[]).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].get("rating"), Some(&DataValue::Integer(2)));
}

#[tokio::test]
async fn enrichment_across_two_observations_fills_in_the_missing_position() {
    let first = Summit::new(Some("Beispielturm".into()), vec![], vec![], UNDEFINED, UNDEFINED).unwrap();
    let high = Position::from_decimal_degrees(47.0, 11.0).unwrap();
    let second = Summit::new(Some("Beispielturm".into()), vec![], vec![], high, UNDEFINED).unwrap();

    let (_dir, db) = run_pipeline_against_file(vec![(first, vec![]), (second, vec![])]).await;

    let rows = db.execute_read("SELECT latitude, longitude FROM summits", &[]).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("latitude"), Some(&DataValue::Integer(high.latitude() as i64)));
}

#[tokio::test]
async fn a_later_observation_cannot_overwrite_an_already_set_position() {
    let high = Position::from_decimal_degrees(47.0, 11.0).unwrap();
    let first = Summit::new(Some("Beispielturm".into()), vec![], vec![], high, UNDEFINED).unwrap();

    // Same coordinates: not a conflict, a no-op confirmation.
    let confirming = Summit::new(Some("Beispielturm".into()), vec![], vec![], high, UNDEFINED).unwrap();
    let (_dir, db) = run_pipeline_against_file(vec![(first.clone(), vec![]), (confirming, vec![])]).await;
    let rows = db.execute_read("SELECT latitude FROM summits", &[]).await.unwrap();
    assert_eq!(rows[0].get("latitude"), Some(&DataValue::Integer(high.latitude() as i64)));

    // Different coordinates: a genuine conflict aborts the run before any
    // database file is produced.
    let conflicting_pos = Position::from_decimal_degrees(48.0, 11.0).unwrap();
    let conflicting = Summit::new(Some("Beispielturm".into()), vec![], vec![], conflicting_pos, UNDEFINED).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("routedb_v1.sqlite");
    let pipeline = Pipeline::new(
        vec![Box::new(FixedSourceFilter::new(vec![(first, vec![]), (conflicting, vec![])]))],
        vec![Box::new(EntityMerger::new())],
        vec![Box::new(Validator::new())],
        vec![Box::new(RelationalSink::new(
            Box::new(SqliteDatabase::new()),
            db_path.to_string_lossy().into_owned(),
            identity(),
            "2024-01-01T00:00:00Z".to_string(),
        ))],
    );
    let result = pipeline.run().await;
    assert!(matches!(result, Err(RouteDbError::MergeConflict { .. })));
    assert!(!db_path.exists(), "a failed merge must not produce an output file");
}

#[tokio::test]
async fn a_shared_name_discovered_late_collapses_two_canonical_summits() {
    let unspecified_one = Summit::new(None, vec![], vec!["Name1".to_string()], UNDEFINED, UNDEFINED).unwrap();
    let unspecified_two = Summit::new(None, vec![], vec!["Name2".to_string()], UNDEFINED, UNDEFINED).unwrap();
    let bridge = Summit::new(Some("Name1".into()), vec!["Name2".into()], vec![], UNDEFINED, UNDEFINED).unwrap();

    let (_dir, db) = run_pipeline_against_file(vec![
        (unspecified_one, vec![]),
        (unspecified_two, vec![]),
        (bridge, vec![]),
    ])
    .await;

    let summits = db.execute_read("SELECT id FROM summits", &[]).await.unwrap();
    assert_eq!(summits.len(), 1, "the bridging observation should have merged all three into one summit");

    let names = db.execute_read("SELECT name FROM summit_names ORDER BY usage", &[]).await.unwrap();
    let found: Vec<String> = names
        .iter()
        .map(|row| match row.get("name").unwrap() {
            DataValue::Text(s) => s.clone(),
            other => panic!("expected text, got {other:?}"),
        })
        .collect();
    assert!(found.contains(&"Name1".to_string()));
    assert!(found.contains(&"Name2".to_string()));
}

#[tokio::test]
async fn too_distant_namesakes_remain_separate_summits() {
    let here = Position::from_decimal_degrees(51.0, 13.0).unwrap();
    let far = Position::from_decimal_degrees(52.0, 13.0).unwrap();
    let a = Summit::new(Some("Name1".into()), vec![], vec![], here, UNDEFINED).unwrap();
    let b = Summit::new(Some("Name1".into()), vec![], vec![], far, UNDEFINED).unwrap();

    let (_dir, db) = run_pipeline_against_file(vec![(a, vec![]), (b, vec![])]).await;

    let summits = db.execute_read("SELECT id FROM summits", &[]).await.unwrap();
    assert_eq!(summits.len(), 2, "two summits over 200m apart sharing a name must not merge");
}

#[tokio::test]
async fn a_rating_outside_the_valid_range_is_rejected_at_construction() {
    // Parsing a rating out of a source's raw text is out of scope; the
    // boundary this system actually enforces is `Post::new`'s range check,
    // which is what the VALIDATE stage's fix-or-drop policy ultimately
    // depends on.
    assert!(Post::new("user", Utc.timestamp_opt(0, 0).unwrap(), "comment", 4).is_err());
    assert!(Post::new("user", Utc.timestamp_opt(0, 0).unwrap(), "comment", -4).is_err());
}

#[tokio::test]
async fn unrepairable_route_drops_its_whole_summit_before_writing() {
    let good = Summit::new(Some("Good".into()), vec![], vec![], UNDEFINED, UNDEFINED).unwrap();
    let bad = Summit::new(Some("Bad".into()), vec![], vec![], UNDEFINED, UNDEFINED).unwrap();
    let empty_named_route = Route::new("", "II", 0, 0, 0, 0, 0, false).unwrap();

    let (_dir, db) = run_pipeline_against_file(vec![(good, vec![route("AW")]), (bad, vec![empty_named_route])]).await;

    let names = db.execute_read("SELECT name FROM summit_names", &[]).await.unwrap();
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].get("name"), Some(&DataValue::Text("Good".to_string())));
}
