// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Entity merger (MERGE stage)
//!
//! Reads the input Pipe, folds matching summit observations into a
//! canonical in-memory set, and emits the result into the
//! output Pipe. A `MergeConflict` aborts the stage immediately — the
//! outer `run` call returns the first `Err` it sees and the engine (see
//! `crate::engine::Pipeline::run`) stops the whole pipeline there.

use async_trait::async_trait;
use routedb_domain::{Pipe, Route, RouteDbError, Summit};

use crate::engine::TransformFilter;

struct CanonicalSummit {
    summit: Summit,
    routes: Vec<Route>,
}

/// Merges Summit/Route observations that refer to the same physical summit,
/// per the Summit/Route matching predicate and enrichment rules.
#[derive(Default)]
pub struct EntityMerger;

impl EntityMerger {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TransformFilter for EntityMerger {
    #[tracing::instrument(skip(self, input, output))]
    async fn run(&self, input: &Pipe, output: &Pipe) -> Result<(), RouteDbError> {
        let mut canonical: Vec<CanonicalSummit> = Vec::new();

        for (summit_id, summit) in input.iter_summits() {
            let routes: Vec<Route> = input.iter_routes_of(summit_id).map(|(_, route)| route).collect();
            fold_into_canonical_set(&mut canonical, summit, routes)?;
        }

        tracing::debug!(canonical_summits = canonical.len(), "merge produced canonical set");

        for entry in canonical {
            let summit_id = output.add_summit(entry.summit);
            for route in entry.routes {
                output.add_route(summit_id, route)?;
            }
        }
        Ok(())
    }
}

/// Implements the re-scan algorithm: a newly discovered name
/// can collapse several previously independent canonical entries into one,
/// so every incoming summit is matched against the *whole* canonical set,
/// not just its most recent entry.
fn fold_into_canonical_set(
    canonical: &mut Vec<CanonicalSummit>,
    incoming_summit: Summit,
    incoming_routes: Vec<Route>,
) -> Result<(), RouteDbError> {
    let matching: Vec<usize> = canonical
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.summit.matches(&incoming_summit))
        .map(|(index, _)| index)
        .collect();

    let Some(&first) = matching.first() else {
        canonical.push(CanonicalSummit {
            summit: incoming_summit,
            routes: incoming_routes,
        });
        return Ok(());
    };

    // Fold every later match into the first one, highest index first so
    // `first` never shifts underneath us.
    for &index in matching[1..].iter().rev() {
        let subsumed = canonical.remove(index);
        canonical[first].summit.enrich_with(&subsumed.summit)?;
        merge_routes(&mut canonical[first].routes, subsumed.routes)?;
    }

    canonical[first].summit.enrich_with(&incoming_summit)?;
    merge_routes(&mut canonical[first].routes, incoming_routes)?;
    Ok(())
}

fn merge_routes(incumbent_routes: &mut Vec<Route>, incoming_routes: Vec<Route>) -> Result<(), RouteDbError> {
    for incoming in incoming_routes {
        match incumbent_routes.iter_mut().find(|route| route.matches(&incoming)) {
            Some(incumbent) => incumbent.enrich_with(&incoming)?,
            None => incumbent_routes.push(incoming),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use routedb_domain::{Position, UNDEFINED};

    fn summit(official: &str) -> Summit {
        Summit::new(Some(official.to_string()), vec![], vec![], UNDEFINED, UNDEFINED).unwrap()
    }

    fn unspecified_summit(name: &str) -> Summit {
        Summit::new(None, vec![], vec![name.to_string()], UNDEFINED, UNDEFINED).unwrap()
    }

    async fn run_merge(input: &Pipe) -> Pipe {
        let output = Pipe::new();
        EntityMerger::new().run(input, &output).await.unwrap();
        output
    }

    #[tokio::test]
    async fn enrichment_across_two_observations_fills_position() {
        let input = Pipe::new();
        input.add_summit(summit("Beispielturm"));
        let high = Position::from_decimal_degrees(47.0, 11.0).unwrap();
        input.add_summit(Summit::new(Some("Beispielturm".into()), vec![], vec![], high, UNDEFINED).unwrap());

        let output = run_merge(&input).await;
        let merged: Vec<_> = output.iter_summits().collect();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].1.high_grade_position(), high);
    }

    #[tokio::test]
    async fn name_driven_collapse_merges_two_canonical_summits_at_once() {
        let input = Pipe::new();
        input.add_summit(unspecified_summit("Name1"));
        input.add_summit(unspecified_summit("Name2"));
        input.add_summit(Summit::new(Some("Name1".into()), vec!["Name2".into()], vec![], UNDEFINED, UNDEFINED).unwrap());

        let output = run_merge(&input).await;
        let merged: Vec<_> = output.iter_summits().collect();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].1.official_name(), Some("Name1"));
        assert_eq!(merged[0].1.alternate_names().collect::<Vec<_>>(), vec!["Name2"]);
    }

    #[tokio::test]
    async fn too_distant_namesakes_stay_separate() {
        let input = Pipe::new();
        let here = Position::from_decimal_degrees(51.0, 13.0).unwrap();
        let far = Position::from_decimal_degrees(52.0, 13.0).unwrap();
        input.add_summit(Summit::new(Some("Name1".into()), vec![], vec![], here, UNDEFINED).unwrap());
        input.add_summit(Summit::new(Some("Name1".into()), vec![], vec![], far, UNDEFINED).unwrap());

        let output = run_merge(&input).await;
        assert_eq!(output.iter_summits().count(), 2);
    }

    #[tokio::test]
    async fn conflicting_route_grades_abort_merge() {
        let input = Pipe::new();
        let s1 = input.add_summit(summit("Turm"));
        input
            .add_route(s1, Route::new("AW", "VIIb", 8, 8, 0, 0, 0, false).unwrap())
            .unwrap();
        let s2 = input.add_summit(summit("Turm"));
        input
            .add_route(s2, Route::new("AW", "VIIc", 9, 9, 0, 0, 0, false).unwrap())
            .unwrap();

        let output = Pipe::new();
        let result = EntityMerger::new().run(&input, &output).await;
        assert!(matches!(result, Err(RouteDbError::MergeConflict { .. })));
    }
}
