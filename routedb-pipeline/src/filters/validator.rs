// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Validator (VALIDATE stage)
//!
//! Applies the fix-or-drop policy: any unrepairable summit,
//! route, or post drops the *entire* owning summit, since downstream
//! consumers require referential completeness. Posts are checked as part of
//! the same coarse-grained sweep: a single bad rating
//! anywhere under a summit is enough to drop that summit.

use async_trait::async_trait;
use routedb_domain::{Pipe, Route, RouteDbError};

use crate::engine::TransformFilter;

#[derive(Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TransformFilter for Validator {
    #[tracing::instrument(skip(self, input, output))]
    async fn run(&self, input: &Pipe, output: &Pipe) -> Result<(), RouteDbError> {
        let mut dropped = 0usize;

        for (summit_id, summit) in input.iter_summits() {
            if summit.fix_invalid_data().is_err() {
                dropped += 1;
                continue;
            }

            let routes: Vec<Route> = input.iter_routes_of(summit_id).map(|(_, route)| route).collect();
            if !all_repairable(&routes) {
                dropped += 1;
                continue;
            }

            let new_summit_id = output.add_summit(summit);
            for route in routes {
                output.add_route(new_summit_id, route)?;
            }
        }

        if dropped > 0 {
            tracing::warn!(dropped, "validator dropped summits with unrepairable data");
        }
        Ok(())
    }
}

fn all_repairable(routes: &[Route]) -> bool {
    routes.iter().all(|route| {
        route.fix_invalid_data().is_ok() && route.posts().iter().all(|post| post.fix_invalid_data().is_ok())
    })
}
