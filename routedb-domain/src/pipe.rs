// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipe
//!
//! The in-memory store handed between pipeline stages. A Pipe owns every
//! entity inserted into it; inter-entity relations are expressed through the
//! opaque [`SummitId`]/[`RouteId`] handles returned on insertion rather than
//! through direct references, so the store never needs cyclic ownership and
//! is trivially handed off whole between stages.
//!
//! A Pipe must be safe for concurrent read/write even though
//! the pipeline itself runs stages and filters serially today: every
//! mutating call takes an exclusive lock for its duration, and every
//! `iter_*` call takes a shared lock that is held for the returned
//! iterator's entire lifetime, so no insertion can interleave with a live
//! iteration. The iterators yield owned clones rather than borrowed
//! references — Rust's borrow checker cannot express a "lending" iterator
//! that hands out `&Summit` while also holding the lock guard inside the
//! same struct on stable Rust, and the entities here are cheap enough to
//! clone that this is the pragmatic, safe translation of the original
//! reference-based API (see DESIGN.md).

use std::sync::RwLock;

use crate::entities::{Post, Route, Summit};
use crate::error::RouteDbError;

/// Opaque handle to a [`Summit`] stored in a [`Pipe`]. Stable and dense
/// within one Pipe instance; never equal to a `RouteId`'s numeric value
/// being confused for a summit, since the types differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SummitId(usize);

/// Opaque handle to a [`Route`] stored in a [`Pipe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteId(usize);

#[derive(Default)]
struct PipeInner {
    summits: Vec<Summit>,
    summit_routes: Vec<Vec<RouteId>>,
    routes: Vec<Route>,
    route_summit: Vec<SummitId>,
}

/// A per-stage, append-only store of entities.
#[derive(Default)]
pub struct Pipe {
    inner: RwLock<PipeInner>,
}

impl Pipe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `summit`, returning a fresh, never-reused handle.
    pub fn add_summit(&self, summit: Summit) -> SummitId {
        let mut inner = self.inner.write().expect("pipe lock poisoned");
        let id = SummitId(inner.summits.len());
        inner.summits.push(summit);
        inner.summit_routes.push(Vec::new());
        id
    }

    /// Appends `route` under `summit_id`. Fails with `EntityNotFound` if the
    /// summit does not exist in this Pipe.
    pub fn add_route(&self, summit_id: SummitId, route: Route) -> Result<RouteId, RouteDbError> {
        let mut inner = self.inner.write().expect("pipe lock poisoned");
        if summit_id.0 >= inner.summits.len() {
            return Err(RouteDbError::entity_not_found(format!("summit {:?}", summit_id)));
        }
        let route_id = RouteId(inner.routes.len());
        inner.routes.push(route);
        inner.route_summit.push(summit_id);
        inner.summit_routes[summit_id.0].push(route_id);
        Ok(route_id)
    }

    /// Appends `post` under `route_id`. Fails with `EntityNotFound` if the
    /// route does not exist in this Pipe.
    pub fn add_post(&self, route_id: RouteId, post: Post) -> Result<(), RouteDbError> {
        let mut inner = self.inner.write().expect("pipe lock poisoned");
        let route = inner
            .routes
            .get_mut(route_id.0)
            .ok_or_else(|| RouteDbError::entity_not_found(format!("route {:?}", route_id)))?;
        route.push_post(post);
        Ok(())
    }

    /// The summit owning `route_id`, if it exists in this Pipe.
    pub fn summit_of(&self, route_id: RouteId) -> Option<SummitId> {
        let inner = self.inner.read().expect("pipe lock poisoned");
        inner.route_summit.get(route_id.0).copied()
    }

    pub fn summit_count(&self) -> usize {
        self.inner.read().expect("pipe lock poisoned").summits.len()
    }

    /// Iterates all summits in insertion order. Holds a shared lock for the
    /// iterator's lifetime: no `add_*` call on this Pipe can proceed while
    /// the returned iterator is alive.
    pub fn iter_summits(&self) -> SummitIter<'_> {
        SummitIter {
            guard: self.inner.read().expect("pipe lock poisoned"),
            next_idx: 0,
        }
    }

    /// Iterates the routes of `summit_id` in insertion order; empty if the
    /// id is unknown to this Pipe.
    pub fn iter_routes_of(&self, summit_id: SummitId) -> RouteIter<'_> {
        let guard = self.inner.read().expect("pipe lock poisoned");
        let route_ids = guard.summit_routes.get(summit_id.0).cloned().unwrap_or_default();
        RouteIter {
            guard,
            route_ids,
            next_idx: 0,
        }
    }

    /// Iterates the posts of `route_id` in insertion order; empty if the id
    /// is unknown to this Pipe.
    pub fn iter_posts_of(&self, route_id: RouteId) -> PostIter<'_> {
        let guard = self.inner.read().expect("pipe lock poisoned");
        let posts = guard.routes.get(route_id.0).map(|r| r.posts().to_vec()).unwrap_or_default();
        PostIter { _guard: guard, posts, next_idx: 0 }
    }
}

pub struct SummitIter<'a> {
    guard: std::sync::RwLockReadGuard<'a, PipeInner>,
    next_idx: usize,
}

impl Iterator for SummitIter<'_> {
    type Item = (SummitId, Summit);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next_idx;
        let summit = self.guard.summits.get(idx)?.clone();
        self.next_idx += 1;
        Some((SummitId(idx), summit))
    }
}

pub struct RouteIter<'a> {
    guard: std::sync::RwLockReadGuard<'a, PipeInner>,
    route_ids: Vec<RouteId>,
    next_idx: usize,
}

impl Iterator for RouteIter<'_> {
    type Item = (RouteId, Route);

    fn next(&mut self) -> Option<Self::Item> {
        let route_id = *self.route_ids.get(self.next_idx)?;
        let route = self.guard.routes[route_id.0].clone();
        self.next_idx += 1;
        Some((route_id, route))
    }
}

pub struct PostIter<'a> {
    _guard: std::sync::RwLockReadGuard<'a, PipeInner>,
    posts: Vec<Post>,
    next_idx: usize,
}

impl Iterator for PostIter<'_> {
    type Item = Post;

    fn next(&mut self) -> Option<Self::Item> {
        let post = self.posts.get(self.next_idx)?.clone();
        self.next_idx += 1;
        Some(post)
    }
}
