// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Post Entity
//!
//! A single community post (comment + rating) attached to exactly one route.
//! Posts are never de-duplicated by the merger: the same
//! commenter may legitimately leave more than one post on a route.

use chrono::{DateTime, Utc};

use crate::error::RouteDbError;

pub const MIN_RATING: i32 = -3;
pub const MAX_RATING: i32 = 3;

#[derive(Debug, Clone)]
pub struct Post {
    user_name: String,
    post_date: DateTime<Utc>,
    comment: String,
    rating: i32,
}

impl Post {
    pub fn new(
        user_name: impl Into<String>,
        post_date: DateTime<Utc>,
        comment: impl Into<String>,
        rating: i32,
    ) -> Result<Self, RouteDbError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(RouteDbError::invalid_state(format!(
                "rating {} out of range [{}, {}]",
                rating, MIN_RATING, MAX_RATING
            )));
        }

        Ok(Self {
            user_name: user_name.into(),
            post_date,
            comment: comment.into(),
            rating,
        })
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn post_date(&self) -> DateTime<Utc> {
        self.post_date
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    /// Validated during VALIDATE: a rating outside
    /// `[-3, 3]` can never actually occur since `new` rejects it, but the
    /// check is kept as the contractual recovery point for data arriving
    /// through channels that bypass `new` (e.g. a future bulk-load path).
    pub fn fix_invalid_data(&self) -> Result<(), RouteDbError> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(RouteDbError::incomplete_data(self.user_name.clone(), "rating"));
        }
        Ok(())
    }
}
