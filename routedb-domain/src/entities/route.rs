// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Route Entity
//!
//! A single climbing route belonging to exactly one summit in a given
//! [`crate::pipe::Pipe`]. The six-tuple `(grade_af, grade_ou, grade_rp,
//! grade_jump, dangerous, star_count)` is merged wholesale, never field by
//! field — a partial grade observation from one source is not mixed with a
//! partial observation from another, since there is no principled way to
//! know the fields came from comparable grading conventions.

use crate::entities::post::Post;
use crate::error::RouteDbError;

/// The "nothing known yet" grade tuple: every numeric field zero, not
/// dangerous, no stars.
const MISSING_GRADES: GradeTuple = GradeTuple {
    grade_af: 0,
    grade_ou: 0,
    grade_rp: 0,
    grade_jump: 0,
    dangerous: false,
    star_count: 0,
};

/// The mergeable subset of a [`Route`]'s attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeTuple {
    pub grade_af: i32,
    pub grade_ou: i32,
    pub grade_rp: i32,
    pub grade_jump: i32,
    pub dangerous: bool,
    pub star_count: i32,
}

#[derive(Debug, Clone)]
pub struct Route {
    route_name: String,
    grade: String,
    grade_af: i32,
    grade_rp: i32,
    grade_ou: i32,
    grade_jump: i32,
    star_count: i32,
    dangerous: bool,
    posts: Vec<Post>,
}

impl Route {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        route_name: impl Into<String>,
        grade: impl Into<String>,
        grade_af: i32,
        grade_rp: i32,
        grade_ou: i32,
        grade_jump: i32,
        star_count: i32,
        dangerous: bool,
    ) -> Result<Self, RouteDbError> {
        for (value, field) in [
            (grade_af, "grade_af"),
            (grade_rp, "grade_rp"),
            (grade_ou, "grade_ou"),
            (grade_jump, "grade_jump"),
            (star_count, "star_count"),
        ] {
            if value < 0 {
                return Err(RouteDbError::invalid_state(format!("{} must be >= 0, got {}", field, value)));
            }
        }

        Ok(Self {
            route_name: route_name.into(),
            grade: grade.into(),
            grade_af,
            grade_rp,
            grade_ou,
            grade_jump,
            star_count,
            dangerous,
            posts: Vec::new(),
        })
    }

    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    pub fn grade(&self) -> &str {
        &self.grade
    }

    pub fn grade_af(&self) -> i32 {
        self.grade_af
    }

    pub fn grade_rp(&self) -> i32 {
        self.grade_rp
    }

    pub fn grade_ou(&self) -> i32 {
        self.grade_ou
    }

    pub fn grade_jump(&self) -> i32 {
        self.grade_jump
    }

    pub fn star_count(&self) -> i32 {
        self.star_count
    }

    pub fn dangerous(&self) -> bool {
        self.dangerous
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn push_post(&mut self, post: Post) {
        self.posts.push(post);
    }

    pub fn grade_tuple(&self) -> GradeTuple {
        GradeTuple {
            grade_af: self.grade_af,
            grade_ou: self.grade_ou,
            grade_rp: self.grade_rp,
            grade_jump: self.grade_jump,
            dangerous: self.dangerous,
            star_count: self.star_count,
        }
    }

    fn set_grade_tuple(&mut self, grades: GradeTuple) {
        self.grade_af = grades.grade_af;
        self.grade_ou = grades.grade_ou;
        self.grade_rp = grades.grade_rp;
        self.grade_jump = grades.grade_jump;
        self.dangerous = grades.dangerous;
        self.star_count = grades.star_count;
    }

    /// Two routes within the same summit match iff their names are
    /// byte-wise equal — no position-based matching for
    /// routes).
    pub fn matches(&self, other: &Route) -> bool {
        self.route_name == other.route_name
    }

    /// Folds `incoming`'s grade tuple and posts into `self`, following the
    /// route enrichment rules.
    pub fn enrich_with(&mut self, incoming: &Route) -> Result<(), RouteDbError> {
        let incumbent_grades = self.grade_tuple();
        let incoming_grades = incoming.grade_tuple();

        if incumbent_grades == MISSING_GRADES {
            self.set_grade_tuple(incoming_grades);
        } else if incoming_grades != MISSING_GRADES && incoming_grades != incumbent_grades {
            return Err(RouteDbError::merge_conflict("route", self.route_name.clone(), "grade"));
        }

        self.posts.extend(incoming.posts.iter().cloned());
        Ok(())
    }

    /// Attempts to repair this route during VALIDATE. Grade
    /// and star-count fields can never go negative through public
    /// construction, so the only repair target documented here is an
    /// explicit recheck kept for parity with `Summit::fix_invalid_data` —
    /// it always succeeds today, and exists as the contractual recovery
    /// point named here.
    pub fn fix_invalid_data(&self) -> Result<(), RouteDbError> {
        if self.route_name.is_empty() {
            return Err(RouteDbError::incomplete_data(self.route_name.clone(), "route_name"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(name: &str) -> Route {
        Route::new(name, "II", 0, 0, 0, 0, 0, false).unwrap()
    }

    #[test]
    fn rejects_negative_fields() {
        assert!(Route::new("AW", "II", -1, 0, 0, 0, 0, false).is_err());
    }

    #[test]
    fn enrich_adopts_incoming_grades_when_incumbent_is_missing() {
        let mut incumbent = route("AW");
        let incoming = Route::new("AW", "VIIb", 8, 8, 0, 0, 2, false).unwrap();
        incumbent.enrich_with(&incoming).unwrap();
        assert_eq!(incumbent.grade_af(), 8);
        assert_eq!(incumbent.star_count(), 2);
    }

    #[test]
    fn enrich_keeps_incumbent_when_incoming_matches_or_is_missing() {
        let mut incumbent = Route::new("AW", "VIIb", 8, 8, 0, 0, 2, false).unwrap();
        let same = Route::new("AW", "VIIb", 8, 8, 0, 0, 2, false).unwrap();
        incumbent.enrich_with(&same).unwrap();
        assert_eq!(incumbent.grade_af(), 8);

        let missing = route("AW");
        incumbent.enrich_with(&missing).unwrap();
        assert_eq!(incumbent.grade_af(), 8);
    }

    #[test]
    fn enrich_rejects_conflicting_grades() {
        let mut incumbent = Route::new("AW", "VIIb", 8, 8, 0, 0, 0, false).unwrap();
        let conflicting = Route::new("AW", "VIIc", 9, 9, 0, 0, 0, false).unwrap();
        let err = incumbent.enrich_with(&conflicting).unwrap_err();
        assert!(matches!(err, RouteDbError::MergeConflict { attribute: "grade", .. }));
    }

    #[test]
    fn enrich_concatenates_posts_without_dedup() {
        use chrono::{TimeZone, Utc};
        let mut incumbent = route("AW");
        incumbent.push_post(Post::new("a", Utc.timestamp_opt(0, 0).unwrap(), "hi", 1).unwrap());
        let mut incoming = route("AW");
        incoming.push_post(Post::new("a", Utc.timestamp_opt(0, 0).unwrap(), "hi", 1).unwrap());

        incumbent.enrich_with(&incoming).unwrap();
        assert_eq!(incumbent.posts().len(), 2);
    }
}
