// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Summit Entity
//!
//! A summit as observed by one or more source filters. Name fields are kept
//! separate (`official_name`, `alternate_names`, `unspecified_names`) because
//! the upstream sources disagree on which names are "official"; the merge
//! algebra in [`Summit::enrich_with`] is what reconciles several partial
//! observations of the same physical rock into one canonical record.

use crate::entities::ordered_set::OrderedSet;
use crate::error::RouteDbError;
use crate::value_objects::{NormalizedName, Position, UNDEFINED};

/// A single summit, as held by a [`crate::pipe::Pipe`].
#[derive(Debug, Clone)]
pub struct Summit {
    official_name: Option<String>,
    alternate_names: OrderedSet<String>,
    unspecified_names: OrderedSet<String>,
    high_grade_position: Position,
    low_grade_position: Position,
}

impl Summit {
    /// Builds a summit observation. Fails with `InvalidState` if all three
    /// name fields would be empty, or if `official_name` duplicates an entry
    /// already present in `alternate_names`.
    pub fn new(
        official_name: Option<String>,
        alternate_names: Vec<String>,
        unspecified_names: Vec<String>,
        high_grade_position: Position,
        low_grade_position: Position,
    ) -> Result<Self, RouteDbError> {
        let official_name = official_name.filter(|n| !n.is_empty());

        let mut alternates = OrderedSet::new();
        for name in alternate_names {
            alternates.insert(name);
        }
        let mut unspecified = OrderedSet::new();
        for name in unspecified_names {
            unspecified.insert(name);
        }

        if official_name.is_none() && alternates.is_empty() && unspecified.is_empty() {
            return Err(RouteDbError::invalid_state(
                "summit has no official, alternate, or unspecified name",
            ));
        }

        if let Some(official) = &official_name {
            if alternates.contains(official) {
                return Err(RouteDbError::invalid_state(format!(
                    "official name '{}' duplicated in alternate_names",
                    official
                )));
            }
        }

        Ok(Self {
            official_name,
            alternate_names: alternates,
            unspecified_names: unspecified,
            high_grade_position,
            low_grade_position,
        })
    }

    pub fn official_name(&self) -> Option<&str> {
        self.official_name.as_deref()
    }

    pub fn alternate_names(&self) -> impl Iterator<Item = &str> {
        self.alternate_names.iter().map(String::as_str)
    }

    pub fn unspecified_names(&self) -> impl Iterator<Item = &str> {
        self.unspecified_names.iter().map(String::as_str)
    }

    pub fn high_grade_position(&self) -> Position {
        self.high_grade_position
    }

    pub fn low_grade_position(&self) -> Position {
        self.low_grade_position
    }

    /// The derived display name: official name, else first alternate, else
    /// first unspecified name. Never empty — `new` guarantees at least one
    /// name field is non-empty.
    pub fn name(&self) -> &str {
        self.official_name
            .as_deref()
            .or_else(|| self.alternate_names.first().map(String::as_str))
            .or_else(|| self.unspecified_names.first().map(String::as_str))
            .unwrap_or_default()
    }

    /// The `NormalizedName` of every stored name across the three fields —
    /// the identity set the merger matches summits on.
    pub fn possible_identifiers(&self) -> Vec<NormalizedName> {
        let mut identifiers = Vec::new();
        if let Some(official) = &self.official_name {
            identifiers.push(NormalizedName::new(official));
        }
        identifiers.extend(self.alternate_names.iter().map(|n| NormalizedName::new(n)));
        identifiers.extend(self.unspecified_names.iter().map(|n| NormalizedName::new(n)));
        identifiers
    }

    /// True iff `self` and `other` share at least one `NormalizedName`.
    pub fn shares_a_name_with(&self, other: &Summit) -> bool {
        let ours = self.possible_identifiers();
        other.possible_identifiers().iter().any(|id| ours.contains(id))
    }

    /// The position-compatibility half of the summit matching predicate
    /// true iff either side has `UNDEFINED` position, or both
    /// sides are set and mutually within 200 m.
    pub fn positions_compatible_with(&self, other: &Summit) -> bool {
        positions_compatible(self.high_grade_position, other.high_grade_position)
            && positions_compatible(self.low_grade_position, other.low_grade_position)
    }

    /// True iff `self` and `other` are observations of the same physical
    /// summit under the merge predicate.
    pub fn matches(&self, other: &Summit) -> bool {
        self.shares_a_name_with(other) && self.positions_compatible_with(other)
    }

    /// Folds `incoming`'s attributes into `self` in place, following the
    /// summit enrichment rules. On a `MergeConflict`, `self`
    /// is left in whatever partially-enriched state the rule application
    /// reached before the conflicting attribute — callers abort the stage on
    /// error, so this is never observed downstream.
    pub fn enrich_with(&mut self, incoming: &Summit) -> Result<(), RouteDbError> {
        self.enrich_official_name(incoming)?;
        self.alternate_names.union_preserving_order(&incoming.alternate_names);
        if let Some(official) = &self.official_name {
            self.alternate_names.remove(&official.clone());
        }
        self.unspecified_names.union_preserving_order(&incoming.unspecified_names);
        self.high_grade_position = enrich_position("position", self.name(), self.high_grade_position, incoming.high_grade_position)?;
        self.low_grade_position = enrich_position("position", self.name(), self.low_grade_position, incoming.low_grade_position)?;
        Ok(())
    }

    fn enrich_official_name(&mut self, incoming: &Summit) -> Result<(), RouteDbError> {
        let Some(incoming_name) = &incoming.official_name else {
            return Ok(());
        };
        match &self.official_name {
            None => {
                self.official_name = Some(incoming_name.clone());
                Ok(())
            }
            Some(incumbent_name) => {
                if NormalizedName::new(incumbent_name) == NormalizedName::new(incoming_name) {
                    Ok(())
                } else {
                    Err(RouteDbError::merge_conflict("summit", incumbent_name.clone(), "official name"))
                }
            }
        }
    }

    /// Attempts to repair this summit during the VALIDATE stage. The only repair strategy is resetting an out-of-range position
    /// back to `UNDEFINED` — that can't actually trigger because `new` and
    /// `enrich_with` only ever produce positions built through
    /// `Position::new`/`from_decimal_degrees`, which reject out-of-range
    /// values at construction time. The check stays here as the documented
    /// recovery point for the `IncompleteData` contract, so
    /// that an `IncompleteData` is raised instead of succeeding silently if
    /// that invariant is ever relaxed upstream.
    pub fn fix_invalid_data(&self) -> Result<(), RouteDbError> {
        if self.official_name.is_none() && self.alternate_names.is_empty() && self.unspecified_names.is_empty() {
            return Err(RouteDbError::incomplete_data(self.name().to_string(), "name"));
        }
        Ok(())
    }
}

fn positions_compatible(a: Position, b: Position) -> bool {
    a.is_undefined() || b.is_undefined() || a.within_radius(&b, 200.0)
}

fn enrich_position(
    attribute: &'static str,
    summit_name: &str,
    incumbent: Position,
    incoming: Position,
) -> Result<Position, RouteDbError> {
    if incumbent.is_undefined() {
        return Ok(incoming);
    }
    if incoming.is_undefined() || incoming == incumbent {
        return Ok(incumbent);
    }
    Err(RouteDbError::merge_conflict("summit", summit_name.to_string(), attribute))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summit_with_official(name: &str) -> Summit {
        Summit::new(Some(name.to_string()), vec![], vec![], UNDEFINED, UNDEFINED).unwrap()
    }

    #[test]
    fn requires_at_least_one_non_empty_name_field() {
        assert!(Summit::new(None, vec![], vec![], UNDEFINED, UNDEFINED).is_err());
    }

    #[test]
    fn official_name_cannot_also_be_an_alternate() {
        assert!(Summit::new(Some("Falkenturm".into()), vec!["Falkenturm".into()], vec![], UNDEFINED, UNDEFINED).is_err());
    }

    #[test]
    fn name_prefers_official_then_alternate_then_unspecified() {
        let s = Summit::new(None, vec!["Alt".into()], vec!["Unspec".into()], UNDEFINED, UNDEFINED).unwrap();
        assert_eq!(s.name(), "Alt");
    }

    #[test]
    fn enrich_fills_empty_position_from_incoming() {
        let mut incumbent = summit_with_official("Beispielturm");
        let high = Position::from_decimal_degrees(47.0, 11.0).unwrap();
        let incoming = Summit::new(Some("Beispielturm".into()), vec![], vec![], high, UNDEFINED).unwrap();

        incumbent.enrich_with(&incoming).unwrap();
        assert_eq!(incumbent.high_grade_position(), high);
    }

    #[test]
    fn enrich_does_not_overwrite_an_already_set_position() {
        let high = Position::from_decimal_degrees(47.0, 11.0).unwrap();
        let mut incumbent = Summit::new(Some("Beispielturm".into()), vec![], vec![], high, UNDEFINED).unwrap();

        let low = Position::from_decimal_degrees(47.00000011, 11.00000037).unwrap();
        let incoming = Summit::new(Some("Beispielturm".into()), vec![], vec![], UNDEFINED, low).unwrap();

        incumbent.enrich_with(&incoming).unwrap();
        assert_eq!(incumbent.high_grade_position(), high);
        assert_eq!(incumbent.low_grade_position(), low);
    }

    #[test]
    fn enrich_rejects_conflicting_official_names() {
        let mut incumbent = summit_with_official("Name1");
        let incoming = summit_with_official("Name2");
        let err = incumbent.enrich_with(&incoming).unwrap_err();
        assert!(matches!(err, RouteDbError::MergeConflict { attribute: "official name", .. }));
    }

    #[test]
    fn enrich_drops_alternate_equal_to_official_name_after_union() {
        let mut incumbent = Summit::new(None, vec!["Name1".into()], vec![], UNDEFINED, UNDEFINED).unwrap();
        let incoming = Summit::new(Some("Name1".into()), vec![], vec![], UNDEFINED, UNDEFINED).unwrap();

        incumbent.enrich_with(&incoming).unwrap();
        assert_eq!(incumbent.official_name(), Some("Name1"));
        assert_eq!(incumbent.alternate_names().count(), 0);
    }

    #[test]
    fn matches_requires_shared_name_and_compatible_position() {
        let a = summit_with_official("Name1");
        let far = Position::from_decimal_degrees(51.0, 13.0).unwrap();
        let b = Summit::new(Some("Name1".into()), vec![], vec![], far, UNDEFINED).unwrap();
        let c = Summit::new(Some("Name1".into()), vec![], vec![], far, UNDEFINED).unwrap();

        assert!(a.matches(&b)); // a has UNDEFINED, always compatible
        let far2 = Position::from_decimal_degrees(52.0, 13.0).unwrap();
        let d = Summit::new(Some("Name1".into()), vec![], vec![], far2, UNDEFINED).unwrap();
        assert!(!b.matches(&d)); // both set, >200m apart
        let _ = c;
    }
}
