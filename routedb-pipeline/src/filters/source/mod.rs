// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Source filters (IMPORT stage)
//!
//! Only the trait boundary and two plumbing concerns — per-summit dedup and
//! a site-specific deny-list — are implemented here. Actual HTML/JSON
//! parsing of a remote source is explicitly out of scope; `teufelsturm`/
//! `geo_position` are stub producers that exist to prove the
//! `SourceFilter` shape compiles and is exercised by the engine's
//! IMPORTING stage.

pub mod geo_position;
pub mod teufelsturm;

pub use geo_position::GeoPositionSourceFilter;
pub use teufelsturm::TeufelsturmSourceFilter;

use std::collections::HashSet;
use std::sync::Mutex;

/// Per-summit dedup cache keyed by the raw observed name string, plus the
/// site-specific deny-list applied before any insertion.
pub(crate) struct ImportGuard {
    deny_list: HashSet<String>,
    seen: Mutex<HashSet<String>>,
}

impl ImportGuard {
    pub(crate) fn new(deny_list: HashSet<String>) -> Self {
        Self {
            deny_list,
            seen: Mutex::new(HashSet::new()),
        }
    }

    /// True the first time `name` is offered and it isn't denied; false on
    /// every repeat observation or denied name.
    pub(crate) fn should_insert(&self, name: &str) -> bool {
        if self.deny_list.contains(name) {
            return false;
        }
        let mut seen = self.seen.lock().expect("import guard lock poisoned");
        seen.insert(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denied_names_are_never_inserted() {
        let guard = ImportGuard::new(HashSet::from(["Forbidden".to_string()]));
        assert!(!guard.should_insert("Forbidden"));
    }

    #[test]
    fn repeated_observations_of_the_same_name_are_deduplicated() {
        let guard = ImportGuard::new(HashSet::new());
        assert!(guard.should_insert("Falkenturm"));
        assert!(!guard.should_insert("Falkenturm"));
    }
}
