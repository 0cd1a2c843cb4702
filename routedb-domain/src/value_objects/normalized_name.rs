// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # NormalizedName Value Object
//!
//! A derived string identity used to equate differently-spelled observations
//! of the same summit name. The normalization deliberately loses
//! information: stripping non-ASCII bytes collapses accented variants
//! ("Müller" and "Mller" collide). This is the upstream source's behavior,
//! exploited by the merge predicate, and must not be "improved" — doing so
//! would silently change which summits the merger treats as the same
//! physical rock.

use std::fmt;

/// The canonical derived identity of a summit name.
///
/// Two [`NormalizedName`]s are equal iff their derived strings are equal.
/// Construction is infallible: any input string produces *some* normalized
/// name, including the empty string for input that is all whitespace or
/// punctuation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName(String);

impl NormalizedName {
    /// Derives the normalized identity of `raw`:
    /// 1. lowercase
    /// 2. drop every byte outside printable ASCII (`0x20..=0x7E`)
    /// 3. replace ASCII punctuation with spaces
    /// 4. split on whitespace, sort segments, rejoin with `_`
    pub fn new(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        let printable_ascii: String = lowered.chars().filter(|c| c.is_ascii() && !c.is_ascii_control()).collect();
        let despunctuated: String = printable_ascii
            .chars()
            .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
            .collect();

        let mut segments: Vec<&str> = despunctuated.split_whitespace().collect();
        segments.sort_unstable();
        Self(segments.join("_"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NormalizedName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
