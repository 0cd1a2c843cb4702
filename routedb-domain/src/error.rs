// /////////////////////////////////////////////////////////////////////////////
// routedb
// Copyright (c) 2026 The routedb Authors
// SPDX-License-Identifier: MIT
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! A single hierarchical error enum for everything that can go wrong while
//! building the route database, from a malformed upstream response down to a
//! broken internal invariant. Error kinds map directly onto the failure modes
//! named by the pipeline: entity lookups, merge conflicts, validation
//! failures, transport failures, and programmer errors.
//!
//! Each kind carries enough context (entity type, name, attribute) to log a
//! single actionable line without the caller needing to reconstruct it.

use thiserror::Error;

/// Errors recognized by the core pipeline: entity model, Pipe, merger,
/// validator, and relational sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteDbError {
    /// A parent id referenced by `add_route`/`add_post` does not exist in the
    /// Pipe. Always a programmer error inside a filter implementation.
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// Two observations of the same entity disagree on an attribute that
    /// cannot be merged automatically.
    #[error("cannot merge {entity_type} data for '{name}' because of conflicting {attribute} values")]
    MergeConflict {
        entity_type: &'static str,
        name: String,
        attribute: &'static str,
    },

    /// The validator could not repair a mandatory attribute; the owning
    /// summit subtree is dropped.
    #[error("missing '{missing_attribute}' data on {entity}")]
    IncompleteData {
        entity: String,
        missing_attribute: &'static str,
    },

    /// The transport layer (HTTP, traffic replay) failed.
    #[error("data retrieval failed: {0}")]
    DataRetrieval(String),

    /// Upstream data could not be parsed into the expected shape.
    #[error("data processing failed: {0}")]
    DataProcessing(String),

    /// A string value (e.g. a grade or rating) has an invalid format.
    #[error("value '{invalid_value}' is not a valid {value_type}")]
    ValueParse {
        value_type: &'static str,
        invalid_value: String,
    },

    /// A precondition of an internal API was violated (e.g. an operation
    /// issued against an unconnected database). Always a programmer error.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl RouteDbError {
    pub fn entity_not_found(object_name: impl Into<String>) -> Self {
        Self::EntityNotFound(object_name.into())
    }

    pub fn merge_conflict(entity_type: &'static str, name: impl Into<String>, attribute: &'static str) -> Self {
        Self::MergeConflict {
            entity_type,
            name: name.into(),
            attribute,
        }
    }

    pub fn incomplete_data(entity: impl Into<String>, missing_attribute: &'static str) -> Self {
        Self::IncompleteData {
            entity: entity.into(),
            missing_attribute,
        }
    }

    pub fn value_parse(value_type: &'static str, invalid_value: impl Into<String>) -> Self {
        Self::ValueParse {
            value_type,
            invalid_value: invalid_value.into(),
        }
    }

    pub fn data_retrieval(msg: impl Into<String>) -> Self {
        Self::DataRetrieval(msg.into())
    }

    pub fn data_processing(msg: impl Into<String>) -> Self {
        Self::DataProcessing(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// True for the handful of kinds a source filter may catch per-record
    /// and log rather than letting abort the whole stage.
    pub fn is_record_skippable(&self) -> bool {
        matches!(self, Self::DataProcessing(_) | Self::ValueParse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_conflict_message_names_entity_and_attribute() {
        let err = RouteDbError::merge_conflict("summit", "Falkenturm", "position");
        assert_eq!(
            err.to_string(),
            "cannot merge summit data for 'Falkenturm' because of conflicting position values"
        );
    }

    #[test]
    fn data_processing_is_record_skippable() {
        assert!(RouteDbError::DataProcessing("bad html".into()).is_record_skippable());
        assert!(!RouteDbError::EntityNotFound("x".into()).is_record_skippable());
    }
}
