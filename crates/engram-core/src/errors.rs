//! Error taxonomy for the Engram memory store.
//!
//! Validation and conflict errors are raised before any mutation; storage
//! errors abort the operation in progress with the transaction rolled back.

use crate::record::MemoryStatus;

/// Result alias used across the workspace.
pub type EngramResult<T> = Result<T, EngramError>;

#[derive(Debug, thiserror::Error)]
pub enum EngramError {
    /// Input rejected at the boundary. The store is left unchanged.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// No record with the given id (or no match for a forget-by-query).
    #[error("memory not found: {id}")]
    NotFound { id: String },

    /// A forget-by-query matched more than one active record.
    /// The caller must re-issue with a disambiguated id.
    #[error("query matched {} memories, expected exactly one", matches.len())]
    AmbiguousTarget { matches: Vec<String> },

    /// Attempt to move a record out of a terminal status.
    #[error("memory {id} is {current} and cannot transition to {requested}")]
    ConflictingTransition {
        id: String,
        current: MemoryStatus,
        requested: MemoryStatus,
    },

    /// A consolidation pass is already running.
    #[error("consolidation already in progress")]
    ConsolidationBusy,

    /// SQLite or serialization failure.
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl EngramError {
    /// Shorthand for a validation error on a named field.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_field_and_reason() {
        let err = EngramError::validation("importance", "must be within [0.0, 1.0]");
        assert_eq!(err.to_string(), "invalid importance: must be within [0.0, 1.0]");
    }

    #[test]
    fn conflicting_transition_names_both_statuses() {
        let err = EngramError::ConflictingTransition {
            id: "m1".to_string(),
            current: MemoryStatus::Retired,
            requested: MemoryStatus::Active,
        };
        assert!(err.to_string().contains("retired"));
        assert!(err.to_string().contains("active"));
    }
}
