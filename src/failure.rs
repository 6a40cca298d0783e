//! Failure classification shared by all service errors.
//!
//! Service errors carry precise variants for callers that branch on them.
//! Presentation layers instead use [`FailureKind`] and the user-facing
//! message, which never echoes backend error text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse category of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A referenced task or sprint does not exist.
    NotFound,
    /// The operation is not allowed in the current task or sprint state.
    InvalidState,
    /// Submitted values failed validation.
    InvalidInput,
    /// The backing store could not be reached; the caller may retry.
    Unavailable,
    /// No authenticated identity is available.
    Unauthenticated,
}

impl FailureKind {
    /// Returns the canonical machine-readable representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidState => "invalid_state",
            Self::InvalidInput => "invalid_input",
            Self::Unavailable => "unavailable",
            Self::Unauthenticated => "unauthenticated",
        }
    }

    /// Returns a human-readable message describing the category.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::NotFound => "The requested item could not be found.",
            Self::InvalidState => "This change is not allowed in the item's current state.",
            Self::InvalidInput => "Some of the submitted values are invalid.",
            Self::Unavailable => {
                "The project store is temporarily unavailable. Please try again."
            }
            Self::Unauthenticated => "You need to sign in before making changes.",
        }
    }

    /// Returns whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
