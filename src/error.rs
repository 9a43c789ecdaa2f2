//! Error types for the advisor core
//!
//! The core has one non-terminal condition (a midpoint rating without a
//! tie-break) which is reported through `Classification::needs_evidence`,
//! not through this enum. Everything here is a caller contract violation.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisorError {
    /// Out-of-range rating or an unknown enum code
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A report was requested while the quadrant is still unresolved
    #[error("classification pending: a midpoint rating needs a tie-break direction")]
    ClassificationPending,
}

impl AdvisorError {
    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        Self::InvalidArgument(what.into())
    }
}
