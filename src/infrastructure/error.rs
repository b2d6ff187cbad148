//! Error types for list inference
//!
//! Only genuine faults live here. "No list on this page" is not an error: it is
//! reported as [`crate::domain::Extraction::NotFound`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Rejected before any traversal started (bad seeds, malformed boxes, bad selectors)
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A tree-access primitive failed, e.g. a handle that does not belong to the tree
    #[error("Tree traversal failed: {reason}")]
    TraversalFailure { reason: String },

    #[error("DOM snapshot could not be decoded: {source}")]
    Snapshot {
        #[from]
        source: serde_json::Error,
    },
}

impl ExtractionError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn traversal_failure(reason: impl Into<String>) -> Self {
        Self::TraversalFailure {
            reason: reason.into(),
        }
    }

    /// Every variant leaves the process healthy; callers may retry with other input.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidInput { .. } => true,
            Self::TraversalFailure { .. } => true,
            Self::Snapshot { .. } => true,
        }
    }

    /// Whether the extractor boundary converts this error into a not-found outcome
    pub fn is_traversal(&self) -> bool {
        matches!(self, Self::TraversalFailure { .. })
    }
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;
