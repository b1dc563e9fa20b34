//! Error types for value construction.

use thiserror::Error;

/// Value construction error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Shape rank outside `1..=3`.
    #[error("invalid rank {rank}: numeric arrays have rank 1 to 3")]
    InvalidRank {
        /// Offending rank.
        rank: usize,
    },

    /// Element count does not match the product of the shape.
    #[error("shape {shape:?} needs {expected} elements, got {actual}")]
    LengthMismatch {
        /// Requested shape.
        shape: Vec<usize>,
        /// Element count implied by the shape.
        expected: usize,
        /// Element count supplied.
        actual: usize,
    },

    /// Serialized element does not fit the declared element type.
    #[error("element {index} is not a valid {element_type} value")]
    InvalidElement {
        /// Declared element type name.
        element_type: &'static str,
        /// Position of the offending element.
        index: usize,
    },
}

/// Result type for value construction.
pub type ValueResult<T> = Result<T, ValueError>;
