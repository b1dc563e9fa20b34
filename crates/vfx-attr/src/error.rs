//! Error types for attribute coding.
//!
//! Every failure of the codec, the registry lookups and the header walker
//! is an [`AttrError`]. Nothing is retried: the caller sees the first
//! failure and the operation that produced it has no effect.

use crate::kind::AttributeKind;
use thiserror::Error;

/// Attribute coding error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttrError {
    /// Native type name outside the supported set.
    #[error("unknown attribute type '{type_name}'")]
    UnknownAttributeKind {
        /// Native type name of the offending attribute.
        type_name: String,
    },

    /// Native attribute does not hold the representation of the requested kind.
    #[error("attribute of type '{found}' cannot be read as {kind}")]
    AttributeTypeMismatch {
        /// Requested kind.
        kind: AttributeKind,
        /// Native type name actually found.
        found: String,
    },

    /// Host value has the wrong shape or element type for the kind.
    #[error("{kind} attribute expects {expected}, got {found}")]
    AttributeShapeMismatch {
        /// Target kind.
        kind: AttributeKind,
        /// Expected shape, in words.
        expected: String,
        /// Description of the supplied value.
        found: String,
    },

    /// Kind cannot be written from a host value.
    #[error("{kind} attributes cannot be written directly")]
    UnsupportedWrite {
        /// Offending kind.
        kind: AttributeKind,
    },

    /// Token not present in an enumeration table.
    #[error("unrecognized {enumeration} token '{token}'")]
    UnrecognizedEnumToken {
        /// Enumeration name.
        enumeration: &'static str,
        /// Offending token.
        token: String,
    },

    /// Header has no attribute of that name.
    #[error("missing attribute '{name}'")]
    MissingAttribute {
        /// Requested attribute name.
        name: String,
    },

    /// Bulk write input is not a struct.
    #[error("attribute set must be a struct, got {found}")]
    ExpectedStruct {
        /// Type name of the supplied value.
        found: &'static str,
    },

    /// Header content is inconsistent.
    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

/// Result type for attribute coding.
pub type AttrResult<T> = Result<T, AttrError>;
