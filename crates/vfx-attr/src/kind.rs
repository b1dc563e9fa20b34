//! The closed set of attribute kinds.

use crate::error::{AttrError, AttrResult};
use crate::registry::AttributeRegistry;
use std::fmt;
use std::str::FromStr;

/// Kind of a native attribute.
///
/// `Invalid` stands for any native type outside the supported set. It is
/// what the registry answers for unknown type names and is never the kind
/// of a constructible attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKind {
    /// `box2f`
    Box2f,
    /// `box2i`
    Box2i,
    /// `chlist`
    ChannelList,
    /// `chromaticities`
    Chromaticities,
    /// `compression`
    Compression,
    /// `double`
    Double,
    /// `envmap`
    Envmap,
    /// `float`
    Float,
    /// `floatvector`
    FloatVector,
    /// `int`
    Int,
    /// `intvector`
    IntVector,
    /// `lineOrder`
    LineOrder,
    /// `string`
    String,
    /// `v2f`
    V2f,
    /// `v2i`
    V2i,
    /// Unrecognized native type.
    Invalid,
}

impl AttributeKind {
    /// Every kind, `Invalid` last.
    pub const ALL: [AttributeKind; 16] = [
        AttributeKind::Box2f,
        AttributeKind::Box2i,
        AttributeKind::ChannelList,
        AttributeKind::Chromaticities,
        AttributeKind::Compression,
        AttributeKind::Double,
        AttributeKind::Envmap,
        AttributeKind::Float,
        AttributeKind::FloatVector,
        AttributeKind::Int,
        AttributeKind::IntVector,
        AttributeKind::LineOrder,
        AttributeKind::String,
        AttributeKind::V2f,
        AttributeKind::V2i,
        AttributeKind::Invalid,
    ];

    /// Native type name, `"unknown"` for `Invalid`.
    pub fn type_name(self) -> &'static str {
        AttributeRegistry::global().type_name_of(self)
    }

    /// True for kinds that can be built from a host value.
    pub fn is_writable(self) -> bool {
        !matches!(self, AttributeKind::ChannelList | AttributeKind::Invalid)
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Parses a native type name.
///
/// ```rust
/// use vfx_attr::AttributeKind;
///
/// assert_eq!("v2f".parse::<AttributeKind>().unwrap(), AttributeKind::V2f);
/// assert!("m44f".parse::<AttributeKind>().is_err());
/// ```
impl FromStr for AttributeKind {
    type Err = AttrError;

    fn from_str(s: &str) -> AttrResult<Self> {
        match AttributeRegistry::global().kind_of(s) {
            AttributeKind::Invalid => Err(AttrError::UnknownAttributeKind {
                type_name: s.to_string(),
            }),
            kind => Ok(kind),
        }
    }
}
