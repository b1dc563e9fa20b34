//! Native header attributes.

use crate::kind::AttributeKind;
use crate::types::{Box2f, Box2i, ChannelList, Chromaticities, Compression, Envmap, LineOrder, V2f, V2i};

/// One native header attribute.
///
/// Every supported kind has a variant. Attributes whose native type is
/// outside the supported set are carried as [`Attribute::Opaque`], keeping
/// their raw payload so they can be copied between files unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// Float box.
    Box2f(Box2f),
    /// Integer box.
    Box2i(Box2i),
    /// Channel descriptors.
    ChannelList(ChannelList),
    /// Primaries and white point.
    Chromaticities(Chromaticities),
    /// Compression method.
    Compression(Compression),
    /// 64-bit float.
    Double(f64),
    /// Environment map layout.
    Envmap(Envmap),
    /// 32-bit float.
    Float(f32),
    /// List of 32-bit floats.
    FloatVector(Vec<f32>),
    /// 32-bit integer.
    Int(i32),
    /// List of 32-bit integers.
    IntVector(Vec<i32>),
    /// Scanline order.
    LineOrder(LineOrder),
    /// Text.
    String(String),
    /// Float 2D vector.
    V2f(V2f),
    /// Integer 2D vector.
    V2i(V2i),
    /// Attribute of an unsupported native type.
    Opaque {
        /// Native type name, e.g. `timecode`.
        type_name: String,
        /// Raw serialized payload.
        bytes: Vec<u8>,
    },
}

impl Attribute {
    /// Kind of the variant. Opaque attributes are `Invalid`.
    pub fn kind(&self) -> AttributeKind {
        match self {
            Attribute::Box2f(_) => AttributeKind::Box2f,
            Attribute::Box2i(_) => AttributeKind::Box2i,
            Attribute::ChannelList(_) => AttributeKind::ChannelList,
            Attribute::Chromaticities(_) => AttributeKind::Chromaticities,
            Attribute::Compression(_) => AttributeKind::Compression,
            Attribute::Double(_) => AttributeKind::Double,
            Attribute::Envmap(_) => AttributeKind::Envmap,
            Attribute::Float(_) => AttributeKind::Float,
            Attribute::FloatVector(_) => AttributeKind::FloatVector,
            Attribute::Int(_) => AttributeKind::Int,
            Attribute::IntVector(_) => AttributeKind::IntVector,
            Attribute::LineOrder(_) => AttributeKind::LineOrder,
            Attribute::String(_) => AttributeKind::String,
            Attribute::V2f(_) => AttributeKind::V2f,
            Attribute::V2i(_) => AttributeKind::V2i,
            Attribute::Opaque { .. } => AttributeKind::Invalid,
        }
    }

    /// Native type name as stored in the file.
    pub fn type_name(&self) -> &str {
        match self {
            Attribute::Opaque { type_name, .. } => type_name,
            other => other.kind().type_name(),
        }
    }

    /// Tries to get as string reference.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Attribute::String(s) => Some(s),
            _ => None,
        }
    }

    /// Tries to get as f32.
    #[inline]
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Attribute::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Tries to get as integer box.
    #[inline]
    pub fn as_box2i(&self) -> Option<&Box2i> {
        match self {
            Attribute::Box2i(b) => Some(b),
            _ => None,
        }
    }

    /// Tries to get as channel list.
    #[inline]
    pub fn as_channel_list(&self) -> Option<&ChannelList> {
        match self {
            Attribute::ChannelList(list) => Some(list),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        assert_eq!(Attribute::Float(1.0).type_name(), "float");
        assert_eq!(Attribute::LineOrder(LineOrder::IncreasingY).type_name(), "lineOrder");
        assert_eq!(Attribute::ChannelList(ChannelList::default()).type_name(), "chlist");
        let opaque = Attribute::Opaque {
            type_name: "timecode".into(),
            bytes: vec![0; 8],
        };
        assert_eq!(opaque.type_name(), "timecode");
        assert_eq!(opaque.kind(), AttributeKind::Invalid);
    }
}
