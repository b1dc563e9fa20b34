//! Attribute codec: native attributes <-> host values.
//!
//! | kind | host value (canonical shape) |
//! |------|------------------------------|
//! | `box2f` / `box2i` | cell `{min, max}`, each a `[2]` float32 / int32 array |
//! | `chlist` | cell of channel name strings (read only) |
//! | `chromaticities` | struct `{red, green, blue, white}`, each `[2]` float32 |
//! | `compression`, `lineOrder`, `envmap` | token string |
//! | `double` / `float` / `int` | `[1]` float64 / float32 / int32 |
//! | `floatvector` / `intvector` | `[n]` float32 / int32 |
//! | `string` | string |
//! | `v2f` / `v2i` | `[2]` float32 / int32 |
//!
//! [`encode`] validates the host value completely before building the
//! attribute; it counts elements, so a `[1, 2]` array is accepted where a
//! `[2]` one is expected. For every writable kind and canonical value,
//! `decode(kind, &encode(kind, &v)?)? == v`.

use crate::attribute::Attribute;
use crate::error::{AttrError, AttrResult};
use crate::kind::AttributeKind;
use crate::registry::{AttributeRegistry, UNKNOWN_TYPE_NAME};
use crate::tables::TokenEnum;
use crate::types::{Box2, Chromaticities, Compression, Envmap, LineOrder, V2};
use std::collections::BTreeMap;
use vfx_value::{Element, NumericArray, Value};

/// Chromaticities struct field names, in primaries order.
pub const CHROMATICITY_KEYS: [&str; 4] = ["red", "green", "blue", "white"];

/// Decodes a native attribute as `kind`.
///
/// `Invalid` fails with [`AttrError::UnknownAttributeKind`] naming the
/// attribute's native type; a kind that does not match the attribute's
/// representation fails with [`AttrError::AttributeTypeMismatch`].
pub fn decode(kind: AttributeKind, attribute: &Attribute) -> AttrResult<Value> {
    use AttributeKind as K;

    let value = match (kind, attribute) {
        (K::Box2f, Attribute::Box2f(b)) => box_value(b),
        (K::Box2i, Attribute::Box2i(b)) => box_value(b),
        (K::ChannelList, Attribute::ChannelList(list)) => {
            Value::Cell(list.names().map(Value::from).collect())
        }
        (K::Chromaticities, Attribute::Chromaticities(c)) => chromaticities_value(c),
        (K::Compression, Attribute::Compression(c)) => Value::from(c.to_token()),
        (K::Double, Attribute::Double(v)) => Value::from(*v),
        (K::Envmap, Attribute::Envmap(e)) => Value::from(e.to_token()),
        (K::Float, Attribute::Float(v)) => Value::from(*v),
        (K::FloatVector, Attribute::FloatVector(v)) => NumericArray::vector(v.clone()).into(),
        (K::Int, Attribute::Int(v)) => Value::from(*v),
        (K::IntVector, Attribute::IntVector(v)) => NumericArray::vector(v.clone()).into(),
        (K::LineOrder, Attribute::LineOrder(order)) => Value::from(order.to_token()),
        (K::String, Attribute::String(s)) => Value::from(s.as_str()),
        (K::V2f, Attribute::V2f(v)) => v2_value(v),
        (K::V2i, Attribute::V2i(v)) => v2_value(v),
        (K::Invalid, _) => {
            return Err(AttrError::UnknownAttributeKind {
                type_name: attribute.type_name().to_string(),
            });
        }
        _ => {
            return Err(AttrError::AttributeTypeMismatch {
                kind,
                found: attribute.type_name().to_string(),
            });
        }
    };
    Ok(value)
}

/// Decodes a native attribute using the kind registered for its type name.
pub fn decode_native(attribute: &Attribute) -> AttrResult<Value> {
    decode(AttributeRegistry::global().kind_of(attribute.type_name()), attribute)
}

/// Encodes a host value as a native attribute of `kind`.
///
/// Fails with [`AttrError::AttributeShapeMismatch`] when the value does not
/// fit the kind, [`AttrError::UnsupportedWrite`] for channel lists and
/// [`AttrError::UnknownAttributeKind`] for `Invalid`.
pub fn encode(kind: AttributeKind, value: &Value) -> AttrResult<Attribute> {
    use AttributeKind as K;

    let attribute = match kind {
        K::Box2f => Attribute::Box2f(box_from(kind, value)?),
        K::Box2i => Attribute::Box2i(box_from(kind, value)?),
        K::ChannelList => return Err(AttrError::UnsupportedWrite { kind }),
        K::Chromaticities => Attribute::Chromaticities(chromaticities_from(value)?),
        K::Compression => Attribute::Compression(Compression::from_token(token(kind, value)?)?),
        K::Double => Attribute::Double(scalar(kind, value)?),
        K::Envmap => Attribute::Envmap(Envmap::from_token(token(kind, value)?)?),
        K::Float => Attribute::Float(scalar(kind, value)?),
        K::FloatVector => Attribute::FloatVector(elements(kind, value, None)?.to_vec()),
        K::Int => Attribute::Int(scalar(kind, value)?),
        K::IntVector => Attribute::IntVector(elements(kind, value, None)?.to_vec()),
        K::LineOrder => Attribute::LineOrder(LineOrder::from_token(token(kind, value)?)?),
        K::String => Attribute::String(
            value
                .as_str()
                .ok_or_else(|| shape_mismatch(kind, "a string".into(), value))?
                .to_string(),
        ),
        K::V2f => Attribute::V2f(v2_from(kind, value)?),
        K::V2i => Attribute::V2i(v2_from(kind, value)?),
        K::Invalid => {
            return Err(AttrError::UnknownAttributeKind {
                type_name: UNKNOWN_TYPE_NAME.to_string(),
            });
        }
    };
    Ok(attribute)
}

// === decode helpers ===

fn v2_value<T: Element>(v: &V2<T>) -> Value {
    NumericArray::vector(vec![v.x, v.y]).into()
}

fn box_value<T: Element>(b: &Box2<T>) -> Value {
    Value::Cell(vec![v2_value(&b.min), v2_value(&b.max)])
}

fn chromaticities_value(c: &Chromaticities) -> Value {
    let points = [c.red, c.green, c.blue, c.white];
    CHROMATICITY_KEYS
        .iter()
        .zip(points.iter())
        .map(|(key, point)| (key.to_string(), v2_value(point)))
        .collect()
}

// === encode helpers ===

fn describe(value: &Value) -> String {
    match value {
        Value::Numeric(n) => {
            let dims: Vec<String> = n.shape().iter().map(|d| d.to_string()).collect();
            format!("{} array of shape [{}]", n.element_type(), dims.join(", "))
        }
        Value::Str(_) => "a string".to_string(),
        Value::Cell(items) => format!("a cell of {} items", items.len()),
        Value::Struct(_) => "a struct".to_string(),
    }
}

fn shape_mismatch(kind: AttributeKind, expected: String, value: &Value) -> AttrError {
    AttrError::AttributeShapeMismatch {
        kind,
        expected,
        found: describe(value),
    }
}

/// Elements of a numeric value of type `T`, optionally with an exact count.
fn elements<T: Element>(kind: AttributeKind, value: &Value, count: Option<usize>) -> AttrResult<&[T]> {
    let expected = || match count {
        Some(n) => format!("{} {} element(s)", n, T::TYPE),
        None => format!("a {} array", T::TYPE),
    };
    let values = value
        .as_slice::<T>()
        .ok_or_else(|| shape_mismatch(kind, expected(), value))?;
    match count {
        Some(n) if values.len() != n => Err(shape_mismatch(kind, expected(), value)),
        _ => Ok(values),
    }
}

fn scalar<T: Element>(kind: AttributeKind, value: &Value) -> AttrResult<T> {
    Ok(elements::<T>(kind, value, Some(1))?[0])
}

fn v2_from<T: Element>(kind: AttributeKind, value: &Value) -> AttrResult<V2<T>> {
    match elements::<T>(kind, value, Some(2))? {
        &[x, y] => Ok(V2::new(x, y)),
        _ => Err(shape_mismatch(kind, format!("2 {} element(s)", T::TYPE), value)),
    }
}

fn box_from<T: Element>(kind: AttributeKind, value: &Value) -> AttrResult<Box2<T>> {
    match value.as_cell() {
        Some([min, max]) => Ok(Box2::new(v2_from(kind, min)?, v2_from(kind, max)?)),
        _ => Err(shape_mismatch(
            kind,
            format!("a cell of two 2-element {} arrays", T::TYPE),
            value,
        )),
    }
}

fn chromaticities_from(value: &Value) -> AttrResult<Chromaticities> {
    let kind = AttributeKind::Chromaticities;
    let fields: &BTreeMap<String, Value> = value.as_struct().ok_or_else(|| {
        shape_mismatch(
            kind,
            "a struct with red, green, blue and white".into(),
            value,
        )
    })?;
    let point = |key: &str| -> AttrResult<V2<f32>> {
        let field = fields.get(key).ok_or_else(|| AttrError::AttributeShapeMismatch {
            kind,
            expected: format!("a '{key}' field"),
            found: "a struct without it".into(),
        })?;
        v2_from(kind, field)
    };
    Ok(Chromaticities {
        red: point("red")?,
        green: point("green")?,
        blue: point("blue")?,
        white: point("white")?,
    })
}

fn token(kind: AttributeKind, value: &Value) -> AttrResult<&str> {
    value
        .as_str()
        .ok_or_else(|| shape_mismatch(kind, "a token string".into(), value))
}
