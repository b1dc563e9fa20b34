//! Whole-header reads and writes.
//!
//! Reading walks every attribute of a [`Header`] and decodes it with the
//! kind its native type name is registered under. The first failure aborts
//! the walk, so callers never see a partial struct.
//!
//! Writing takes a struct of host values. Each entry is encoded with its
//! hinted kind, or with the registry's default kind for the key. All
//! entries are encoded before the header is touched: a failing entry leaves
//! the header exactly as it was.

use crate::attribute::Attribute;
use crate::codec::{decode, decode_native, encode};
use crate::error::{AttrError, AttrResult};
use crate::header::Header;
use crate::kind::AttributeKind;
use crate::registry::AttributeRegistry;
use std::collections::BTreeMap;
use tracing::{debug, trace};
use vfx_value::Value;

/// Per-key kind overrides for bulk writes.
pub type KindHints = BTreeMap<String, AttributeKind>;

/// Decodes one attribute by name.
pub fn read_attribute(header: &Header, name: &str) -> AttrResult<Value> {
    let attribute = header.get(name).ok_or_else(|| AttrError::MissingAttribute {
        name: name.to_string(),
    })?;
    decode_native(attribute)
}

/// Decodes every attribute into a struct keyed by attribute name.
pub fn read_all_attributes(header: &Header) -> AttrResult<Value> {
    let registry = AttributeRegistry::global();
    let mut fields = BTreeMap::new();
    for (name, attribute) in header.iter() {
        let kind = registry.kind_of(attribute.type_name());
        trace!(attribute = name, %kind, "decoding attribute");
        let value = decode(kind, attribute).inspect_err(|e| {
            debug!(attribute = name, error = %e, "attribute decode failed");
        })?;
        fields.insert(name.to_string(), value);
    }
    Ok(Value::Struct(fields))
}

/// Encodes and stores one attribute.
///
/// Without a kind hint the registry's default kind for `name` is used.
pub fn write_attribute(
    header: &mut Header,
    name: &str,
    value: &Value,
    kind: Option<AttributeKind>,
) -> AttrResult<()> {
    let kind = kind.unwrap_or_else(|| AttributeRegistry::global().default_kind_for(name));
    let attribute = encode(kind, value)?;
    trace!(attribute = name, %kind, "writing attribute");
    header.insert(name, attribute);
    Ok(())
}

/// Encodes and stores every entry of a struct, using default kinds.
pub fn write_all_attributes(header: &mut Header, values: &Value) -> AttrResult<()> {
    write_all_attributes_with_hints(header, values, &KindHints::new())
}

/// Encodes and stores every entry of a struct.
///
/// Keys present in `hints` use the hinted kind; the rest use the
/// registry's default. Either every entry is stored or none is.
pub fn write_all_attributes_with_hints(
    header: &mut Header,
    values: &Value,
    hints: &KindHints,
) -> AttrResult<()> {
    let fields = values.as_struct().ok_or(AttrError::ExpectedStruct {
        found: values.type_name(),
    })?;

    let registry = AttributeRegistry::global();
    let staged = fields
        .iter()
        .map(|(name, value)| {
            let kind = hints
                .get(name)
                .copied()
                .unwrap_or_else(|| registry.default_kind_for(name));
            encode(kind, value)
                .map(|attribute| (name.clone(), attribute))
                .inspect_err(|e| debug!(attribute = %name, %kind, error = %e, "attribute encode failed"))
        })
        .collect::<AttrResult<Vec<(String, Attribute)>>>()?;

    debug!(count = staged.len(), "writing attributes");
    for (name, attribute) in staged {
        header.insert(name, attribute);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Compression, V2};
    use vfx_value::NumericArray;

    fn host_struct(entries: Vec<(&str, Value)>) -> Value {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn read_all_default_header() {
        let header = Header::new(4, 3);
        let value = read_all_attributes(&header).unwrap();
        let fields = value.as_struct().unwrap();
        assert_eq!(fields.len(), header.len());
        assert_eq!(value.get("compression"), Some(&Value::from("zip")));
        assert_eq!(value.get("lineOrder"), Some(&Value::from("increasing_y")));
        assert_eq!(value.get("channels"), Some(&Value::Cell(vec![])));
        assert_eq!(value.get("screenWindowWidth"), Some(&Value::from(1.0f32)));
    }

    #[test]
    fn read_all_aborts_on_opaque() {
        let mut header = Header::new(2, 2);
        header.insert(
            "timeCode",
            Attribute::Opaque {
                type_name: "timecode".into(),
                bytes: vec![0; 8],
            },
        );
        assert_eq!(
            read_all_attributes(&header),
            Err(AttrError::UnknownAttributeKind {
                type_name: "timecode".into()
            })
        );
    }

    #[test]
    fn read_missing_attribute() {
        let header = Header::new(2, 2);
        assert_eq!(
            read_attribute(&header, "owner"),
            Err(AttrError::MissingAttribute {
                name: "owner".into()
            })
        );
    }

    #[test]
    fn write_uses_known_key_kinds() {
        let mut header = Header::new(2, 2);
        let values = host_struct(vec![
            ("gain", Value::from(2.0f32)),
            ("adoptedNeutral", Value::from(NumericArray::vector(vec![0.3f32, 0.3]))),
            ("compression", Value::from("piz")),
            ("shot", Value::from("sq010_sh020")),
        ]);
        write_all_attributes(&mut header, &values).unwrap();

        assert_eq!(header.get("gain"), Some(&Attribute::Float(2.0)));
        assert_eq!(
            header.get("adoptedNeutral"),
            Some(&Attribute::V2f(V2::new(0.3, 0.3)))
        );
        assert_eq!(header.compression(), Compression::Piz);
        assert_eq!(
            header.get("shot"),
            Some(&Attribute::String("sq010_sh020".into()))
        );
    }

    #[test]
    fn hints_override_defaults() {
        let mut header = Header::new(2, 2);
        let values = host_struct(vec![("frame", Value::from(1001i32))]);
        let mut hints = KindHints::new();
        hints.insert("frame".into(), AttributeKind::Int);
        write_all_attributes_with_hints(&mut header, &values, &hints).unwrap();
        assert_eq!(header.get("frame"), Some(&Attribute::Int(1001)));
    }

    #[test]
    fn failed_write_leaves_header_untouched() {
        let mut header = Header::new(2, 2);
        let before = header.clone();
        let values = host_struct(vec![
            ("comments", Value::from("ok")),
            ("gain", Value::from("not a float")),
            ("owner", Value::from("lab")),
        ]);
        let err = write_all_attributes(&mut header, &values).unwrap_err();
        assert!(matches!(
            err,
            AttrError::AttributeShapeMismatch {
                kind: AttributeKind::Float,
                ..
            }
        ));
        assert_eq!(header, before);
    }

    #[test]
    fn write_requires_struct() {
        let mut header = Header::new(2, 2);
        assert_eq!(
            write_all_attributes(&mut header, &Value::from("x")),
            Err(AttrError::ExpectedStruct { found: "string" })
        );
    }

    #[test]
    fn single_write_with_and_without_hint() {
        let mut header = Header::new(2, 2);
        write_attribute(&mut header, "expTime", &Value::from(0.04f32), None).unwrap();
        write_attribute(
            &mut header,
            "wrapmodes",
            &Value::from("clamp,clamp"),
            Some(AttributeKind::String),
        )
        .unwrap();
        assert_eq!(header.get("expTime"), Some(&Attribute::Float(0.04)));
        assert_eq!(read_attribute(&header, "wrapmodes").unwrap(), Value::from("clamp,clamp"));
        assert!(matches!(
            write_attribute(&mut header, "channels", &Value::Cell(vec![]), None),
            Err(AttrError::UnsupportedWrite { .. })
        ));
    }
}
