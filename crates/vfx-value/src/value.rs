//! Dynamic value tree.
//!
//! [`Value`] is what a host hands to, and receives from, the attribute
//! codec: numeric arrays, strings, heterogeneous cell lists and
//! string-keyed structs.
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use vfx_value::{NumericArray, Value};
//!
//! let mut chroma = BTreeMap::new();
//! chroma.insert("white".to_string(), Value::from(NumericArray::vector(vec![0.3127f32, 0.3290])));
//! let value = Value::Struct(chroma);
//!
//! assert_eq!(value.type_name(), "struct");
//! assert!(value.get("white").is_some());
//! ```

use crate::numeric::{Element, NumericArray};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Dynamically typed host value.
///
/// Serialized untagged: numeric arrays as `{"type", "shape", "data"}`
/// objects, strings as strings, cells as arrays and structs as objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[must_use]
pub enum Value {
    /// Typed numeric array, scalars included.
    Numeric(NumericArray),

    /// UTF-8 string.
    Str(String),

    /// Ordered heterogeneous list.
    Cell(Vec<Value>),

    /// String-keyed record, ordered by key.
    Struct(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the type name for error messages and debugging.
    ///
    /// Numeric arrays report their element type.
    ///
    /// ```rust
    /// use vfx_value::Value;
    ///
    /// assert_eq!(Value::from(1i32).type_name(), "int32");
    /// assert_eq!(Value::from("zip").type_name(), "string");
    /// ```
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Numeric(n) => n.element_type().name(),
            Value::Str(_) => "string",
            Value::Cell(_) => "cell",
            Value::Struct(_) => "struct",
        }
    }

    /// Tries to get as numeric array reference.
    #[inline]
    pub fn as_numeric(&self) -> Option<&NumericArray> {
        match self {
            Value::Numeric(n) => Some(n),
            _ => None,
        }
    }

    /// Tries to get as string reference.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Tries to get as cell list.
    #[inline]
    pub fn as_cell(&self) -> Option<&[Value]> {
        match self {
            Value::Cell(items) => Some(items),
            _ => None,
        }
    }

    /// Tries to get as struct map.
    #[inline]
    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Struct field lookup. `None` for missing keys and non-struct values.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_struct()?.get(key)
    }

    /// Typed view of a numeric value.
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        self.as_numeric()?.as_slice()
    }
}

impl From<NumericArray> for Value {
    fn from(v: NumericArray) -> Self {
        Value::Numeric(v)
    }
}

macro_rules! scalar_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Numeric(NumericArray::scalar(v))
                }
            }
        )*
    };
}

scalar_from!(bool, i32, f32, f64);

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Cell(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Struct(v)
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Value::Struct(iter.into_iter().collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Numeric(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Cell(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "}}")
            }
            Value::Struct(fields) => {
                write!(f, "{{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_conversions() {
        assert_eq!(Value::from(2.0f64).as_slice::<f64>(), Some(&[2.0][..]));
        assert_eq!(Value::from(true).type_name(), "bool");
        assert_eq!(Value::from(3i32).as_slice::<f32>(), None);
    }

    #[test]
    fn struct_access() {
        let value: Value = [("owner".to_string(), Value::from("lab"))]
            .into_iter()
            .collect();
        assert_eq!(value.get("owner").and_then(Value::as_str), Some("lab"));
        assert_eq!(value.get("missing"), None);
        assert_eq!(Value::from("x").get("owner"), None);
    }

    #[test]
    fn display() {
        let cell = Value::Cell(vec![Value::from("R"), Value::from("G")]);
        assert_eq!(cell.to_string(), "{R, G}");
        let rec: Value = [
            ("a".to_string(), Value::from(1i32)),
            ("b".to_string(), Value::from(NumericArray::vector(vec![1.5f32, 2.0]))),
        ]
        .into_iter()
        .collect();
        assert_eq!(rec.to_string(), "{a: 1, b: [1.5, 2]}");
    }
}
