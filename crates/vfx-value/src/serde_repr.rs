//! Serialized form of [`NumericArray`].
//!
//! ```json
//! {"type": "float32", "shape": [2], "data": [0.64, 0.33]}
//! ```

use crate::error::ValueError;
use crate::numeric::{ElementType, NumericArray, NumericData};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumericRepr {
    #[serde(rename = "type")]
    element_type: ElementType,
    shape: Vec<usize>,
    data: Vec<Scalar>,
}

// Untagged deserialization stops at `Float`, so `Single` only appears on output.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Single(f32),
}

impl From<NumericArray> for NumericRepr {
    fn from(array: NumericArray) -> Self {
        let shape = array.shape().to_vec();
        let element_type = array.element_type();
        let data = match array.into_data() {
            NumericData::Bool(v) => v.into_iter().map(Scalar::Bool).collect(),
            NumericData::Int32(v) => v.into_iter().map(|x| Scalar::Int(x.into())).collect(),
            NumericData::Float32(v) => v.into_iter().map(Scalar::Single).collect(),
            NumericData::Float64(v) => v.into_iter().map(Scalar::Float).collect(),
        };
        Self {
            element_type,
            shape,
            data,
        }
    }
}

impl TryFrom<NumericRepr> for NumericArray {
    type Error = ValueError;

    fn try_from(repr: NumericRepr) -> Result<Self, Self::Error> {
        let element_type = repr.element_type;
        let invalid = |index| ValueError::InvalidElement {
            element_type: element_type.name(),
            index,
        };
        let values = repr.data.into_iter().enumerate();
        let data = match element_type {
            ElementType::Bool => NumericData::Bool(
                values
                    .map(|(i, s)| match s {
                        Scalar::Bool(b) => Ok(b),
                        _ => Err(invalid(i)),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            ElementType::Int32 => NumericData::Int32(
                values
                    .map(|(i, s)| match s {
                        Scalar::Int(v) => i32::try_from(v).map_err(|_| invalid(i)),
                        _ => Err(invalid(i)),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            ElementType::Float32 => NumericData::Float32(
                values
                    .map(|(i, s)| match s {
                        Scalar::Int(v) => Ok(v as f32),
                        Scalar::Float(v) => Ok(v as f32),
                        Scalar::Single(v) => Ok(v),
                        Scalar::Bool(_) => Err(invalid(i)),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            ElementType::Float64 => NumericData::Float64(
                values
                    .map(|(i, s)| match s {
                        Scalar::Int(v) => Ok(v as f64),
                        Scalar::Float(v) => Ok(v),
                        Scalar::Single(v) => Ok(v.into()),
                        Scalar::Bool(_) => Err(invalid(i)),
                    })
                    .collect::<Result<_, _>>()?,
            ),
        };
        NumericArray::new(&repr.shape, data)
    }
}
