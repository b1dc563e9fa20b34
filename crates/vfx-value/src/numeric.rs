//! Shaped numeric arrays.
//!
//! [`NumericArray`] pairs a [`Shape`] with homogeneous [`NumericData`].
//! Construction validates the shape, so every array in circulation has a
//! rank in `1..=3` and exactly `product(shape)` elements.

use crate::error::{ValueError, ValueResult};
use crate::serde_repr::NumericRepr;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Highest supported rank.
pub const MAX_RANK: usize = 3;

/// Array shape, one extent per axis.
pub type Shape = SmallVec<[usize; MAX_RANK]>;

/// Element type of a numeric array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Logical values.
    Bool,
    /// Signed 32-bit integers.
    Int32,
    /// 32-bit floats.
    Float32,
    /// 64-bit floats.
    Float64,
}

impl ElementType {
    /// Lowercase name, as used in the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            ElementType::Bool => "bool",
            ElementType::Int32 => "int32",
            ElementType::Float32 => "float32",
            ElementType::Float64 => "float64",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Flat element storage of a numeric array.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericData {
    /// Logical values.
    Bool(Vec<bool>),
    /// Signed 32-bit integers.
    Int32(Vec<i32>),
    /// 32-bit floats.
    Float32(Vec<f32>),
    /// 64-bit floats.
    Float64(Vec<f64>),
}

impl NumericData {
    /// Number of stored elements.
    pub fn len(&self) -> usize {
        match self {
            NumericData::Bool(v) => v.len(),
            NumericData::Int32(v) => v.len(),
            NumericData::Float32(v) => v.len(),
            NumericData::Float64(v) => v.len(),
        }
    }

    /// Returns true when no elements are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type of the storage.
    pub fn element_type(&self) -> ElementType {
        match self {
            NumericData::Bool(_) => ElementType::Bool,
            NumericData::Int32(_) => ElementType::Int32,
            NumericData::Float32(_) => ElementType::Float32,
            NumericData::Float64(_) => ElementType::Float64,
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for bool {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Rust types that can be stored in a [`NumericArray`].
///
/// Sealed: implemented for `bool`, `i32`, `f32` and `f64` only.
pub trait Element: sealed::Sealed + Copy + fmt::Debug + 'static {
    /// Element type tag for this Rust type.
    const TYPE: ElementType;

    #[doc(hidden)]
    fn slice_of(data: &NumericData) -> Option<&[Self]>;

    #[doc(hidden)]
    fn into_data(values: Vec<Self>) -> NumericData;

    #[doc(hidden)]
    fn vec_of(data: NumericData) -> Option<Vec<Self>>;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident) => {
        impl Element for $ty {
            const TYPE: ElementType = ElementType::$variant;

            fn slice_of(data: &NumericData) -> Option<&[Self]> {
                match data {
                    NumericData::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn into_data(values: Vec<Self>) -> NumericData {
                NumericData::$variant(values)
            }

            fn vec_of(data: NumericData) -> Option<Vec<Self>> {
                match data {
                    NumericData::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(bool, Bool);
impl_element!(i32, Int32);
impl_element!(f32, Float32);
impl_element!(f64, Float64);

/// Typed numeric array with an explicit shape of rank 1 to 3.
///
/// # Example
///
/// ```rust
/// use vfx_value::{ElementType, NumericArray};
///
/// let white = NumericArray::vector(vec![0.3127f32, 0.3290]);
/// assert_eq!(white.shape(), &[2]);
/// assert_eq!(white.element_type(), ElementType::Float32);
/// assert_eq!(white.as_slice::<f32>(), Some(&[0.3127f32, 0.3290][..]));
/// assert_eq!(white.as_slice::<i32>(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NumericRepr", into = "NumericRepr")]
pub struct NumericArray {
    shape: Shape,
    data: NumericData,
}

impl NumericArray {
    /// Creates an array, validating rank and element count.
    pub fn new(shape: &[usize], data: NumericData) -> ValueResult<Self> {
        if shape.is_empty() || shape.len() > MAX_RANK {
            return Err(ValueError::InvalidRank { rank: shape.len() });
        }
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(ValueError::LengthMismatch {
                shape: shape.to_vec(),
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            shape: Shape::from_slice(shape),
            data,
        })
    }

    /// Creates an array from a typed vector.
    pub fn from_vec<T: Element>(shape: &[usize], values: Vec<T>) -> ValueResult<Self> {
        Self::new(shape, T::into_data(values))
    }

    /// Creates a shape `[1]` array.
    pub fn scalar<T: Element>(value: T) -> Self {
        Self {
            shape: Shape::from_slice(&[1]),
            data: T::into_data(vec![value]),
        }
    }

    /// Creates a shape `[n]` array.
    pub fn vector<T: Element>(values: Vec<T>) -> Self {
        Self {
            shape: Shape::from_slice(&[values.len()]),
            data: T::into_data(values),
        }
    }

    /// Extent along each axis.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total element count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true when the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element type of the array.
    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    /// Underlying storage.
    pub fn data(&self) -> &NumericData {
        &self.data
    }

    /// Consumes the array, returning its storage.
    pub fn into_data(self) -> NumericData {
        self.data
    }

    /// Typed view of the elements, `None` on element type mismatch.
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice_of(&self.data)
    }

    /// Consumes the array into a typed vector, `None` on element type mismatch.
    pub fn into_vec<T: Element>(self) -> Option<Vec<T>> {
        T::vec_of(self.data)
    }

    /// The single element of a one-element array.
    pub fn scalar_value<T: Element>(&self) -> Option<T> {
        match self.as_slice::<T>()? {
            [v] => Some(*v),
            _ => None,
        }
    }

    /// Contiguous rank-2 slab `index` along the third axis.
    ///
    /// Arrays of rank 1 or 2 consist of a single slab.
    pub fn slab<T: Element>(&self, index: usize) -> Option<&[T]> {
        let values = self.as_slice::<T>()?;
        let slabs = if self.rank() == 3 { self.shape[2] } else { 1 };
        if index >= slabs {
            return None;
        }
        let slab_len = values.len() / slabs.max(1);
        values.get(index * slab_len..(index + 1) * slab_len)
    }
}

impl fmt::Display for NumericArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
            if values.len() == 1 {
                return write!(f, "{}", values[0]);
            }
            write!(f, "[")?;
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", v)?;
            }
            write!(f, "]")
        }

        if self.rank() > 1 || self.len() > 16 {
            let dims: Vec<String> = self.shape.iter().map(|d| d.to_string()).collect();
            return write!(f, "<{} {}>", self.element_type(), dims.join("x"));
        }
        match &self.data {
            NumericData::Bool(v) => list(f, v),
            NumericData::Int32(v) => list(f, v),
            NumericData::Float32(v) => list(f, v),
            NumericData::Float64(v) => list(f, v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_is_validated() {
        assert_eq!(
            NumericArray::from_vec::<f32>(&[], vec![]),
            Err(ValueError::InvalidRank { rank: 0 })
        );
        assert_eq!(
            NumericArray::from_vec(&[1, 1, 1, 1], vec![1.0f32]),
            Err(ValueError::InvalidRank { rank: 4 })
        );
    }

    #[test]
    fn length_is_validated() {
        let err = NumericArray::from_vec(&[2, 3], vec![0i32; 5]).unwrap_err();
        assert_eq!(
            err,
            ValueError::LengthMismatch {
                shape: vec![2, 3],
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn empty_vector_is_allowed() {
        let v = NumericArray::vector(Vec::<f32>::new());
        assert_eq!(v.shape(), &[0]);
        assert!(v.is_empty());
    }

    #[test]
    fn scalar_access() {
        let s = NumericArray::scalar(42i32);
        assert_eq!(s.scalar_value::<i32>(), Some(42));
        assert_eq!(s.scalar_value::<f32>(), None);
        let v = NumericArray::vector(vec![1i32, 2]);
        assert_eq!(v.scalar_value::<i32>(), None);
    }

    #[test]
    fn slabs_follow_third_axis() {
        // 2x2 image, 3 channels
        let data: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let tensor = NumericArray::from_vec(&[2, 2, 3], data).unwrap();
        assert_eq!(tensor.slab::<f32>(0), Some(&[0.0, 1.0, 2.0, 3.0][..]));
        assert_eq!(tensor.slab::<f32>(2), Some(&[8.0, 9.0, 10.0, 11.0][..]));
        assert_eq!(tensor.slab::<f32>(3), None);

        let plane = NumericArray::from_vec(&[2, 2], vec![1.0f32; 4]).unwrap();
        assert_eq!(plane.slab::<f32>(0).map(<[f32]>::len), Some(4));
        assert_eq!(plane.slab::<f32>(1), None);
    }

    #[test]
    fn display() {
        assert_eq!(NumericArray::scalar(1.5f32).to_string(), "1.5");
        assert_eq!(NumericArray::vector(vec![1i32, 2]).to_string(), "[1, 2]");
        let plane = NumericArray::from_vec(&[3, 4], vec![0.0f64; 12]).unwrap();
        assert_eq!(plane.to_string(), "<float64 3x4>");
    }
}
