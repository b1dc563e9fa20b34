//! # vfx-value
//!
//! Dynamic value model shared between image metadata codecs and the hosts
//! that call them.
//!
//! A host (scripting environment, JSON front end, test harness) sees image
//! metadata and pixel data as a small tree of dynamically typed values:
//!
//! - [`NumericArray`] - typed numeric data (bool, int32, float32, float64)
//!   with an explicit shape of rank 1 to 3. A scalar is shape `[1]`.
//! - strings, ordered cell lists and string-keyed structs, wrapped in [`Value`].
//!
//! # Storage order
//!
//! Numeric data is stored as a sequence of rank-2 slabs. Each slab is
//! row-major (`index = y * width + x`), and slabs are laid out one after
//! another along the third axis. A `[height, width, channels]` pixel tensor
//! therefore keeps every channel as one contiguous `height * width` plane.
//!
//! # Example
//!
//! ```rust
//! use vfx_value::{NumericArray, Value};
//!
//! let gain = Value::from(2.5f32);
//! assert_eq!(gain.as_numeric().and_then(|n| n.scalar_value::<f32>()), Some(2.5));
//!
//! let plane = NumericArray::from_vec(&[2, 2], vec![0.0f32, 1.0, 2.0, 3.0]).unwrap();
//! assert_eq!(plane.shape(), &[2, 2]);
//! ```

mod error;
mod numeric;
mod serde_repr;
mod value;

pub use error::{ValueError, ValueResult};
pub use numeric::{Element, ElementType, MAX_RANK, NumericArray, NumericData, Shape};
pub use value::Value;
