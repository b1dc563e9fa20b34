//! # vfx-attr
//!
//! Typed OpenEXR header attributes and a lossless codec between them and
//! the dynamic host values of [`vfx_value`].
//!
//! # Architecture
//!
//! - [`Attribute`] / [`Header`] - the native model: one tagged variant per
//!   supported attribute kind, stored by name.
//! - [`tables`] - token tables for `compression`, `lineOrder` and `envmap`.
//! - [`AttributeRegistry`] - native type name <-> [`AttributeKind`] and the
//!   default kind of well-known keys.
//! - [`codec`] - [`decode`] / [`encode`] for a single attribute.
//! - [`walker`] - whole-header reads and all-or-nothing bulk writes.
//!
//! # Quick Start
//!
//! ```rust
//! use vfx_attr::{Header, read_all_attributes, write_all_attributes};
//! use vfx_value::Value;
//!
//! let mut header = Header::new(1920, 1080);
//! let extra: Value = [
//!     ("owner".to_string(), Value::from("comp")),
//!     ("expTime".to_string(), Value::from(0.02f32)),
//! ]
//! .into_iter()
//! .collect();
//! write_all_attributes(&mut header, &extra)?;
//!
//! let all = read_all_attributes(&header)?;
//! assert_eq!(all.get("owner"), Some(&Value::from("comp")));
//! assert_eq!(all.get("compression"), Some(&Value::from("zip")));
//! # Ok::<(), vfx_attr::AttrError>(())
//! ```

mod attribute;
pub mod codec;
mod error;
pub mod header;
mod kind;
mod registry;
pub mod tables;
mod types;
pub mod walker;

pub use attribute::Attribute;
pub use codec::{decode, decode_native, encode};
pub use error::{AttrError, AttrResult};
pub use header::Header;
pub use kind::AttributeKind;
pub use registry::{AttributeRegistry, UNKNOWN_TYPE_NAME};
pub use tables::{TokenEnum, UNKNOWN_TOKEN};
pub use types::{
    Box2, Box2f, Box2i, Channel, ChannelList, Chromaticities, Compression, Envmap, LineOrder,
    SampleType, V2, V2f, V2i,
};
pub use walker::{
    KindHints, read_all_attributes, read_attribute, write_all_attributes,
    write_all_attributes_with_hints, write_attribute,
};
