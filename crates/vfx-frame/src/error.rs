//! Error types for pixel marshalling.
//!
//! A failed read or write leaves its file object unusable; callers discard
//! it and start over. Attribute and value errors pass through unchanged.

use std::io;
use thiserror::Error;
use vfx_attr::AttrError;
use vfx_value::{ElementType, ValueError};

/// Pixel marshalling error.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Attribute coding failed.
    #[error(transparent)]
    Attr(#[from] AttrError),

    /// Host value construction failed.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// A frame buffer was declared twice on the same file.
    #[error("frame buffer already declared")]
    FrameBufferAlreadyDeclared,

    /// Pixel transfer requested before declaring a frame buffer.
    #[error("no frame buffer declared")]
    NotDeclared,

    /// Pixels already read from this file.
    #[error("pixels already read")]
    AlreadyRead,

    /// Pixels already written to this file.
    #[error("pixels already written")]
    AlreadyWritten,

    /// Pixel tensor shape does not fit the data window and channel count.
    #[error("pixel tensor of shape {actual:?} does not match expected {expected}")]
    ShapeMismatch {
        /// Expected shape, in words.
        expected: String,
        /// Actual tensor shape.
        actual: Vec<usize>,
    },

    /// Pixel tensor is not float32.
    #[error("pixel tensor must be float32, got {found}")]
    ElementTypeMismatch {
        /// Element type supplied.
        found: ElementType,
    },

    /// Channel declaration with no names.
    #[error("no channels requested")]
    EmptyChannelSet,

    /// Same channel named twice in one declaration.
    #[error("channel '{0}' requested more than once")]
    DuplicateChannel(String),

    /// Plane length does not cover the data window.
    #[error("plane of {actual} samples does not cover {expected} pixels")]
    PlaneSize {
        /// Pixels in the data window.
        expected: usize,
        /// Samples in the plane.
        actual: usize,
    },

    /// Absolute pixel address falls outside a slice's storage.
    #[error("pixel ({x}, {y}) is outside the slice")]
    SliceOutOfBounds {
        /// Absolute x.
        x: i32,
        /// Absolute y.
        y: i32,
    },

    /// Requested rows are not inside the data window.
    #[error("rows {start}..{end} outside data window rows {min}..{max}")]
    RowRange {
        /// First requested row.
        start: i32,
        /// One past the last requested row.
        end: i32,
        /// First data window row.
        min: i32,
        /// One past the last data window row.
        max: i32,
    },

    /// Data window rows run past the 32-bit coordinate range.
    #[error("data window of {height} rows at y = {origin_y} ends past the coordinate range")]
    WindowOverflow {
        /// First data window row.
        origin_y: i32,
        /// Rows.
        height: usize,
    },

    /// Content the file library cannot store.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Not an OpenEXR file.
    #[error("not an OpenEXR file: {0}")]
    InvalidFile(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// OpenEXR library error.
    #[error("OpenEXR error: {0}")]
    Exr(#[from] exr::error::Error),
}

/// Result type for pixel marshalling.
pub type FrameResult<T> = Result<T, FrameError>;
