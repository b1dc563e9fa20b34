//! File library seam.
//!
//! The marshaller never talks to a file format directly. A source of pixels
//! implements [`ImageInput`], a destination implements [`OutputTarget`].
//! Both address pixels in absolute file coordinates through frame buffers.

use crate::error::FrameResult;
use crate::frame_buffer::{ConstFrameBuffer, FrameBuffer};
use crate::window::DataWindow;
use std::collections::BTreeMap;
use std::ops::Range;
use vfx_attr::Header;

/// Readable image: a header plus row access through a frame buffer.
pub trait ImageInput {
    /// Name of the underlying file, empty for in-memory images.
    fn file_name(&self) -> &str {
        ""
    }

    /// Header with every attribute of the image.
    fn header(&self) -> &Header;

    /// Fills every slice of `frame_buffer` for the absolute rows `rows`.
    ///
    /// Slices naming channels the image does not have receive their fill
    /// value.
    fn read_pixels(&mut self, frame_buffer: &mut FrameBuffer<'_>, rows: Range<i32>) -> FrameResult<()>;
}

/// Writable image destination.
pub trait OutputTarget {
    /// Stores `header` and the absolute rows `rows` of every slice.
    fn write_pixels(
        &mut self,
        header: &Header,
        frame_buffer: &ConstFrameBuffer<'_>,
        rows: Range<i32>,
    ) -> FrameResult<()>;
}

/// Copies the given rows of every slice into zero-based planes covering
/// `window`, keyed by channel name. Rows outside `rows` stay zero.
pub fn collect_planes(
    window: &DataWindow,
    frame_buffer: &ConstFrameBuffer<'_>,
    rows: Range<i32>,
) -> FrameResult<BTreeMap<String, Vec<f32>>> {
    window.check_rows(&rows)?;
    let mut planes = BTreeMap::new();
    for (name, slice) in frame_buffer.iter() {
        let mut plane = vec![0.0f32; window.pixel_count()];
        for y in rows.clone() {
            let start = window.row_start(y);
            plane[start..start + window.width]
                .copy_from_slice(slice.row(window.origin_x, y, window.width)?);
        }
        planes.insert(name.to_string(), plane);
    }
    Ok(planes)
}
