//! In-memory image backend.
//!
//! [`MemoryImage`] keeps a header and one zero-based f32 plane per channel.
//! It reads and writes through the same absolute-coordinate frame buffers
//! as the OpenEXR backend, so it stands in for a file in tests and for hosts
//! that never touch the disk.

use crate::error::{FrameError, FrameResult};
use crate::frame_buffer::{ConstFrameBuffer, FrameBuffer};
use crate::library::{ImageInput, OutputTarget, collect_planes};
use crate::window::DataWindow;
use std::collections::BTreeMap;
use std::ops::Range;
use tracing::{debug, trace};
use vfx_attr::{Channel, Header, SampleType};

/// Header plus channel planes held in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryImage {
    header: Header,
    planes: BTreeMap<String, Vec<f32>>,
}

impl MemoryImage {
    /// Image with `header` and no pixel data yet.
    pub fn new(header: Header) -> Self {
        Self {
            header,
            planes: BTreeMap::new(),
        }
    }

    /// Adds a float channel. The plane must cover the data window.
    pub fn with_channel(mut self, name: impl Into<String>, plane: Vec<f32>) -> FrameResult<Self> {
        let window = DataWindow::from_header(&self.header)?;
        if plane.len() != window.pixel_count() {
            return Err(FrameError::PlaneSize {
                expected: window.pixel_count(),
                actual: plane.len(),
            });
        }
        let name = name.into();
        self.header.add_channel(Channel::new(name.clone(), SampleType::Float));
        self.planes.insert(name, plane);
        Ok(self)
    }

    pub(crate) fn from_parts(header: Header, planes: BTreeMap<String, Vec<f32>>) -> Self {
        Self { header, planes }
    }

    /// Header of the image.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Zero-based plane of a channel.
    pub fn plane(&self, name: &str) -> Option<&[f32]> {
        self.planes.get(name).map(Vec::as_slice)
    }

    /// Names of channels with pixel data.
    pub fn plane_names(&self) -> impl Iterator<Item = &str> {
        self.planes.keys().map(String::as_str)
    }
}

impl ImageInput for MemoryImage {
    fn header(&self) -> &Header {
        &self.header
    }

    fn read_pixels(&mut self, frame_buffer: &mut FrameBuffer<'_>, rows: Range<i32>) -> FrameResult<()> {
        let window = DataWindow::from_header(&self.header)?;
        window.check_rows(&rows)?;
        for (name, slice) in frame_buffer.iter_mut() {
            match self.planes.get(name) {
                Some(plane) => {
                    trace!(channel = name, "reading channel");
                    for y in rows.clone() {
                        let start = window.row_start(y);
                        slice.store_row(window.origin_x, y, &plane[start..start + window.width])?;
                    }
                }
                None => {
                    debug!(channel = name, fill = slice.fill_value(), "channel not in image, filling");
                    for y in rows.clone() {
                        slice.fill_row(window.origin_x, y, window.width)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl OutputTarget for MemoryImage {
    fn write_pixels(
        &mut self,
        header: &Header,
        frame_buffer: &ConstFrameBuffer<'_>,
        rows: Range<i32>,
    ) -> FrameResult<()> {
        let window = DataWindow::from_header(header)?;
        self.planes = collect_planes(&window, frame_buffer, rows)?;
        self.header = header.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_buffer::Slice;

    #[test]
    fn reads_requested_rows_only() {
        let mut header = Header::new(2, 3);
        header.set_data_window(DataWindow::new(2, 3).with_origin(0, 10).to_box());
        let mut image = MemoryImage::new(header)
            .with_channel("Z", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();

        let window = DataWindow::from_header(image.header()).unwrap();
        let mut plane = vec![0.0f32; 6];
        {
            let mut fb = FrameBuffer::new(window);
            fb.insert("Z", Slice::new(&mut plane, &window, 0.0).unwrap());
            image.read_pixels(&mut fb, 11..12).unwrap();
        }
        assert_eq!(plane, [0.0, 0.0, 3.0, 4.0, 0.0, 0.0]);
    }

    #[test]
    fn plane_size_is_checked() {
        let result = MemoryImage::new(Header::new(2, 2)).with_channel("R", vec![0.0; 3]);
        assert!(matches!(
            result,
            Err(FrameError::PlaneSize { expected: 4, actual: 3 })
        ));
    }
}
