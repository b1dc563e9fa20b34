//! Frame buffers: named slices over caller-owned planes.
//!
//! A slice addresses a zero-based `width x height` f32 plane with absolute
//! file coordinates. The address of pixel `(x, y)` is
//! `base + x * x_stride + y * y_stride`, with `base` taken from
//! [`DataWindow::base_offset`], `x_stride = 1` and `y_stride = width`.
//! Every address is checked against the plane before it is touched.

use crate::error::{FrameError, FrameResult};
use crate::window::DataWindow;
use std::ops::Range;

#[derive(Debug, Clone, Copy)]
struct Addressing {
    base: isize,
    x_stride: isize,
    y_stride: isize,
    min_x: i64,
    max_x: i64,
    len: usize,
}

impl Addressing {
    fn for_window(window: &DataWindow, len: usize) -> FrameResult<Self> {
        if len != window.pixel_count() {
            return Err(FrameError::PlaneSize {
                expected: window.pixel_count(),
                actual: len,
            });
        }
        Ok(Self {
            base: window.base_offset(),
            x_stride: 1,
            y_stride: window.width as isize,
            min_x: i64::from(window.origin_x),
            max_x: i64::from(window.origin_x) + window.width as i64,
            len,
        })
    }

    fn index(&self, x: i32, y: i32) -> FrameResult<usize> {
        let out_of_bounds = FrameError::SliceOutOfBounds { x, y };
        if !(self.min_x..self.max_x).contains(&i64::from(x)) {
            return Err(out_of_bounds);
        }
        let offset = self.base + x as isize * self.x_stride + y as isize * self.y_stride;
        usize::try_from(offset)
            .ok()
            .filter(|&i| i < self.len)
            .ok_or(out_of_bounds)
    }

    /// Index range of `width` pixels starting at `(x0, y)`.
    fn row(&self, x0: i32, y: i32, width: usize) -> FrameResult<Range<usize>> {
        let start = self.index(x0, y)?;
        if i64::from(x0) + width as i64 > self.max_x {
            return Err(FrameError::SliceOutOfBounds {
                x: (self.max_x) as i32,
                y,
            });
        }
        Ok(start..start + width)
    }
}

/// Writable slice, filled by the file library during a read.
#[derive(Debug)]
pub struct Slice<'a> {
    data: &'a mut [f32],
    addressing: Addressing,
    fill_value: f32,
}

impl<'a> Slice<'a> {
    /// Slice over a plane covering `window`. Pixels the file has no data
    /// for get `fill_value`.
    pub fn new(data: &'a mut [f32], window: &DataWindow, fill_value: f32) -> FrameResult<Self> {
        let addressing = Addressing::for_window(window, data.len())?;
        Ok(Self {
            data,
            addressing,
            fill_value,
        })
    }

    /// Value for pixels without file data.
    pub fn fill_value(&self) -> f32 {
        self.fill_value
    }

    /// Stores one pixel.
    pub fn store(&mut self, x: i32, y: i32, value: f32) -> FrameResult<()> {
        let index = self.addressing.index(x, y)?;
        self.data[index] = value;
        Ok(())
    }

    /// Stores a run of pixels starting at `(x0, y)`.
    pub fn store_row(&mut self, x0: i32, y: i32, values: &[f32]) -> FrameResult<()> {
        let range = self.addressing.row(x0, y, values.len())?;
        self.data[range].copy_from_slice(values);
        Ok(())
    }

    /// Sets `width` pixels starting at `(x0, y)` to the fill value.
    pub fn fill_row(&mut self, x0: i32, y: i32, width: usize) -> FrameResult<()> {
        let range = self.addressing.row(x0, y, width)?;
        let fill = self.fill_value;
        self.data[range].fill(fill);
        Ok(())
    }
}

/// Read-only slice, drained by the file library during a write.
#[derive(Debug, Clone, Copy)]
pub struct ConstSlice<'a> {
    data: &'a [f32],
    addressing: Addressing,
}

impl<'a> ConstSlice<'a> {
    /// Slice over a plane covering `window`.
    pub fn new(data: &'a [f32], window: &DataWindow) -> FrameResult<Self> {
        let addressing = Addressing::for_window(window, data.len())?;
        Ok(Self { data, addressing })
    }

    /// Loads one pixel.
    pub fn load(&self, x: i32, y: i32) -> FrameResult<f32> {
        Ok(self.data[self.addressing.index(x, y)?])
    }

    /// Run of `width` pixels starting at `(x0, y)`.
    pub fn row(&self, x0: i32, y: i32, width: usize) -> FrameResult<&'a [f32]> {
        let range = self.addressing.row(x0, y, width)?;
        Ok(&self.data[range])
    }
}

/// Named writable slices for one read pass.
#[derive(Debug)]
pub struct FrameBuffer<'a> {
    window: DataWindow,
    slices: Vec<(String, Slice<'a>)>,
}

impl<'a> FrameBuffer<'a> {
    /// Empty frame buffer for `window`.
    pub fn new(window: DataWindow) -> Self {
        Self {
            window,
            slices: Vec::new(),
        }
    }

    /// Window the slices were built for.
    pub fn window(&self) -> &DataWindow {
        &self.window
    }

    /// Registers a slice, replacing one of the same name.
    pub fn insert(&mut self, name: impl Into<String>, slice: Slice<'a>) {
        let name = name.into();
        match self.slices.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = slice,
            None => self.slices.push((name, slice)),
        }
    }

    /// Slices in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Slice<'a>)> {
        self.slices.iter_mut().map(|(n, s)| (n.as_str(), s))
    }

    /// Registered channel names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slices.iter().map(|(n, _)| n.as_str())
    }

    /// Number of slices.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// True when no slice is registered.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// Named read-only slices for one write pass.
#[derive(Debug, Clone)]
pub struct ConstFrameBuffer<'a> {
    window: DataWindow,
    slices: Vec<(String, ConstSlice<'a>)>,
}

impl<'a> ConstFrameBuffer<'a> {
    /// Empty frame buffer for `window`.
    pub fn new(window: DataWindow) -> Self {
        Self {
            window,
            slices: Vec::new(),
        }
    }

    /// Window the slices were built for.
    pub fn window(&self) -> &DataWindow {
        &self.window
    }

    /// Registers a slice, replacing one of the same name.
    pub fn insert(&mut self, name: impl Into<String>, slice: ConstSlice<'a>) {
        let name = name.into();
        match self.slices.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = slice,
            None => self.slices.push((name, slice)),
        }
    }

    /// Slices in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConstSlice<'a>)> {
        self.slices.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Looks up a slice by channel name.
    pub fn get(&self, name: &str) -> Option<&ConstSlice<'a>> {
        self.slices.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    /// Number of slices.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// True when no slice is registered.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}
