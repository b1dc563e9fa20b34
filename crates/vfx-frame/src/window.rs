//! Data window geometry.
//!
//! Pixel coordinates in an OpenEXR file are absolute: the data window may
//! start anywhere, including at negative coordinates. Planes in memory are
//! zero-based, so every slice carries a base offset that maps absolute
//! `(x, y)` back onto plane index `(y - origin_y) * width + (x - origin_x)`.

use crate::error::{FrameError, FrameResult};
use std::ops::Range;
use vfx_attr::{Box2i, Header};

/// Origin and extent of the pixels stored in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataWindow {
    /// Absolute x of the first column.
    pub origin_x: i32,
    /// Absolute y of the first row.
    pub origin_y: i32,
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
}

impl DataWindow {
    /// Window of `width x height` pixels at the origin.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            origin_x: 0,
            origin_y: 0,
            width,
            height,
        }
    }

    /// Same extent, moved to `(x, y)`.
    pub fn with_origin(self, x: i32, y: i32) -> Self {
        Self {
            origin_x: x,
            origin_y: y,
            ..self
        }
    }

    /// Window described by an inclusive box.
    pub fn from_box(window: &Box2i) -> Self {
        Self {
            origin_x: window.min.x,
            origin_y: window.min.y,
            width: window.width(),
            height: window.height(),
        }
    }

    /// Data window of a header.
    pub fn from_header(header: &Header) -> FrameResult<Self> {
        Ok(Self::from_box(&header.data_window()?))
    }

    /// Inclusive box form.
    pub fn to_box(&self) -> Box2i {
        Box2i::from_origin_size(self.origin_x, self.origin_y, self.width, self.height)
    }

    /// Pixels in the window.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Offset that maps absolute coordinates onto a zero-based plane:
    /// `-(origin_x + origin_y * width)`.
    pub fn base_offset(&self) -> isize {
        -(self.origin_x as isize + self.origin_y as isize * self.width as isize)
    }

    /// Absolute row range. Fails when the row past the last one is not an
    /// `i32`, e.g. a window whose last row is `i32::MAX`.
    pub fn rows(&self) -> FrameResult<Range<i32>> {
        i32::try_from(self.height)
            .ok()
            .and_then(|height| self.origin_y.checked_add(height))
            .map(|end| self.origin_y..end)
            .ok_or(FrameError::WindowOverflow {
                origin_y: self.origin_y,
                height: self.height,
            })
    }

    /// Plane index of the first pixel of absolute row `y`.
    pub fn row_start(&self, y: i32) -> usize {
        (i64::from(y) - i64::from(self.origin_y)) as usize * self.width
    }

    /// Fails unless `rows` lies within the window.
    pub fn check_rows(&self, rows: &Range<i32>) -> FrameResult<()> {
        let all = self.rows()?;
        if rows.start < all.start || rows.end > all.end || rows.start > rows.end {
            return Err(FrameError::RowRange {
                start: rows.start,
                end: rows.end,
                min: all.start,
                max: all.end,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_offset_maps_origin_to_zero() {
        let window = DataWindow::new(4, 3).with_origin(5, -3);
        assert_eq!(window.base_offset(), -(5 + -3 * 4));
        // the first pixel lands at index 0, the last at width*height-1
        let index = |x: i32, y: i32| window.base_offset() + x as isize + y as isize * 4;
        assert_eq!(index(5, -3), 0);
        assert_eq!(index(8, -1), 11);
    }

    #[test]
    fn box_round_trip() {
        let window = DataWindow::new(7, 2).with_origin(-10, 20);
        assert_eq!(DataWindow::from_box(&window.to_box()), window);
        assert_eq!(window.rows().unwrap(), 20..22);
    }

    #[test]
    fn row_range_is_checked() {
        let window = DataWindow::new(2, 2).with_origin(0, 10);
        assert!(window.check_rows(&(10..12)).is_ok());
        assert!(window.check_rows(&(11..11)).is_ok());
        assert!(matches!(
            window.check_rows(&(9..12)),
            Err(FrameError::RowRange { min: 10, max: 12, .. })
        ));
    }

    #[test]
    fn rows_at_the_coordinate_limits() {
        let top = DataWindow::new(2, 1).with_origin(0, i32::MAX);
        assert!(matches!(
            top.rows(),
            Err(FrameError::WindowOverflow { origin_y: i32::MAX, height: 1 })
        ));
        assert!(top.check_rows(&(0..0)).is_err());

        let below = DataWindow::new(2, 1).with_origin(0, i32::MAX - 1);
        assert_eq!(below.rows().unwrap(), i32::MAX - 1..i32::MAX);

        let bottom = DataWindow::new(3, 2).with_origin(i32::MIN, i32::MIN);
        assert_eq!(bottom.rows().unwrap(), i32::MIN..i32::MIN + 2);
        assert_eq!(bottom.row_start(i32::MIN + 1), 3);
    }
}
