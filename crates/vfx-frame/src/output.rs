//! Writing a host tensor to an image.
//!
//! [`OutputFile`] owns the header being built and borrows the caller's
//! pixel tensor from declaration until the write. Channel planes are
//! registered as slices straight into the tensor; nothing is copied until
//! the file library drains them.
//!
//! # Example
//!
//! ```rust
//! use vfx_frame::{InputFile, MemoryImage, OutputFile};
//! use vfx_value::{NumericArray, Value};
//!
//! let tensor = NumericArray::from_vec(&[1, 2], vec![0.5f32, 1.5])?;
//! let mut output = OutputFile::new(2, 1);
//! output.set_attribute("owner", &Value::from("lab"))?;
//! output.declare_y(&tensor)?;
//!
//! let mut image = MemoryImage::default();
//! output.write_to(&mut image)?;
//! assert_eq!(image.plane("Y"), Some(&[0.5f32, 1.5][..]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::{FrameError, FrameResult};
use crate::frame_buffer::{ConstFrameBuffer, ConstSlice};
use crate::input::{RGB_CHANNELS, Y_CHANNEL, unique_names};
use crate::library::OutputTarget;
use crate::openexr::ExrOutput;
use crate::options::WriteOptions;
use crate::tensor;
use crate::window::DataWindow;
use std::path::Path;
use tracing::debug;
use vfx_attr::{
    Attribute, AttributeKind, Channel, Header, KindHints, write_all_attributes_with_hints,
    write_attribute,
};
use vfx_value::{NumericArray, Value};

enum WriteState<'t> {
    Empty,
    Declared { channels: Vec<(String, &'t [f32])> },
    Written,
}

/// Image being built from a pixel tensor.
pub struct OutputFile<'t> {
    header: Header,
    options: WriteOptions,
    state: WriteState<'t>,
}

impl<'t> OutputFile<'t> {
    /// Output of `width x height` pixels with a default header.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            header: Header::new(width, height),
            options: WriteOptions::default(),
            state: WriteState::Empty,
        }
    }

    /// Output with a caller-built header. Its data window must be valid.
    pub fn from_header(header: Header) -> FrameResult<Self> {
        DataWindow::from_header(&header)?.rows()?;
        Ok(Self {
            header,
            options: WriteOptions::default(),
            state: WriteState::Empty,
        })
    }

    /// Moves the data window to start at `(x, y)`.
    pub fn with_data_window_origin(mut self, x: i32, y: i32) -> FrameResult<Self> {
        let window = DataWindow::from_header(&self.header)?.with_origin(x, y);
        window.rows()?;
        self.header.set_data_window(window.to_box());
        Ok(self)
    }

    /// Replaces the write options.
    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Header as built so far.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Current data window.
    pub fn data_window(&self) -> FrameResult<DataWindow> {
        DataWindow::from_header(&self.header)
    }

    /// Encodes and sets one attribute, with the default kind for its name.
    pub fn set_attribute(&mut self, name: &str, value: &Value) -> FrameResult<()> {
        Ok(write_attribute(&mut self.header, name, value, None)?)
    }

    /// Encodes and sets one attribute as `kind`.
    pub fn set_attribute_as(&mut self, name: &str, kind: AttributeKind, value: &Value) -> FrameResult<()> {
        Ok(write_attribute(&mut self.header, name, value, Some(kind))?)
    }

    /// Encodes and sets every entry of a struct. All or nothing.
    pub fn set_attributes(&mut self, values: &Value) -> FrameResult<()> {
        self.set_attributes_with_hints(values, &KindHints::new())
    }

    /// Encodes and sets every entry of a struct, with per-key kind hints.
    pub fn set_attributes_with_hints(&mut self, values: &Value, hints: &KindHints) -> FrameResult<()> {
        Ok(write_all_attributes_with_hints(&mut self.header, values, hints)?)
    }

    /// Sets a native attribute as is, e.g. one copied from another header.
    pub fn insert_attribute(&mut self, name: impl Into<String>, attribute: Attribute) {
        self.header.insert(name, attribute);
    }

    /// Declares the channels to write and the tensor holding their pixels.
    ///
    /// The tensor must be float32 with shape `[height, width]` for one
    /// channel or `[height, width, channels]`; plane `i` becomes channel
    /// `names[i]`.
    pub fn declare_channels<I, N>(&mut self, pixels: &'t NumericArray, names: I) -> FrameResult<()>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        if !matches!(self.state, WriteState::Empty) {
            return Err(FrameError::FrameBufferAlreadyDeclared);
        }
        let names = unique_names(names)?;
        let window = DataWindow::from_header(&self.header)?;
        let planes = tensor::planes(pixels, &window, names.len())?;

        for name in &names {
            self.header
                .add_channel(Channel::new(name.clone(), self.options.sample_type));
        }
        debug!(channels = ?names, sample_type = self.options.sample_type.name(), "declared write frame buffer");
        self.state = WriteState::Declared {
            channels: names.into_iter().zip(planes).collect(),
        };
        Ok(())
    }

    /// Declares `R`, `G`, `B` from a `[height, width, 3]` tensor.
    pub fn declare_rgb(&mut self, pixels: &'t NumericArray) -> FrameResult<()> {
        self.declare_channels(pixels, RGB_CHANNELS)
    }

    /// Declares `Y` from a `[height, width]` tensor.
    pub fn declare_y(&mut self, pixels: &'t NumericArray) -> FrameResult<()> {
        self.declare_channels(pixels, [Y_CHANNEL])
    }

    /// Writes the header and every row of the data window to `target`.
    ///
    /// The output cannot be written again, whether this succeeds or not.
    pub fn write_to<T: OutputTarget>(&mut self, target: &mut T) -> FrameResult<()> {
        let channels = match std::mem::replace(&mut self.state, WriteState::Written) {
            WriteState::Declared { channels } => channels,
            WriteState::Empty => {
                self.state = WriteState::Empty;
                return Err(FrameError::NotDeclared);
            }
            WriteState::Written => return Err(FrameError::AlreadyWritten),
        };

        let window = DataWindow::from_header(&self.header)?;
        let mut frame_buffer = ConstFrameBuffer::new(window);
        for (name, plane) in &channels {
            frame_buffer.insert(name.as_str(), ConstSlice::new(plane, &window)?);
        }
        target.write_pixels(&self.header, &frame_buffer, window.rows()?)?;
        debug!(channels = channels.len(), rows = window.height, "wrote pixels");
        Ok(())
    }

    /// Writes an OpenEXR file.
    pub fn write_pixels(&mut self, path: impl AsRef<Path>) -> FrameResult<()> {
        let mut target = ExrOutput::create(path);
        self.write_to(&mut target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputFile;
    use crate::memory::MemoryImage;
    use vfx_attr::{AttrError, Box2i, SampleType};

    fn ramp(height: usize, width: usize, channels: usize) -> NumericArray {
        let len = height * width * channels;
        let data: Vec<f32> = (0..len).map(|v| v as f32 * 0.5).collect();
        if channels == 1 {
            NumericArray::from_vec(&[height, width], data).unwrap()
        } else {
            NumericArray::from_vec(&[height, width, channels], data).unwrap()
        }
    }

    #[test]
    fn single_channel_round_trip() {
        let pixels = ramp(3, 4, 1);
        let mut output = OutputFile::new(4, 3);
        output.declare_channels(&pixels, ["Z"]).unwrap();
        let mut image = MemoryImage::default();
        output.write_to(&mut image).unwrap();

        let mut input = InputFile::new(image).unwrap();
        input.declare_channels(["Z"]).unwrap();
        let back = input.read_pixels().unwrap();
        assert_eq!(back.shape(), &[3, 4]);
        assert_eq!(back, pixels);
    }

    #[test]
    fn tensor_rows_are_image_rows() {
        // 3 columns, 4 rows: a [4, 3] tensor
        let pixels = ramp(4, 3, 1);
        let mut output = OutputFile::new(3, 4);
        output.declare_y(&pixels).unwrap();
        let mut image = MemoryImage::default();
        output.write_to(&mut image).unwrap();

        let window = DataWindow::from_header(image.header()).unwrap();
        assert_eq!((window.width, window.height), (3, 4));
        // element [row 1, column 2] lands at pixel (2, 1)
        let plane = image.plane("Y").unwrap();
        assert_eq!(plane[window.row_start(1) + 2], pixels.as_slice::<f32>().unwrap()[3 + 2]);

        let mut input = InputFile::new(image).unwrap();
        input.declare_y().unwrap();
        let back = input.read_pixels().unwrap();
        assert_eq!(back.shape(), &[4, 3]);
        assert_eq!(back, pixels);

        let mut transposed = OutputFile::new(4, 3);
        assert!(matches!(
            transposed.declare_y(&pixels),
            Err(FrameError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn windows_at_the_coordinate_limits() {
        assert!(matches!(
            OutputFile::new(2, 1).with_data_window_origin(0, i32::MAX),
            Err(FrameError::WindowOverflow { .. })
        ));
        let mut header = Header::new(2, 1);
        header.set_data_window(Box2i::from_origin_size(0, i32::MAX, 2, 1));
        assert!(matches!(
            OutputFile::from_header(header),
            Err(FrameError::WindowOverflow { .. })
        ));

        let pixels = ramp(1, 2, 1);
        let mut output = OutputFile::new(2, 1)
            .with_data_window_origin(i32::MIN, i32::MAX - 1)
            .unwrap();
        output.declare_y(&pixels).unwrap();
        let mut image = MemoryImage::default();
        output.write_to(&mut image).unwrap();
        let mut input = InputFile::new(image).unwrap();
        input.declare_y().unwrap();
        assert_eq!(input.read_pixels().unwrap(), pixels);
    }

    #[test]
    fn origin_offset_round_trip() {
        let pixels = ramp(3, 4, 3);
        let mut output = OutputFile::new(4, 3).with_data_window_origin(5, -3).unwrap();
        output.declare_rgb(&pixels).unwrap();
        let mut image = MemoryImage::default();
        output.write_to(&mut image).unwrap();

        let window = DataWindow::from_header(image.header()).unwrap();
        assert_eq!((window.origin_x, window.origin_y), (5, -3));

        let mut input = InputFile::new(image).unwrap();
        input.declare_rgb().unwrap();
        assert_eq!(input.read_pixels().unwrap(), pixels);
    }

    #[test]
    fn state_machine() {
        let pixels = ramp(2, 2, 1);
        let mut output = OutputFile::new(2, 2);
        let mut image = MemoryImage::default();
        assert!(matches!(output.write_to(&mut image), Err(FrameError::NotDeclared)));

        output.declare_y(&pixels).unwrap();
        assert!(matches!(
            output.declare_y(&pixels),
            Err(FrameError::FrameBufferAlreadyDeclared)
        ));
        output.write_to(&mut image).unwrap();
        assert!(matches!(output.write_to(&mut image), Err(FrameError::AlreadyWritten)));
    }

    #[test]
    fn tensor_is_validated() {
        let pixels = ramp(3, 4, 2);
        let mut output = OutputFile::new(4, 3);
        assert!(matches!(
            output.declare_rgb(&pixels),
            Err(FrameError::ShapeMismatch { .. })
        ));
        let wrong_size = ramp(4, 3, 1);
        assert!(matches!(
            output.declare_y(&wrong_size),
            Err(FrameError::ShapeMismatch { .. })
        ));
        let doubles = NumericArray::from_vec(&[3, 4], vec![0.0f64; 12]).unwrap();
        assert!(matches!(
            output.declare_y(&doubles),
            Err(FrameError::ElementTypeMismatch { .. })
        ));
        // a failed declaration leaves the output declarable
        output.declare_channels(&pixels, ["U", "V"]).unwrap();
    }

    #[test]
    fn channels_use_write_options() {
        let pixels = ramp(1, 1, 1);
        let mut output = OutputFile::new(1, 1)
            .with_options(WriteOptions::default().with_sample_type(SampleType::Half));
        output.declare_y(&pixels).unwrap();
        let channel = output.header().channels().and_then(|c| c.get("Y")).cloned();
        assert_eq!(channel.map(|c| c.sample_type), Some(SampleType::Half));
    }

    #[test]
    fn attributes_reach_the_target() {
        let pixels = ramp(1, 1, 1);
        let mut output = OutputFile::new(1, 1);
        output.set_attribute("expTime", &Value::from(0.01f32)).unwrap();
        output
            .set_attribute_as("frame", AttributeKind::Int, &Value::from(1001i32))
            .unwrap();
        assert!(matches!(
            output.set_attribute("channels", &Value::Cell(vec![])),
            Err(FrameError::Attr(AttrError::UnsupportedWrite { .. }))
        ));
        output.declare_y(&pixels).unwrap();
        let mut image = MemoryImage::default();
        output.write_to(&mut image).unwrap();
        assert_eq!(image.header().get("expTime"), Some(&Attribute::Float(0.01)));
        assert_eq!(image.header().get("frame"), Some(&Attribute::Int(1001)));
    }
}
