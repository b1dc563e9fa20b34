//! Reading pixels into a host tensor.
//!
//! [`InputFile`] walks a strict sequence: declare the channels once, read
//! once. The read allocates one plane per channel in a single arena, lets
//! the library fill it row by row and hands it to the caller as the pixel
//! tensor. A failed read drops the arena before returning.
//!
//! # Example
//!
//! ```rust
//! use vfx_attr::Header;
//! use vfx_frame::{InputFile, MemoryImage};
//!
//! let image = MemoryImage::new(Header::new(2, 1)).with_channel("Y", vec![0.25, 0.75])?;
//! let mut input = InputFile::new(image)?;
//! input.declare_y()?;
//! let tensor = input.read_pixels()?;
//! assert_eq!(tensor.shape(), &[1, 2]);
//! assert_eq!(tensor.as_slice::<f32>(), Some(&[0.25, 0.75][..]));
//! # Ok::<(), vfx_frame::FrameError>(())
//! ```

use crate::error::{FrameError, FrameResult};
use crate::frame_buffer::{FrameBuffer, Slice};
use crate::library::ImageInput;
use crate::openexr::ExrInput;
use crate::options::ReadOptions;
use crate::tensor;
use crate::window::DataWindow;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};
use vfx_attr::{Header, read_all_attributes, read_attribute};
use vfx_value::{NumericArray, Value};

/// Channel names of the RGB convenience declaration.
pub const RGB_CHANNELS: [&str; 3] = ["R", "G", "B"];
/// Channel name of the luminance convenience declaration.
pub const Y_CHANNEL: &str = "Y";

enum ReadState {
    Empty,
    Declared { channels: Vec<String> },
    Read,
}

/// Image being read into a pixel tensor.
pub struct InputFile<S: ImageInput = ExrInput> {
    source: S,
    window: DataWindow,
    options: ReadOptions,
    state: ReadState,
}

impl InputFile<ExrInput> {
    /// Opens an OpenEXR file.
    pub fn open(path: impl AsRef<Path>) -> FrameResult<Self> {
        Self::new(ExrInput::open(path)?)
    }
}

impl<S: ImageInput> InputFile<S> {
    /// Wraps an image source. Its header must carry a valid data window.
    pub fn new(source: S) -> FrameResult<Self> {
        let window = DataWindow::from_header(source.header())?;
        Ok(Self {
            source,
            window,
            options: ReadOptions::default(),
            state: ReadState::Empty,
        })
    }

    /// Replaces the read options.
    pub fn with_options(mut self, options: ReadOptions) -> Self {
        self.options = options;
        self
    }

    /// Name of the underlying file.
    pub fn file_name(&self) -> &str {
        self.source.file_name()
    }

    /// Header of the image.
    pub fn header(&self) -> &Header {
        self.source.header()
    }

    /// Data window of the image.
    pub fn data_window(&self) -> DataWindow {
        self.window
    }

    /// Columns of the data window.
    pub fn width(&self) -> usize {
        self.window.width
    }

    /// Rows of the data window.
    pub fn height(&self) -> usize {
        self.window.height
    }

    /// `(height, width)`, the leading axes of the pixel tensor.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.window.height, self.window.width)
    }

    /// Number of channels in the file.
    pub fn num_channels(&self) -> usize {
        self.header().channels().map_or(0, |list| list.len())
    }

    /// Channel names in file order.
    pub fn channel_names(&self) -> Vec<String> {
        self.header()
            .channels()
            .map(|list| list.names().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Decodes one attribute.
    pub fn attribute(&self, name: &str) -> FrameResult<Value> {
        Ok(read_attribute(self.header(), name)?)
    }

    /// Decodes every attribute into a struct.
    pub fn attributes(&self) -> FrameResult<Value> {
        Ok(read_all_attributes(self.header())?)
    }

    /// Declares the channels to read, in tensor order.
    ///
    /// Channels missing from the file are read as the fill value.
    pub fn declare_channels<I, N>(&mut self, names: I) -> FrameResult<()>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        if !matches!(self.state, ReadState::Empty) {
            return Err(FrameError::FrameBufferAlreadyDeclared);
        }
        let channels = unique_names(names)?;

        if let Some(list) = self.source.header().channels() {
            for name in channels.iter().filter(|n| !list.contains(n)) {
                warn!(
                    file = self.source.file_name(),
                    channel = %name,
                    fill = self.options.fill_value,
                    "channel not found, it will be filled"
                );
            }
        }

        debug!(channels = ?channels, width = self.window.width, height = self.window.height, "declared read frame buffer");
        self.state = ReadState::Declared { channels };
        Ok(())
    }

    /// Declares `R`, `G`, `B`.
    pub fn declare_rgb(&mut self) -> FrameResult<()> {
        self.declare_channels(RGB_CHANNELS)
    }

    /// Declares `Y`.
    pub fn declare_y(&mut self) -> FrameResult<()> {
        self.declare_channels([Y_CHANNEL])
    }

    /// Reads every row of the data window into a pixel tensor.
    ///
    /// Rank 2 `[height, width]` for one channel, rank 3
    /// `[height, width, channels]` otherwise. The file cannot be read again,
    /// whether this succeeds or not.
    pub fn read_pixels(&mut self) -> FrameResult<NumericArray> {
        let channels = match std::mem::replace(&mut self.state, ReadState::Read) {
            ReadState::Declared { channels } => channels,
            ReadState::Empty => {
                self.state = ReadState::Empty;
                return Err(FrameError::NotDeclared);
            }
            ReadState::Read => return Err(FrameError::AlreadyRead),
        };

        let window = self.window;
        let mut arena = vec![self.options.fill_value; channels.len() * window.pixel_count()];
        {
            let mut frame_buffer = FrameBuffer::new(window);
            let planes = arena.chunks_mut(window.pixel_count().max(1));
            for (name, plane) in channels.iter().zip(planes) {
                frame_buffer.insert(name.as_str(), Slice::new(plane, &window, self.options.fill_value)?);
            }
            self.source.read_pixels(&mut frame_buffer, window.rows()?)?;
        }
        debug!(channels = channels.len(), rows = window.height, "read pixels");

        tensor::from_planes(&window, channels.len(), arena)
    }

    /// Releases the image source.
    pub fn into_source(self) -> S {
        self.source
    }
}

/// Collects channel names, rejecting empty and repeated ones.
pub(crate) fn unique_names<I, N>(names: I) -> FrameResult<Vec<String>>
where
    I: IntoIterator<Item = N>,
    N: Into<String>,
{
    let names: Vec<String> = names.into_iter().map(Into::into).collect();
    if names.is_empty() {
        return Err(FrameError::EmptyChannelSet);
    }
    let mut seen = BTreeSet::new();
    for name in &names {
        if !seen.insert(name.as_str()) {
            return Err(FrameError::DuplicateChannel(name.clone()));
        }
    }
    Ok(names)
}
