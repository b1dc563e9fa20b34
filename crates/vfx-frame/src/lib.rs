//! # vfx-frame
//!
//! Moves pixels between OpenEXR images and host pixel tensors.
//!
//! # Architecture
//!
//! - [`InputFile`] / [`OutputFile`] - one-shot read and write sessions with
//!   a declare-then-transfer state machine.
//! - [`FrameBuffer`] / [`ConstFrameBuffer`] - named slices that address
//!   zero-based planes with absolute file coordinates.
//! - [`ImageInput`] / [`OutputTarget`] - the file library seam, implemented
//!   by [`ExrInput`] / [`ExrOutput`] on disk and [`MemoryImage`] in memory.
//! - [`tensor`] - the `[height, width(, channels)]` float32 layout.
//!
//! Attribute access goes through [`vfx_attr`], so every header value a
//! session reads or writes uses the same codec as the rest of the host.
//!
//! # Example
//!
//! ```rust,no_run
//! use vfx_frame::{InputFile, OutputFile};
//!
//! let mut input = InputFile::open("plate.exr")?;
//! input.declare_rgb()?;
//! let pixels = input.read_pixels()?;
//!
//! let mut output = OutputFile::new(input.width(), input.height());
//! output.set_attribute("owner", &input.attribute("owner")?)?;
//! output.declare_rgb(&pixels)?;
//! output.write_pixels("copy.exr")?;
//! # Ok::<(), vfx_frame::FrameError>(())
//! ```

mod error;
mod frame_buffer;
mod input;
mod library;
mod memory;
mod openexr;
mod options;
mod output;
pub mod tensor;
mod window;

pub use error::{FrameError, FrameResult};
pub use frame_buffer::{ConstFrameBuffer, ConstSlice, FrameBuffer, Slice};
pub use input::{InputFile, RGB_CHANNELS, Y_CHANNEL};
pub use library::{ImageInput, OutputTarget, collect_planes};
pub use memory::MemoryImage;
pub use openexr::{ExrInput, ExrOutput, MAGIC, is_exr_file};
pub use options::{ReadOptions, WriteOptions};
pub use output::OutputFile;
pub use window::DataWindow;
