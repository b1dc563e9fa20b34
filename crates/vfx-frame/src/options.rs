//! Read and write options.

use vfx_attr::SampleType;

/// Options for reading pixels.
///
/// ```rust
/// use vfx_frame::ReadOptions;
///
/// let options = ReadOptions::default().with_fill_value(f32::NAN);
/// assert!(options.fill_value.is_nan());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadOptions {
    /// Value stored for channels the file does not have.
    pub fill_value: f32,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { fill_value: 0.0 }
    }
}

impl ReadOptions {
    /// Sets the value used for missing channels.
    pub fn with_fill_value(mut self, fill_value: f32) -> Self {
        self.fill_value = fill_value;
        self
    }
}

/// Options for writing pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    /// Storage type of the written channels. Float by default.
    pub sample_type: SampleType,
}

impl WriteOptions {
    /// Sets the channel storage type.
    pub fn with_sample_type(mut self, sample_type: SampleType) -> Self {
        self.sample_type = sample_type;
        self
    }
}
