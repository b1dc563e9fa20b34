//! Native attribute payload types.
//!
//! These mirror the structured values an OpenEXR header can carry:
//! 2D vectors, inclusive boxes, chromaticity primaries, channel
//! descriptors and the three closed enumerations.

/// 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct V2<T> {
    /// X component.
    pub x: T,
    /// Y component.
    pub y: T,
}

impl<T> V2<T> {
    /// Creates a vector.
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

/// Float 2D vector (`v2f`).
pub type V2f = V2<f32>;

/// Integer 2D vector (`v2i`).
pub type V2i = V2<i32>;

/// Axis-aligned box with inclusive corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Box2<T> {
    /// Lower corner.
    pub min: V2<T>,
    /// Upper corner, inclusive.
    pub max: V2<T>,
}

impl<T> Box2<T> {
    /// Creates a box from its corners.
    pub const fn new(min: V2<T>, max: V2<T>) -> Self {
        Self { min, max }
    }
}

/// Float box (`box2f`).
pub type Box2f = Box2<f32>;

/// Integer box (`box2i`), used for data and display windows.
pub type Box2i = Box2<i32>;

impl Box2i {
    /// Box covering `width x height` pixels starting at `(x, y)`.
    pub fn from_origin_size(x: i32, y: i32, width: usize, height: usize) -> Self {
        let extent = |origin: i32, len: usize| (i64::from(origin) + len as i64 - 1) as i32;
        Self::new(V2::new(x, y), V2::new(extent(x, width), extent(y, height)))
    }

    /// Pixel count along x; zero for inverted boxes.
    pub fn width(&self) -> usize {
        (i64::from(self.max.x) - i64::from(self.min.x) + 1).max(0) as usize
    }

    /// Pixel count along y; zero for inverted boxes.
    pub fn height(&self) -> usize {
        (i64::from(self.max.y) - i64::from(self.min.y) + 1).max(0) as usize
    }
}

/// CIE xy chromaticities of the RGB primaries and white point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chromaticities {
    /// Red primary.
    pub red: V2f,
    /// Green primary.
    pub green: V2f,
    /// Blue primary.
    pub blue: V2f,
    /// White point.
    pub white: V2f,
}

impl Default for Chromaticities {
    /// Rec. ITU-R BT.709 primaries with a D65 white point.
    fn default() -> Self {
        Self {
            red: V2::new(0.6400, 0.3300),
            green: V2::new(0.3000, 0.6000),
            blue: V2::new(0.1500, 0.0600),
            white: V2::new(0.3127, 0.3290),
        }
    }
}

/// Storage type of a channel's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleType {
    /// 32-bit unsigned integer.
    Uint,
    /// 16-bit float.
    Half,
    /// 32-bit float.
    #[default]
    Float,
}

impl SampleType {
    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            SampleType::Uint => "uint",
            SampleType::Half => "half",
            SampleType::Float => "float",
        }
    }
}

/// One entry of a channel list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    /// Channel name, e.g. `R` or `diffuse.R`.
    pub name: String,
    /// Sample storage type.
    pub sample_type: SampleType,
    /// Horizontal subsampling factor.
    pub x_sampling: i32,
    /// Vertical subsampling factor.
    pub y_sampling: i32,
    /// Whether samples are perceptually linear.
    pub p_linear: bool,
}

impl Channel {
    /// Full-resolution channel.
    pub fn new(name: impl Into<String>, sample_type: SampleType) -> Self {
        Self {
            name: name.into(),
            sample_type,
            x_sampling: 1,
            y_sampling: 1,
            p_linear: false,
        }
    }

    /// True when the channel has one sample per pixel.
    pub fn is_full_resolution(&self) -> bool {
        self.x_sampling == 1 && self.y_sampling == 1
    }
}

/// Channel descriptors, kept sorted by name like the file format does.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelList {
    channels: Vec<Channel>,
}

impl ChannelList {
    /// Builds a list, sorting by name. Later duplicates replace earlier ones.
    pub fn new(channels: impl IntoIterator<Item = Channel>) -> Self {
        let mut list = Self::default();
        for channel in channels {
            list.insert(channel);
        }
        list
    }

    /// Inserts a channel, replacing one with the same name.
    pub fn insert(&mut self, channel: Channel) {
        match self
            .channels
            .binary_search_by(|c| c.name.as_str().cmp(&channel.name))
        {
            Ok(i) => self.channels[i] = channel,
            Err(i) => self.channels.insert(i, channel),
        }
    }

    /// Looks up a channel by name.
    pub fn get(&self, name: &str) -> Option<&Channel> {
        self.channels
            .binary_search_by(|c| c.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.channels[i])
    }

    /// True when a channel of that name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Channels in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    /// Channel names in name order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.name.as_str())
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True when the list is empty.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Pixel data compression (`compression`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Compression {
    /// Uncompressed.
    No,
    /// Run-length encoding.
    Rle,
    /// Zlib, one scanline per block.
    Zips,
    /// Zlib, 16 scanlines per block.
    #[default]
    Zip,
    /// Wavelet.
    Piz,
    /// Lossy 24-bit float.
    Pxr24,
    /// Lossy 4x4 block.
    B44,
    /// B44 with flat-area optimization.
    B44a,
    /// Any method without a token.
    Unknown,
}

/// Scanline order (`lineOrder`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineOrder {
    /// Top to bottom.
    #[default]
    IncreasingY,
    /// Bottom to top.
    DecreasingY,
    /// Any order (tiled files).
    RandomY,
    /// Unrecognized order.
    Unknown,
}

/// Environment map layout (`envmap`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Envmap {
    /// Latitude-longitude.
    LatLong,
    /// Cube faces stacked vertically.
    Cube,
    /// Unrecognized layout.
    Unknown,
}
