//! OpenEXR backend on top of the `exr` crate.
//!
//! [`ExrInput`] decodes the first flat layer of a file into a header and
//! float planes, then serves rows from memory. [`ExrOutput`] collects the
//! planes of a write pass and encodes them as one scanline layer.
//!
//! Attributes the `exr` crate keeps in typed fields are mapped to their
//! standard header names; everything else travels through the layer's
//! free-form attribute table. Standard attributes without a native kind
//! (`framesPerSecond`, `keyCode`, `timeCode` and friends) surface as opaque
//! attributes holding their file serialization, and are written back from it.
//! Text is UTF-8.

use crate::error::{FrameError, FrameResult};
use crate::frame_buffer::{ConstFrameBuffer, FrameBuffer};
use crate::library::{ImageInput, OutputTarget, collect_planes};
use crate::memory::MemoryImage;
use crate::window::DataWindow;
use exr::image::write::WritableImage;
use exr::image::{AnyChannel, AnyChannels, Blocks, Encoding, FlatSamples, Image, Layer};
use exr::math::Vec2;
use exr::meta::attribute::{self as exr_attr, AttributeValue, IntegerBounds, Text};
use exr::meta::header::{ImageAttributes, LayerAttributes, standard_names};
use half::f16;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use vfx_attr::{
    Attribute, Box2, Box2i, Channel, ChannelList, Chromaticities, Compression, Envmap, Header,
    LineOrder, SampleType, V2,
};
use vfx_attr::header::{CHANNELS, COMPRESSION, DATA_WINDOW, DISPLAY_WINDOW, LINE_ORDER};

/// First four bytes of every OpenEXR file.
pub const MAGIC: [u8; 4] = [0x76, 0x2f, 0x31, 0x01];

/// True when `path` starts with the OpenEXR magic number.
pub fn is_exr_file(path: impl AsRef<Path>) -> bool {
    let mut magic = [0u8; 4];
    File::open(path)
        .and_then(|mut file| file.read_exact(&mut magic))
        .map(|_| magic == MAGIC)
        .unwrap_or(false)
}

// ============================================================================
// Reading
// ============================================================================

/// OpenEXR file opened for reading.
#[derive(Debug)]
pub struct ExrInput {
    file_name: String,
    image: MemoryImage,
}

impl ExrInput {
    /// Reads the header and pixels of the first layer of `path`.
    pub fn open(path: impl AsRef<Path>) -> FrameResult<Self> {
        let path = path.as_ref();
        let file_name = path.display().to_string();
        if !is_exr_file(path) {
            if !path.exists() {
                return Err(FrameError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{file_name}: file not found"),
                )));
            }
            return Err(FrameError::InvalidFile(file_name));
        }

        let image = exr::prelude::read_first_flat_layer_from_file(path)?;
        let layer = &image.layer_data;
        let mut header = Header::default();
        read_image_attributes(&image.attributes, &mut header);
        read_layer_attributes(&layer.attributes, &mut header);

        let window = DataWindow::new(layer.size.0, layer.size.1).with_origin(
            layer.attributes.layer_position.0,
            layer.attributes.layer_position.1,
        );
        header.set_data_window(window.to_box());
        header.insert(COMPRESSION, Attribute::Compression(compression_from_exr(layer.encoding.compression)));
        header.insert(LINE_ORDER, Attribute::LineOrder(line_order_from_exr(layer.encoding.line_order)));

        let mut channels = Vec::with_capacity(layer.channel_data.list.len());
        let mut planes = BTreeMap::new();
        for channel in &layer.channel_data.list {
            let name = decode_text(&channel.name);
            let sample_type = match channel.sample_data {
                FlatSamples::F16(_) => SampleType::Half,
                FlatSamples::F32(_) => SampleType::Float,
                FlatSamples::U32(_) => SampleType::Uint,
            };
            let mut descriptor = Channel::new(name.clone(), sample_type);
            descriptor.x_sampling = channel.sampling.0 as i32;
            descriptor.y_sampling = channel.sampling.1 as i32;
            descriptor.p_linear = channel.quantize_linearly;

            if descriptor.is_full_resolution() {
                planes.insert(name, channel.sample_data.values_as_f32().collect::<Vec<f32>>());
            } else {
                warn!(file = %file_name, channel = %name, "subsampled channel is not read");
            }
            channels.push(descriptor);
        }
        header.insert(CHANNELS, Attribute::ChannelList(ChannelList::new(channels)));

        debug!(file = %file_name, attributes = header.len(), channels = planes.len(), "opened OpenEXR file");
        Ok(Self {
            file_name,
            image: MemoryImage::from_parts(header, planes),
        })
    }
}

impl ImageInput for ExrInput {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn header(&self) -> &Header {
        self.image.header()
    }

    fn read_pixels(&mut self, frame_buffer: &mut FrameBuffer<'_>, rows: Range<i32>) -> FrameResult<()> {
        trace!(file = %self.file_name, rows = ?rows, "reading rows");
        self.image.read_pixels(frame_buffer, rows)
    }
}

fn read_image_attributes(attributes: &ImageAttributes, header: &mut Header) {
    header.insert(DISPLAY_WINDOW, Attribute::Box2i(box_from_bounds(&attributes.display_window)));
    header.insert("pixelAspectRatio", Attribute::Float(attributes.pixel_aspect));
    if let Some(chromaticities) = &attributes.chromaticities {
        header.insert("chromaticities", Attribute::Chromaticities(chromaticities_from_exr(chromaticities)));
    }
    if let Some(time_code) = attributes.time_code {
        header.insert("timeCode", native_opaque(&AttributeValue::TimeCode(time_code)));
    }
    read_other(&attributes.other, header);
}

fn read_layer_attributes(attributes: &LayerAttributes, header: &mut Header) {
    let text = |value: &Option<Text>| value.as_ref().map(|t| Attribute::String(decode_text(t)));
    let float = |value: Option<f32>| value.map(Attribute::Float);
    let native = |value: Option<AttributeValue>| value.map(|v| native_opaque(&v));

    let typed = [
        ("name", text(&attributes.layer_name)),
        ("owner", text(&attributes.owner)),
        ("comments", text(&attributes.comments)),
        ("capDate", text(&attributes.capture_date)),
        ("renderingTransform", text(&attributes.rendering_transform_name)),
        ("lookModTransform", text(&attributes.look_modification_transform_name)),
        ("software", text(&attributes.software_name)),
        ("wrapmodes", text(&attributes.wrap_mode_name)),
        ("view", text(&attributes.view_name)),
        ("utcOffset", float(attributes.utc_offset)),
        ("longitude", float(attributes.longitude)),
        ("latitude", float(attributes.latitude)),
        ("altitude", float(attributes.altitude)),
        ("focus", float(attributes.focus)),
        ("expTime", float(attributes.exposure)),
        ("aperture", float(attributes.aperture)),
        ("isoSpeed", float(attributes.iso_speed)),
        ("whiteLuminance", float(attributes.white_luminance)),
        ("xDensity", float(attributes.horizontal_density)),
        ("near", float(attributes.near_clip_plane)),
        ("far", float(attributes.far_clip_plane)),
        ("fieldOfViewHorizontal", float(attributes.horizontal_field_of_view)),
        ("fieldOfViewVertical", float(attributes.vertical_field_of_view)),
        ("adoptedNeutral", attributes.adopted_neutral.map(|v| Attribute::V2f(V2::new(v.0, v.1)))),
        ("envmap", attributes.environment_map.map(|e| Attribute::Envmap(envmap_from_exr(e)))),
        (
            "originalDataWindow",
            attributes.original_data_window.as_ref().map(|b| Attribute::Box2i(box_from_bounds(b))),
        ),
        (
            "screenWindowCenter",
            Some(Attribute::V2f(V2::new(attributes.screen_window_center.0, attributes.screen_window_center.1))),
        ),
        ("screenWindowWidth", Some(Attribute::Float(attributes.screen_window_width))),
        // no native kind: kept as their serialized payload
        ("framesPerSecond", native(attributes.frames_per_second.map(AttributeValue::Rational))),
        ("deepImageState", native(attributes.deep_image_state.map(AttributeValue::Rational))),
        ("worldToCamera", native(attributes.world_to_camera.map(AttributeValue::Matrix4x4))),
        ("worldToNDC", native(attributes.world_to_normalized_device.map(AttributeValue::Matrix4x4))),
        ("keyCode", native(attributes.film_key_code.map(AttributeValue::KeyCode))),
        ("multiView", native(attributes.multi_view_names.clone().map(AttributeValue::TextVector))),
        ("preview", native(attributes.preview.clone().map(AttributeValue::Preview))),
    ];
    for (name, attribute) in typed {
        if let Some(attribute) = attribute {
            header.insert(name, attribute);
        }
    }
    read_other(&attributes.other, header);
}

fn read_other<'a>(other: impl IntoIterator<Item = (&'a Text, &'a AttributeValue)>, header: &mut Header) {
    for (name, value) in other {
        let name = decode_text(name);
        match attribute_from_exr(value) {
            Some(attribute) => {
                header.insert(name, attribute);
            }
            None => trace!(attribute = %name, "attribute skipped"),
        }
    }
}

/// Attribute text is UTF-8. Files written by older tools may carry Latin-1,
/// which is taken byte for byte.
fn decode_text(text: &Text) -> String {
    match std::str::from_utf8(text.bytes()) {
        Ok(s) => s.to_string(),
        Err(_) => text.bytes().iter().map(|&b| char::from(b)).collect(),
    }
}

fn attribute_from_exr(value: &AttributeValue) -> Option<Attribute> {
    let attribute = match value {
        AttributeValue::ChannelList(_) => return None,
        AttributeValue::Chromaticities(c) => Attribute::Chromaticities(chromaticities_from_exr(c)),
        AttributeValue::Compression(c) => Attribute::Compression(compression_from_exr(*c)),
        AttributeValue::EnvironmentMap(e) => Attribute::Envmap(envmap_from_exr(*e)),
        AttributeValue::LineOrder(l) => Attribute::LineOrder(line_order_from_exr(*l)),
        AttributeValue::Text(t) => Attribute::String(decode_text(t)),
        AttributeValue::F64(v) => Attribute::Double(*v),
        AttributeValue::F32(v) => Attribute::Float(*v),
        AttributeValue::I32(v) => Attribute::Int(*v),
        AttributeValue::IntegerBounds(b) => Attribute::Box2i(box_from_bounds(b)),
        AttributeValue::FloatRect(r) => {
            Attribute::Box2f(Box2::new(V2::new(r.min.0, r.min.1), V2::new(r.max.0, r.max.1)))
        }
        AttributeValue::IntVec2(v) => Attribute::V2i(V2::new(v.0, v.1)),
        AttributeValue::FloatVec2(v) => Attribute::V2f(V2::new(v.0, v.1)),
        AttributeValue::Custom { kind, bytes } => {
            let type_name = decode_text(kind);
            match type_name.as_str() {
                "floatvector" => Attribute::FloatVector(words(bytes).map(f32::from_le_bytes).collect()),
                "intvector" => Attribute::IntVector(words(bytes).map(i32::from_le_bytes).collect()),
                _ => Attribute::Opaque {
                    type_name,
                    bytes: bytes.to_vec(),
                },
            }
        }
        other => native_opaque(other),
    };
    Some(attribute)
}

fn words(bytes: &[u8]) -> impl Iterator<Item = [u8; 4]> + '_ {
    bytes.chunks_exact(4).map(|b| [b[0], b[1], b[2], b[3]])
}

/// Opaque attribute carrying the little-endian file serialization of a
/// value without a native kind.
fn native_opaque(value: &AttributeValue) -> Attribute {
    let mut bytes = Vec::new();
    match value {
        AttributeValue::Rational((numerator, denominator)) => {
            bytes.extend(numerator.to_le_bytes());
            bytes.extend(denominator.to_le_bytes());
        }
        AttributeValue::Matrix3x3(m) => bytes.extend(m.iter().flat_map(|v| v.to_le_bytes())),
        AttributeValue::Matrix4x4(m) => bytes.extend(m.iter().flat_map(|v| v.to_le_bytes())),
        AttributeValue::IntVec3((x, y, z)) => bytes.extend([x, y, z].iter().flat_map(|v| v.to_le_bytes())),
        AttributeValue::FloatVec3((x, y, z)) => bytes.extend([x, y, z].iter().flat_map(|v| v.to_le_bytes())),
        AttributeValue::KeyCode(k) => bytes.extend(
            [
                k.film_manufacturer_code,
                k.film_type,
                k.film_roll_prefix,
                k.count,
                k.perforation_offset,
                k.perforations_per_frame,
                k.perforations_per_count,
            ]
            .iter()
            .flat_map(|v| v.to_le_bytes()),
        ),
        AttributeValue::TextVector(texts) => {
            for text in texts {
                bytes.extend((text.bytes().len() as i32).to_le_bytes());
                bytes.extend_from_slice(text.bytes());
            }
        }
        AttributeValue::TimeCode(time_code) => match time_code.pack_time_as_tv60_u32() {
            Ok(time) => {
                bytes.extend(time.to_le_bytes());
                bytes.extend(time_code.pack_user_data_as_u32().to_le_bytes());
            }
            Err(err) => warn!(error = %err, "time code cannot be packed"),
        },
        AttributeValue::Preview(preview) => {
            bytes.extend((preview.size.0 as u32).to_le_bytes());
            bytes.extend((preview.size.1 as u32).to_le_bytes());
            bytes.extend(preview.pixel_data.iter().map(|&v| v as u8));
        }
        _ => {}
    }
    Attribute::Opaque {
        type_name: String::from_utf8_lossy(value.kind_name()).into_owned(),
        bytes,
    }
}

fn box_from_bounds(bounds: &IntegerBounds) -> Box2i {
    Box2i::from_origin_size(bounds.position.0, bounds.position.1, bounds.size.0, bounds.size.1)
}

fn chromaticities_from_exr(c: &exr_attr::Chromaticities) -> Chromaticities {
    let v = |p: Vec2<f32>| V2::new(p.0, p.1);
    Chromaticities {
        red: v(c.red),
        green: v(c.green),
        blue: v(c.blue),
        white: v(c.white),
    }
}

fn compression_from_exr(compression: exr::compression::Compression) -> Compression {
    use exr::compression::Compression as C;
    match compression {
        C::Uncompressed => Compression::No,
        C::RLE => Compression::Rle,
        C::ZIP1 => Compression::Zips,
        C::ZIP16 => Compression::Zip,
        C::PIZ => Compression::Piz,
        C::PXR24 => Compression::Pxr24,
        C::B44 => Compression::B44,
        C::B44A => Compression::B44a,
        _ => Compression::Unknown,
    }
}

fn line_order_from_exr(order: exr_attr::LineOrder) -> LineOrder {
    match order {
        exr_attr::LineOrder::Increasing => LineOrder::IncreasingY,
        exr_attr::LineOrder::Decreasing => LineOrder::DecreasingY,
        exr_attr::LineOrder::Unspecified => LineOrder::RandomY,
    }
}

fn envmap_from_exr(envmap: exr_attr::EnvironmentMap) -> Envmap {
    match envmap {
        exr_attr::EnvironmentMap::LatitudeLongitude => Envmap::LatLong,
        exr_attr::EnvironmentMap::Cube => Envmap::Cube,
    }
}

// ============================================================================
// Writing
// ============================================================================

/// OpenEXR file to be written.
///
/// Nothing touches the disk until the write pass delivers the pixels.
#[derive(Debug, Clone)]
pub struct ExrOutput {
    path: PathBuf,
}

impl ExrOutput {
    /// Output that will create or replace `path`.
    pub fn create(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputTarget for ExrOutput {
    fn write_pixels(
        &mut self,
        header: &Header,
        frame_buffer: &ConstFrameBuffer<'_>,
        rows: Range<i32>,
    ) -> FrameResult<()> {
        let window = DataWindow::from_header(header)?;
        let mut planes = collect_planes(&window, frame_buffer, rows)?;

        let mut channels: SmallVec<[AnyChannel<FlatSamples>; 4]> = SmallVec::new();
        if let Some(list) = header.channels() {
            for channel in list.iter() {
                if !channel.is_full_resolution() {
                    warn!(channel = %channel.name, "subsampled channel is not written");
                    continue;
                }
                let name = text(&channel.name);
                let plane = planes
                    .remove(&channel.name)
                    .unwrap_or_else(|| vec![0.0; window.pixel_count()]);
                let mut any = AnyChannel::new(name, samples(plane, channel.sample_type));
                any.quantize_linearly = channel.p_linear;
                channels.push(any);
            }
        }
        if channels.is_empty() {
            return Err(FrameError::Unsupported("image without channels".into()));
        }

        let compression = compression_to_exr(header.compression())?;
        let encoding = Encoding {
            compression,
            blocks: Blocks::ScanLines,
            line_order: line_order_to_exr(header.line_order()),
        };

        let mut layer_attributes = LayerAttributes::default();
        layer_attributes.layer_position = Vec2(window.origin_x, window.origin_y);
        let display = header.display_window().unwrap_or_else(|_| window.to_box());
        let mut image_attributes = ImageAttributes::new(bounds_from_box(&display));
        for (name, attribute) in header.iter() {
            store_attribute(name, attribute, &mut image_attributes, &mut layer_attributes)?;
        }

        let layer = Layer::new(
            Vec2(window.width, window.height),
            layer_attributes,
            encoding,
            AnyChannels::sort(channels),
        );
        let image = Image {
            attributes: image_attributes,
            layer_data: layer,
        };
        image.write().non_parallel().to_file(&self.path)?;
        debug!(file = %self.path.display(), width = window.width, height = window.height, "wrote OpenEXR file");
        Ok(())
    }
}

fn samples(plane: Vec<f32>, sample_type: SampleType) -> FlatSamples {
    match sample_type {
        SampleType::Float => FlatSamples::F32(plane),
        SampleType::Half => FlatSamples::F16(plane.into_iter().map(f16::from_f32).collect()),
        SampleType::Uint => FlatSamples::U32(plane.into_iter().map(|v| v.max(0.0) as u32).collect()),
    }
}

fn text(value: &str) -> Text {
    Text::from_slice_unchecked(value.as_bytes())
}

fn mismatch(name: &str, attribute: &Attribute) -> FrameError {
    FrameError::Unsupported(format!(
        "attribute '{name}' cannot be stored as {}",
        attribute.type_name()
    ))
}

/// True for names the OpenEXR format reserves for its standard attributes.
fn is_reserved(name: &str) -> bool {
    standard_names::ALL.iter().any(|reserved| *reserved == name.as_bytes())
}

/// Puts one header attribute where the `exr` crate expects it.
fn store_attribute(
    name: &str,
    attribute: &Attribute,
    image: &mut ImageAttributes,
    layer: &mut LayerAttributes,
) -> FrameResult<()> {
    match (name, attribute) {
        // carried by the layer geometry and encoding
        (CHANNELS | DATA_WINDOW | DISPLAY_WINDOW, _)
        | (COMPRESSION, Attribute::Compression(_))
        | (LINE_ORDER, Attribute::LineOrder(_)) => {}

        (_, Attribute::Opaque { bytes, .. }) if bytes.is_empty() => {
            warn!(attribute = name, type_name = attribute.type_name(), "attribute without payload is not written");
        }

        ("pixelAspectRatio", Attribute::Float(v)) => image.pixel_aspect = *v,
        ("chromaticities", Attribute::Chromaticities(c)) => image.chromaticities = Some(chromaticities_to_exr(c)),
        ("timeCode", _) => image.time_code = Some(time_code_field(name, attribute)?),
        ("screenWindowCenter", Attribute::V2f(v)) => layer.screen_window_center = Vec2(v.x, v.y),
        ("screenWindowWidth", Attribute::Float(v)) => layer.screen_window_width = *v,

        ("name", Attribute::String(s)) => layer.layer_name = Some(text(s)),
        ("owner", Attribute::String(s)) => layer.owner = Some(text(s)),
        ("comments", Attribute::String(s)) => layer.comments = Some(text(s)),
        ("capDate", Attribute::String(s)) => layer.capture_date = Some(text(s)),
        ("renderingTransform", Attribute::String(s)) => layer.rendering_transform_name = Some(text(s)),
        ("lookModTransform", Attribute::String(s)) => layer.look_modification_transform_name = Some(text(s)),
        ("software", Attribute::String(s)) => layer.software_name = Some(text(s)),
        ("wrapmodes", Attribute::String(s)) => layer.wrap_mode_name = Some(text(s)),
        ("view", Attribute::String(s)) => layer.view_name = Some(text(s)),

        ("utcOffset", Attribute::Float(v)) => layer.utc_offset = Some(*v),
        ("longitude", Attribute::Float(v)) => layer.longitude = Some(*v),
        ("latitude", Attribute::Float(v)) => layer.latitude = Some(*v),
        ("altitude", Attribute::Float(v)) => layer.altitude = Some(*v),
        ("focus", Attribute::Float(v)) => layer.focus = Some(*v),
        ("expTime", Attribute::Float(v)) => layer.exposure = Some(*v),
        ("aperture", Attribute::Float(v)) => layer.aperture = Some(*v),
        ("isoSpeed", Attribute::Float(v)) => layer.iso_speed = Some(*v),
        ("whiteLuminance", Attribute::Float(v)) => layer.white_luminance = Some(*v),
        ("xDensity", Attribute::Float(v)) => layer.horizontal_density = Some(*v),
        ("near", Attribute::Float(v)) => layer.near_clip_plane = Some(*v),
        ("far", Attribute::Float(v)) => layer.far_clip_plane = Some(*v),
        ("fieldOfViewHorizontal", Attribute::Float(v)) => layer.horizontal_field_of_view = Some(*v),
        ("fieldOfViewVertical", Attribute::Float(v)) => layer.vertical_field_of_view = Some(*v),
        ("adoptedNeutral", Attribute::V2f(v)) => layer.adopted_neutral = Some(Vec2(v.x, v.y)),
        ("originalDataWindow", Attribute::Box2i(b)) => layer.original_data_window = Some(bounds_from_box(b)),
        ("envmap", Attribute::Envmap(e)) => match envmap_to_exr(*e) {
            Some(envmap) => layer.environment_map = Some(envmap),
            None => warn!(attribute = name, "unknown environment map is not written"),
        },

        ("framesPerSecond", _) => layer.frames_per_second = Some(rational_field(name, attribute)?),
        ("deepImageState", _) => layer.deep_image_state = Some(rational_field(name, attribute)?),
        ("worldToCamera", _) => layer.world_to_camera = Some(matrix_field(name, attribute)?),
        ("worldToNDC", _) => layer.world_to_normalized_device = Some(matrix_field(name, attribute)?),
        ("keyCode", _) => layer.film_key_code = Some(key_code_field(name, attribute)?),
        ("multiView", _) => layer.multi_view_names = Some(text_vector_field(name, attribute)?),
        ("preview", _) => layer.preview = Some(preview_field(name, attribute)?),

        _ if is_reserved(name) => return Err(mismatch(name, attribute)),
        _ => match attribute_to_exr(attribute)? {
            Some(value) => {
                layer.other.insert(text(name), value);
            }
            None => warn!(attribute = name, type_name = attribute.type_name(), "attribute is not written"),
        },
    }
    Ok(())
}

fn attribute_to_exr(attribute: &Attribute) -> FrameResult<Option<AttributeValue>> {
    let custom = |kind: &str, bytes: Vec<u8>| AttributeValue::Custom { kind: text(kind), bytes: bytes.into() };
    let value = match attribute {
        Attribute::Box2f(b) => AttributeValue::FloatRect(exr_attr::FloatRect {
            min: Vec2(b.min.x, b.min.y),
            max: Vec2(b.max.x, b.max.y),
        }),
        Attribute::Box2i(b) => AttributeValue::IntegerBounds(bounds_from_box(b)),
        Attribute::Chromaticities(c) => AttributeValue::Chromaticities(chromaticities_to_exr(c)),
        Attribute::Compression(c) => AttributeValue::Compression(compression_to_exr(*c)?),
        Attribute::Double(v) => AttributeValue::F64(*v),
        Attribute::Envmap(e) => match envmap_to_exr(*e) {
            Some(envmap) => AttributeValue::EnvironmentMap(envmap),
            None => return Ok(None),
        },
        Attribute::Float(v) => AttributeValue::F32(*v),
        Attribute::FloatVector(values) => {
            custom("floatvector", values.iter().flat_map(|v| v.to_le_bytes()).collect())
        }
        Attribute::Int(v) => AttributeValue::I32(*v),
        Attribute::IntVector(values) => custom("intvector", values.iter().flat_map(|v| v.to_le_bytes()).collect()),
        Attribute::LineOrder(l) => AttributeValue::LineOrder(line_order_to_exr(*l)),
        Attribute::String(s) => AttributeValue::Text(text(s)),
        Attribute::V2f(v) => AttributeValue::FloatVec2(Vec2(v.x, v.y)),
        Attribute::V2i(v) => AttributeValue::IntVec2(Vec2(v.x, v.y)),
        Attribute::ChannelList(_) => return Ok(None),
        Attribute::Opaque { bytes, .. } if bytes.is_empty() => return Ok(None),
        Attribute::Opaque { type_name, bytes } => custom(type_name, bytes.clone()),
    };
    Ok(Some(value))
}

fn bounds_from_box(b: &Box2i) -> IntegerBounds {
    IntegerBounds::new(Vec2(b.min.x, b.min.y), Vec2(b.width(), b.height()))
}

// ----------------------------------------------------------------------------
// Standard attributes without a native kind
// ----------------------------------------------------------------------------

/// Payload of an opaque attribute of the given native type.
fn payload<'a>(name: &str, attribute: &'a Attribute, type_name: &str) -> FrameResult<&'a [u8]> {
    match attribute {
        Attribute::Opaque { type_name: found, bytes } if found == type_name => Ok(bytes),
        _ => Err(mismatch(name, attribute)),
    }
}

/// Payload split into exactly `N` four-byte words.
fn fixed_words<const N: usize>(name: &str, attribute: &Attribute, type_name: &str) -> FrameResult<[[u8; 4]; N]> {
    let bytes = payload(name, attribute, type_name)?;
    if bytes.len() != 4 * N {
        return Err(mismatch(name, attribute));
    }
    let mut out = [[0u8; 4]; N];
    for (word, chunk) in out.iter_mut().zip(words(bytes)) {
        *word = chunk;
    }
    Ok(out)
}

/// `rational` payload, or `[numerator, denominator]` as an int vector.
fn rational_field(name: &str, attribute: &Attribute) -> FrameResult<exr_attr::Rational> {
    match attribute {
        Attribute::IntVector(v) if v.len() == 2 => {
            let denominator = u32::try_from(v[1]).map_err(|_| mismatch(name, attribute))?;
            Ok((v[0], denominator))
        }
        _ => {
            let [numerator, denominator] = fixed_words::<2>(name, attribute, "rational")?;
            Ok((i32::from_le_bytes(numerator), u32::from_le_bytes(denominator)))
        }
    }
}

/// `m44f` payload, or sixteen row-major floats.
fn matrix_field(name: &str, attribute: &Attribute) -> FrameResult<exr_attr::Matrix4x4> {
    match attribute {
        Attribute::FloatVector(v) => <[f32; 16]>::try_from(v.as_slice()).map_err(|_| mismatch(name, attribute)),
        _ => Ok(fixed_words::<16>(name, attribute, "m44f")?.map(f32::from_le_bytes)),
    }
}

/// `keycode` payload, or its seven fields as an int vector.
fn key_code_field(name: &str, attribute: &Attribute) -> FrameResult<exr_attr::KeyCode> {
    let v: [i32; 7] = match attribute {
        Attribute::IntVector(v) => <[i32; 7]>::try_from(v.as_slice()).map_err(|_| mismatch(name, attribute))?,
        _ => fixed_words::<7>(name, attribute, "keycode")?.map(i32::from_le_bytes),
    };
    Ok(exr_attr::KeyCode {
        film_manufacturer_code: v[0],
        film_type: v[1],
        film_roll_prefix: v[2],
        count: v[3],
        perforation_offset: v[4],
        perforations_per_frame: v[5],
        perforations_per_count: v[6],
    })
}

fn time_code_field(name: &str, attribute: &Attribute) -> FrameResult<exr_attr::TimeCode> {
    let [time, user_data] = fixed_words::<2>(name, attribute, "timecode")?.map(u32::from_le_bytes);
    Ok(exr_attr::TimeCode::from_tv60_time(time, user_data))
}

/// `stringvector` payload: length-prefixed strings back to back.
fn text_vector_field(name: &str, attribute: &Attribute) -> FrameResult<Vec<Text>> {
    let mut rest = payload(name, attribute, "stringvector")?;
    let mut texts = Vec::new();
    while !rest.is_empty() {
        let len = match rest {
            [a, b, c, d, ..] => usize::try_from(i32::from_le_bytes([*a, *b, *c, *d])).ok(),
            _ => None,
        }
        .filter(|&len| len <= rest.len() - 4)
        .ok_or_else(|| mismatch(name, attribute))?;
        texts.push(Text::from_slice_unchecked(&rest[4..4 + len]));
        rest = &rest[4 + len..];
    }
    Ok(texts)
}

/// `preview` payload: width, height, then 8-bit RGBA rows.
fn preview_field(name: &str, attribute: &Attribute) -> FrameResult<exr_attr::Preview> {
    let bytes = payload(name, attribute, "preview")?;
    let (size, pixels) = bytes.split_at_checked(8).ok_or_else(|| mismatch(name, attribute))?;
    let dim = |at: usize| u32::from_le_bytes([size[at], size[at + 1], size[at + 2], size[at + 3]]) as usize;
    let (width, height) = (dim(0), dim(4));
    if width.checked_mul(height).and_then(|n| n.checked_mul(4)) != Some(pixels.len()) {
        return Err(mismatch(name, attribute));
    }
    Ok(exr_attr::Preview {
        size: Vec2(width, height),
        pixel_data: pixels.iter().map(|&v| v as i8).collect(),
    })
}

fn chromaticities_to_exr(c: &Chromaticities) -> exr_attr::Chromaticities {
    let v = |p: V2<f32>| Vec2(p.x, p.y);
    exr_attr::Chromaticities {
        red: v(c.red),
        green: v(c.green),
        blue: v(c.blue),
        white: v(c.white),
    }
}

fn compression_to_exr(compression: Compression) -> FrameResult<exr::compression::Compression> {
    use exr::compression::Compression as C;
    Ok(match compression {
        Compression::No => C::Uncompressed,
        Compression::Rle => C::RLE,
        Compression::Zips => C::ZIP1,
        Compression::Zip => C::ZIP16,
        Compression::Piz => C::PIZ,
        Compression::Pxr24 => C::PXR24,
        Compression::B44 => C::B44,
        Compression::B44a => C::B44A,
        Compression::Unknown => {
            return Err(FrameError::Unsupported("unknown compression".into()));
        }
    })
}

fn line_order_to_exr(order: LineOrder) -> exr_attr::LineOrder {
    match order {
        LineOrder::DecreasingY => exr_attr::LineOrder::Decreasing,
        LineOrder::RandomY => exr_attr::LineOrder::Unspecified,
        LineOrder::IncreasingY | LineOrder::Unknown => exr_attr::LineOrder::Increasing,
    }
}

fn envmap_to_exr(envmap: Envmap) -> Option<exr_attr::EnvironmentMap> {
    match envmap {
        Envmap::LatLong => Some(exr_attr::EnvironmentMap::LatitudeLongitude),
        Envmap::Cube => Some(exr_attr::EnvironmentMap::Cube),
        Envmap::Unknown => None,
    }
}
