use approx::assert_relative_eq;
use exr::prelude::{
    AnyChannel, AnyChannels, Encoding, FlatSamples, Image, Layer, LayerAttributes, SmallVec, Text,
    WritableImage,
};
use std::path::Path;
use tempfile::TempDir;
use vfx_attr::{AttrError, Attribute, AttributeKind, Compression, KindHints, SampleType};
use vfx_frame::{FrameError, InputFile, OutputFile, WriteOptions, is_exr_file};
use vfx_value::{NumericArray, Value};

fn ramp(shape: &[usize]) -> NumericArray {
    let len: usize = shape.iter().product();
    NumericArray::from_vec(shape, (0..len).map(|v| v as f32 * 0.5).collect::<Vec<f32>>()).unwrap()
}

fn v2f(x: f32, y: f32) -> Value {
    Value::from(NumericArray::vector(vec![x, y]))
}

fn box2i(min: (i32, i32), max: (i32, i32)) -> Value {
    Value::Cell(vec![
        Value::from(NumericArray::vector(vec![min.0, min.1])),
        Value::from(NumericArray::vector(vec![max.0, max.1])),
    ])
}

/// Writes a 2x2 `Y` image straight through the `exr` crate.
fn write_with_exr(path: &Path, attributes: LayerAttributes) {
    let channel = AnyChannel::new("Y", FlatSamples::F32(vec![0.25; 4]));
    let layer = Layer::new(
        (2, 2),
        attributes,
        Encoding::UNCOMPRESSED,
        AnyChannels::sort(SmallVec::from_vec(vec![channel])),
    );
    Image::from_layer(layer).write().non_parallel().to_file(path).unwrap();
}

#[test]
fn single_channel_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("z.exr");
    let pixels = ramp(&[3, 4]);

    let mut output = OutputFile::new(4, 3);
    output.declare_channels(&pixels, ["Z"]).unwrap();
    output.write_pixels(&path).unwrap();
    assert!(is_exr_file(&path));

    let mut input = InputFile::open(&path).unwrap();
    assert_eq!(input.dimensions(), (3, 4));
    assert_eq!(input.channel_names(), ["Z"]);
    assert_eq!(input.file_name(), path.display().to_string());
    input.declare_channels(["Z"]).unwrap();
    assert_eq!(input.read_pixels().unwrap(), pixels);
}

#[test]
fn tensor_rows_are_file_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tall.exr");
    // 3 columns, 4 rows
    let pixels = ramp(&[4, 3]);

    let mut output = OutputFile::new(3, 4);
    output.declare_y(&pixels).unwrap();
    output.write_pixels(&path).unwrap();

    let mut input = InputFile::open(&path).unwrap();
    assert_eq!((input.width(), input.height()), (3, 4));
    input.declare_y().unwrap();
    let back = input.read_pixels().unwrap();
    assert_eq!(back.shape(), &[4, 3]);
    assert_eq!(back, pixels);
}

#[test]
fn data_window_origin_survives() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("offset.exr");
    let pixels = ramp(&[3, 4, 3]);

    let mut output = OutputFile::new(4, 3).with_data_window_origin(5, -3).unwrap();
    output.declare_rgb(&pixels).unwrap();
    output.write_pixels(&path).unwrap();

    let mut input = InputFile::open(&path).unwrap();
    let window = input.data_window();
    assert_eq!((window.origin_x, window.origin_y), (5, -3));
    assert_eq!((window.width, window.height), (4, 3));
    input.declare_rgb().unwrap();
    assert_eq!(input.read_pixels().unwrap(), pixels);
}

#[test]
fn half_channels() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("half.exr");
    let pixels = ramp(&[2, 2, 3]);

    let mut output = OutputFile::new(2, 2)
        .with_options(WriteOptions::default().with_sample_type(SampleType::Half));
    output.declare_rgb(&pixels).unwrap();
    output.write_pixels(&path).unwrap();

    let mut input = InputFile::open(&path).unwrap();
    let channels = input.header().channels().cloned().unwrap();
    assert!(channels.iter().all(|c| c.sample_type == SampleType::Half));
    input.declare_rgb().unwrap();
    // multiples of 0.5 below 2048 are exact in half precision
    assert_eq!(input.read_pixels().unwrap(), pixels);
}

#[test]
fn missing_channel_is_filled() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("y.exr");
    let pixels = ramp(&[2, 3]);

    let mut output = OutputFile::new(3, 2);
    output.declare_y(&pixels).unwrap();
    output.write_pixels(&path).unwrap();

    let mut input = InputFile::open(&path).unwrap();
    input.declare_channels(["Y", "A"]).unwrap();
    let tensor = input.read_pixels().unwrap();
    assert_eq!(tensor.shape(), &[2, 3, 2]);
    assert_eq!(tensor.slab::<f32>(0), pixels.as_slice::<f32>());
    assert_eq!(tensor.slab::<f32>(1), Some(&[0.0f32; 6][..]));
}

#[test]
fn attributes_survive_the_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("meta.exr");
    let pixels = ramp(&[1, 2]);

    let chroma: Value = [
        ("red", v2f(0.713, 0.293)),
        ("green", v2f(0.165, 0.830)),
        ("blue", v2f(0.128, 0.044)),
        ("white", v2f(0.32168, 0.33767)),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    let values: Value = [
        ("gain", Value::from(2.5f32)),
        ("owner", Value::from("lighting")),
        ("shot", Value::from("sq010_sh020")),
        ("chromaticities", chroma.clone()),
        ("compression", Value::from("piz")),
        ("weights", Value::from(NumericArray::vector(vec![0.25f32, 0.5, 1.0]))),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    let hints: KindHints = [("weights".to_string(), AttributeKind::FloatVector)].into_iter().collect();

    let mut output = OutputFile::new(2, 1);
    output.set_attributes_with_hints(&values, &hints).unwrap();
    output
        .set_attribute_as("frame", AttributeKind::Int, &Value::from(1001i32))
        .unwrap();
    output.declare_y(&pixels).unwrap();
    output.write_pixels(&path).unwrap();

    let input = InputFile::open(&path).unwrap();
    assert_eq!(input.header().compression(), Compression::Piz);
    let all = input.attributes().unwrap();
    assert_eq!(all.get("owner"), Some(&Value::from("lighting")));
    assert_eq!(all.get("shot"), Some(&Value::from("sq010_sh020")));
    assert_eq!(all.get("compression"), Some(&Value::from("piz")));
    assert_eq!(all.get("frame"), Some(&Value::from(1001i32)));
    assert_eq!(all.get("chromaticities"), Some(&chroma));
    assert_eq!(
        all.get("weights"),
        Some(&Value::from(NumericArray::vector(vec![0.25f32, 0.5, 1.0])))
    );
    let gain = input.attribute("gain").unwrap();
    assert_relative_eq!(gain.as_numeric().and_then(|n| n.scalar_value::<f32>()).unwrap(), 2.5);
}

#[test]
fn standard_attributes_survive_the_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("standard.exr");
    let pixels = ramp(&[2, 2]);

    let values: Value = [
        ("wrapmodes", Value::from("clamp")),
        ("view", Value::from("left")),
        ("originalDataWindow", box2i((-8, -8), (9, 9))),
        ("near", Value::from(0.1f32)),
        ("far", Value::from(1000.0f32)),
        ("fieldOfViewHorizontal", Value::from(54.4f32)),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    let mut output = OutputFile::new(2, 2);
    output.set_attributes(&values).unwrap();
    output
        .set_attribute_as(
            "framesPerSecond",
            AttributeKind::IntVector,
            &Value::from(NumericArray::vector(vec![24000i32, 1001])),
        )
        .unwrap();
    output.declare_y(&pixels).unwrap();
    output.write_pixels(&path).unwrap();

    let input = InputFile::open(&path).unwrap();
    for key in ["wrapmodes", "view", "originalDataWindow", "near", "far", "fieldOfViewHorizontal"] {
        assert_eq!(input.attribute(key).ok().as_ref(), values.get(key), "{key}");
    }
    let mut fps = 24000i32.to_le_bytes().to_vec();
    fps.extend(1001u32.to_le_bytes());
    assert_eq!(
        input.header().get("framesPerSecond"),
        Some(&Attribute::Opaque {
            type_name: "rational".into(),
            bytes: fps,
        })
    );
    assert!(matches!(
        input.attribute("framesPerSecond"),
        Err(FrameError::Attr(AttrError::UnknownAttributeKind { .. }))
    ));
}

#[test]
fn standard_attributes_written_by_exr_are_listed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stereo.exr");

    let mut attributes = LayerAttributes::default();
    attributes.view_name = Some(Text::from("left"));
    attributes.wrap_mode_name = Some(Text::from("periodic"));
    attributes.owner = Some(Text::from_slice_unchecked("Grüße".as_bytes()));
    attributes.multi_view_names = Some(vec![Text::from("left"), Text::from("right")]);
    write_with_exr(&path, attributes);

    let input = InputFile::open(&path).unwrap();
    for key in ["view", "wrapmodes", "owner", "multiView"] {
        assert!(input.header().contains(key), "{key}");
    }
    assert_eq!(input.attribute("view").unwrap(), Value::from("left"));
    assert_eq!(input.attribute("wrapmodes").unwrap(), Value::from("periodic"));
    assert_eq!(input.attribute("owner").unwrap(), Value::from("Grüße"));
    assert_eq!(
        input.header().get("multiView").map(Attribute::type_name),
        Some("stringvector")
    );
}

#[test]
fn non_ascii_text_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("unicode.exr");
    let pixels = ramp(&[1, 1]);

    let mut output = OutputFile::new(1, 1);
    output.set_attribute("owner", &Value::from("東京")).unwrap();
    output.set_attribute("comments", &Value::from("Grüße")).unwrap();
    output.set_attribute("lens", &Value::from("50mm ƒ/1.4")).unwrap();
    output.declare_y(&pixels).unwrap();
    output.write_pixels(&path).unwrap();

    let input = InputFile::open(&path).unwrap();
    assert_eq!(input.attribute("owner").unwrap(), Value::from("東京"));
    assert_eq!(input.attribute("comments").unwrap(), Value::from("Grüße"));
    assert_eq!(input.attribute("lens").unwrap(), Value::from("50mm ƒ/1.4"));
}

#[test]
fn data_windows_at_the_coordinate_limits() {
    assert!(matches!(
        OutputFile::new(2, 1).with_data_window_origin(0, i32::MAX),
        Err(FrameError::WindowOverflow { .. })
    ));

    // the file format caps coordinates at half the i32 range
    let dir = TempDir::new().unwrap();
    let pixels = ramp(&[1, 2]);
    let mut output = OutputFile::new(2, 1).with_data_window_origin(0, i32::MAX - 1).unwrap();
    output.declare_y(&pixels).unwrap();
    assert!(output.write_pixels(dir.path().join("edge.exr")).is_err());

    let limit = i32::MAX / 2 - 2;
    let path = dir.path().join("far.exr");
    let mut output = OutputFile::new(2, 1).with_data_window_origin(-limit, limit).unwrap();
    output.declare_y(&pixels).unwrap();
    output.write_pixels(&path).unwrap();

    let mut input = InputFile::open(&path).unwrap();
    let window = input.data_window();
    assert_eq!((window.origin_x, window.origin_y), (-limit, limit));
    input.declare_y().unwrap();
    assert_eq!(input.read_pixels().unwrap(), pixels);
}

#[test]
fn not_an_exr_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "plain text").unwrap();
    assert!(!is_exr_file(&path));
    assert!(matches!(InputFile::open(&path), Err(FrameError::InvalidFile(_))));
}
