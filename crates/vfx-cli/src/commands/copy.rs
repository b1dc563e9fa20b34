//! Copy command: read channels into a tensor, write them to a new image.
//!
//! The output keeps every writable attribute of the input as is. Overrides
//! from `--attrs` are encoded with `--kind` hints or the default kind for
//! their key, and are applied all at once.

use crate::CopyArgs;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use vfx_attr::header::{CHANNELS, DATA_WINDOW};
use vfx_attr::{Attribute, Compression, Header, KindHints, SampleType};
use vfx_frame::{OutputFile, WriteOptions};
use vfx_value::Value;

/// Runs the copy command.
pub fn run(args: CopyArgs, verbose: u8) -> Result<()> {
    let mut input = super::open_input(&args.input)?;
    let channels = if args.channels.is_empty() {
        input.channel_names()
    } else {
        args.channels.clone()
    };
    if channels.is_empty() {
        bail!("{} has no channels", args.input.display());
    }

    input.declare_channels(channels.iter().cloned())?;
    let pixels = input
        .read_pixels()
        .with_context(|| format!("Failed to read pixels: {}", args.input.display()))?;

    let window = input.data_window();
    let (x, y) = args.origin.unwrap_or((window.origin_x, window.origin_y));
    let sample_type = if args.half { SampleType::Half } else { SampleType::Float };
    let mut output = OutputFile::new(window.width, window.height)
        .with_data_window_origin(x, y)?
        .with_options(WriteOptions::default().with_sample_type(sample_type));

    for (name, attribute) in copyable_attributes(input.header()) {
        output.insert_attribute(name, attribute.clone());
    }
    if let Some(path) = &args.attrs {
        let overrides = load_overrides(path)?;
        let hints: KindHints = args.kinds.iter().cloned().collect();
        output
            .set_attributes_with_hints(&overrides, &hints)
            .with_context(|| format!("Invalid attributes in {}", path.display()))?;
    } else if !args.kinds.is_empty() {
        warn!("--kind given without --attrs, ignored");
    }

    output.declare_channels(&pixels, channels.iter().cloned())?;
    output
        .write_pixels(&args.output)
        .with_context(|| format!("Failed to write: {}", args.output.display()))?;

    info!(input = %args.input.display(), output = %args.output.display(), channels = channels.len(), "copied");
    if verbose > 0 {
        println!(
            "{} -> {} ({}x{}, {})",
            args.input.display(),
            args.output.display(),
            window.width,
            window.height,
            channels.join(",")
        );
    }
    Ok(())
}

/// Input attributes that can be carried to the output unchanged.
fn copyable_attributes(header: &Header) -> impl Iterator<Item = (&str, &Attribute)> {
    header.iter().filter(|(name, attribute)| {
        let structural = *name == CHANNELS || *name == DATA_WINDOW;
        let keep = !structural
            && attribute.kind().is_writable()
            && !matches!(attribute, Attribute::Compression(Compression::Unknown));
        if !keep && !structural {
            warn!(attribute = name, type_name = attribute.type_name(), "attribute not copied");
        }
        keep
    })
}

/// Reads a JSON struct of attribute values.
fn load_overrides(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read: {}", path.display()))?;
    let value: Value = serde_json::from_str(&text).with_context(|| format!("Invalid JSON: {}", path.display()))?;
    if value.as_struct().is_none() {
        bail!("{} must hold a JSON object", path.display());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::open_input;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use vfx_attr::AttributeKind;
    use vfx_value::NumericArray;

    fn write_source(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("source.exr");
        let pixels = NumericArray::from_vec(&[2, 2, 3], (0..12).map(|v| v as f32).collect::<Vec<f32>>()).unwrap();
        let mut output = OutputFile::new(2, 2).with_data_window_origin(3, 4).unwrap();
        output.set_attribute("owner", &Value::from("plates")).unwrap();
        output.declare_rgb(&pixels).unwrap();
        output.write_pixels(&path).unwrap();
        path
    }

    fn args(input: PathBuf, output: PathBuf) -> CopyArgs {
        CopyArgs {
            input,
            output,
            channels: Vec::new(),
            attrs: None,
            kinds: Vec::new(),
            half: false,
            origin: None,
        }
    }

    #[test]
    fn copies_pixels_and_attributes() {
        let dir = TempDir::new().unwrap();
        let source = write_source(&dir);
        let target = dir.path().join("copy.exr");

        run(args(source.clone(), target.clone()), 0).unwrap();

        let mut original = open_input(&source).unwrap();
        let mut copy = open_input(&target).unwrap();
        assert_eq!(copy.data_window(), original.data_window());
        assert_eq!(copy.attribute("owner").unwrap(), Value::from("plates"));
        original.declare_rgb().unwrap();
        copy.declare_rgb().unwrap();
        assert_eq!(copy.read_pixels().unwrap(), original.read_pixels().unwrap());
    }

    #[test]
    fn overrides_channels_and_origin() {
        let dir = TempDir::new().unwrap();
        let source = write_source(&dir);
        let target = dir.path().join("green.exr");
        let attrs = dir.path().join("attrs.json");
        fs::write(&attrs, r#"{"frame": {"type": "int32", "shape": [1], "data": [1001]}, "owner": "comp"}"#).unwrap();

        let mut copy_args = args(source, target.clone());
        copy_args.channels = vec!["G".into()];
        copy_args.attrs = Some(attrs);
        copy_args.kinds = vec![("frame".into(), AttributeKind::Int)];
        copy_args.origin = Some((-1, -1));
        copy_args.half = true;
        run(copy_args, 0).unwrap();

        let copy = open_input(&target).unwrap();
        assert_eq!(copy.channel_names(), ["G"]);
        assert_eq!((copy.data_window().origin_x, copy.data_window().origin_y), (-1, -1));
        assert_eq!(copy.attribute("owner").unwrap(), Value::from("comp"));
        assert_eq!(copy.attribute("frame").unwrap(), Value::from(1001i32));
    }

    #[test]
    fn bad_overrides_fail() {
        let dir = TempDir::new().unwrap();
        let source = write_source(&dir);
        let attrs = dir.path().join("attrs.json");
        fs::write(&attrs, r#"["not", "a", "struct"]"#).unwrap();

        let mut copy_args = args(source, dir.path().join("out.exr"));
        copy_args.attrs = Some(attrs);
        assert!(run(copy_args, 0).is_err());
        assert!(!dir.path().join("out.exr").exists());
    }
}
