//! CLI command implementations

pub mod attr;
pub mod copy;
pub mod info;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;
use vfx_attr::{Attribute, Header, decode_native};
use vfx_frame::InputFile;
use vfx_value::Value;

/// Opens an OpenEXR image.
pub fn open_input(path: &Path) -> Result<InputFile> {
    InputFile::open(path).with_context(|| format!("Failed to open: {}", path.display()))
}

/// Decodes every attribute that has a host value, keeping header order.
///
/// Attributes of unsupported native types come back as `Err` with a short
/// description instead of aborting the walk.
pub fn decode_each(header: &Header) -> Vec<(&str, Result<Value, String>)> {
    header
        .iter()
        .map(|(name, attribute)| {
            let decoded = decode_native(attribute).map_err(|err| {
                debug!(attribute = name, error = %err, "attribute has no host value");
                describe_opaque(attribute)
            });
            (name, decoded)
        })
        .collect()
}

fn describe_opaque(attribute: &Attribute) -> String {
    match attribute {
        Attribute::Opaque { type_name, bytes } => format!("<{type_name}, {} bytes>", bytes.len()),
        other => format!("<{}>", other.type_name()),
    }
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
