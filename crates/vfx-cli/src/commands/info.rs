//! Image info command.
//!
//! Displays the data window, channels and every header attribute.

use crate::InfoArgs;
use anyhow::Result;
use serde_json::{Map, json};
use std::fs;
use std::path::Path;
use tracing::warn;
use vfx_frame::{ExrInput, InputFile};

/// Runs the info command.
pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    let mut reports = Vec::with_capacity(args.input.len());
    for (idx, path) in args.input.iter().enumerate() {
        let file_size = fs::metadata(path)?.len();
        let input = super::open_input(path)?;

        if args.json {
            reports.push(json_report(path, &input, file_size)?);
        } else {
            if idx > 0 {
                println!();
            }
            print_text(path, &input, file_size, verbose);
        }
    }

    if args.json {
        let output = match reports.len() {
            1 => reports.remove(0),
            _ => serde_json::Value::Array(reports),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}

/// Prints info in human-readable text format.
fn print_text(path: &Path, input: &InputFile<ExrInput>, file_size: u64, verbose: u8) {
    let window = input.data_window();
    let channels: Vec<String> = input
        .header()
        .channels()
        .map(|list| {
            list.iter()
                .map(|c| format!("{} ({})", c.name, c.sample_type.name()))
                .collect()
        })
        .unwrap_or_default();

    println!("{}", path.display());
    println!("  Resolution:  {}x{}", window.width, window.height);
    println!(
        "  Data window: ({}, {}) - ({}, {})",
        window.origin_x,
        window.origin_y,
        window.origin_x + window.width as i32 - 1,
        window.origin_y + window.height as i32 - 1
    );
    println!("  Channels:    {}", channels.join(", "));
    println!("  File size:   {}", super::format_size(file_size));
    if verbose > 0 {
        println!("  Compression: {}", input.header().compression());
    }

    println!("  Attributes:");
    for (name, decoded) in super::decode_each(input.header()) {
        match decoded {
            Ok(value) => println!("    {}: {}", name, value),
            Err(description) => println!("    {}: {}", name, description),
        }
    }
}

/// Builds the JSON report of one file. Attributes without a host value are
/// left out.
fn json_report(path: &Path, input: &InputFile<ExrInput>, file_size: u64) -> Result<serde_json::Value> {
    let window = input.data_window();
    let mut attributes = Map::new();
    for (name, decoded) in super::decode_each(input.header()) {
        match decoded {
            Ok(value) => {
                attributes.insert(name.to_string(), serde_json::to_value(&value)?);
            }
            Err(description) => warn!(attribute = name, %description, "attribute left out of JSON"),
        }
    }

    Ok(json!({
        "file": path.display().to_string(),
        "width": window.width,
        "height": window.height,
        "origin": [window.origin_x, window.origin_y],
        "channels": input.channel_names(),
        "size_bytes": file_size,
        "attributes": attributes,
    }))
}
