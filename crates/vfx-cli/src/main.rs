//! vfx-bridge - OpenEXR attributes and pixels through a dynamic value model
//!
//! Front end for vfx-frame: inspect headers, print single attributes as
//! JSON and copy images through a pixel tensor.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vfx_attr::AttributeKind;

mod commands;

#[derive(Parser)]
#[command(name = "vfx-bridge")]
#[command(author, version, about = "OpenEXR attributes and pixels as dynamic values")]
#[command(long_about = "
Reads and writes OpenEXR images through a dynamic value model: attributes
become numeric arrays, strings and structs, pixels become float32 tensors.

Examples:
  vfx-bridge info plate.exr                 # Header summary and attributes
  vfx-bridge info a.exr b.exr --json        # Machine-readable headers
  vfx-bridge attr plate.exr chromaticities  # One attribute as JSON
  vfx-bridge copy plate.exr -o out.exr -c R,G,B --half
  vfx-bridge copy plate.exr -o out.exr --attrs extra.json --kind frame=int
  vfx-bridge -vv copy plate.exr -o out.exr --origin -10,-10
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Display image dimensions, channels and attributes
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Print one attribute as JSON
    #[command(visible_alias = "a")]
    Attr(AttrArgs),

    /// Read channels into a tensor and write them to a new image
    #[command(visible_alias = "c")]
    Copy(CopyArgs),
}

/// Arguments for the `info` command.
#[derive(Args)]
struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Arguments for the `attr` command.
#[derive(Args)]
struct AttrArgs {
    /// Input image
    input: PathBuf,

    /// Attribute name, e.g. chromaticities
    name: String,
}

/// Arguments for the `copy` command.
#[derive(Args)]
struct CopyArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Channels to copy (default: all channels of the input)
    #[arg(short, long, value_delimiter = ',')]
    channels: Vec<String>,

    /// JSON file with a struct of attributes to set on the output
    #[arg(long)]
    attrs: Option<PathBuf>,

    /// Attribute kind override, e.g. frame=int (repeatable)
    #[arg(long = "kind", value_parser = parse_kind_hint)]
    kinds: Vec<(String, AttributeKind)>,

    /// Store samples as half floats
    #[arg(long)]
    half: bool,

    /// Data window origin of the output as x,y (default: the input's)
    #[arg(long, value_parser = parse_origin, allow_hyphen_values = true)]
    origin: Option<(i32, i32)>,
}

/// Parses `key=kind`.
fn parse_kind_hint(s: &str) -> Result<(String, AttributeKind), String> {
    let (key, kind) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=kind, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty attribute name in '{s}'"));
    }
    let kind: AttributeKind = kind.parse().map_err(|e| format!("{e}"))?;
    Ok((key.to_string(), kind))
}

/// Parses `x,y`.
fn parse_origin(s: &str) -> Result<(i32, i32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got '{s}'"))?;
    let parse = |v: &str| v.trim().parse::<i32>().map_err(|e| format!("'{v}': {e}"));
    Ok((parse(x)?, parse(y)?))
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Attr(args) => commands::attr::run(args, cli.verbose),
        Commands::Copy(args) => commands::copy::run(args, cli.verbose),
    }
}
