//! Single attribute as JSON.

use crate::AttrArgs;
use anyhow::{Context, Result};
use tracing::debug;

/// Runs the attr command.
pub fn run(args: AttrArgs, _verbose: u8) -> Result<()> {
    let input = super::open_input(&args.input)?;
    let value = input
        .attribute(&args.name)
        .with_context(|| format!("Failed to read '{}' from {}", args.name, args.input.display()))?;
    debug!(attribute = %args.name, type_name = value.type_name(), "decoded attribute");
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
