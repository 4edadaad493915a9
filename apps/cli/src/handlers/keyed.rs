use anyhow::{Context, Result};
use gedx::codec::keyed::{self, RawKeyedItem};
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Decodes a keyed object from `file` and prints its canonical encoding.
///
/// Single unique items stay bare and groups stay arrays, so running the output through
/// this command again yields the same document.
///
/// # Errors
/// Returns an error if the input cannot be read, is not JSON, or is not a keyed object.
pub fn normalize(file: &Path) -> Result<()> {
    let input = read_input(file)?;
    let value: Value = serde_json::from_str(&input)
        .with_context(|| format!("Failed to parse JSON from {}", file.display()))?;

    let items: Vec<RawKeyedItem> = keyed::decode(value)?;
    debug!(items = items.len(), "Decoded keyed collection");

    let encoded = keyed::encode(&items)?;
    println!("{}", serde_json::to_string_pretty(&encoded)?);
    Ok(())
}

fn read_input(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
        return Ok(buf);
    }

    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}
