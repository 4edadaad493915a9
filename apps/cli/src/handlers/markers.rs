use anyhow::Result;
use gedx::codec::config::{RegistryConfig, load_config};
use gedx::codec::registry::discovery::scan_markers;
use std::path::Path;

/// Lists every type name found in marker files, one `marker:line<TAB>type` per line.
///
/// # Errors
/// Returns an error if an explicit config file cannot be loaded.
pub fn list(config: Option<&Path>) -> Result<()> {
    let config = match config {
        Some(path) => load_config::<RegistryConfig>(Some(path))?,
        None => RegistryConfig::default(),
    };

    let entries = scan_markers(&config);
    if entries.is_empty() {
        println!("No model markers found.");
        return Ok(());
    }

    for entry in entries {
        println!("{}:{}\t{}", entry.marker.display(), entry.line, entry.type_name);
    }

    Ok(())
}
