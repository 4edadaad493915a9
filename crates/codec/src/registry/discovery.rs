//! Marker-file discovery.
//!
//! A module advertises its model types with a plain-text marker file at
//! [`DEFAULT_MARKER_PATH`](crate::config::DEFAULT_MARKER_PATH), one fully-qualified Rust
//! type name per line. Blank lines and lines starting with `#` are ignored. Every marker
//! found under the configured roots is read, and each listed name is looked up in the
//! [`Catalogue`](super::Catalogue).

use crate::config::RegistryConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// One type name listed in a marker file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerEntry {
    pub marker: PathBuf,
    /// 1-based line number inside the marker.
    pub line: usize,
    pub type_name: String,
}

/// Scans every configured root for marker files and collects their entries in walk order.
///
/// Unreadable directories and marker files are logged and skipped; discovery never fails.
#[must_use]
pub fn scan_markers(config: &RegistryConfig) -> Vec<MarkerEntry> {
    let mut entries = Vec::new();

    for root in &config.roots {
        for marker in find_markers(root, &config.marker_path, config.max_depth) {
            match std::fs::read_to_string(&marker) {
                Ok(content) => {
                    let parsed = parse_marker(&content);
                    debug!(marker = %marker.display(), types = parsed.len(), "Read model marker");
                    entries.extend(parsed.into_iter().map(|(line, type_name)| MarkerEntry {
                        marker: marker.clone(),
                        line,
                        type_name: type_name.to_owned(),
                    }));
                },
                Err(e) => {
                    warn!(marker = %marker.display(), err = %e, "Skipping unreadable model marker");
                },
            }
        }
    }

    entries
}

fn find_markers(root: &Path, marker_path: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut markers: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(root = %root.display(), err = %e, "Skipping path during marker scan");
                None
            },
        })
        .filter(|entry| entry.file_type().is_file() && entry.path().ends_with(marker_path))
        .map(walkdir::DirEntry::into_path)
        .collect();

    markers.sort();
    markers
}

/// `(line number, type name)` for every meaningful line of a marker file.
#[must_use]
pub fn parse_marker(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_and_blank_lines_are_ignored() {
        let content = "# models\n\n  app::Note  \n#app::Hidden\napp::Link\n";
        assert_eq!(parse_marker(content), vec![(3, "app::Note"), (5, "app::Link")]);
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let config = RegistryConfig::with_roots(["/definitely/not/a/gedx/root"]);
        assert!(scan_markers(&config).is_empty());
    }
}
