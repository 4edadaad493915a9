//! Registry configuration and the layered loader shared with the CLI.

use crate::error::{CodecError, CodecErrorExt};
use config::{Config, Environment, File};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default location of marker files, relative to a scanned root.
pub const DEFAULT_MARKER_PATH: &str = "META-INF/gedx.models";

/// Settings that drive discovery and the registry's namespace preferences.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Directories scanned for marker files.
    pub roots: Vec<PathBuf>,
    /// Marker file path relative to any directory under a root.
    pub marker_path: PathBuf,
    /// How deep below each root the scan descends.
    pub max_depth: usize,
    /// Namespace written without a prefix in prefix-based formats.
    pub default_namespace: Option<String>,
    /// Extra prefix bindings, applied over those declared by model types.
    pub prefixes: Vec<PrefixBinding>,
}

/// One `namespace -> prefix` binding.
///
/// Kept as a list of tables rather than a map because namespace URIs contain dots, which
/// the `config` crate reads as key paths.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrefixBinding {
    pub namespace: String,
    pub prefix: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from(".")],
            marker_path: PathBuf::from(DEFAULT_MARKER_PATH),
            max_depth: 8,
            default_namespace: None,
            prefixes: Vec::new(),
        }
    }
}

impl RegistryConfig {
    /// A config scanning the given roots with every other setting at its default.
    #[must_use]
    pub fn with_roots<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self { roots: roots.into_iter().map(Into::into).collect(), ..Self::default() }
    }
}

/// Loads `T` from a config file overlaid with `GEDX__*` environment variables.
///
/// The file defaults to `gedx` in the working directory (any extension the `config` crate
/// understands). Nested keys use a double underscore: `GEDX__MAX_DEPTH=2` sets `max_depth`.
///
/// # Errors
/// Returns [`CodecError::Config`] if the file is missing or does not match `T`.
///
/// # Example
/// ```rust,no_run
/// use gedx_codec::config::{RegistryConfig, load_config};
///
/// let cfg: RegistryConfig = load_config(Some("config/gedx")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, CodecError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from("gedx"), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix("GEDX").separator("__").convert_case(config::Case::Snake),
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
