use crate::error::{KernelError, KernelErrorExt};
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of environment overrides, e.g. `CRADLE__LOG__LEVEL=debug`.
pub const ENV_PREFIX: &str = "CRADLE";

/// Loads bootstrap settings: an optional file overlaid by environment variables.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: Loads settings from a file (e.g., `cradle.toml`). If no path is provided, it
///    defaults to `"cradle"` in the working directory with any supported extension. A missing file
///    is not an error; every field has a default.
/// 2. **Environment Overrides**: Overlays values from environment variables prefixed with `CRADLE__`.
///    Nested structures are accessed using double underscores (e.g., `CRADLE__DOCUMENT__PATH` maps to `document.path`).
///
/// These are the settings needed before the directive document can be read. Directives
/// themselves never come from here.
///
/// # Errors
/// [`KernelError::Config`] if a source is malformed or does not match `T`.
///
/// # Example
/// ```rust
/// use cradle_kernel::config::load_config;
/// use cradle_kernel::domain::config::BootstrapConfig;
///
/// let cfg: BootstrapConfig = load_config(Some("does/not/exist")).unwrap();
/// assert_eq!(cfg.log.level, "info");
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, KernelError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from("cradle"), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!("Loading bootstrap config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
