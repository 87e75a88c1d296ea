//! Implementation of the `init` command.
//!
//! Writes a default `asgraph.yaml` so its settings can be edited in place.

use crate::config::{AsgraphConfig, CONFIG_FILE_NAME};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Write a default configuration file into `base_dir`.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// [`Error::Config`] if the file exists and `force` is not set; I/O errors
/// otherwise.
pub async fn init(base_dir: &Path, force: bool) -> Result<PathBuf> {
    let config_file = base_dir.join(CONFIG_FILE_NAME);

    if !force && fs::try_exists(&config_file).await? {
        return Err(Error::Config(format!(
            "'{}' already exists; use --force to overwrite it",
            config_file.display()
        )));
    }

    AsgraphConfig::default().save(&config_file).await?;
    tracing::debug!(path = %config_file.display(), "wrote default configuration");
    Ok(config_file)
}
