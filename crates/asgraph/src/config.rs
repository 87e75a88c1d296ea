//! Configuration for asgraph.
//!
//! Settings live in `asgraph.yaml` in the working directory, or at the path
//! given with `--config`. Command-line flags take precedence over the file.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "asgraph.yaml";

/// Number of largest customer cones listed in a build summary
pub const DEFAULT_TOP_CONES: usize = 10;

/// Configuration file structure for asgraph
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AsgraphConfig {
    /// Files written by `build`
    pub output: OutputSettings,

    /// Summary presentation
    pub display: DisplaySettings,
}

/// Output section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputSettings {
    /// Tab-separated export path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tsv: Option<PathBuf>,

    /// JSONL snapshot path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
}

/// Display section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplaySettings {
    /// How many of the largest customer cones a summary lists
    #[serde(rename = "top-cones")]
    pub top_cones: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            top_cones: DEFAULT_TOP_CONES,
        }
    }
}

impl AsgraphConfig {
    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// I/O errors reading the file, or [`Error::Config`] for invalid YAML.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if serialization fails, I/O errors writing the file.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Resolve the configuration for a run.
    ///
    /// An explicit path must exist. Without one, `asgraph.yaml` in
    /// `working_dir` is used when present and defaults otherwise.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub async fn resolve(explicit: Option<&Path>, working_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading configuration");
            return Self::load(path).await;
        }

        let path = working_dir.join(CONFIG_FILE_NAME);
        if fs::try_exists(&path).await? {
            tracing::debug!(path = %path.display(), "loading configuration");
            Self::load(&path).await
        } else {
            Ok(Self::default())
        }
    }
}
