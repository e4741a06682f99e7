//! The `studio.json` configuration file.
//!
//! Two instances exist at runtime: the current configuration at the project
//! root, and the mirrored copy inside the `.studio` state directory from the
//! last link pass. Comparing the two is what lets the unlink pass tear down
//! links whose entries were removed in the meantime.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading or writing the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("malformed configuration at {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to serialize configuration: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to write {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// The ordered list of managed paths, plus any unrelated keys the file
/// carries (preserved verbatim on rewrite).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudioConfig {
  #[serde(default)]
  paths: Vec<String>,

  #[serde(flatten)]
  extra: BTreeMap<String, serde_json::Value>,
}

impl StudioConfig {
  /// Load the configuration from `path`.
  ///
  /// A missing file is the common case and yields an empty configuration;
  /// a file that exists but cannot be parsed is an error, since guessing
  /// managed paths is never safe.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "no configuration file, treating as empty");
        return Ok(Self::default());
      }
      Err(source) => {
        return Err(ConfigError::Read {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Persist the configuration to `path`.
  ///
  /// Writes the whole file to a temporary sibling and renames it into place
  /// so a crash never leaves a half-written configuration behind.
  pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
    let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;

    let mut temp_path = path.as_os_str().to_owned();
    temp_path.push(".tmp");
    let temp_path = PathBuf::from(temp_path);

    fs::write(&temp_path, &content).map_err(|source| ConfigError::Write {
      path: temp_path.clone(),
      source,
    })?;
    fs::rename(&temp_path, path).map_err(|source| ConfigError::Write {
      path: path.to_path_buf(),
      source,
    })?;

    Ok(())
  }

  /// The managed paths, in declaration order.
  pub fn paths(&self) -> &[String] {
    &self.paths
  }

  /// Whether any path is managed.
  pub fn has_paths(&self) -> bool {
    !self.paths.is_empty()
  }

  /// Append a managed path, keeping the list free of exact duplicates.
  pub fn add_path(&mut self, path: impl Into<String>) {
    let path = path.into();
    if !self.paths.contains(&path) {
      self.paths.push(path);
    }
  }

  /// Drop a managed path. Unknown paths are ignored.
  pub fn remove_path(&mut self, path: &str) {
    self.paths.retain(|p| p != path);
  }
}
