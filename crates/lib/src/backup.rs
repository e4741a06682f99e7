//! Preserved originals for linked packages.
//!
//! When a real installed directory is about to be replaced by a link, its
//! content is copied into the `.studio` state directory first, keyed by
//! package name. The copy is moved back when the link is removed.
//!
//! # Storage Layout
//!
//! ```text
//! .studio/
//! ├── studio.json         # mirrored configuration from the last link pass
//! ├── acme-widgets/       # backup entry for acme/widgets
//! └── acme-gadgets/       # backup entry for acme/gadgets
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use studio_platform::PlatformError;

/// Errors that can occur while preserving or restoring an original copy.
#[derive(Debug, Error)]
pub enum BackupError {
  #[error("failed to prepare backup directory {}: {source}", path.display())]
  Prepare {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to back up {name}: {source}")]
  Copy {
    name: String,
    #[source]
    source: PlatformError,
  },

  #[error("failed to restore {name}: {source}")]
  Restore {
    name: String,
    #[source]
    source: PlatformError,
  },
}

/// Flatten a `vendor/name` package name into a filesystem-safe key.
pub fn entry_key(name: &str) -> String {
  name.replace(['/', '\\'], "-")
}

/// Side-channel store of original installed directories, one entry per
/// package name.
#[derive(Debug, Clone)]
pub struct BackupStore {
  root: PathBuf,
}

impl BackupStore {
  /// Create a store rooted at the state directory. Nothing is created on
  /// disk until the first backup.
  pub fn new(root: PathBuf) -> Self {
    Self { root }
  }

  /// Path of the entry for `name`, whether or not it exists.
  pub fn entry_path(&self, name: &str) -> PathBuf {
    self.root.join(entry_key(name))
  }

  /// Whether a backup exists for `name`.
  pub fn contains(&self, name: &str) -> bool {
    self.entry_path(name).is_dir()
  }

  /// Preserve `source` as the backup for `name`.
  ///
  /// Copies into a staging directory and renames it into place, so an entry
  /// is either absent or complete even if the copy is interrupted. Returns
  /// `false` without touching anything when an entry already exists: the
  /// existing backup belongs to an earlier, still-active link and holds the
  /// real original.
  pub fn backup(&self, name: &str, source: &Path) -> Result<bool, BackupError> {
    if self.contains(name) {
      debug!(name, "backup already present, keeping it");
      return Ok(false);
    }

    fs::create_dir_all(&self.root).map_err(|source| BackupError::Prepare {
      path: self.root.clone(),
      source,
    })?;

    let entry = self.entry_path(name);
    let staging = self.root.join(format!("{}.partial", entry_key(name)));

    // Leftover staging from an interrupted earlier run.
    if staging.exists() {
      fs::remove_dir_all(&staging).map_err(|source| BackupError::Prepare {
        path: staging.clone(),
        source,
      })?;
    }

    studio_platform::copy_dir(source, &staging).map_err(|source| BackupError::Copy {
      name: name.to_string(),
      source,
    })?;
    fs::rename(&staging, &entry).map_err(|source| BackupError::Prepare {
      path: entry.clone(),
      source,
    })?;

    debug!(name, entry = %entry.display(), "backed up original");
    Ok(true)
  }

  /// Move the backup for `name` to `dest` and delete the entry.
  ///
  /// Returns `false` without error when no entry exists: a package that
  /// never had an installed copy before it was first linked has nothing to
  /// restore.
  pub fn restore(&self, name: &str, dest: &Path) -> Result<bool, BackupError> {
    let entry = self.entry_path(name);
    if !entry.is_dir() {
      debug!(name, "no backup to restore");
      return Ok(false);
    }

    if let Some(parent) = dest.parent() {
      studio_platform::ensure_dir(parent).map_err(|source| BackupError::Restore {
        name: name.to_string(),
        source,
      })?;
    }

    studio_platform::move_dir(&entry, dest).map_err(|source| BackupError::Restore {
      name: name.to_string(),
      source,
    })?;

    debug!(name, dest = %dest.display(), "restored original");
    Ok(true)
  }
}
