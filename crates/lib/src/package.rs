//! Package descriptors built from local manifests.
//!
//! A descriptor is a pure function of the manifest contents at the moment it
//! is built. It is never cached across passes: the local working copy may
//! have changed between two invocations.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::consts::{DEV_VERSION, MANIFEST_FILENAME};

/// Errors that can occur while building a descriptor for a managed path.
#[derive(Debug, Error)]
pub enum DescriptorError {
  #[error("no composer.json found in {}", path.display())]
  ManifestNotFound { path: PathBuf },

  #[error("failed to read {}: {source}", path.display())]
  ManifestRead {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid composer.json in {}: {source}", path.display())]
  ManifestParse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("composer.json in {} does not declare a package name", path.display())]
  MissingName { path: PathBuf },
}

/// The fields of a package manifest the link engine cares about.
#[derive(Debug, Deserialize)]
struct Manifest {
  name: Option<String>,
  #[serde(default)]
  extra: serde_json::Map<String, serde_json::Value>,
}

/// In-memory identity of a locally managed package.
///
/// The version is always the synthetic development marker and the dist URL
/// is the managed path itself, overriding whatever the manifest declares as
/// its published location.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDescriptor {
  /// Package name in `vendor/name` form, as declared by the manifest.
  pub name: String,
  /// Always [`DEV_VERSION`].
  pub version: String,
  /// Canonicalized directory of the local working copy.
  pub source_path: PathBuf,
  /// The managed path as declared in the configuration.
  pub dist_url: String,
  /// Remaining manifest `extra` metadata, with `branch-alias` stripped.
  pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PackageDescriptor {
  /// Build a descriptor for a managed path declared in the configuration.
  ///
  /// Relative paths are resolved against the project root. Any
  /// `extra.branch-alias` entry is dropped: branch aliases require the
  /// resolver's dev-version machinery, which a purely local, unpublished
  /// package never goes through.
  pub fn from_managed_path(root: &Path, declared: &str) -> Result<Self, DescriptorError> {
    let dir = if Path::new(declared).is_absolute() {
      PathBuf::from(declared)
    } else {
      root.join(declared)
    };

    let dir = dunce::canonicalize(&dir).map_err(|_| DescriptorError::ManifestNotFound { path: dir.clone() })?;

    let manifest_path = dir.join(MANIFEST_FILENAME);
    let content = match fs::read_to_string(&manifest_path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(DescriptorError::ManifestNotFound { path: dir });
      }
      Err(source) => {
        return Err(DescriptorError::ManifestRead {
          path: manifest_path,
          source,
        });
      }
    };

    let mut manifest: Manifest = serde_json::from_str(&content).map_err(|source| DescriptorError::ManifestParse {
      path: manifest_path.clone(),
      source,
    })?;

    let Some(name) = manifest.name.take().filter(|name| !name.is_empty()) else {
      return Err(DescriptorError::MissingName { path: manifest_path });
    };

    manifest.extra.remove("branch-alias");

    Ok(Self {
      name,
      version: DEV_VERSION.to_string(),
      source_path: dir,
      dist_url: declared.to_string(),
      extra: manifest.extra,
    })
  }
}
