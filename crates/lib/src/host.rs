//! Collaborators provided by the dependency-manager host.
//!
//! The link engine never resolves versions or installs anything itself; it
//! asks the host where a package would be installed and reports what it did
//! through the host's output stream. These seams are traits so tests (and
//! other hosts) can substitute their own implementations.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::consts::DEV_VERSION;
use crate::package::PackageDescriptor;

/// Resolves the install destination the host would use for a package.
pub trait InstallPaths {
  /// The directory the package of this name is (or would be) installed to.
  ///
  /// `None` means the host does not know the package, in which case there
  /// is nothing to link or unlink for it.
  fn install_path(&self, package: &PackageDescriptor) -> Option<PathBuf>;
}

/// The Composer vendor-directory convention: `<vendor-dir>/<vendor>/<name>`.
#[derive(Debug, Clone)]
pub struct VendorInstallPaths {
  vendor_dir: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct RootManifestConfig {
  #[serde(rename = "vendor-dir")]
  vendor_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RootManifest {
  #[serde(default)]
  config: RootManifestConfig,
}

impl VendorInstallPaths {
  pub fn new(vendor_dir: PathBuf) -> Self {
    Self { vendor_dir }
  }

  /// Read the vendor directory from the project's own manifest
  /// (`config.vendor-dir`), falling back to `vendor`.
  pub fn for_project(root: &Path) -> Self {
    let manifest_path = root.join(crate::consts::MANIFEST_FILENAME);
    let vendor_dir = fs::read_to_string(&manifest_path)
      .ok()
      .and_then(|content| serde_json::from_str::<RootManifest>(&content).ok())
      .and_then(|manifest| manifest.config.vendor_dir)
      .unwrap_or_else(|| "vendor".to_string());

    debug!(vendor_dir = %vendor_dir, "resolved vendor directory");
    Self::new(root.join(vendor_dir))
  }
}

impl InstallPaths for VendorInstallPaths {
  fn install_path(&self, package: &PackageDescriptor) -> Option<PathBuf> {
    Some(self.vendor_dir.join(&package.name))
  }
}

/// The host's diagnostic output stream.
pub trait HostIo {
  /// Write one already-formatted line.
  fn write_line(&self, line: &str);
}

/// Writes host output to stderr, where package managers put diagnostics.
#[derive(Debug, Default)]
pub struct StderrIo;

impl HostIo for StderrIo {
  fn write_line(&self, line: &str) {
    eprintln!("{line}");
  }
}

/// One entry of the host's installed-package set.
#[derive(Debug, Clone, PartialEq)]
pub struct InstalledPackage {
  pub name: String,
  pub version: String,
  /// Where the content comes from; the managed path for development entries.
  pub dist_url: Option<String>,
}

impl InstalledPackage {
  /// The development stand-in for an installed package, derived from a
  /// managed descriptor.
  pub fn development(descriptor: &PackageDescriptor) -> Self {
    Self {
      name: descriptor.name.clone(),
      version: DEV_VERSION.to_string(),
      dist_url: Some(descriptor.dist_url.clone()),
    }
  }
}

/// In-memory view of the host's installed-package set, keyed by name.
///
/// Only the dump affordance mutates this; the link and unlink passes work
/// on the filesystem instead.
#[derive(Debug, Default)]
pub struct InstalledRepository {
  packages: BTreeMap<String, InstalledPackage>,
}

impl InstalledRepository {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, package: InstalledPackage) {
    self.packages.insert(package.name.clone(), package);
  }

  pub fn remove(&mut self, name: &str) -> Option<InstalledPackage> {
    self.packages.remove(name)
  }

  pub fn find(&self, name: &str) -> Option<&InstalledPackage> {
    self.packages.get(name)
  }

  pub fn iter(&self) -> impl Iterator<Item = &InstalledPackage> {
    self.packages.values()
  }

  pub fn len(&self) -> usize {
    self.packages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.packages.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn descriptor(name: &str) -> PackageDescriptor {
    PackageDescriptor {
      name: name.to_string(),
      version: DEV_VERSION.to_string(),
      source_path: PathBuf::from("/src"),
      dist_url: "../src".to_string(),
      extra: serde_json::Map::new(),
    }
  }

  #[test]
  fn vendor_dir_defaults_to_vendor() {
    let temp = TempDir::new().unwrap();
    let paths = VendorInstallPaths::for_project(temp.path());

    let dest = paths.install_path(&descriptor("acme/widgets")).unwrap();
    assert_eq!(dest, temp.path().join("vendor/acme/widgets"));
  }

  #[test]
  fn vendor_dir_honours_project_manifest() {
    let temp = TempDir::new().unwrap();
    fs::write(
      temp.path().join("composer.json"),
      r#"{"name": "acme/app", "config": {"vendor-dir": "deps"}}"#,
    )
    .unwrap();

    let paths = VendorInstallPaths::for_project(temp.path());
    let dest = paths.install_path(&descriptor("acme/widgets")).unwrap();
    assert_eq!(dest, temp.path().join("deps/acme/widgets"));
  }

  #[test]
  fn repository_replaces_entries_by_name() {
    let mut repo = InstalledRepository::new();
    repo.add(InstalledPackage {
      name: "acme/widgets".to_string(),
      version: "1.2.0".to_string(),
      dist_url: None,
    });

    repo.add(InstalledPackage::development(&descriptor("acme/widgets")));

    assert_eq!(repo.len(), 1);
    assert_eq!(repo.find("acme/widgets").unwrap().version, DEV_VERSION);
  }
}
