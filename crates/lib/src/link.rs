//! The link/unlink reconciliation passes.
//!
//! A link pass replaces installed package directories with links to managed
//! working copies; an unlink pass removes those links and puts the preserved
//! originals back. Both passes re-derive every decision from the filesystem
//! at the moment they act; the host's own install step may have run between
//! hook invocations, so no cached "is linked" flag can be trusted.
//!
//! Failure policy: only configuration-level problems abort a pass. Anything
//! wrong with a single managed path (missing manifest, resolution failure,
//! I/O error) is reported and skipped so the remaining packages still link.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use studio_platform::{LinkState, PlatformError};

use crate::backup::{BackupError, BackupStore};
use crate::config::{ConfigError, StudioConfig};
use crate::consts::CONFIG_FILENAME;
use crate::hooks::HookContext;
use crate::host::{InstalledPackage, InstalledRepository};
use crate::package::{DescriptorError, PackageDescriptor};

/// A failure local to one managed path. The pass records it and continues.
#[derive(Debug, Error)]
pub enum LinkError {
  #[error(transparent)]
  Descriptor(#[from] DescriptorError),

  #[error(transparent)]
  Backup(#[from] BackupError),

  #[error(transparent)]
  Platform(#[from] PlatformError),

  #[error("failed to remove original {}: {source}", path.display())]
  RemoveOriginal {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// A failure that aborts the whole pass.
#[derive(Debug, Error)]
pub enum PassError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error("failed to prepare state directory {}: {source}", path.display())]
  StateDir {
    path: PathBuf,
    #[source]
    source: PlatformError,
  },

  #[error("failed to mirror configuration to {}: {source}", path.display())]
  Mirror {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// What went wrong with one managed path.
#[derive(Debug)]
pub struct PackageFailure {
  /// The path as declared in the configuration.
  pub path: String,
  pub error: LinkError,
}

/// Result of a link pass.
#[derive(Debug, Default)]
pub struct LinkReport {
  /// Packages newly linked in this pass.
  pub linked: Vec<String>,
  /// Packages whose destination already was a managed link.
  pub already_linked: Vec<String>,
  /// Declared paths whose package the host does not know.
  pub unknown: Vec<String>,
  pub failed: Vec<PackageFailure>,
}

impl LinkReport {
  pub fn is_clean(&self) -> bool {
    self.failed.is_empty()
  }
}

/// Result of an unlink pass.
#[derive(Debug, Default)]
pub struct UnlinkReport {
  /// Links removed with their original restored from backup.
  pub restored: Vec<String>,
  /// Links removed that had no backup (nothing was installed before).
  pub removed: Vec<String>,
  pub failed: Vec<PackageFailure>,
}

impl UnlinkReport {
  pub fn is_clean(&self) -> bool {
    self.failed.is_empty()
  }

  /// Total number of links torn down.
  pub fn unlinked(&self) -> usize {
    self.restored.len() + self.removed.len()
  }
}

enum LinkOutcome {
  Linked(String),
  AlreadyLinked(String),
  Unknown,
}

enum UnlinkOutcome {
  Restored(String),
  Removed(String),
  Untouched,
}

/// Replace installed copies of managed packages with links.
///
/// Runs after the host has resolved and installed dependencies. For each
/// managed path: build its descriptor, resolve the install destination, and
/// if the destination is a real directory, preserve it and link the working
/// copy in its place. Afterwards the configuration is mirrored into the
/// state directory so the next unlink pass can see entries that were
/// removed in the meantime.
pub fn link_packages(ctx: &HookContext<'_>) -> Result<LinkReport, PassError> {
  let config = StudioConfig::load(&ctx.config_path())?;
  info!(paths = config.paths().len(), "link pass");

  let store = BackupStore::new(ctx.state_dir());
  let mut report = LinkReport::default();

  for declared in config.paths() {
    match link_one(ctx, &store, declared) {
      Ok(LinkOutcome::Linked(name)) => report.linked.push(name),
      Ok(LinkOutcome::AlreadyLinked(name)) => report.already_linked.push(name),
      Ok(LinkOutcome::Unknown) => report.unknown.push(declared.clone()),
      Err(error) => {
        warn!(path = declared, error = %error, "skipping managed path");
        ctx.say(&format!("Skipping {declared}: {error}"));
        report.failed.push(PackageFailure {
          path: declared.clone(),
          error,
        });
      }
    }
  }

  mirror_config(ctx, &config)?;

  Ok(report)
}

fn link_one(ctx: &HookContext<'_>, store: &BackupStore, declared: &str) -> Result<LinkOutcome, LinkError> {
  let package = PackageDescriptor::from_managed_path(ctx.root(), declared)?;

  let Some(destination) = ctx.install_path(&package) else {
    debug!(name = %package.name, "package unknown to the host, nothing to link");
    return Ok(LinkOutcome::Unknown);
  };

  match studio_platform::link_state(&destination) {
    LinkState::Link => {
      debug!(name = %package.name, "already linked");
      Ok(LinkOutcome::AlreadyLinked(package.name))
    }
    state => {
      ctx.say(&format!("Creating link to {declared} for package {}", package.name));

      if state == LinkState::Directory {
        store.backup(&package.name, &destination)?;
        fs::remove_dir_all(&destination).map_err(|source| LinkError::RemoveOriginal {
          path: destination.clone(),
          source,
        })?;
      }

      if let Some(parent) = destination.parent() {
        studio_platform::ensure_dir(parent)?;
      }
      studio_platform::create_link(&package.source_path, &destination)?;

      info!(name = %package.name, destination = %destination.display(), "linked");
      Ok(LinkOutcome::Linked(package.name))
    }
  }
}

/// Remove managed links and restore the preserved originals.
///
/// Runs before the host resolves dependencies, so resolution only ever sees
/// plain directories. Walks the union of previously managed paths (from the
/// mirrored configuration) and currently managed ones: a path dropped from
/// the configuration since the last link pass still has a live link that
/// must be torn down.
pub fn unlink_packages(ctx: &HookContext<'_>) -> Result<UnlinkReport, PassError> {
  let previous = StudioConfig::load(&ctx.state_dir().join(CONFIG_FILENAME))?;
  let current = StudioConfig::load(&ctx.config_path())?;
  info!(
    previous = previous.paths().len(),
    current = current.paths().len(),
    "unlink pass"
  );

  let store = BackupStore::new(ctx.state_dir());
  let mut report = UnlinkReport::default();
  let mut seen = BTreeSet::new();

  for declared in previous.paths().iter().chain(current.paths()) {
    if !seen.insert(declared.clone()) {
      continue;
    }

    match unlink_one(ctx, &store, declared) {
      Ok(UnlinkOutcome::Restored(name)) => report.restored.push(name),
      Ok(UnlinkOutcome::Removed(name)) => report.removed.push(name),
      Ok(UnlinkOutcome::Untouched) => {}
      Err(error) => {
        warn!(path = declared, error = %error, "skipping managed path");
        ctx.say(&format!("Skipping {declared}: {error}"));
        report.failed.push(PackageFailure {
          path: declared.clone(),
          error,
        });
      }
    }
  }

  Ok(report)
}

fn unlink_one(ctx: &HookContext<'_>, store: &BackupStore, declared: &str) -> Result<UnlinkOutcome, LinkError> {
  let package = PackageDescriptor::from_managed_path(ctx.root(), declared)?;

  let Some(destination) = ctx.install_path(&package) else {
    debug!(name = %package.name, "package unknown to the host, nothing to unlink");
    return Ok(UnlinkOutcome::Untouched);
  };

  if studio_platform::link_state(&destination) != LinkState::Link {
    return Ok(UnlinkOutcome::Untouched);
  }

  ctx.say(&format!("Removing linked path {declared} for package {}", package.name));
  studio_platform::remove_link(&destination)?;

  let restored = store.restore(&package.name, &destination)?;
  info!(name = %package.name, restored, "unlinked");

  Ok(if restored {
    UnlinkOutcome::Restored(package.name)
  } else {
    UnlinkOutcome::Removed(package.name)
  })
}

/// Swap managed packages into the host's installed-package set.
///
/// For every managed path whose package the set contains, the installed
/// entry is removed and replaced by a development entry built from the
/// working copy's manifest. The filesystem is not touched. Returns the
/// number of entries replaced.
pub fn load_packages_for_dump(
  ctx: &HookContext<'_>,
  installed: &mut InstalledRepository,
) -> Result<usize, PassError> {
  let config = StudioConfig::load(&ctx.config_path())?;
  let mut replaced = 0;

  for declared in config.paths() {
    let package = match PackageDescriptor::from_managed_path(ctx.root(), declared) {
      Ok(package) => package,
      Err(error) => {
        warn!(path = declared, error = %error, "skipping managed path");
        ctx.say(&format!("Skipping {declared}: {error}"));
        continue;
      }
    };

    if installed.find(&package.name).is_none() {
      continue;
    }

    ctx.say(&format!("Loading package {} ({})", package.name, package.version));
    installed.remove(&package.name);
    installed.add(InstalledPackage::development(&package));
    replaced += 1;
  }

  Ok(replaced)
}

/// Refresh the state directory after a link pass.
///
/// The state directory is only ever created for projects that actually
/// manage paths; the configuration is mirrored whenever the current or the
/// previously mirrored list is non-empty, which is what lets the next
/// unlink pass detect removed entries.
fn mirror_config(ctx: &HookContext<'_>, current: &StudioConfig) -> Result<(), PassError> {
  let state_dir = ctx.state_dir();

  if current.has_paths() {
    studio_platform::ensure_dir(&state_dir).map_err(|source| PassError::StateDir {
      path: state_dir.clone(),
      source,
    })?;
  }

  let mirrored_path = state_dir.join(CONFIG_FILENAME);
  let previous = StudioConfig::load(&mirrored_path)?;

  if (current.has_paths() || previous.has_paths()) && state_dir.is_dir() {
    let config_path = ctx.config_path();
    if config_path.exists() {
      fs::copy(&config_path, &mirrored_path).map_err(|source| PassError::Mirror {
        path: mirrored_path.clone(),
        source,
      })?;
      debug!(path = %mirrored_path.display(), "mirrored configuration");
    }
  }

  Ok(())
}
