//! Lifecycle glue between the host and the reconciliation passes.
//!
//! The host invokes hooks single-threaded and in order; links therefore only
//! exist between user-visible operations. Exactly one action is registered
//! per phase, and every hook tolerates duplicate invocation for the same
//! logical phase, since repeating a pass is a no-op by idempotence.

use std::path::{Path, PathBuf};

use crate::consts::{CONFIG_FILENAME, IO_PREFIX, STATE_DIR};
use crate::host::{HostIo, InstallPaths};
use crate::link::{self, LinkReport, PassError, UnlinkReport};
use crate::package::PackageDescriptor;

/// Host lifecycle points the engine participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
  /// Before the host resolves and installs dependencies.
  PreUpdate,
  /// After a plain install run.
  PostInstall,
  /// After an update run.
  PostUpdate,
  /// Just before the host generates its final artifact (autoloader dump).
  PreAutoloadDump,
}

impl LifecyclePhase {
  pub const ALL: [LifecyclePhase; 4] = [
    LifecyclePhase::PreUpdate,
    LifecyclePhase::PostInstall,
    LifecyclePhase::PostUpdate,
    LifecyclePhase::PreAutoloadDump,
  ];

  /// The single action registered for this phase.
  ///
  /// Unlink runs before resolution so the host only ever sees plain
  /// directories; every later phase links.
  pub fn action(self) -> PhaseAction {
    match self {
      LifecyclePhase::PreUpdate => PhaseAction::Unlink,
      LifecyclePhase::PostInstall | LifecyclePhase::PostUpdate | LifecyclePhase::PreAutoloadDump => PhaseAction::Link,
    }
  }
}

/// What the engine does at a lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseAction {
  Link,
  Unlink,
}

/// Everything a hook needs from the host, passed into each invocation.
///
/// Hooks are functions of (context, configuration); nothing is carried over
/// between invocations.
pub struct HookContext<'a> {
  root: PathBuf,
  install_paths: &'a dyn InstallPaths,
  io: &'a dyn HostIo,
}

impl<'a> HookContext<'a> {
  pub fn new(root: PathBuf, install_paths: &'a dyn InstallPaths, io: &'a dyn HostIo) -> Self {
    Self {
      root,
      install_paths,
      io,
    }
  }

  /// The project root the configuration and state directory live under.
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Path of the current configuration file.
  pub fn config_path(&self) -> PathBuf {
    self.root.join(CONFIG_FILENAME)
  }

  /// Path of the hidden per-project state directory.
  pub fn state_dir(&self) -> PathBuf {
    self.root.join(STATE_DIR)
  }

  /// Resolve a package's install destination, anchored at the project root
  /// when the host hands back a relative path.
  pub(crate) fn install_path(&self, package: &PackageDescriptor) -> Option<PathBuf> {
    self.install_paths.install_path(package).map(|path| {
      if path.is_absolute() {
        path
      } else {
        self.root.join(path)
      }
    })
  }

  /// Write one prefixed line to the host's output stream.
  pub(crate) fn say(&self, message: &str) {
    self.io.write_line(&format!("{IO_PREFIX} {message}"));
  }
}

/// Outcome of a dispatched hook.
#[derive(Debug)]
pub enum HookReport {
  Linked(LinkReport),
  Unlinked(UnlinkReport),
}

/// Run the action registered for `phase`.
pub fn dispatch(phase: LifecyclePhase, ctx: &HookContext<'_>) -> Result<HookReport, PassError> {
  match phase.action() {
    PhaseAction::Unlink => Ok(HookReport::Unlinked(link::unlink_packages(ctx)?)),
    PhaseAction::Link => Ok(HookReport::Linked(link::link_packages(ctx)?)),
  }
}

/// Pre-update: tear managed links down before the host resolves.
pub fn on_pre_update(ctx: &HookContext<'_>) -> Result<UnlinkReport, PassError> {
  link::unlink_packages(ctx)
}

/// Post-install: put managed links in place.
pub fn on_post_install(ctx: &HookContext<'_>) -> Result<LinkReport, PassError> {
  link::link_packages(ctx)
}

/// Post-update: put managed links in place.
pub fn on_post_update(ctx: &HookContext<'_>) -> Result<LinkReport, PassError> {
  link::link_packages(ctx)
}

/// Pre-autoload-dump: ensure links exist before the final artifact is built
/// (covers runs where the post phases were skipped).
pub fn on_pre_autoload_dump(ctx: &HookContext<'_>) -> Result<LinkReport, PassError> {
  link::link_packages(ctx)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn exactly_one_action_per_phase() {
    assert_eq!(LifecyclePhase::PreUpdate.action(), PhaseAction::Unlink);
    assert_eq!(LifecyclePhase::PostInstall.action(), PhaseAction::Link);
    assert_eq!(LifecyclePhase::PostUpdate.action(), PhaseAction::Link);
    assert_eq!(LifecyclePhase::PreAutoloadDump.action(), PhaseAction::Link);
  }

  #[test]
  fn only_pre_update_unlinks() {
    let unlinking: Vec<_> = LifecyclePhase::ALL
      .into_iter()
      .filter(|phase| phase.action() == PhaseAction::Unlink)
      .collect();
    assert_eq!(unlinking, [LifecyclePhase::PreUpdate]);
  }
}
