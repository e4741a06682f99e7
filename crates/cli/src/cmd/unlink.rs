//! Implementation of the `studio unlink` command.
//!
//! Runs an unlink pass, exactly as the pre-update lifecycle hook would:
//! managed links are removed and the preserved originals restored.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use studio_lib::{HookContext, StderrIo, VendorInstallPaths, unlink_packages};

use crate::output::{print_error, print_stat, print_success};

pub fn cmd_unlink(root: &Path) -> Result<()> {
  let installer = VendorInstallPaths::for_project(root);
  let io = StderrIo;
  let ctx = HookContext::new(root.to_path_buf(), &installer, &io);

  let report = unlink_packages(&ctx)?;
  info!(unlinked = report.unlinked(), failed = report.failed.len(), "unlink pass finished");

  print_success("Unlink pass complete");
  print_stat("Restored", &report.restored.len().to_string());
  print_stat("Removed", &report.removed.len().to_string());

  for failure in &report.failed {
    print_error(&format!("{}: {}", failure.path, failure.error));
  }

  Ok(())
}
