//! Implementation of the `studio link` command.
//!
//! Runs a link pass against the project in the current (or given) directory,
//! exactly as the post-update lifecycle hook would.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use studio_lib::{HookContext, StderrIo, VendorInstallPaths, link_packages};

use crate::output::{print_error, print_stat, print_success};

pub fn cmd_link(root: &Path) -> Result<()> {
  let installer = VendorInstallPaths::for_project(root);
  let io = StderrIo;
  let ctx = HookContext::new(root.to_path_buf(), &installer, &io);

  let report = link_packages(&ctx)?;
  info!(linked = report.linked.len(), failed = report.failed.len(), "link pass finished");

  print_success("Link pass complete");
  print_stat("Linked", &report.linked.len().to_string());
  print_stat("Already linked", &report.already_linked.len().to_string());
  if !report.unknown.is_empty() {
    print_stat("Not installed", &report.unknown.len().to_string());
  }

  for failure in &report.failed {
    print_error(&format!("{}: {}", failure.path, failure.error));
  }

  Ok(())
}
