//! Status command implementation.
//!
//! Lists the managed paths from `studio.json` together with the current
//! filesystem state of each install destination.

use std::path::Path;

use anyhow::Result;

use studio_lib::{InstallPaths, PackageDescriptor, StudioConfig, VendorInstallPaths, consts};
use studio_platform::LinkState;

use crate::output::{print_error, print_info, print_json, print_success, symbols};

pub fn cmd_status(root: &Path, json: bool) -> Result<()> {
  let config = StudioConfig::load(&root.join(consts::CONFIG_FILENAME))?;
  if !config.has_paths() {
    if json {
      return print_json(&serde_json::json!({ "paths": [] }));
    }
    print_info("No managed paths. Add one to studio.json or run 'studio create'.");
    return Ok(());
  }

  let installer = VendorInstallPaths::for_project(root);
  let mut entries = Vec::new();

  for declared in config.paths() {
    let entry = match PackageDescriptor::from_managed_path(root, declared) {
      Ok(package) => {
        let state = installer
          .install_path(&package)
          .map(|destination| match studio_platform::link_state(&destination) {
            LinkState::Link => "linked",
            LinkState::Directory => "installed",
            LinkState::Missing => "missing",
          })
          .unwrap_or("unknown");
        (declared.clone(), Some(package.name), state)
      }
      Err(err) => {
        if !json {
          print_error(&format!("{declared}: {err}"));
        }
        (declared.clone(), None, "error")
      }
    };
    entries.push(entry);
  }

  if json {
    let paths: Vec<_> = entries
      .iter()
      .map(|(path, package, state)| serde_json::json!({ "path": path, "package": package, "state": state }))
      .collect();
    return print_json(&serde_json::json!({ "paths": paths }));
  }

  print_success(&format!("{} managed path(s)", entries.len()));
  for (path, package, state) in &entries {
    let symbol = match *state {
      "linked" => symbols::SUCCESS,
      "error" => symbols::ERROR,
      _ => symbols::INFO,
    };
    match package {
      Some(name) => println!("  {symbol} {path} {} {name} ({state})", symbols::ARROW),
      None => println!("  {symbol} {path} ({state})"),
    }
  }

  Ok(())
}
