//! Implementation of the `studio create` command.
//!
//! Scaffolds a new package (or clones an existing Git repository), registers
//! its path in `studio.json`, and runs the composer install / dump-autoload
//! steps a freshly created package needs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use studio_lib::{StudioConfig, consts};
use studio_platform::run_command;

use crate::output::{print_info, print_success};
use crate::prompts;

pub fn cmd_create(root: &Path, path: &Path, git: Option<&str>, name: Option<String>) -> Result<()> {
  let package_dir = if path.is_absolute() {
    path.to_path_buf()
  } else {
    root.join(path)
  };
  if package_dir.exists() {
    bail!("Target path {} already exists", package_dir.display());
  }

  if let Some(url) = git {
    print_info(&format!("Cloning {url}..."));
    let clone_target = package_dir.to_string_lossy();
    run_command("git", &["clone", url, clone_target.as_ref()], root)?;
  } else {
    let name = match name {
      Some(name) => name,
      None => prompts::package_name()?,
    };
    if !name.contains('/') {
      bail!("Package name must look like vendor/name, got `{name}`");
    }
    write_skeleton(&package_dir, &name)?;
  }

  let config_path = root.join(consts::CONFIG_FILENAME);
  let mut config = StudioConfig::load(&config_path)?;
  config.add_path(path.to_string_lossy());
  config.save(&config_path)?;

  print_success(&format!("Package directory {} created", package_dir.display()));

  print_info("Running composer install for the new package...");
  run_command("composer", &["install", "--prefer-dist"], &package_dir)?;

  print_info("Dumping autoloads...");
  run_command("composer", &["dump-autoload"], root)?;

  print_success("Package successfully created");
  Ok(())
}

fn write_skeleton(dir: &Path, name: &str) -> Result<()> {
  fs::create_dir_all(dir.join("src")).with_context(|| format!("Failed to create {}", dir.display()))?;

  let mut psr4 = serde_json::Map::new();
  psr4.insert(psr4_namespace(name), serde_json::Value::String("src/".to_string()));

  let manifest = serde_json::json!({
    "name": name,
    "description": "",
    "require": {},
    "autoload": { "psr-4": psr4 }
  });
  let content = serde_json::to_string_pretty(&manifest).context("Failed to serialize the manifest")?;
  fs::write(dir.join(consts::MANIFEST_FILENAME), content)
    .with_context(|| format!("Failed to write {}", dir.join(consts::MANIFEST_FILENAME).display()))?;

  Ok(())
}

/// `acme/widget-factory` -> `Acme\WidgetFactory\`
fn psr4_namespace(name: &str) -> String {
  name
    .split('/')
    .map(studly)
    .collect::<Vec<_>>()
    .join("\\")
    + "\\"
}

fn studly(part: &str) -> String {
  part
    .split(['-', '_', '.'])
    .filter(|chunk| !chunk.is_empty())
    .map(|chunk| {
      let mut chars = chunk.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn psr4_namespace_studlifies_both_parts() {
    assert_eq!(psr4_namespace("acme/widgets"), "Acme\\Widgets\\");
    assert_eq!(psr4_namespace("acme/widget-factory"), "Acme\\WidgetFactory\\");
    assert_eq!(psr4_namespace("my_org/some.pkg"), "MyOrg\\SomePkg\\");
  }

  #[test]
  fn skeleton_writes_a_valid_manifest() {
    let temp = tempfile::TempDir::new().unwrap();
    let dir = temp.path().join("pkg");
    write_skeleton(&dir, "acme/widgets").unwrap();

    let manifest: serde_json::Value =
      serde_json::from_str(&fs::read_to_string(dir.join("composer.json")).unwrap()).unwrap();
    assert_eq!(manifest["name"], "acme/widgets");
    assert_eq!(manifest["autoload"]["psr-4"]["Acme\\Widgets\\"], "src/");
    assert!(dir.join("src").is_dir());
  }
}
