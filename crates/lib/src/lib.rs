//! studio-lib: Core types and logic for Studio
//!
//! Studio lets a developer work on several Composer packages at once by
//! replacing installed copies under the vendor directory with links to
//! local working copies declared in `studio.json`. This crate provides:
//! - `StudioConfig`: the ordered list of managed paths
//! - `PackageDescriptor`: a package identity built from a local manifest
//! - `BackupStore`: preserved originals under the `.studio` state directory
//! - `link_packages` / `unlink_packages`: the reconciliation passes
//! - Lifecycle hooks mapping host phases onto the passes

pub mod backup;
pub mod config;
pub mod consts;
pub mod hooks;
pub mod host;
pub mod link;
pub mod package;

pub use backup::{BackupError, BackupStore};
pub use config::{ConfigError, StudioConfig};
pub use hooks::{HookContext, HookReport, LifecyclePhase, PhaseAction, dispatch};
pub use host::{HostIo, InstallPaths, InstalledPackage, InstalledRepository, StderrIo, VendorInstallPaths};
pub use link::{
  LinkError, LinkReport, PackageFailure, PassError, UnlinkReport, link_packages, load_packages_for_dump,
  unlink_packages,
};
pub use package::{DescriptorError, PackageDescriptor};
