//! Shared constants.

/// Name of the configuration file listing managed paths, at the project root.
pub const CONFIG_FILENAME: &str = "studio.json";

/// Hidden per-project state directory holding backups and the mirrored
/// configuration from the last link pass.
pub const STATE_DIR: &str = ".studio";

/// Manifest file expected inside every managed path.
pub const MANIFEST_FILENAME: &str = "composer.json";

/// Synthetic version marking a locally developed, unconstrained package.
pub const DEV_VERSION: &str = "dev-master";

/// Prefix for user-visible diagnostics written to the host's output stream.
pub const IO_PREFIX: &str = "[Studio]";
