//! Error types for studio-platform

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in filesystem operations
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create link {} -> {}: {source}", link.display(), original.display())]
    CreateLink {
        link: PathBuf,
        original: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove link {}: {source}", path.display())]
    RemoveLink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a link: {}", path.display())]
    NotALink { path: PathBuf },

    #[error("failed to read directory {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move {} to {}: {source}", from.display(), to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove directory {}: {source}", path.display())]
    RemoveDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
