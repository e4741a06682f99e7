//! Platform abstractions for studio
//!
//! This crate provides the filesystem and process primitives the link
//! engine is built on:
//! - Link-or-junction handling behind a single capability (symlinks on
//!   Unix, symlinks with a junction fallback on Windows)
//! - Recursive directory copy and move
//! - Running external commands (git, composer)

mod error;
mod fs;
mod process;

pub use error::PlatformError;
pub use fs::{LinkState, copy_dir, create_link, ensure_dir, is_link, link_state, move_dir, remove_link};
pub use process::{ProcessError, run_command};
