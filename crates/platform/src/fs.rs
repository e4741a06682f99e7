//! Link-or-junction handling and directory transfer primitives.
//!
//! Everything here re-inspects the filesystem at call time; callers must not
//! cache the answers across other filesystem mutations.

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::PlatformError;

/// State of an install destination, derived from the filesystem at the
/// moment of inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// A real entry with actual content.
    Directory,
    /// An active symlink or junction.
    Link,
    /// Nothing exists at the path.
    Missing,
}

/// Inspect the state of a path.
pub fn link_state(path: &Path) -> LinkState {
    match fs::symlink_metadata(path) {
        Err(_) => LinkState::Missing,
        Ok(meta) if meta.file_type().is_symlink() => LinkState::Link,
        Ok(_) if is_junction(path) => LinkState::Link,
        Ok(_) => LinkState::Directory,
    }
}

/// Whether `path` is a symlink or an NTFS junction.
pub fn is_link(path: &Path) -> bool {
    link_state(path) == LinkState::Link
}

#[cfg(windows)]
fn is_junction(path: &Path) -> bool {
    junction::exists(path).unwrap_or(false)
}

#[cfg(not(windows))]
fn is_junction(_path: &Path) -> bool {
    false
}

/// Create a directory link at `link` pointing to `original`.
#[cfg(unix)]
pub fn create_link(original: &Path, link: &Path) -> Result<(), PlatformError> {
    std::os::unix::fs::symlink(original, link).map_err(|source| PlatformError::CreateLink {
        link: link.to_path_buf(),
        original: original.to_path_buf(),
        source,
    })?;

    debug!(link = %link.display(), original = %original.display(), "created symlink");
    Ok(())
}

/// Create a directory link at `link` pointing to `original`.
///
/// Directory symlinks require a privilege most accounts lack, so a junction
/// is created when symlinking fails.
#[cfg(windows)]
pub fn create_link(original: &Path, link: &Path) -> Result<(), PlatformError> {
    if std::os::windows::fs::symlink_dir(original, link).is_ok() {
        debug!(link = %link.display(), original = %original.display(), "created symlink");
        return Ok(());
    }

    junction::create(original, link).map_err(|source| PlatformError::CreateLink {
        link: link.to_path_buf(),
        original: original.to_path_buf(),
        source,
    })?;

    debug!(link = %link.display(), original = %original.display(), "created junction");
    Ok(())
}

/// Remove a symlink or junction without touching the directory it points to.
pub fn remove_link(path: &Path) -> Result<(), PlatformError> {
    if !is_link(path) {
        return Err(PlatformError::NotALink {
            path: path.to_path_buf(),
        });
    }

    #[cfg(unix)]
    let removed = fs::remove_file(path);
    #[cfg(windows)]
    let removed = fs::remove_dir(path);

    removed.map_err(|source| PlatformError::RemoveLink {
        path: path.to_path_buf(),
        source,
    })
}

/// Create a directory and all of its parents if they do not exist yet.
pub fn ensure_dir(path: &Path) -> Result<(), PlatformError> {
    fs::create_dir_all(path).map_err(|source| PlatformError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Recursively copy a directory tree.
///
/// Symlinks inside the tree are recreated as links, not followed.
pub fn copy_dir(from: &Path, to: &Path) -> Result<(), PlatformError> {
    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry.map_err(|source| PlatformError::Walk {
            path: from.to_path_buf(),
            source,
        })?;

        let rel = match entry.path().strip_prefix(from) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let dest = to.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            ensure_dir(&dest)?;
        } else if file_type.is_symlink() {
            let target = fs::read_link(entry.path()).map_err(|source| PlatformError::Copy {
                from: entry.path().to_path_buf(),
                to: dest.clone(),
                source,
            })?;
            recreate_symlink(&target, entry.path(), &dest)?;
        } else {
            fs::copy(entry.path(), &dest).map_err(|source| PlatformError::Copy {
                from: entry.path().to_path_buf(),
                to: dest.clone(),
                source,
            })?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn recreate_symlink(target: &Path, _entry: &Path, dest: &Path) -> Result<(), PlatformError> {
    std::os::unix::fs::symlink(target, dest).map_err(|source| PlatformError::CreateLink {
        link: dest.to_path_buf(),
        original: target.to_path_buf(),
        source,
    })
}

#[cfg(windows)]
fn recreate_symlink(target: &Path, entry: &Path, dest: &Path) -> Result<(), PlatformError> {
    use std::os::windows::fs::{symlink_dir, symlink_file};

    // `metadata` follows the link, so this tells us which flavor to recreate.
    let points_at_dir = entry.metadata().map(|meta| meta.is_dir()).unwrap_or(false);

    let created = if points_at_dir {
        symlink_dir(target, dest)
    } else {
        symlink_file(target, dest)
    };

    created.map_err(|source| PlatformError::CreateLink {
        link: dest.to_path_buf(),
        original: target.to_path_buf(),
        source,
    })
}

/// Move a directory, preferring an atomic rename.
///
/// Falls back to copy-then-remove when the rename fails (for example across
/// filesystems).
pub fn move_dir(from: &Path, to: &Path) -> Result<(), PlatformError> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(err) => {
            debug!(
                from = %from.display(),
                to = %to.display(),
                error = %err,
                "rename failed, copying instead"
            );
            copy_dir(from, to)?;
            fs::remove_dir_all(from).map_err(|source| PlatformError::RemoveDir {
                path: from.to_path_buf(),
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn link_state_distinguishes_directory_link_and_missing() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("real");
        fs::create_dir(&dir).unwrap();

        let link = temp.path().join("link");
        create_link(&dir, &link).unwrap();

        assert_eq!(link_state(&dir), LinkState::Directory);
        assert_eq!(link_state(&link), LinkState::Link);
        assert_eq!(link_state(&temp.path().join("nope")), LinkState::Missing);
    }

    #[test]
    fn created_link_resolves_to_original() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("pkg");
        write_file(&dir.join("file.txt"), "content");

        let link = temp.path().join("linked");
        create_link(&dir, &link).unwrap();

        assert!(is_link(&link));
        assert_eq!(fs::read_to_string(link.join("file.txt")).unwrap(), "content");
    }

    #[test]
    fn remove_link_leaves_original_untouched() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("pkg");
        write_file(&dir.join("file.txt"), "content");

        let link = temp.path().join("linked");
        create_link(&dir, &link).unwrap();
        remove_link(&link).unwrap();

        assert_eq!(link_state(&link), LinkState::Missing);
        assert_eq!(fs::read_to_string(dir.join("file.txt")).unwrap(), "content");
    }

    #[test]
    fn remove_link_refuses_real_directories() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("real");
        fs::create_dir(&dir).unwrap();

        let err = remove_link(&dir).unwrap_err();
        assert!(matches!(err, PlatformError::NotALink { .. }));
        assert!(dir.is_dir());
    }

    #[test]
    fn copy_dir_copies_nested_trees() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        write_file(&src.join("a.txt"), "a");
        write_file(&src.join("nested/deep/b.txt"), "b");

        let dst = temp.path().join("dst");
        copy_dir(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dst.join("nested/deep/b.txt")).unwrap(), "b");
        // Source stays in place.
        assert_eq!(fs::read_to_string(src.join("a.txt")).unwrap(), "a");
    }

    #[cfg(unix)]
    #[test]
    fn copy_dir_recreates_inner_symlinks() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        write_file(&src.join("real.txt"), "data");
        std::os::unix::fs::symlink("real.txt", src.join("alias.txt")).unwrap();

        let dst = temp.path().join("dst");
        copy_dir(&src, &dst).unwrap();

        let copied = dst.join("alias.txt");
        assert!(fs::symlink_metadata(&copied).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&copied).unwrap(), "data");
    }

    #[test]
    fn move_dir_relocates_content() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        write_file(&src.join("a.txt"), "a");

        let dst = temp.path().join("dst");
        move_dir(&src, &dst).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "a");
    }
}
