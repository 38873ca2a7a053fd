use std::fs;
use std::path::Path;

use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::list::{list, StatMode};
use crate::fs_op::path::resolve_no_follow;
use crate::fs_op::stat;

/// Remove a file, symlink or directory tree at `path` (`rm -rf`).
///
/// A path that does not exist is already removed, so this returns `Ok(())`
/// and callers need not check first. Symlinks are unlinked, never followed.
/// Directories are emptied depth-first and then removed; the first failure
/// stops the call and leaves the remaining siblings untouched.
///
/// # Examples
///
/// ```no_run
/// use shellfs::fs_op::remove::remove;
/// remove("/tmp/some_dir").expect("remove failed");
/// ```
pub fn remove<P: AsRef<Path>>(path: P) -> Result<()> {
    remove_resolved(&resolve_no_follow(path))
}

fn remove_resolved(path: &Path) -> Result<()> {
    let Some(st) = stat::lexists(path) else {
        return Ok(());
    };

    if !st.is_dir() {
        fs::remove_file(path).map_err(|e| FsOpError::io("Remove", path, e))?;
        tracing::debug!(path = %path.display(), "removed file");
        return Ok(());
    }

    for entry in list(path, StatMode::None, false)?.sorted() {
        remove_resolved(&path.join(&entry.name))?;
    }
    fs::remove_dir(path).map_err(|e| FsOpError::io("Remove", path, e))?;
    tracing::debug!(path = %path.display(), "removed directory");
    Ok(())
}
