//! Permission and ownership changes, single-path and recursive.
//!
//! The recursive variants descend into real directories only; a symlink to a
//! directory has its target's mode changed (as `chmod(2)` does) but is not
//! walked, so link cycles cannot loop forever.

use std::fs;
use std::path::Path;

use std::os::unix::fs::PermissionsExt;

use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::list::{list, StatMode};
use crate::fs_op::path::resolve;
use crate::fs_op::stat;

/// Set the permission bits of exactly `path` (no recursion).
pub fn chmod<P: AsRef<Path>>(path: P, mode: u32) -> Result<()> {
    let path = resolve(path);
    fs::set_permissions(&path, fs::Permissions::from_mode(mode))
        .map_err(|e| FsOpError::io("Chmod", &path, e))?;
    tracing::debug!(path = %path.display(), mode = %format!("{mode:o}"), "chmod");
    Ok(())
}

/// Change owner and/or group of exactly `path`. `None` leaves that id as is.
pub fn chown<P: AsRef<Path>>(path: P, uid: Option<u32>, gid: Option<u32>) -> Result<()> {
    use nix::unistd::{Gid, Uid};

    let path = resolve(path);
    nix::unistd::chown(path.as_path(), uid.map(Uid::from_raw), gid.map(Gid::from_raw))
        .map_err(|errno| FsOpError::io("Chown", &path, errno.into()))?;
    tracing::debug!(path = %path.display(), ?uid, ?gid, "chown");
    Ok(())
}

/// `chmod -R`: apply `mode` to `path` and, for a directory, everything below.
pub fn rchmod<P: AsRef<Path>>(path: P, mode: u32) -> Result<()> {
    recurse("Chmod", &resolve(path), &mut |p: &Path| chmod(p, mode))
}

/// `chown -R`: apply the ids to `path` and, for a directory, everything below.
pub fn rchown<P: AsRef<Path>>(path: P, uid: Option<u32>, gid: Option<u32>) -> Result<()> {
    recurse("Chown", &resolve(path), &mut |p: &Path| chown(p, uid, gid))
}

// Apply `op` top-down, stopping at the first failure.
fn recurse(name: &'static str, path: &Path, op: &mut dyn FnMut(&Path) -> Result<()>) -> Result<()> {
    if stat::exists(path).is_none() {
        return Err(FsOpError::not_found(name, path));
    }
    op(path)?;

    let is_real_dir = stat::lexists(path).is_some_and(|s| s.is_dir());
    if !is_real_dir {
        return Ok(());
    }
    for entry in list(path, StatMode::None, false)?.sorted() {
        let child = path.join(&entry.name);
        if stat::exists(&child).is_none() {
            // Dangling link: nothing to apply to.
            continue;
        }
        recurse(name, &child, op)?;
    }
    Ok(())
}
