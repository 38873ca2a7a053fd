use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::helpers::ensure_parent_exists;
use crate::fs_op::path::resolve;
use crate::fs_op::stat;

/// Create every missing directory of `path`, root to leaf.
///
/// Segments that already exist are skipped; the first segment the OS refuses
/// to create stops the call with its error. Calling this on an existing
/// directory succeeds without touching anything.
pub fn mkdir_all<P: AsRef<Path>>(path: P) -> Result<()> {
    let target = resolve(path);
    let mut current = PathBuf::new();
    for comp in target.components() {
        current.push(comp);
        if stat::exists(&current).is_some() {
            continue;
        }
        match fs::create_dir(&current) {
            Ok(()) => tracing::debug!(dir = %current.display(), "created directory"),
            // Lost a race with another creator; fine as long as it is a directory.
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && stat::is_dir(&current) => {}
            Err(e) => return Err(FsOpError::io("Mkdir", &current, e)),
        }
    }
    Ok(())
}

/// Create an empty file at `path`, creating missing parents.
///
/// An already existing `path` (of any type) is left untouched and counts as
/// success.
pub fn create_empty_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let target = resolve(path);
    if stat::lexists(&target).is_some() {
        return Ok(());
    }
    write_file(&target, b"")
}

/// Replace the content of `path` with `data`, creating missing parents.
pub fn write_file<P: AsRef<Path>, D: AsRef<[u8]>>(path: P, data: D) -> Result<()> {
    let target = resolve(path);
    ensure_parent_exists(&target)?;
    fs::write(&target, data.as_ref()).map_err(|e| FsOpError::io("Write", &target, e))?;
    tracing::debug!(file = %target.display(), bytes = data.as_ref().len(), "wrote file");
    Ok(())
}
