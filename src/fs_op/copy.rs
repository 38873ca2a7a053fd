use std::fs::File;
use std::io;
use std::path::Path;

use crate::fs_op::bridge;
use crate::fs_op::create::mkdir_all;
use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::helpers::{ensure_parent_exists, resolve_target};
use crate::fs_op::list::{list, StatMode};
use crate::fs_op::path::resolve;
use crate::fs_op::stat;

/// Copy `src` to `dst`, recursively when `src` is a directory.
///
/// - A file copied onto an existing directory lands at `dst/basename(src)`.
/// - With `overwrite == false` an existing target file is left alone and the
///   call succeeds.
/// - A directory is merged into `dst` (created when missing), entry by entry
///   in name order.
///
/// Copying a file onto itself (the same path, or a hard link to it) is an
/// error and leaves the file untouched.
///
/// The first failing entry stops the copy; whatever was copied before it
/// stays on disk. Only bytes are copied, not permissions or timestamps.
pub fn copy<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q, overwrite: bool) -> Result<()> {
    copy_with_buffer(src, dst, overwrite, bridge::DEFAULT_BUFFER_SIZE)
}

/// [`copy`] streaming file contents in chunks of `buffer_size` bytes.
pub fn copy_with_buffer<P: AsRef<Path>, Q: AsRef<Path>>(
    src: P,
    dst: Q,
    overwrite: bool,
    buffer_size: usize,
) -> Result<()> {
    let src = resolve(src);
    let dst = resolve(dst);
    if dst != src && dst.starts_with(&src) && stat::is_dir(&src) {
        return Err(FsOpError::PathContext {
            op: "Copy",
            src,
            dst,
            source: io::Error::new(io::ErrorKind::InvalidInput, "cannot copy a directory into itself"),
        });
    }
    copy_resolved(&src, &dst, overwrite, buffer_size)
}

fn copy_resolved(src: &Path, dst: &Path, overwrite: bool, buffer_size: usize) -> Result<()> {
    let Some(st) = stat::exists(src) else {
        return Err(FsOpError::not_found("Copy", src));
    };

    if !st.is_dir() {
        let target = resolve_target(src, dst);
        let existing = stat::exists(&target);
        if existing.as_ref().is_some_and(|e| e.same_file(&st)) {
            return Err(FsOpError::PathContext {
                op: "Copy",
                src: src.to_path_buf(),
                dst: target,
                source: io::Error::new(io::ErrorKind::InvalidInput, "source and destination are the same file"),
            });
        }
        if !overwrite && existing.is_some() {
            tracing::debug!(target = %target.display(), "copy skipped, target exists");
            return Ok(());
        }
        return copy_file(src, &target, buffer_size);
    }

    if stat::exists(dst).is_none() {
        mkdir_all(dst)?;
    }

    for entry in list(src, StatMode::None, false)?.sorted() {
        copy_resolved(&src.join(&entry.name), &dst.join(&entry.name), overwrite, buffer_size)?;
    }
    Ok(())
}

/// Stream the bytes of one file into `target`, creating its parents.
fn copy_file(src: &Path, target: &Path, buffer_size: usize) -> Result<()> {
    ensure_parent_exists(target)?;
    let context = |source| FsOpError::PathContext {
        op: "Copy",
        src: src.to_path_buf(),
        dst: target.to_path_buf(),
        source,
    };
    let reader = File::open(src).map_err(context)?;
    let writer = File::create(target).map_err(context)?;
    let bytes = bridge::pipe_with_capacity(reader, writer, buffer_size)?;
    tracing::debug!(src = %src.display(), dst = %target.display(), bytes, "copied file");
    Ok(())
}
