use std::fs;
use std::path::Path;

use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::helpers::{ensure_parent_exists, resolve_target};
use crate::fs_op::path::{resolve, resolve_no_follow};
use crate::fs_op::stat;

/// Move (rename) `src` to `dst`.
///
/// If `dst` is an existing directory `src` is moved into it, keeping its
/// name; otherwise `dst` is the final path. The parent of the final path is
/// created when moving a directory. The move is a single `rename(2)`: there
/// is no copy fallback, so crossing filesystems fails with an error of kind
/// [`ErrorKind::CrossDevice`](crate::fs_op::error::ErrorKind::CrossDevice)
/// and leaves `src` in place.
pub fn move_path<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<()> {
    let src = resolve_no_follow(src);
    let dst = resolve(dst);

    let Some(st) = stat::lexists(&src) else {
        return Err(FsOpError::not_found("Move", &src));
    };

    let target = resolve_target(&src, &dst);
    if st.is_dir() {
        ensure_parent_exists(&target)?;
    }

    fs::rename(&src, &target).map_err(|source| FsOpError::PathContext {
        op: "Move",
        src: src.clone(),
        dst: target.clone(),
        source,
    })?;
    tracing::debug!(src = %src.display(), dst = %target.display(), "moved");
    Ok(())
}
