use std::path::{Path, PathBuf};

use crate::fs_op::create::mkdir_all;
use crate::fs_op::error::Result;
use crate::fs_op::stat;

/// Resolve the destination for an operation: if `dst` is an existing
/// directory the target becomes `dst.join(basename(src))`, otherwise `dst`
/// itself.
pub fn resolve_target(src: &Path, dst: &Path) -> PathBuf {
    match src.file_name() {
        Some(name) if stat::is_dir(dst) => dst.join(name),
        _ => dst.to_path_buf(),
    }
}

/// Ensure the parent directory of `p` exists.
pub fn ensure_parent_exists(p: &Path) -> Result<()> {
    match p.parent() {
        Some(parent) if stat::exists(parent).is_none() => mkdir_all(parent),
        _ => Ok(()),
    }
}

/// Final path component as an owned path, used for default archive names.
pub(crate) fn base_name(p: &Path) -> PathBuf {
    p.file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("root"))
}
