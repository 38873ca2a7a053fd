//! Shell-facing entry points that accept a glob pattern in place of a path.
//!
//! Each function expands its first argument with [`glob::for_each_match`]
//! and runs the single-path operation once per match, in expansion order,
//! stopping at the first failure. A pattern that matches nothing is a
//! successful no-op. An argument without metacharacters is passed through
//! unchanged, so a missing literal path still reports `NotFound` where the
//! underlying operation does.
//!
//! The single-path operations are re-exported here as well so callers can
//! import everything from one place.

use std::path::Path;

use crate::fs_op::error::Result;
use crate::fs_op::glob::{self, GlobOptions};

/// Single-path create helpers.
pub use crate::fs_op::create::{create_empty_file, mkdir_all, write_file};

/// Single-path copy/move/remove.
pub use crate::fs_op::copy::copy;
pub use crate::fs_op::mv::move_path;
pub use crate::fs_op::remove::remove;

/// Stat-based predicates.
pub use crate::fs_op::stat::{exists, is_dir, lexists};

/// `cp -r PATTERN DST`.
pub fn cp<Q: AsRef<Path>>(pattern: &str, dst: Q, overwrite: bool, options: GlobOptions) -> Result<()> {
    let dst = dst.as_ref();
    glob::for_each_match(pattern, options, |src| copy(src, dst, overwrite))
}

/// `mv PATTERN DST`.
pub fn mv<Q: AsRef<Path>>(pattern: &str, dst: Q, options: GlobOptions) -> Result<()> {
    let dst = dst.as_ref();
    glob::for_each_match(pattern, options, |src| move_path(src, dst))
}

/// `rm -rf PATTERN`.
pub fn rm(pattern: &str, options: GlobOptions) -> Result<()> {
    glob::for_each_match(pattern, options, |p| remove(p))
}

/// `chmod MODE PATTERN`.
pub fn chmod(pattern: &str, mode: u32, options: GlobOptions) -> Result<()> {
    glob::for_each_match(pattern, options, |p| crate::fs_op::permissions::chmod(p, mode))
}

/// `chmod -R MODE PATTERN`.
pub fn rchmod(pattern: &str, mode: u32, options: GlobOptions) -> Result<()> {
    glob::for_each_match(pattern, options, |p| crate::fs_op::permissions::rchmod(p, mode))
}

/// `chown UID:GID PATTERN`.
pub fn chown(pattern: &str, uid: Option<u32>, gid: Option<u32>, options: GlobOptions) -> Result<()> {
    glob::for_each_match(pattern, options, |p| crate::fs_op::permissions::chown(p, uid, gid))
}

/// `chown -R UID:GID PATTERN`.
pub fn rchown(pattern: &str, uid: Option<u32>, gid: Option<u32>, options: GlobOptions) -> Result<()> {
    glob::for_each_match(pattern, options, |p| crate::fs_op::permissions::rchown(p, uid, gid))
}
