//! A shell-like session over the `fs_op` operations.
//!
//! [`FsShell`] answers every call with `bool` or `Option` and keeps the most
//! recent failure in a slot that the caller inspects with
//! [`FsShell::error`]. Successful calls never touch the slot, so one check
//! after a batch of calls tells whether any of them failed. Each session owns
//! its slot; sessions are not shared between threads.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::fs_op::archive;
use crate::fs_op::copy::copy_with_buffer;
use crate::fs_op::create;
use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::files;
use crate::fs_op::glob;
use crate::fs_op::io::{self, OpenFlags};
use crate::fs_op::list::{self, DirectoryListing, StatMode};
use crate::fs_op::path;
use crate::fs_op::stat::{self, Stat};
use crate::settings::Settings;

#[derive(Debug, Default)]
pub struct FsShell {
    settings: Settings,
    last_error: Option<FsOpError>,
}

impl FsShell {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            last_error: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Message of the last recorded failure, clearing the slot when `clear`
    /// is set.
    pub fn error(&mut self, clear: bool) -> Option<String> {
        let msg = self.last_error.as_ref().map(ToString::to_string);
        if clear {
            self.last_error = None;
        }
        msg
    }

    pub fn last_error(&self) -> Option<&FsOpError> {
        self.last_error.as_ref()
    }

    /// Remove and return the last recorded failure.
    pub fn take_error(&mut self) -> Option<FsOpError> {
        self.last_error.take()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    fn record<T>(&mut self, res: Result<T>) -> Option<T> {
        match res {
            Ok(v) => Some(v),
            Err(err) => {
                tracing::warn!(error = %err, "operation failed");
                self.last_error = Some(err);
                None
            }
        }
    }

    fn check(&mut self, res: Result<()>) -> bool {
        self.record(res).is_some()
    }

    /// `cp -r`; `src` may be a glob pattern. Uses the configured overwrite
    /// policy and buffer size.
    pub fn cp<Q: AsRef<Path>>(&mut self, src: &str, dst: Q) -> bool {
        let (overwrite, buffer) = (self.settings.overwrite, self.settings.copy_buffer_size);
        let dst = dst.as_ref();
        let res = glob::for_each_match(src, self.settings.glob_options(), |p| {
            copy_with_buffer(p, dst, overwrite, buffer)
        });
        self.check(res)
    }

    pub fn mv<Q: AsRef<Path>>(&mut self, src: &str, dst: Q) -> bool {
        let res = files::mv(src, dst, self.settings.glob_options());
        self.check(res)
    }

    pub fn rm(&mut self, pattern: &str) -> bool {
        let res = files::rm(pattern, self.settings.glob_options());
        self.check(res)
    }

    pub fn chmod(&mut self, pattern: &str, mode: u32) -> bool {
        let res = files::chmod(pattern, mode, self.settings.glob_options());
        self.check(res)
    }

    pub fn rchmod(&mut self, pattern: &str, mode: u32) -> bool {
        let res = files::rchmod(pattern, mode, self.settings.glob_options());
        self.check(res)
    }

    pub fn chown(&mut self, pattern: &str, uid: Option<u32>, gid: Option<u32>) -> bool {
        let res = files::chown(pattern, uid, gid, self.settings.glob_options());
        self.check(res)
    }

    pub fn rchown(&mut self, pattern: &str, uid: Option<u32>, gid: Option<u32>) -> bool {
        let res = files::rchown(pattern, uid, gid, self.settings.glob_options());
        self.check(res)
    }

    pub fn list<P: AsRef<Path>>(&mut self, path: P, mode: StatMode, dots: bool) -> Option<DirectoryListing> {
        let res = list::list(path, mode, dots);
        self.record(res)
    }

    pub fn ls<P: AsRef<Path>>(&mut self, path: P) -> Option<Vec<String>> {
        let res = list::ls(path);
        self.record(res)
    }

    pub fn lsl<P: AsRef<Path>>(&mut self, path: P) -> Option<DirectoryListing> {
        self.list(path, StatMode::Shallow, false)
    }

    pub fn lsal<P: AsRef<Path>>(&mut self, path: P) -> Option<DirectoryListing> {
        self.list(path, StatMode::Shallow, true)
    }

    pub fn lsls<P: AsRef<Path>>(&mut self, path: P) -> Option<DirectoryListing> {
        self.list(path, StatMode::FollowLinks, false)
    }

    pub fn lsals<P: AsRef<Path>>(&mut self, path: P) -> Option<DirectoryListing> {
        self.list(path, StatMode::FollowLinks, true)
    }

    pub fn tar<P: AsRef<Path>>(&mut self, src: P, dst: Option<&Path>) -> bool {
        let res = archive::tar_create_with(src, dst, self.settings.archive_options());
        self.check(res)
    }

    pub fn untar<P: AsRef<Path>>(&mut self, src: P, dst: Option<&Path>) -> bool {
        let res = archive::tar_extract(src, dst);
        self.check(res)
    }

    pub fn zip<P: AsRef<Path>>(&mut self, src: P, dst: Option<&Path>) -> bool {
        let res = archive::zip_create_with(src, dst, self.settings.archive_options());
        self.check(res)
    }

    pub fn unzip<P: AsRef<Path>>(&mut self, src: P, dst: Option<&Path>) -> bool {
        let res = archive::zip_extract(src, dst);
        self.check(res)
    }

    pub fn touch<P: AsRef<Path>>(&mut self, path: P) -> bool {
        let res = create::create_empty_file(path);
        self.check(res)
    }

    pub fn mkdir<P: AsRef<Path>>(&mut self, path: P) -> bool {
        let res = create::mkdir_all(path);
        self.check(res)
    }

    /// Open with an `fopen`-style flag string such as `"r"` or `"wx+"`.
    pub fn open<P: AsRef<Path>>(&mut self, path: P, flags: &str, mode: Option<u32>) -> Option<File> {
        let res = flags
            .parse::<OpenFlags>()
            .and_then(|flags| io::open(path, flags, mode));
        self.record(res)
    }

    pub fn close(&mut self, file: File) -> bool {
        let res = io::close(file);
        self.check(res)
    }

    pub fn read(&mut self, file: &File, buf: &mut [u8], position: Option<u64>) -> Option<usize> {
        let res = io::read(file, buf, position);
        self.record(res)
    }

    pub fn write(&mut self, file: &File, buf: &[u8], position: Option<u64>) -> Option<usize> {
        let res = io::write(file, buf, position);
        self.record(res)
    }

    pub fn readfile<P: AsRef<Path>>(&mut self, path: P) -> Option<Vec<u8>> {
        let res = io::read_file(path);
        self.record(res)
    }

    pub fn writefile<P: AsRef<Path>, D: AsRef<[u8]>>(&mut self, path: P, data: D) -> bool {
        let res = create::write_file(path, data);
        self.check(res)
    }

    /// Metadata of `path` following symlinks; absence is not a failure.
    pub fn exists<P: AsRef<Path>>(&self, path: P) -> Option<Stat> {
        stat::exists(path)
    }

    pub fn realpath<P: AsRef<Path>>(&self, p: P) -> PathBuf {
        path::resolve(p)
    }

    /// Path of `p` relative to `base`, or to the current directory.
    pub fn relpath<P: AsRef<Path>>(&self, p: P, base: Option<&Path>) -> PathBuf {
        match base {
            Some(base) => path::relative_to(p, base),
            None => path::relative_to_cwd(p),
        }
    }
}
