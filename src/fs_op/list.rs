//! Directory enumeration with a selectable stat strategy.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;

use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::path::resolve;
use crate::fs_op::stat::Stat;

/// How children of a listed directory are stat'd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatMode {
    /// No stat calls; every entry carries `None`.
    #[default]
    None,
    /// Stat the entry itself (`lstat`): symlinks are reported as symlinks.
    Shallow,
    /// Follow symlinks to their targets (`stat`).
    FollowLinks,
}

impl StatMode {
    fn stat(self, path: &Path) -> std::io::Result<Option<Stat>> {
        match self {
            StatMode::None => Ok(None),
            StatMode::Shallow => fs::symlink_metadata(path).map(|m| Some(Stat::from_metadata(&m))),
            StatMode::FollowLinks => fs::metadata(path).map(|m| Some(Stat::from_metadata(&m))),
        }
    }
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: OsString,
    pub stat: Option<Stat>,
}

/// Children of a directory in OS enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    entries: Vec<ListEntry>,
}

impl DirectoryListing {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ListEntry> {
        self.entries.iter()
    }

    /// Look an entry up by name.
    pub fn get<N: AsRef<OsStr>>(&self, name: N) -> Option<&ListEntry> {
        let name = name.as_ref();
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains<N: AsRef<OsStr>>(&self, name: N) -> bool {
        self.get(name).is_some()
    }

    /// Reorder entries by name (byte order).
    pub fn sorted(mut self) -> Self {
        self.entries.sort_by(|a, b| a.name.cmp(&b.name));
        self
    }

    /// Entry names, lossily converted for display.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.name.to_string_lossy().into_owned())
            .collect()
    }
}

impl IntoIterator for DirectoryListing {
    type Item = ListEntry;
    type IntoIter = std::vec::IntoIter<ListEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a DirectoryListing {
    type Item = &'a ListEntry;
    type IntoIter = std::slice::Iter<'a, ListEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// List the children of `path`.
///
/// With `include_dot_entries` the listing also contains `.` and `..`, stat'd
/// with the same `mode`. Any failure (missing path, not a directory, a stat
/// that fails) fails the whole call; no partial listing is returned.
pub fn list<P: AsRef<Path>>(path: P, mode: StatMode, include_dot_entries: bool) -> Result<DirectoryListing> {
    let dir = resolve(path);
    let read = fs::read_dir(&dir).map_err(|e| FsOpError::io("List", &dir, e))?;

    let mut entries = Vec::new();
    for item in read {
        let item = item.map_err(|e| FsOpError::io("List", &dir, e))?;
        let name = item.file_name();
        let child = dir.join(&name);
        let stat = mode.stat(&child).map_err(|e| FsOpError::io("List", &child, e))?;
        entries.push(ListEntry { name, stat });
    }

    if include_dot_entries {
        for dot in [".", ".."] {
            let child = dir.join(dot);
            let stat = mode.stat(&child).map_err(|e| FsOpError::io("List", &child, e))?;
            entries.push(ListEntry {
                name: OsString::from(dot),
                stat,
            });
        }
    }

    tracing::trace!(dir = %dir.display(), count = entries.len(), "listed directory");
    Ok(DirectoryListing { entries })
}

/// Names of the children of `path`.
pub fn ls<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    Ok(list(path, StatMode::None, false)?.names())
}

/// `ls -l`: children with `lstat` metadata.
pub fn lsl<P: AsRef<Path>>(path: P) -> Result<DirectoryListing> {
    list(path, StatMode::Shallow, false)
}

/// `ls -al`: like [`lsl`] plus `.` and `..`.
pub fn lsal<P: AsRef<Path>>(path: P) -> Result<DirectoryListing> {
    list(path, StatMode::Shallow, true)
}

/// Like [`lsl`] but following symlinks.
pub fn lsls<P: AsRef<Path>>(path: P) -> Result<DirectoryListing> {
    list(path, StatMode::FollowLinks, false)
}

/// Like [`lsal`] but following symlinks.
pub fn lsals<P: AsRef<Path>>(path: P) -> Result<DirectoryListing> {
    list(path, StatMode::FollowLinks, true)
}
