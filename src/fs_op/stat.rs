use std::fs::{self, Metadata};
use std::path::Path;
use std::time::SystemTime;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

/// Lightweight classification of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// A symbolic link (only reported by non-following stats).
    Symlink,
    /// Anything else: sockets, FIFOs, devices.
    Other,
}

/// Metadata snapshot of an existing path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub kind: StatKind,
    pub len: u64,
    /// Full `st_mode` on Unix (type and permission bits).
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    /// Device and inode; together they identify the file.
    pub dev: u64,
    pub ino: u64,
    pub modified: Option<SystemTime>,
    pub accessed: Option<SystemTime>,
    pub created: Option<SystemTime>,
}

impl Stat {
    pub fn from_metadata(meta: &Metadata) -> Self {
        let ft = meta.file_type();
        let kind = if ft.is_symlink() {
            StatKind::Symlink
        } else if ft.is_dir() {
            StatKind::Directory
        } else if ft.is_file() {
            StatKind::File
        } else {
            StatKind::Other
        };

        #[cfg(unix)]
        let (mode, uid, gid) = (meta.mode(), meta.uid(), meta.gid());
        #[cfg(not(unix))]
        let (mode, uid, gid) = (if meta.permissions().readonly() { 0o444 } else { 0o666 }, 0, 0);
        #[cfg(unix)]
        let (dev, ino) = (meta.dev(), meta.ino());
        #[cfg(not(unix))]
        let (dev, ino) = (0, 0);

        Stat {
            kind,
            len: meta.len(),
            mode,
            uid,
            gid,
            dev,
            ino,
            modified: meta.modified().ok(),
            accessed: meta.accessed().ok(),
            created: meta.created().ok(),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == StatKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == StatKind::File
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == StatKind::Symlink
    }

    /// True when both stats describe the same file (hard links included).
    pub fn same_file(&self, other: &Stat) -> bool {
        self.dev == other.dev && self.ino == other.ino
    }

    /// Permission bits only (`mode & 0o7777`).
    pub fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }
}

/// Stat `path`, following symlinks. `None` when it does not exist or cannot
/// be stat'd; absence is not an error.
pub fn exists<P: AsRef<Path>>(path: P) -> Option<Stat> {
    fs::metadata(path.as_ref())
        .ok()
        .map(|m| Stat::from_metadata(&m))
}

/// Like [`exists`] but stats a symlink itself, so dangling links are found.
pub fn lexists<P: AsRef<Path>>(path: P) -> Option<Stat> {
    fs::symlink_metadata(path.as_ref())
        .ok()
        .map(|m| Stat::from_metadata(&m))
}

/// Return `true` if the provided `path` is a directory (symlinks followed).
pub fn is_dir<P: AsRef<Path>>(path: P) -> bool {
    exists(path).is_some_and(|s| s.is_dir())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_path_is_none() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("no_such_file_hopefully");
        assert!(exists(&p).is_none());
        assert!(lexists(&p).is_none());
        assert!(!is_dir(&p));
    }

    #[test]
    fn file_and_dir_kinds() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("a.txt");
        fs::write(&file, b"hello").unwrap();
        let st = exists(&file).unwrap();
        assert_eq!(st.kind, StatKind::File);
        assert_eq!(st.len, 5);
        assert!(st.modified.is_some());

        let dir = tmp.path().join("subdir");
        fs::create_dir(&dir).unwrap();
        assert!(exists(&dir).unwrap().is_dir());
        assert!(is_dir(&dir));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_only_seen_by_lexists() {
        let tmp = tempdir().unwrap();
        let link = tmp.path().join("dangling");
        std::os::unix::fs::symlink(tmp.path().join("nowhere"), &link).unwrap();
        assert!(exists(&link).is_none());
        assert!(lexists(&link).unwrap().is_symlink());
    }

    #[cfg(unix)]
    #[test]
    fn hard_links_are_the_same_file() {
        let tmp = tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        let c = tmp.path().join("c");
        fs::write(&a, b"x").unwrap();
        fs::hard_link(&a, &b).unwrap();
        fs::write(&c, b"x").unwrap();
        let sa = exists(&a).unwrap();
        assert!(sa.same_file(&exists(&b).unwrap()));
        assert!(!sa.same_file(&exists(&c).unwrap()));
    }

    #[cfg(unix)]
    #[test]
    fn permission_bits_are_exposed() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("m");
        fs::write(&file, b"").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o640)).unwrap();
        assert_eq!(exists(&file).unwrap().permissions(), 0o640);
    }
}
