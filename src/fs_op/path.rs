//! Path canonicalisation that tolerates paths which do not exist yet.
//!
//! Every mutating operation in `fs_op` runs its arguments through
//! [`resolve`] first so relative inputs are never interpreted against two
//! different bases.

use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Return the canonical absolute form of `path`, even when it does not exist.
///
/// Behaviour:
/// - Relative paths are anchored at the current directory.
/// - `.` and empty segments are dropped; `..` removes the previous segment
///   and is ignored at the root.
/// - The deepest existing prefix is canonicalised by the OS (symlinks in it
///   are resolved) and the remaining segments are appended unchanged.
///
/// This never fails: when no prefix can be canonicalised the lexically
/// normalised path is returned as-is.
pub fn resolve<P: AsRef<Path>>(path: P) -> PathBuf {
    let normal = normalize(&absolute(path.as_ref()));

    let mut prefix = normal.clone();
    let mut rest: Vec<OsString> = Vec::new();
    loop {
        if let Ok(real) = fs::canonicalize(&prefix) {
            return rest.iter().rev().fold(real, |acc, seg| acc.join(seg));
        }
        match (prefix.file_name().map(|n| n.to_os_string()), prefix.parent()) {
            (Some(name), Some(parent)) => {
                rest.push(name);
                prefix = parent.to_path_buf();
            }
            _ => return normal,
        }
    }
}

/// Like [`resolve`] but leaves the final segment alone, so a symlink
/// argument still names the link rather than its target.
pub fn resolve_no_follow<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => resolve(parent).join(name),
        (Some(_), Some(name)) => resolve(".").join(name),
        _ => resolve(path),
    }
}

/// Relative path from `base` to `path`, both resolved first.
///
/// Returns an empty path when both resolve to the same location. If the two
/// share no root (different Windows drives) the resolved `path` is returned.
pub fn relative_to<P: AsRef<Path>, B: AsRef<Path>>(path: P, base: B) -> PathBuf {
    let path = resolve(path);
    let base = resolve(base);

    let ours: Vec<Component> = path.components().collect();
    let theirs: Vec<Component> = base.components().collect();

    if ours.first() != theirs.first() {
        return path;
    }

    let common = ours
        .iter()
        .zip(theirs.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..theirs.len() {
        rel.push("..");
    }
    for c in &ours[common..] {
        rel.push(c.as_os_str());
    }
    rel
}

/// [`relative_to`] with the current directory as base.
pub fn relative_to_cwd<P: AsRef<Path>>(path: P) -> PathBuf {
    relative_to(path, ".")
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => Path::new(std::path::MAIN_SEPARATOR_STR).join(path),
    }
}

// Lexical normalisation; never touches the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for c in path.components() {
        match c {
            Component::Prefix(_) | Component::RootDir => out.push(c.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(seg) => out.push(seg),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn has_dots(p: &Path) -> bool {
        p.components()
            .any(|c| matches!(c, Component::CurDir | Component::ParentDir))
    }

    #[test]
    fn existing_path_is_canonical() {
        let td = TempDir::new().unwrap();
        let real = fs::canonicalize(td.path()).unwrap();
        assert_eq!(resolve(td.path()), real);
        assert_eq!(resolve(td.path().join(".")), real);
    }

    #[test]
    fn missing_tail_is_appended_to_existing_prefix() {
        let td = TempDir::new().unwrap();
        let real = fs::canonicalize(td.path()).unwrap();
        let got = resolve(td.path().join("some/./path/../deep"));
        assert_eq!(got, real.join("some/deep"));
        assert!(got.is_absolute());
        assert!(!has_dots(&got));
    }

    #[test]
    fn relative_inputs_become_absolute_without_dots() {
        for p in [".", "..", "./not/there/../x", "a/b/c"] {
            let got = resolve(p);
            assert!(got.is_absolute(), "{got:?} not absolute");
            assert!(!has_dots(&got), "{got:?} has dots");
        }
    }

    #[test]
    fn parent_segments_stop_at_root() {
        assert_eq!(normalize(Path::new("/../../a")), PathBuf::from("/a"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_prefix_is_resolved() {
        let td = TempDir::new().unwrap();
        let target = td.path().join("target");
        fs::create_dir(&target).unwrap();
        let link = td.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let got = resolve(link.join("missing.txt"));
        assert_eq!(got, fs::canonicalize(&target).unwrap().join("missing.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn no_follow_keeps_the_link_name() {
        let td = TempDir::new().unwrap();
        let real = fs::canonicalize(td.path()).unwrap();
        fs::create_dir(td.path().join("target")).unwrap();
        std::os::unix::fs::symlink(td.path().join("target"), td.path().join("link")).unwrap();
        assert_eq!(resolve_no_follow(td.path().join("link")), real.join("link"));
        assert_eq!(resolve(td.path().join("link")), real.join("target"));
    }

    #[test]
    fn relative_to_base() {
        let td = TempDir::new().unwrap();
        let base = td.path().join("test");
        let path = base.join("some/path/depth");
        assert_eq!(relative_to(&path, &base), PathBuf::from("some/path/depth"));
        assert_eq!(
            relative_to(td.path().join("other"), &base),
            PathBuf::from("../other")
        );
        assert_eq!(relative_to(&base, &base), PathBuf::new());
    }

    #[test]
    fn relative_to_cwd_is_relative() {
        let rel = relative_to_cwd("./test/some/path/depth");
        assert!(rel.is_relative());
        assert!(rel.ends_with("test/some/path/depth"));
    }
}
