//! Shell-style glob expansion over the real filesystem.
//!
//! A pattern is split at `/`. The literal segments before the first one with
//! a metacharacter name the directory that is walked; the rest is compiled
//! with `globset` and matched against paths relative to that directory.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use walkdir::{DirEntry, WalkDir};

use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::stat;

const MAGIC: &[char] = &['*', '?', '[', '{'];

/// Expansion switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobOptions {
    /// Let wildcards match names starting with `.`.
    pub dot: bool,
}

/// True when `pattern` contains a glob metacharacter.
pub fn has_magic(pattern: &str) -> bool {
    pattern.contains(MAGIC)
}

/// Expand `pattern` with default options.
pub fn expand(pattern: &str) -> Result<Vec<PathBuf>> {
    expand_with(pattern, GlobOptions::default())
}

/// Expand `pattern` into the existing paths it matches, parents before
/// children and siblings in byte order. No match is an empty vector.
///
/// A trailing `**` matches zero or more directories, so `tmp/**` yields
/// `tmp` itself ahead of everything below it.
pub fn expand_with(pattern: &str, options: GlobOptions) -> Result<Vec<PathBuf>> {
    if !has_magic(pattern) {
        let literal = PathBuf::from(pattern);
        return Ok(stat::lexists(&literal).map(|_| literal).into_iter().collect());
    }

    let split = Split::new(pattern);
    let matcher = compile(pattern, &split.rest.join("/"))?;
    // `x/**` also matches `x`.
    let base_matcher = match split.rest.split_last() {
        Some((last, parent)) if last == "**" && !parent.is_empty() => {
            Some(compile(pattern, &parent.join("/"))?)
        }
        _ => None,
    };
    let walk_root = if split.root.as_os_str().is_empty() {
        Path::new(".")
    } else {
        split.root.as_path()
    };

    let mut walker = WalkDir::new(walk_root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();
    if let Some(depth) = split.max_depth() {
        walker = walker.max_depth(depth);
    }

    let mut matches = Vec::new();
    if split.rest.len() == 1
        && split.rest[0] == "**"
        && !split.root.as_os_str().is_empty()
        && stat::lexists(&split.root).is_some_and(|s| s.is_dir())
    {
        matches.push(split.root.clone());
    }
    let visible = |e: &DirEntry| options.dot || split.allows_dot(e);
    for entry in walker.into_iter().filter_entry(visible) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::trace!(error = %err, "glob walk skipped an entry");
                continue;
            }
        };
        let Ok(rel) = entry.path().strip_prefix(walk_root) else {
            continue;
        };
        let is_base = entry.file_type().is_dir()
            && base_matcher.as_ref().is_some_and(|m| m.is_match(rel));
        if is_base || matcher.is_match(rel) {
            matches.push(split.root.join(rel));
        }
    }
    tracing::trace!(pattern, count = matches.len(), "glob expanded");
    Ok(matches)
}

/// Run `f` once per match of `pattern`, stopping at the first error.
///
/// A pattern without metacharacters is handed to `f` unchanged, whether or
/// not it exists, so the wrapped operation reports on it itself.
pub fn for_each_match<F>(pattern: &str, options: GlobOptions, mut f: F) -> Result<()>
where
    F: FnMut(&Path) -> Result<()>,
{
    if !has_magic(pattern) {
        return f(Path::new(pattern));
    }
    for path in expand_with(pattern, options)? {
        f(&path)?;
    }
    Ok(())
}

fn compile(pattern: &str, rest: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(rest)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|source| FsOpError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

struct Split {
    root: PathBuf,
    rest: Vec<String>,
}

impl Split {
    fn new(pattern: &str) -> Self {
        let mut root = if pattern.starts_with('/') {
            PathBuf::from("/")
        } else {
            PathBuf::new()
        };
        let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        let first_magic = segments
            .iter()
            .position(|s| has_magic(s))
            .unwrap_or(segments.len());
        for seg in &segments[..first_magic] {
            root.push(seg);
        }
        let rest = segments[first_magic..].iter().map(|s| s.to_string()).collect();
        Split { root, rest }
    }

    // `**` and braces (which may hide a `/`) leave the depth open.
    fn max_depth(&self) -> Option<usize> {
        if self.rest.iter().any(|s| s.contains("**") || s.contains('{')) {
            None
        } else {
            Some(self.rest.len())
        }
    }

    fn allows_dot(&self, entry: &DirEntry) -> bool {
        if !entry.file_name().to_string_lossy().starts_with('.') {
            return true;
        }
        self.rest
            .get(entry.depth().saturating_sub(1))
            .is_some_and(|seg| seg.starts_with('.'))
    }
}
