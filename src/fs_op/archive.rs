//! Tar+gzip and zip archive creation and extraction.
//!
//! Tar archives go through the stream bridge: the encoder runs on a worker
//! pushing into a channel that the calling thread drains into the output
//! file, and extraction runs the decoder on a worker fed from the input
//! file. Zip needs a seekable output, so its entries are piped straight into
//! the `ZipWriter`.
//!
//! Archives store the source under its own name: archiving `/data/photos`
//! yields entries `photos/...`, so extracting into `out` recreates
//! `out/photos`.

use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::fs_op::bridge;
use crate::fs_op::create::mkdir_all;
use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::helpers::{base_name, ensure_parent_exists};
use crate::fs_op::path::resolve;
use crate::fs_op::stat::{self, Stat};

const DIR_MODE: u32 = 0o755;
const FILE_MODE: u32 = 0o644;

/// Compression used for zip entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZipMethod {
    Stored,
    #[default]
    Deflated,
}

impl From<ZipMethod> for CompressionMethod {
    fn from(m: ZipMethod) -> Self {
        match m {
            ZipMethod::Stored => CompressionMethod::Stored,
            ZipMethod::Deflated => CompressionMethod::Deflated,
        }
    }
}

/// Codec settings for archive creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// gzip level, 0 (none) to 9 (best).
    pub gzip_level: u32,
    pub zip_method: ZipMethod,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            gzip_level: 6,
            zip_method: ZipMethod::Deflated,
        }
    }
}

/// Write `src` as a gzip-compressed tar to `dst` (default
/// `./<name>.tgz`).
pub fn tar_create<P: AsRef<Path>>(src: P, dst: Option<&Path>) -> Result<()> {
    tar_create_with(src, dst, ArchiveOptions::default())
}

pub fn tar_create_with<P: AsRef<Path>>(src: P, dst: Option<&Path>, options: ArchiveOptions) -> Result<()> {
    let src = resolve(src);
    let Some(st) = stat::exists(&src) else {
        return Err(FsOpError::not_found("Tar", &src));
    };
    let dst = output_path("Tar", &src, &st, dst, "tgz")?;
    ensure_parent_exists(&dst)?;

    let name = base_name(&src);
    let level = Compression::new(options.gzip_level.min(9));
    let out = File::create(&dst).map_err(|e| FsOpError::io("Tar", &dst, e))?;

    let bytes = bridge::run_producer(
        |w| {
            let mut builder = tar::Builder::new(GzEncoder::new(w, level));
            builder.follow_symlinks(false);
            if st.is_dir() {
                builder.append_dir_all(&name, &src)?;
            } else {
                builder.append_path_with_name(&src, &name)?;
            }
            builder.into_inner()?.finish()?;
            Ok(())
        },
        out,
    )?;
    tracing::debug!(src = %src.display(), dst = %dst.display(), bytes, "created tar archive");
    Ok(())
}

/// Unpack the gzip-compressed tar `src` into `dst` (default `.`).
pub fn tar_extract<P: AsRef<Path>>(src: P, dst: Option<&Path>) -> Result<()> {
    let src = resolve(src);
    if stat::exists(&src).is_none() {
        return Err(FsOpError::not_found("Untar", &src));
    }
    let dst = resolve(dst.unwrap_or(Path::new(".")));
    mkdir_all(&dst)?;

    let input = File::open(&src).map_err(|e| FsOpError::io("Untar", &src, e))?;
    let bytes = bridge::run_consumer(input, |r| tar::Archive::new(GzDecoder::new(r)).unpack(&dst))?;
    tracing::debug!(src = %src.display(), dst = %dst.display(), bytes, "extracted tar archive");
    Ok(())
}

/// Write `src` as a zip archive to `dst` (default `./<name>.zip`).
pub fn zip_create<P: AsRef<Path>>(src: P, dst: Option<&Path>) -> Result<()> {
    zip_create_with(src, dst, ArchiveOptions::default())
}

pub fn zip_create_with<P: AsRef<Path>>(src: P, dst: Option<&Path>, options: ArchiveOptions) -> Result<()> {
    let src = resolve(src);
    let Some(st) = stat::exists(&src) else {
        return Err(FsOpError::not_found("Zip", &src));
    };
    let dst = output_path("Zip", &src, &st, dst, "zip")?;
    ensure_parent_exists(&dst)?;

    let out = File::create(&dst).map_err(|e| FsOpError::io("Zip", &dst, e))?;
    let mut zip = ZipWriter::new(out);
    let name = base_name(&src);

    if st.is_dir() {
        add_tree(&mut zip, &src, &name, options.zip_method)?;
    } else {
        add_file(&mut zip, &src, &name.to_string_lossy(), options.zip_method)?;
    }
    zip.finish()?;
    tracing::debug!(src = %src.display(), dst = %dst.display(), "created zip archive");
    Ok(())
}

/// Extract every entry of the zip archive `src` into `dst` (default `.`).
pub fn zip_extract<P: AsRef<Path>>(src: P, dst: Option<&Path>) -> Result<()> {
    let src = resolve(src);
    if stat::exists(&src).is_none() {
        return Err(FsOpError::not_found("Unzip", &src));
    }
    let dst = resolve(dst.unwrap_or(Path::new(".")));
    mkdir_all(&dst)?;

    let input = File::open(&src).map_err(|e| FsOpError::io("Unzip", &src, e))?;
    let mut archive = ZipArchive::new(input)?;
    archive.extract(&dst)?;
    tracing::debug!(src = %src.display(), dst = %dst.display(), entries = archive.len(), "extracted zip archive");
    Ok(())
}

// The archive may not land inside the directory it is built from.
fn output_path(op: &'static str, src: &Path, st: &Stat, dst: Option<&Path>, ext: &str) -> Result<PathBuf> {
    let dst = match dst {
        Some(d) => resolve(d),
        None => {
            let mut file: OsString = base_name(src).into_os_string();
            file.push(".");
            file.push(ext);
            resolve(file)
        }
    };
    if st.is_dir() && dst.starts_with(src) {
        return Err(FsOpError::PathContext {
            op,
            src: src.to_path_buf(),
            dst,
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                "archive would be written inside the source directory",
            ),
        });
    }
    Ok(dst)
}

fn add_tree(zip: &mut ZipWriter<File>, root: &Path, name: &Path, method: ZipMethod) -> Result<()> {
    let dir_options = FileOptions::default()
        .compression_method(method.into())
        .unix_permissions(DIR_MODE);

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let at = e.path().unwrap_or(root).to_path_buf();
            FsOpError::io("Zip", at, e.into())
        })?;
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let entry_name = name.join(rel).to_string_lossy().into_owned();

        if entry.file_type().is_dir() {
            zip.add_directory(entry_name, dir_options)?;
            continue;
        }
        match stat::exists(entry.path()) {
            Some(s) if s.is_file() => add_file(zip, entry.path(), &entry_name, method)?,
            _ => tracing::debug!(path = %entry.path().display(), "zip skipped non-file entry"),
        }
    }
    Ok(())
}

fn add_file(zip: &mut ZipWriter<File>, path: &Path, entry_name: &str, method: ZipMethod) -> Result<()> {
    let options = FileOptions::default()
        .compression_method(method.into())
        .unix_permissions(FILE_MODE);
    zip.start_file(entry_name, options)?;
    let input = File::open(path).map_err(|e| FsOpError::io("Zip", path, e))?;
    bridge::pipe(input, &mut *zip)?;
    Ok(())
}
