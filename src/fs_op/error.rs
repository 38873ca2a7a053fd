use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Which end of a byte pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSide {
    Source,
    Sink,
}

impl fmt::Display for StreamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamSide::Source => write!(f, "source"),
            StreamSide::Sink => write!(f, "sink"),
        }
    }
}

/// Errors produced by filesystem operations.
#[derive(Error, Debug)]
pub enum FsOpError {
    /// The source path of an operation does not exist.
    #[error("{op} error: source path `{}` does not exist", path.display())]
    NotFound { op: &'static str, path: PathBuf },

    /// Wrapper for an OS error on a single path.
    #[error("{op} failed on `{}`: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Contextual error that includes source and destination paths.
    #[error("{op} failed from `{}` to `{}`: {source}", src.display(), dst.display())]
    PathContext {
        op: &'static str,
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A byte pipeline stopped because one of its ends failed.
    #[error("stream {side} failed: {source}")]
    Stream {
        side: StreamSide,
        #[source]
        source: io::Error,
    },

    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("invalid open flags `{0}`")]
    InvalidFlags(String),

    /// A background stream worker panicked.
    #[error("stream worker failed: {0}")]
    Worker(String),
}

/// Coarse classification of a failure, independent of the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    PermissionDenied,
    CrossDevice,
    NotADirectory,
    IsADirectory,
    Io,
    Other,
}

impl FsOpError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        FsOpError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn not_found(op: &'static str, path: impl Into<PathBuf>) -> Self {
        FsOpError::NotFound {
            op,
            path: path.into(),
        }
    }

    /// The underlying OS error, when there is one.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            FsOpError::Io { source, .. }
            | FsOpError::PathContext { source, .. }
            | FsOpError::Stream { source, .. } => Some(source),
            FsOpError::Zip(zip::result::ZipError::Io(source)) => Some(source),
            _ => None,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FsOpError::NotFound { .. } => ErrorKind::NotFound,
            FsOpError::Zip(zip::result::ZipError::FileNotFound) => ErrorKind::NotFound,
            FsOpError::Pattern { .. } | FsOpError::InvalidFlags(_) | FsOpError::Worker(_) => {
                ErrorKind::Other
            }
            _ => self.io_error().map(classify_io).unwrap_or(ErrorKind::Other),
        }
    }
}

fn classify_io(err: &io::Error) -> ErrorKind {
    #[cfg(unix)]
    {
        match err.raw_os_error() {
            Some(libc::EXDEV) => return ErrorKind::CrossDevice,
            Some(libc::ENOTDIR) => return ErrorKind::NotADirectory,
            Some(libc::EISDIR) => return ErrorKind::IsADirectory,
            _ => {}
        }
    }
    match err.kind() {
        io::ErrorKind::NotFound => ErrorKind::NotFound,
        io::ErrorKind::AlreadyExists => ErrorKind::AlreadyExists,
        io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
        _ => ErrorKind::Io,
    }
}

/// Result alias used across `fs_op`.
pub type Result<T, E = FsOpError> = std::result::Result<T, E>;
