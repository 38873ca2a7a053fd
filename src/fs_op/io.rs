//! Thin file-handle passthroughs that report failures as `FsOpError`.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::os::unix::fs::{FileExt, OpenOptionsExt};
use std::os::unix::io::{AsRawFd, IntoRawFd};
use std::path::Path;
use std::str::FromStr;

use crate::fs_op::error::{FsOpError, Result};
use crate::fs_op::path::resolve;

/// How a file is opened, spelled the way `fopen`-style flag strings are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFlags {
    /// `r`: read, must exist.
    Read,
    /// `r+`: read and write, must exist.
    ReadWrite,
    /// `rs+`: read and write with synchronous I/O.
    ReadWriteSync,
    /// `w` / `wx`: write, truncate or create (`exclusive` fails if present).
    Write { exclusive: bool },
    /// `w+` / `wx+`: like `Write` but also readable.
    WriteRead { exclusive: bool },
    /// `a` / `ax`: append, create if missing.
    Append { exclusive: bool },
    /// `a+` / `ax+`: append and read.
    AppendRead { exclusive: bool },
}

impl FromStr for OpenFlags {
    type Err = FsOpError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "r" | "rs" => OpenFlags::Read,
            "r+" => OpenFlags::ReadWrite,
            "rs+" => OpenFlags::ReadWriteSync,
            "w" => OpenFlags::Write { exclusive: false },
            "wx" | "xw" => OpenFlags::Write { exclusive: true },
            "w+" => OpenFlags::WriteRead { exclusive: false },
            "wx+" | "xw+" => OpenFlags::WriteRead { exclusive: true },
            "a" => OpenFlags::Append { exclusive: false },
            "ax" | "xa" => OpenFlags::Append { exclusive: true },
            "a+" => OpenFlags::AppendRead { exclusive: false },
            "ax+" | "xa+" => OpenFlags::AppendRead { exclusive: true },
            other => return Err(FsOpError::InvalidFlags(other.to_string())),
        })
    }
}

impl OpenFlags {
    fn options(self) -> OpenOptions {
        let mut o = OpenOptions::new();
        match self {
            OpenFlags::Read => {
                o.read(true);
            }
            OpenFlags::ReadWrite => {
                o.read(true).write(true);
            }
            OpenFlags::ReadWriteSync => {
                o.read(true).write(true).custom_flags(libc::O_SYNC);
            }
            OpenFlags::Write { exclusive } => {
                o.write(true).truncate(true);
                creation(&mut o, exclusive);
            }
            OpenFlags::WriteRead { exclusive } => {
                o.read(true).write(true).truncate(true);
                creation(&mut o, exclusive);
            }
            OpenFlags::Append { exclusive } => {
                o.append(true);
                creation(&mut o, exclusive);
            }
            OpenFlags::AppendRead { exclusive } => {
                o.read(true).append(true);
                creation(&mut o, exclusive);
            }
        }
        o
    }
}

fn creation(o: &mut OpenOptions, exclusive: bool) {
    if exclusive {
        o.create_new(true);
    } else {
        o.create(true);
    }
}

/// Open `path`. `mode` sets the permission bits of a newly created file
/// (default `0o666`, masked by the umask).
pub fn open<P: AsRef<Path>>(path: P, flags: OpenFlags, mode: Option<u32>) -> Result<File> {
    let path = resolve(path);
    let mut options = flags.options();
    options.mode(mode.unwrap_or(0o666));
    options.open(&path).map_err(|e| FsOpError::io("Open", &path, e))
}

/// Close `file`, reporting the result of `close(2)` instead of ignoring it
/// the way `Drop` does.
pub fn close(file: File) -> Result<()> {
    let fd = file.into_raw_fd();
    nix::unistd::close(fd).map_err(|errno| FsOpError::Io {
        op: "Close",
        path: format!("fd {fd}").into(),
        source: errno.into(),
    })
}

/// Read into `buf`. With a `position` the read is positional and leaves the
/// file cursor alone; otherwise it reads from (and advances) the cursor.
pub fn read(file: &File, buf: &mut [u8], position: Option<u64>) -> Result<usize> {
    let res = match position {
        Some(pos) => file.read_at(buf, pos),
        None => (&*file).read(buf),
    };
    res.map_err(|e| FsOpError::io("Read", format!("fd {}", file.as_raw_fd()), e))
}

/// Write `buf`, positionally when `position` is given. Returns the number of
/// bytes written.
pub fn write(file: &File, buf: &[u8], position: Option<u64>) -> Result<usize> {
    let res = match position {
        Some(pos) => file.write_at(buf, pos),
        None => (&*file).write(buf),
    };
    res.map_err(|e| FsOpError::io("Write", format!("fd {}", file.as_raw_fd()), e))
}

/// Whole content of `path` as bytes.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = resolve(path);
    fs::read(&path).map_err(|e| FsOpError::io("Read", &path, e))
}

/// Whole content of `path` as UTF-8 text.
pub fn read_file_string<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = resolve(path);
    fs::read_to_string(&path).map_err(|e| FsOpError::io("Read", &path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_op::error::ErrorKind;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    #[test]
    fn flag_strings_parse() {
        assert_eq!("r".parse::<OpenFlags>().unwrap(), OpenFlags::Read);
        assert_eq!("wx+".parse::<OpenFlags>().unwrap(), OpenFlags::WriteRead { exclusive: true });
        assert!(matches!("q".parse::<OpenFlags>(), Err(FsOpError::InvalidFlags(_))));
    }

    #[test]
    fn open_write_read_close() {
        let td = tempdir().unwrap();
        let p = td.path().join("data.bin");

        let f = open(&p, OpenFlags::Write { exclusive: false }, Some(0o600)).unwrap();
        assert_eq!(write(&f, b"hello world", None).unwrap(), 11);
        assert_eq!(write(&f, b"W", Some(6)).unwrap(), 1);
        close(f).unwrap();
        assert_eq!(fs::metadata(&p).unwrap().permissions().mode() & 0o777, 0o600);

        let f = open(&p, OpenFlags::Read, None).unwrap();
        let mut buf = [0u8; 5];
        assert_eq!(read(&f, &mut buf, Some(6)).unwrap(), 5);
        assert_eq!(&buf, b"World");
        assert_eq!(read(&f, &mut buf, None).unwrap(), 5);
        assert_eq!(&buf, b"hello");
        close(f).unwrap();
    }

    #[test]
    fn exclusive_create_refuses_existing() {
        let td = tempdir().unwrap();
        let p = td.path().join("once");
        fs::write(&p, b"").unwrap();
        let err = open(&p, OpenFlags::Write { exclusive: true }, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn read_missing_file_fails() {
        let td = tempdir().unwrap();
        let err = read_file(td.path().join("some/non/existing/file.txt")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(open(td.path().join("nope"), OpenFlags::Read, None).is_err());
    }

    #[test]
    fn handle_errors_name_the_descriptor() {
        let td = tempdir().unwrap();
        let p = td.path().join("w.txt");

        let f = open(&p, OpenFlags::Write { exclusive: false }, None).unwrap();
        let fd = f.as_raw_fd();
        let mut buf = [0u8; 4];
        let err = read(&f, &mut buf, None).unwrap_err();
        assert!(err.to_string().contains(&format!("fd {fd}")), "{err}");
        close(f).unwrap();

        let f = open(&p, OpenFlags::Read, None).unwrap();
        let fd = f.as_raw_fd();
        let err = write(&f, b"x", None).unwrap_err();
        assert!(err.to_string().contains(&format!("fd {fd}")), "{err}");
        close(f).unwrap();
    }

    #[test]
    fn read_file_variants() {
        let td = tempdir().unwrap();
        let p = td.path().join("t.txt");
        fs::write(&p, "text").unwrap();
        assert_eq!(read_file(&p).unwrap(), b"text");
        assert_eq!(read_file_string(&p).unwrap(), "text");
    }
}
