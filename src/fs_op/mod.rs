//! Blocking filesystem operations with shell semantics.

pub mod archive;
pub mod bridge;
pub mod copy;
pub mod create;
pub mod error;
pub mod files;
pub mod glob;
pub mod helpers;
pub mod io;
pub mod list;
pub mod mv;
pub mod path;
pub mod permissions;
pub mod remove;
pub mod shell;
pub mod stat;

pub use error::{ErrorKind, FsOpError, Result};
pub use shell::FsShell;
