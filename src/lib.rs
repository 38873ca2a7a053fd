pub mod fs_op;
pub mod settings;

pub use crate::fs_op::archive::{ArchiveOptions, ZipMethod};
pub use crate::fs_op::list::{DirectoryListing, ListEntry, StatMode};
pub use crate::fs_op::path::{relative_to, resolve};
pub use crate::fs_op::stat::{Stat, StatKind};
pub use crate::fs_op::{ErrorKind, FsOpError, FsShell};
pub use crate::settings::{load_settings, Settings};
