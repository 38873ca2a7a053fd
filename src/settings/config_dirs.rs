//! Where the configuration file lives.

use std::path::PathBuf;

use directories_next::ProjectDirs;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SHELLFS_CONFIG";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Per-user configuration directory, e.g. `~/.config/shellfs` on Linux.
/// `None` when no home directory can be determined.
pub fn project_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("org", "shellfs", "shellfs").map(|d| d.config_dir().to_path_buf())
}

/// The config file to read: `explicit` if given, else `$SHELLFS_CONFIG`,
/// else `config.toml` in [`project_config_dir`].
pub fn config_file(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit
        .or_else(|| std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()).map(PathBuf::from))
        .or_else(|| project_config_dir().map(|d| d.join(CONFIG_FILE_NAME)))
}
