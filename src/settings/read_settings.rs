use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fs_op::archive::{ArchiveOptions, ZipMethod};
use crate::fs_op::bridge::DEFAULT_BUFFER_SIZE;
use crate::fs_op::glob::GlobOptions;
use crate::settings::config_dirs::config_file;

/// Tunables read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Chunk size for file copies, in bytes.
    pub copy_buffer_size: usize,
    /// gzip level for `tar`, 0 to 9.
    pub gzip_level: u32,
    /// `"stored"` or `"deflated"`.
    pub zip_method: ZipMethod,
    /// Let glob wildcards match dot files.
    pub glob_dot: bool,
    /// Whether `cp` replaces existing files.
    pub overwrite: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let archive = ArchiveOptions::default();
        Self {
            copy_buffer_size: DEFAULT_BUFFER_SIZE,
            gzip_level: archive.gzip_level,
            zip_method: archive.zip_method,
            glob_dot: false,
            overwrite: true,
        }
    }
}

impl Settings {
    pub fn archive_options(&self) -> ArchiveOptions {
        ArchiveOptions {
            gzip_level: self.gzip_level.min(9),
            zip_method: self.zip_method,
        }
    }

    pub fn glob_options(&self) -> GlobOptions {
        GlobOptions { dot: self.glob_dot }
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot read settings file `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings file `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Load settings from `explicit`, `$SHELLFS_CONFIG` or the per-user config
/// directory, in that order. A file that does not exist yields defaults.
pub fn load_settings(explicit: Option<PathBuf>) -> Result<Settings, SettingsError> {
    match config_file(explicit) {
        Some(path) => load_settings_from(&path),
        None => Ok(Settings::default()),
    }
}

/// Load settings from exactly `path`; missing means defaults.
pub fn load_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let settings: Settings = toml::from_str(&text).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), ?settings, "loaded settings");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let td = tempdir().unwrap();
        let s = load_settings_from(&td.path().join("none.toml")).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.copy_buffer_size, 64 * 1024);
        assert!(s.overwrite);
    }

    #[test]
    fn partial_file_overrides_some_keys() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.toml");
        fs::write(&p, "gzip_level = 9\nzip_method = \"stored\"\nglob_dot = true\n").unwrap();
        let s = load_settings(Some(p)).unwrap();
        assert_eq!(s.gzip_level, 9);
        assert_eq!(s.zip_method, ZipMethod::Stored);
        assert!(s.glob_options().dot);
        assert_eq!(s.copy_buffer_size, DEFAULT_BUFFER_SIZE);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.toml");
        fs::write(&p, "gzip_level = \"high\"").unwrap();
        assert!(matches!(load_settings_from(&p), Err(SettingsError::Parse { .. })));

        fs::write(&p, "unknown_key = 1").unwrap();
        assert!(load_settings_from(&p).is_err());
    }

    #[test]
    fn archive_options_clamp_level() {
        let s = Settings {
            gzip_level: 42,
            ..Settings::default()
        };
        assert_eq!(s.archive_options().gzip_level, 9);
    }
}
