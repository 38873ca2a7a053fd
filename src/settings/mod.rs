pub mod config_dirs;
pub mod read_settings;

// Re-export commonly used types/functions for convenience
pub use config_dirs::{config_file, project_config_dir, CONFIG_ENV};
pub use read_settings::{load_settings, load_settings_from, Settings, SettingsError};
