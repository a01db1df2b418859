// src/config.rs

//! Configuration loading for a storage directory.

use std::path::Path;

use crate::models::Config;

/// File name of the configuration inside the storage directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Load `{storage_dir}/config.toml` and apply environment overrides.
///
/// Falls back to defaults if the file is missing or malformed.
pub fn load_config(storage_dir: &Path) -> Config {
    load_config_with(storage_dir, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an explicit override lookup.
pub fn load_config_with(storage_dir: &Path, lookup: impl Fn(&str) -> Option<String>) -> Config {
    let path = storage_dir.join(CONFIG_FILE);
    let mut config = if path.exists() {
        Config::load_or_default(&path)
    } else {
        log::info!("No config at {}, using defaults", path.display());
        Config::default()
    };
    config.apply_overrides(lookup);
    config
}
