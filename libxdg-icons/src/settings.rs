// SPDX-License-Identifier: LGPL-3.0-only
use anyhow::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use xdg::BaseDirectories;

use crate::icon::{CACHE_FILE_NAME, DEFAULT_MAX_AGE, FALLBACK_DIRS};

/// Prefix of the configuration directory (`~/.config/libxdg/`).
pub const CONFIG_PREFIX: &str = "libxdg";

/// Name of the settings file inside the configuration directories.
pub const SETTINGS_FILE: &str = "icons.toml";

/// Theme used when no other default is configured.
pub const DEFAULT_THEME: &str = "MiracleOS";

/// Contents of one `icons.toml` file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsFile {
    /// Icon lookup settings
    #[serde(default)]
    pub icons: IconsSection,
    /// Any other sections are captured here
    #[serde(flatten)]
    pub other: HashMap<String, toml::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IconsSection {
    pub default_theme: Option<String>,
    pub cache_max_age_secs: Option<u64>,
    pub cache_file_name: Option<String>,
    pub fallback_dirs: Option<Vec<PathBuf>>,
}

/// Effective icon lookup settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSettings {
    /// Theme resolved by [`find_icon_defaults`](crate::find_icon_defaults).
    pub default_theme: String,
    /// Freshness window of the theme map cache.
    pub cache_max_age: Duration,
    /// File name of the cache inside the XDG cache directory.
    pub cache_file_name: String,
    /// Unthemed directories searched last.
    pub fallback_dirs: Vec<PathBuf>,
}

impl Default for IconSettings {
    fn default() -> Self {
        Self {
            default_theme: DEFAULT_THEME.to_string(),
            cache_max_age: DEFAULT_MAX_AGE,
            cache_file_name: CACHE_FILE_NAME.to_string(),
            fallback_dirs: FALLBACK_DIRS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl IconSettings {
    /// Load settings from standard locations in precedence order.
    ///
    /// Order (later overrides earlier):
    /// 1. System Data: /usr/share/libxdg/icons.toml (and XDG_DATA_DIRS)
    /// 2. System Config: /etc/xdg/libxdg/icons.toml (and XDG_CONFIG_DIRS)
    /// 3. User Config: ~/.config/libxdg/icons.toml (XDG_CONFIG_HOME)
    pub fn load() -> Result<Self> {
        let xdg_dirs = BaseDirectories::with_prefix(CONFIG_PREFIX)?;
        let mut settings = Self::default();

        for path in xdg_dirs.find_data_files(SETTINGS_FILE).rev() {
            settings.load_file(&path);
        }

        // find_config_files yields the user file first, so it is applied last.
        for path in xdg_dirs.find_config_files(SETTINGS_FILE).rev() {
            settings.load_file(&path);
        }

        Ok(settings)
    }

    /// Load settings from explicit paths, later paths overriding earlier ones.
    pub fn load_from_paths(paths: &[PathBuf]) -> Vec<Result<Self>> {
        let mut settings = Self::default();
        let mut results = Vec::new();

        for path in paths {
            let result = read_settings_file(path).map(|file| {
                settings.merge(file);
                settings.clone()
            });
            results.push(result);
        }

        results
    }

    fn load_file(&mut self, path: &Path) {
        log::info!("Loading icon settings from: {:?}", path);
        match read_settings_file(path) {
            Ok(file) => self.merge(file),
            Err(e) => log::warn!("{:#}", e),
        }
    }

    /// Merge a parsed settings file into the current settings.
    pub fn merge(&mut self, other: SettingsFile) {
        let icons = other.icons;
        if let Some(theme) = icons.default_theme {
            self.default_theme = theme;
        }
        if let Some(secs) = icons.cache_max_age_secs {
            self.cache_max_age = Duration::from_secs(secs);
        }
        if let Some(name) = icons.cache_file_name {
            self.cache_file_name = name;
        }
        if let Some(dirs) = icons.fallback_dirs {
            self.fallback_dirs = dirs;
        }
    }
}

fn read_settings_file(path: &Path) -> Result<SettingsFile> {
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read settings file {:?}: {}", path, e))?;
    toml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse settings file {:?}: {}", path, e))
}
