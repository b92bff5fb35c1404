//! XDG Icon Theme System
//!
//! This module implements icon lookup per the XDG Icon Theme Specification:
//! descriptor parsing, theme map discovery, the on-disk theme map cache, and
//! size-aware lookup with inheritance and fallbacks.

mod cache;
mod error;
mod lookup;
mod map;
mod theme;

use std::path::PathBuf;

use libxdg_basedir::{BaseDirs, XdgBaseDirs};

pub use cache::{build_theme_map, ThemeMapCache, CACHE_FILE_NAME, DEFAULT_MAX_AGE};
pub use error::IconError;
pub use lookup::{lookup_icon, IconLookup, FALLBACK_DIRS, ICON_EXTENSIONS};
pub use map::ThemeMap;
pub use theme::{DirectoryType, IconDirectory, IconTheme, INDEX_FILE};

use crate::settings::IconSettings;

/// Icon registry - main public API for the icon system.
pub struct IconRegistry {
    /// Lookup settings.
    settings: IconSettings,
    /// Where the cache lives and where themes are discovered.
    base_dirs: Box<dyn BaseDirs + Send + Sync>,
}

impl IconRegistry {
    /// Create a registry from the process environment and the settings files.
    ///
    /// Settings that cannot be loaded fall back to the defaults.
    pub fn new() -> Result<Self, IconError> {
        let base_dirs = XdgBaseDirs::new()?;
        let settings = IconSettings::load().unwrap_or_else(|e| {
            log::warn!("IconRegistry: Using default settings: {:#}", e);
            IconSettings::default()
        });
        Ok(Self::with_base_dirs(settings, base_dirs))
    }

    /// Create a registry with explicit settings and base directories.
    pub fn with_base_dirs(
        settings: IconSettings,
        base_dirs: impl BaseDirs + Send + Sync + 'static,
    ) -> Self {
        Self {
            settings,
            base_dirs: Box::new(base_dirs),
        }
    }

    /// Get the current settings.
    pub fn settings(&self) -> &IconSettings {
        &self.settings
    }

    /// Get the default theme name.
    pub fn theme(&self) -> &str {
        &self.settings.default_theme
    }

    /// The theme map cache used by this registry.
    pub fn cache(&self) -> ThemeMapCache {
        ThemeMapCache::new(self.base_dirs.cache_home().join(&self.settings.cache_file_name))
            .with_max_age(self.settings.cache_max_age)
    }

    /// Get the theme map, from the cache if it is fresh.
    pub fn theme_map(&self) -> Result<ThemeMap, IconError> {
        self.cache().load(self.base_dirs.as_ref())
    }

    /// Resolve an icon starting at the theme named `theme_name`.
    ///
    /// An unknown theme name starts the search at the hicolor stage.
    pub fn find_icon(
        &self,
        icon_name: &str,
        size: i32,
        scale: i32,
        theme_name: &str,
    ) -> Result<PathBuf, IconError> {
        let map = self.theme_map()?;
        self.find_in_map(&map, icon_name, size, scale, theme_name)
    }

    /// Resolve an icon against the default theme.
    ///
    /// If the icon is not found and `fallback` names another icon, the whole
    /// resolution is retried once with that name.
    pub fn find_icon_defaults(
        &self,
        icon_name: &str,
        size: i32,
        scale: i32,
        fallback: Option<&str>,
    ) -> Result<PathBuf, IconError> {
        let map = self.theme_map()?;
        let theme = self.settings.default_theme.as_str();

        match self.find_in_map(&map, icon_name, size, scale, theme) {
            Err(e) if e.is_not_found() => match fallback.filter(|f| !f.is_empty()) {
                Some(fallback) => {
                    log::debug!(
                        "IconRegistry: '{}' not found, trying fallback icon '{}'",
                        icon_name,
                        fallback
                    );
                    self.find_in_map(&map, fallback, size, scale, theme)
                },
                None => Err(e),
            },
            result => result,
        }
    }

    fn find_in_map(
        &self,
        map: &ThemeMap,
        icon_name: &str,
        size: i32,
        scale: i32,
        theme_name: &str,
    ) -> Result<PathBuf, IconError> {
        let lookup = IconLookup::new(map).with_fallback_dirs(self.settings.fallback_dirs.clone());
        let empty = IconTheme::default();
        let theme = map.resolve(theme_name).unwrap_or_else(|| {
            log::debug!("IconRegistry: Theme '{}' is not installed", theme_name);
            &empty
        });
        lookup.find_icon(icon_name, size, scale, theme)
    }
}

/// Resolve an icon against the default theme using the process environment.
///
/// See [`IconRegistry::find_icon_defaults`].
pub fn find_icon_defaults(
    icon_name: &str,
    size: i32,
    scale: i32,
    fallback: Option<&str>,
) -> Result<PathBuf, IconError> {
    IconRegistry::new()?.find_icon_defaults(icon_name, size, scale, fallback)
}
