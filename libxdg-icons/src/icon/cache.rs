//! On-disk theme map cache.
//!
//! Scanning every icon theme is expensive, so the merged [`ThemeMap`] is
//! stored as JSON. The cache file's own modification time is its only
//! freshness signal: within the freshness window it is served as-is, past it
//! the map is rebuilt from scratch and the file rewritten.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use libxdg_basedir::BaseDirs;

use crate::icon::error::IconError;
use crate::icon::map::ThemeMap;

/// File name of the cache inside the XDG cache directory.
pub const CACHE_FILE_NAME: &str = "libxdg-icons.json";

/// Default freshness window.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(4 * 60 * 60);

/// Serialises rebuild+write within this process.
static REBUILD_LOCK: Mutex<()> = Mutex::new(());

/// A theme map cache file.
#[derive(Debug, Clone)]
pub struct ThemeMapCache {
    path: PathBuf,
    max_age: Duration,
}

impl ThemeMapCache {
    /// Create a cache backed by `path` with the default freshness window.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_age: DEFAULT_MAX_AGE,
        }
    }

    /// Cache stored as [`CACHE_FILE_NAME`] in the user's cache directory.
    pub fn in_cache_home(base_dirs: &dyn BaseDirs) -> Self {
        Self::new(base_dirs.cache_home().join(CACHE_FILE_NAME))
    }

    /// Set the freshness window.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The freshness window.
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Whether the cache file exists and is within the freshness window.
    pub fn is_fresh(&self) -> Result<bool, IconError> {
        let metadata = match fs::metadata(&self.path) {
            Ok(m) if m.is_file() => m,
            Ok(_) => return Ok(false),
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    log::debug!("ThemeMapCache: Cannot stat {:?}: {}", self.path, e);
                }
                return Ok(false);
            },
        };
        let modified = metadata.modified().map_err(|e| self.read_err(e))?;
        Ok(is_fresh_at(modified, SystemTime::now(), self.max_age))
    }

    /// Get the theme map, rebuilding it from `base_dirs` if the cache is
    /// missing or stale.
    pub fn load(&self, base_dirs: &dyn BaseDirs) -> Result<ThemeMap, IconError> {
        if self.is_fresh()? {
            log::debug!("ThemeMapCache: Using cached theme map {:?}", self.path);
            return self.read();
        }

        let _guard = REBUILD_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        // Another thread may have rebuilt while we waited.
        if self.is_fresh()? {
            return self.read();
        }

        self.rebuild(&base_dirs.data_dirs())
    }

    /// Rebuild the map from `data_dirs` and rewrite the cache file.
    pub fn rebuild(&self, data_dirs: &[PathBuf]) -> Result<ThemeMap, IconError> {
        log::info!("ThemeMapCache: Rebuilding theme map cache {:?}", self.path);
        let map = build_theme_map(data_dirs)?;
        self.write(&map)?;
        Ok(map)
    }

    /// Read and decode the cache file regardless of its age.
    pub fn read(&self) -> Result<ThemeMap, IconError> {
        let bytes = fs::read(&self.path).map_err(|e| self.read_err(e))?;
        serde_json::from_slice(&bytes).map_err(|source| IconError::CacheDecode {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the cache file with `map`.
    ///
    /// The content goes to a sibling temporary file first and is renamed into
    /// place, so readers see either the old or the new map.
    pub fn write(&self, map: &ThemeMap) -> Result<(), IconError> {
        let bytes = serde_json::to_vec(map).map_err(IconError::CacheEncode)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.write_err(e))?;
        }

        let tmp_path = self.tmp_path();
        let written = fs::write(&tmp_path, &bytes).and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.write_err(e));
        }

        log::debug!(
            "ThemeMapCache: Wrote {} theme(s) to {:?}",
            map.len(),
            self.path
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }

    fn read_err(&self, source: io::Error) -> IconError {
        IconError::CacheRead {
            path: self.path.clone(),
            source,
        }
    }

    fn write_err(&self, source: io::Error) -> IconError {
        IconError::CacheWrite {
            path: self.path.clone(),
            source,
        }
    }
}

/// Build a merged theme map from the `icons` directory of every data dir.
///
/// Later data dirs win when two define a theme with the same name. Data dirs
/// without an `icons` directory are skipped.
pub fn build_theme_map(data_dirs: &[PathBuf]) -> Result<ThemeMap, IconError> {
    let mut map = ThemeMap::new();
    for data_dir in data_dirs {
        let icons_dir = data_dir.join("icons");
        if !icons_dir.exists() {
            log::debug!("ThemeMapCache: Skipping missing {:?}", icons_dir);
            continue;
        }
        map.merge(ThemeMap::generate(&icons_dir)?);
    }
    Ok(map)
}

/// Whether a file modified at `modified` is fresh at `now`.
///
/// The window edge is inclusive; timestamps in the future count as age zero.
pub(crate) fn is_fresh_at(modified: SystemTime, now: SystemTime, max_age: Duration) -> bool {
    let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
    age <= max_age
}
