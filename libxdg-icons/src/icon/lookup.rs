//! Icon lookup with size matching, theme inheritance and fallbacks.
//!
//! Resolution order for a request:
//!
//! 1. the requested theme, then its parents depth-first in declaration order;
//! 2. the `hicolor` theme and its parents;
//! 3. the unthemed fallback directories (`/usr/share/icons`, `/usr/share/pixmaps`).

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::icon::error::IconError;
use crate::icon::map::ThemeMap;
use crate::icon::theme::{DirectoryType, IconDirectory, IconTheme};

/// File extensions tried for every candidate, in order.
pub const ICON_EXTENSIONS: [&str; 3] = ["png", "svg", "xpm"];

/// Unthemed directories searched when no theme has the icon.
pub const FALLBACK_DIRS: [&str; 2] = ["/usr/share/icons", "/usr/share/pixmaps"];

/// Map keys under which the hicolor theme is looked up.
const HICOLOR_NAMES: [&str; 2] = ["hicolor", "Hicolor"];

impl IconDirectory {
    /// Whether icons in this directory can be used as-is for `size` at `scale`.
    pub fn matches_size(&self, size: i32, scale: i32) -> bool {
        if self.scale != scale {
            return false;
        }
        match self.directory_type {
            DirectoryType::Fixed => self.size == size,
            DirectoryType::Scaled => self.min_size <= size && size <= self.max_size,
            DirectoryType::Threshold => {
                let size = i64::from(size);
                let low = i64::from(self.size) - i64::from(self.threshold);
                let high = i64::from(self.size) + i64::from(self.threshold);
                low <= size && size <= high
            },
        }
    }

    /// How far `size` at `scale` is from what this directory serves, in
    /// device pixels. Zero means in range.
    pub fn size_distance(&self, size: i32, scale: i32) -> u32 {
        let requested = i64::from(size) * i64::from(scale);
        let dir_scale = i64::from(self.scale);

        let (low, high) = match self.directory_type {
            DirectoryType::Fixed => {
                let exact = i64::from(self.size) * dir_scale;
                (exact, exact)
            },
            DirectoryType::Scaled => (
                i64::from(self.min_size) * dir_scale,
                i64::from(self.max_size) * dir_scale,
            ),
            DirectoryType::Threshold => (
                (i64::from(self.size) - i64::from(self.threshold)) * dir_scale,
                (i64::from(self.size) + i64::from(self.threshold)) * dir_scale,
            ),
        };

        let distance = if requested < low {
            low - requested
        } else if requested > high {
            requested - high
        } else {
            0
        };
        u32::try_from(distance).unwrap_or(u32::MAX)
    }
}

/// Find `icon_name` in a single theme, ignoring its parents.
///
/// Directories whose nominal size and scale equal the request are searched
/// first: a file in a directory that [matches](IconDirectory::matches_size)
/// wins immediately, otherwise the file with the smallest
/// [distance](IconDirectory::size_distance) is kept (first found on ties).
/// Only if those directories hold no file at all are the remaining
/// directories searched the same way.
pub fn lookup_icon(icon_name: &str, size: i32, scale: i32, theme: &IconTheme) -> Option<PathBuf> {
    let (nominal, others): (Vec<&IconDirectory>, Vec<&IconDirectory>) = theme
        .directories
        .iter()
        .partition(|dir| dir.size == size && dir.scale == scale);

    closest_in(icon_name, size, scale, &theme.base_path, &nominal)
        .or_else(|| closest_in(icon_name, size, scale, &theme.base_path, &others))
}

fn closest_in(
    icon_name: &str,
    size: i32,
    scale: i32,
    base_path: &Path,
    directories: &[&IconDirectory],
) -> Option<PathBuf> {
    let mut closest: Option<(u32, PathBuf)> = None;

    for dir in directories {
        let dir_path = base_path.join(&dir.path_name);
        for ext in ICON_EXTENSIONS {
            let path = dir_path.join(format!("{}.{}", icon_name, ext));
            if !file_exists(&path) {
                continue;
            }
            if dir.matches_size(size, scale) {
                return Some(path);
            }
            let distance = dir.size_distance(size, scale);
            if closest.as_ref().map_or(true, |(best, _)| distance < *best) {
                closest = Some((distance, path));
            }
        }
    }

    closest.map(|(_, path)| path)
}

/// Icon lookup over a theme map.
pub struct IconLookup<'a> {
    map: &'a ThemeMap,
    fallback_dirs: Vec<PathBuf>,
}

impl<'a> IconLookup<'a> {
    /// Create a lookup over `map` with the standard fallback directories.
    pub fn new(map: &'a ThemeMap) -> Self {
        Self {
            map,
            fallback_dirs: FALLBACK_DIRS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Replace the unthemed fallback directories.
    pub fn with_fallback_dirs(mut self, fallback_dirs: Vec<PathBuf>) -> Self {
        self.fallback_dirs = fallback_dirs;
        self
    }

    /// Unthemed directories searched last.
    pub fn fallback_dirs(&self) -> &[PathBuf] {
        &self.fallback_dirs
    }

    /// The theme map being searched.
    pub fn map(&self) -> &ThemeMap {
        self.map
    }

    /// Find an icon in `theme` or, depth-first, in its ancestors.
    ///
    /// Parents that are not in the map are skipped, as are themes already
    /// visited on this walk.
    pub fn find_icon_helper(
        &self,
        icon_name: &str,
        size: i32,
        scale: i32,
        theme: &IconTheme,
    ) -> Option<PathBuf> {
        let mut visited = HashSet::new();
        self.search_tree(icon_name, size, scale, theme, &mut visited)
    }

    fn search_tree(
        &self,
        icon_name: &str,
        size: i32,
        scale: i32,
        theme: &IconTheme,
        visited: &mut HashSet<String>,
    ) -> Option<PathBuf> {
        if !visited.insert(theme.name.clone()) {
            log::debug!("IconLookup: Theme '{}' already searched", theme.name);
            return None;
        }

        if let Some(path) = lookup_icon(icon_name, size, scale, theme) {
            log::debug!(
                "IconLookup: Found icon '{}' in theme '{}' at {:?}",
                icon_name,
                theme.name,
                path
            );
            return Some(path);
        }

        for parent_name in &theme.parents {
            let Some(parent) = self.map.resolve(parent_name) else {
                log::debug!(
                    "IconLookup: Parent theme '{}' of '{}' not found, skipping",
                    parent_name,
                    theme.name
                );
                continue;
            };
            log::debug!("IconLookup: Trying inherited theme '{}'", parent.name);
            if let Some(path) = self.search_tree(icon_name, size, scale, parent, visited) {
                return Some(path);
            }
        }

        None
    }

    /// Resolve an icon through the full fallback chain starting at `theme`.
    pub fn find_icon(
        &self,
        icon_name: &str,
        size: i32,
        scale: i32,
        theme: &IconTheme,
    ) -> Result<PathBuf, IconError> {
        if let Some(path) = self.find_icon_helper(icon_name, size, scale, theme) {
            return Ok(path);
        }

        match HICOLOR_NAMES.iter().find_map(|name| self.map.get(name)) {
            Some(hicolor) => {
                log::debug!("IconLookup: Falling back to hicolor theme");
                if let Some(path) = self.find_icon_helper(icon_name, size, scale, hicolor) {
                    return Ok(path);
                }
            },
            None => log::debug!("IconLookup: No hicolor theme installed"),
        }

        self.lookup_fallback_icon(icon_name)
            .ok_or_else(|| IconError::IconNotFound(icon_name.to_string()))
    }

    /// Look for `icon_name` directly inside the fallback directories.
    pub fn lookup_fallback_icon(&self, icon_name: &str) -> Option<PathBuf> {
        for dir in &self.fallback_dirs {
            for ext in ICON_EXTENSIONS {
                let path = dir.join(format!("{}.{}", icon_name, ext));
                if file_exists(&path) {
                    log::debug!("IconLookup: Found fallback icon at {:?}", path);
                    return Some(path);
                }
            }
        }
        log::debug!("IconLookup: Icon '{}' not found in any theme", icon_name);
        None
    }
}

fn file_exists(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(directory_type: DirectoryType, size: i32, scale: i32) -> IconDirectory {
        IconDirectory {
            directory_type,
            size,
            scale,
            ..IconDirectory::placeholder("d")
        }
    }

    #[test]
    fn test_fixed_matches_only_exact() {
        let fixed = dir(DirectoryType::Fixed, 16, 1);
        for size in 1..64 {
            for scale in 1..4 {
                let expected = size == 16 && scale == 1;
                assert_eq!(fixed.matches_size(size, scale), expected, "{}@{}", size, scale);
            }
        }
    }

    #[test]
    fn test_fixed_distance_zero_iff_match_at_same_scale() {
        for scale in 1..4 {
            let fixed = dir(DirectoryType::Fixed, 24, scale);
            for size in 1..64 {
                assert_eq!(
                    fixed.size_distance(size, scale) == 0,
                    fixed.matches_size(size, scale)
                );
            }
            assert_eq!(fixed.size_distance(20, scale), 4 * scale as u32);
        }
    }

    #[test]
    fn test_scaled_distance_monotonic() {
        let scaled = IconDirectory {
            min_size: 16,
            max_size: 64,
            ..dir(DirectoryType::Scaled, 48, 2)
        };

        // Inside [32, 128] device pixels.
        for size in 32..=128 {
            assert_eq!(scaled.size_distance(size, 1), 0);
        }

        let mut previous = 0;
        for size in (1..32).rev() {
            let d = scaled.size_distance(size, 1);
            assert!(d >= previous);
            previous = d;
        }
        let mut previous = 0;
        for size in 129..400 {
            let d = scaled.size_distance(size, 1);
            assert!(d >= previous);
            previous = d;
        }
        assert_eq!(scaled.size_distance(10, 1), 22);
        assert_eq!(scaled.size_distance(130, 1), 2);
    }

    #[test]
    fn test_scaled_matches_range() {
        let scaled = IconDirectory {
            min_size: 16,
            max_size: 64,
            ..dir(DirectoryType::Scaled, 48, 1)
        };
        assert!(scaled.matches_size(16, 1));
        assert!(scaled.matches_size(64, 1));
        assert!(!scaled.matches_size(65, 1));
        assert!(!scaled.matches_size(32, 2));
    }

    #[test]
    fn test_threshold_range() {
        let threshold = IconDirectory {
            threshold: 8,
            ..dir(DirectoryType::Threshold, 32, 1)
        };
        assert!(threshold.matches_size(24, 1));
        assert!(threshold.matches_size(40, 1));
        assert!(!threshold.matches_size(41, 1));
        assert_eq!(threshold.size_distance(28, 1), 0);
        assert_eq!(threshold.size_distance(20, 1), 4);
        assert_eq!(threshold.size_distance(44, 1), 4);
        assert_eq!(threshold.size_distance(24, 2), 8);
    }

    #[test]
    fn test_threshold_bounds_at_integer_limits() {
        let huge = IconDirectory {
            threshold: 1,
            ..dir(DirectoryType::Threshold, i32::MAX, 1)
        };
        assert!(huge.matches_size(i32::MAX, 1));
        assert!(huge.matches_size(i32::MAX - 1, 1));
        assert!(!huge.matches_size(i32::MAX - 2, 1));
        assert!(!huge.matches_size(i32::MIN, 1));

        let tiny = IconDirectory {
            threshold: i32::MAX,
            ..dir(DirectoryType::Threshold, i32::MIN, 1)
        };
        assert!(tiny.matches_size(i32::MIN, 1));
        assert!(tiny.matches_size(-1, 1));
        assert!(!tiny.matches_size(0, 1));
    }

    #[test]
    fn test_lookup_with_extreme_descriptor_values() {
        let theme_dir = tempfile::tempdir().unwrap();
        let theme = IconTheme::parse(
            "[Icon Theme]\nName=Huge\nDirectories=big\n\n\
             [big]\nSize=2147483647\nThreshold=1\nType=Threshold\n",
            theme_dir.path().to_path_buf(),
            "huge",
        );
        let expected = theme_dir.path().join("big/test.png");
        fs::create_dir_all(expected.parent().unwrap()).unwrap();
        fs::write(&expected, b"").unwrap();

        assert_eq!(lookup_icon("test", i32::MAX, 1, &theme), Some(expected.clone()));
        assert_eq!(lookup_icon("test", 1, 1, &theme), Some(expected));
    }

    #[test]
    fn test_lookup_in_empty_theme() {
        assert!(lookup_icon("test", 16, 1, &IconTheme::default()).is_none());
    }
}
