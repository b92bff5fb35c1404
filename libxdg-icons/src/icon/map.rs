//! Name-keyed collection of every discovered icon theme.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::icon::error::IconError;
use crate::icon::theme::{IconTheme, INDEX_FILE};

/// Every theme found across the icon search directories, keyed by theme name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeMap {
    themes: BTreeMap<String, IconTheme>,
}

impl ThemeMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the map for one icons directory.
    ///
    /// Every directory below `icons_dir` (and `icons_dir` itself) holding an
    /// `index.theme` contributes one theme. The first descriptor or directory
    /// that cannot be read aborts the whole walk.
    pub fn generate(icons_dir: &Path) -> Result<Self, IconError> {
        let mut map = Self::new();
        map.walk(icons_dir)?;
        log::debug!(
            "ThemeMap: Found {} theme(s) under {:?}",
            map.len(),
            icons_dir
        );
        Ok(map)
    }

    fn walk(&mut self, dir: &Path) -> Result<(), IconError> {
        let walk_err = |source| IconError::Walk {
            path: dir.to_path_buf(),
            source,
        };

        if dir.join(INDEX_FILE).is_file() {
            let theme = IconTheme::load(dir)?;
            self.insert(theme);
        }

        let mut entries = fs::read_dir(dir)
            .map_err(walk_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(walk_err)?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            if entry.file_type().map_err(walk_err)?.is_dir() {
                self.walk(&entry.path())?;
            }
        }

        Ok(())
    }

    /// Insert a theme under its name, replacing any previous theme of that name.
    pub fn insert(&mut self, theme: IconTheme) -> Option<IconTheme> {
        self.themes.insert(theme.name.clone(), theme)
    }

    /// Merge `other` into this map. Themes from `other` win on name collisions.
    pub fn merge(&mut self, other: ThemeMap) {
        self.themes.extend(other.themes);
    }

    /// Get a theme by its exact name.
    pub fn get(&self, name: &str) -> Option<&IconTheme> {
        self.themes.get(name)
    }

    /// Resolve a declared theme name.
    ///
    /// Declarations do not always match the stored name's case, so the name is
    /// tried verbatim, then lower-case, upper-case and title-case.
    pub fn resolve(&self, name: &str) -> Option<&IconTheme> {
        name_variants(name).find_map(|variant| self.themes.get(&variant))
    }

    /// Number of themes.
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// Theme names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    /// Human readable listing of every theme and its directories.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for theme in self.themes.values() {
            out.push_str(&theme.to_string());
            out.push('\n');
        }
        out
    }
}

impl FromIterator<IconTheme> for ThemeMap {
    fn from_iter<I: IntoIterator<Item = IconTheme>>(iter: I) -> Self {
        let mut map = Self::new();
        for theme in iter {
            map.insert(theme);
        }
        map
    }
}

/// Spellings of a theme name in lookup preference order, without repeats.
pub(crate) fn name_variants(name: &str) -> impl Iterator<Item = String> {
    let mut variants: Vec<String> = Vec::with_capacity(4);
    for candidate in [
        name.to_string(),
        name.to_lowercase(),
        name.to_uppercase(),
        title_case(name),
    ] {
        if !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants.into_iter()
}

/// Upper-case the first letter of every alphanumeric run, lower-case the rest.
pub(crate) fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
