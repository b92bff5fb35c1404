//! XDG Icon Theme descriptor parsing.
//!
//! An `index.theme` file is INI-like: `[Section]` headers, `Key = Value`
//! lines and `#` comments. The `[Icon Theme]` section names the theme, its
//! parents and its directories; every other section describes one of the
//! declared directories.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::icon::error::IconError;

/// File name of a theme descriptor.
pub const INDEX_FILE: &str = "index.theme";

/// Name of the theme-level section.
const THEME_SECTION: &str = "Icon Theme";

/// How a directory matches requested sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DirectoryType {
    /// Icons are exactly `size` pixels.
    Fixed,
    /// Icons scale anywhere in `min_size..=max_size`.
    #[serde(alias = "Scalable")]
    Scaled,
    /// Icons are usable within `size ± threshold`.
    #[default]
    Threshold,
}

impl DirectoryType {
    /// Parse a `Type` value. `Scalable` is the freedesktop spelling of `Scaled`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Fixed" => Some(Self::Fixed),
            "Scaled" | "Scalable" => Some(Self::Scaled),
            "Threshold" => Some(Self::Threshold),
            _ => None,
        }
    }

    /// Get the type as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "Fixed",
            Self::Scaled => "Scaled",
            Self::Threshold => "Threshold",
        }
    }
}

/// One directory advertised by a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconDirectory {
    /// Path of the directory relative to the theme's base path.
    pub path_name: String,
    /// Size matching mode.
    pub directory_type: DirectoryType,
    /// Nominal icon size.
    pub size: i32,
    /// Smallest size a `Scaled` directory serves.
    pub min_size: i32,
    /// Largest size a `Scaled` directory serves.
    pub max_size: i32,
    /// Allowed deviation for `Threshold` directories.
    pub threshold: i32,
    /// Display scale the icons are drawn for.
    pub scale: i32,
    /// Usage context label (`Actions`, `Apps`, ...).
    pub context: Option<String>,
}

impl IconDirectory {
    /// A directory declared in `Directories` before its own section is read.
    pub fn placeholder(path_name: impl Into<String>) -> Self {
        Self {
            path_name: path_name.into(),
            directory_type: DirectoryType::Threshold,
            size: 0,
            min_size: 0,
            max_size: 0,
            threshold: 0,
            scale: 1,
            context: None,
        }
    }

    /// Apply one key of the directory's section.
    fn set(&mut self, key: &str, value: &str) {
        match key {
            "Size" => self.size = parse_int(value),
            "MinSize" => self.min_size = parse_int(value),
            "MaxSize" => self.max_size = parse_int(value),
            "Scale" => self.scale = parse_int(value),
            "Threshold" => self.threshold = parse_int(value),
            "Type" => {
                if let Some(directory_type) = DirectoryType::from_str(value) {
                    self.directory_type = directory_type;
                } else {
                    log::debug!(
                        "IconTheme: Unknown directory type '{}' for '{}'",
                        value,
                        self.path_name
                    );
                }
            },
            "Context" => self.context = Some(value.to_string()),
            _ => {},
        }
    }
}

impl fmt::Display for IconDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type: {}, Size: {}, MinSize: {}, MaxSize: {}, Scale: {}, Threshold: {}, Context: {}, Pathname: {}",
            self.directory_type.as_str(),
            self.size,
            self.min_size,
            self.max_size,
            self.scale,
            self.threshold,
            self.context.as_deref().unwrap_or(""),
            self.path_name,
        )
    }
}

/// XDG Icon Theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconTheme {
    /// Theme name.
    pub name: String,
    /// Inherited themes, searched depth-first in this order.
    pub parents: Vec<String>,
    /// Base path to theme directory.
    pub base_path: PathBuf,
    /// Directories in declaration order.
    pub directories: Vec<IconDirectory>,
    /// Human readable description.
    #[serde(default)]
    pub comment: Option<String>,
    /// Whether the theme should be hidden from theme pickers.
    #[serde(default)]
    pub hidden: bool,
    /// Name of an icon that represents the theme.
    #[serde(default)]
    pub example: Option<String>,
}

impl IconTheme {
    /// Load an icon theme from the `index.theme` inside `theme_dir`.
    pub fn load(theme_dir: &Path) -> Result<Self, IconError> {
        let index_path = theme_dir.join(INDEX_FILE);
        let bytes = fs::read(&index_path).map_err(|source| IconError::IndexRead {
            path: index_path.clone(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes);

        let fallback_name = theme_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::parse(&content, theme_dir.to_path_buf(), &fallback_name))
    }

    /// Parse descriptor content.
    ///
    /// `fallback_name` names the theme when the descriptor has no `Name` key.
    pub fn parse(content: &str, base_path: PathBuf, fallback_name: &str) -> Self {
        let mut theme = IconTheme {
            base_path,
            ..Self::default()
        };
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut current_section = String::new();

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current_section = line[1..line.len() - 1].trim().to_string();
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if current_section == THEME_SECTION {
                match key {
                    "Name" => theme.name = value.to_string(),
                    "Comment" => theme.comment = Some(value.to_string()),
                    "Example" => theme.example = Some(value.to_string()),
                    "Hidden" => theme.hidden = value.eq_ignore_ascii_case("true"),
                    "Inherits" => theme.parents = split_list(value),
                    "Directories" | "ScaledDirectories" => {
                        for dir in split_list(value) {
                            if index.contains_key(&dir) {
                                continue;
                            }
                            index.insert(dir.clone(), theme.directories.len());
                            theme.directories.push(IconDirectory::placeholder(dir));
                        }
                    },
                    _ => {},
                }
            } else if let Some(&i) = index.get(&current_section) {
                theme.directories[i].set(key, value);
            }
        }

        if theme.name.is_empty() {
            theme.name = fallback_name.to_string();
        }

        theme
    }
}

impl fmt::Display for IconTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Theme: {}", self.name)?;
        writeln!(f, "  BasePath: {}", self.base_path.display())?;
        writeln!(f, "  Parents: {:?}", self.parents)?;
        writeln!(f, "  Subdirs:")?;
        for dir in &self.directories {
            writeln!(f, "    - {}", dir)?;
        }
        Ok(())
    }
}

/// Parse an integer field; anything unparsable is zero.
fn parse_int(value: &str) -> i32 {
    value.parse().unwrap_or(0)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
