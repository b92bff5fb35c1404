// SPDX-License-Identifier: LGPL-3.0-only
//! XDG Base Directory resolution.
//!
//! Resolves the logical directory classes of the XDG Base Directory
//! Specification (`data`, `config`, `state`, `cache`, `runtime`, `dataDirs`,
//! `configDirs`) to filesystem paths. Environment overrides win; unset or empty
//! variables fall back to the platform defaults (`~/.local/share`,
//! `/usr/local/share:/usr/share`, `/etc/xdg`, ...).
//!
//! Consumers depend on the [`BaseDirs`] trait so tests and embedders can swap
//! in [`StaticBaseDirs`].

mod error;

use std::path::PathBuf;

pub use error::BaseDirError;

/// Logical directory classes, matching the XDG Base Directory keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XdgDirectory {
    /// `$XDG_DATA_HOME`
    Data,
    /// `$XDG_CONFIG_HOME`
    Config,
    /// `$XDG_STATE_HOME`
    State,
    /// `$XDG_CACHE_HOME`
    Cache,
    /// `$XDG_RUNTIME_DIR`
    Runtime,
    /// `$XDG_DATA_DIRS`
    DataDirs,
    /// `$XDG_CONFIG_DIRS`
    ConfigDirs,
}

impl XdgDirectory {
    /// Parse a directory class from its short key (`"data"`, `"dataDirs"`, ...).
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "data" => Some(Self::Data),
            "config" => Some(Self::Config),
            "state" => Some(Self::State),
            "cache" => Some(Self::Cache),
            "runtime" => Some(Self::Runtime),
            "dataDirs" => Some(Self::DataDirs),
            "configDirs" => Some(Self::ConfigDirs),
            _ => None,
        }
    }

    /// The short key of this directory class.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Config => "config",
            Self::State => "state",
            Self::Cache => "cache",
            Self::Runtime => "runtime",
            Self::DataDirs => "dataDirs",
            Self::ConfigDirs => "configDirs",
        }
    }
}

/// What a directory class resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XdgPath {
    /// A single directory (the `*_HOME` classes and the runtime directory).
    Single(PathBuf),
    /// An ordered search list, most important first.
    List(Vec<PathBuf>),
}

impl XdgPath {
    /// The single path, if this is a single-path class.
    pub fn as_single(&self) -> Option<&PathBuf> {
        match self {
            Self::Single(path) => Some(path),
            Self::List(_) => None,
        }
    }

    /// Flatten into an ordered list.
    pub fn into_list(self) -> Vec<PathBuf> {
        match self {
            Self::Single(path) => vec![path],
            Self::List(paths) => paths,
        }
    }
}

/// Source of XDG base directories.
pub trait BaseDirs {
    /// User data directory.
    fn data_home(&self) -> PathBuf;
    /// User configuration directory.
    fn config_home(&self) -> PathBuf;
    /// User state directory.
    fn state_home(&self) -> PathBuf;
    /// User cache directory.
    fn cache_home(&self) -> PathBuf;
    /// Runtime directory, if the session provides one.
    fn runtime_dir(&self) -> Option<PathBuf>;
    /// System data directories in preference order.
    fn data_dirs(&self) -> Vec<PathBuf>;
    /// System configuration directories in preference order.
    fn config_dirs(&self) -> Vec<PathBuf>;

    /// Resolve a directory class by key.
    ///
    /// Returns `None` only for an unavailable runtime directory.
    fn get(&self, directory: XdgDirectory) -> Option<XdgPath> {
        match directory {
            XdgDirectory::Data => Some(XdgPath::Single(self.data_home())),
            XdgDirectory::Config => Some(XdgPath::Single(self.config_home())),
            XdgDirectory::State => Some(XdgPath::Single(self.state_home())),
            XdgDirectory::Cache => Some(XdgPath::Single(self.cache_home())),
            XdgDirectory::Runtime => self.runtime_dir().map(XdgPath::Single),
            XdgDirectory::DataDirs => Some(XdgPath::List(self.data_dirs())),
            XdgDirectory::ConfigDirs => Some(XdgPath::List(self.config_dirs())),
        }
    }
}

/// Base directories derived from the process environment.
pub struct XdgBaseDirs {
    inner: xdg::BaseDirectories,
}

impl XdgBaseDirs {
    /// Read the base directories from the current environment.
    pub fn new() -> Result<Self, BaseDirError> {
        let inner = xdg::BaseDirectories::new()?;
        Ok(Self { inner })
    }
}

impl BaseDirs for XdgBaseDirs {
    fn data_home(&self) -> PathBuf {
        self.inner.get_data_home()
    }

    fn config_home(&self) -> PathBuf {
        self.inner.get_config_home()
    }

    fn state_home(&self) -> PathBuf {
        self.inner.get_state_home()
    }

    fn cache_home(&self) -> PathBuf {
        self.inner.get_cache_home()
    }

    fn runtime_dir(&self) -> Option<PathBuf> {
        match self.inner.get_runtime_directory() {
            Ok(dir) => Some(dir.clone()),
            Err(e) => {
                log::debug!("XdgBaseDirs: No runtime directory: {}", e);
                None
            },
        }
    }

    fn data_dirs(&self) -> Vec<PathBuf> {
        self.inner.get_data_dirs()
    }

    fn config_dirs(&self) -> Vec<PathBuf> {
        self.inner.get_config_dirs()
    }
}

/// Fixed base directories, independent of the environment.
#[derive(Debug, Clone, Default)]
pub struct StaticBaseDirs {
    /// User data directory.
    pub data_home: PathBuf,
    /// User configuration directory.
    pub config_home: PathBuf,
    /// User state directory.
    pub state_home: PathBuf,
    /// User cache directory.
    pub cache_home: PathBuf,
    /// Runtime directory.
    pub runtime_dir: Option<PathBuf>,
    /// System data directories.
    pub data_dirs: Vec<PathBuf>,
    /// System configuration directories.
    pub config_dirs: Vec<PathBuf>,
}

impl StaticBaseDirs {
    /// Base directories with only a cache directory and data search list set.
    pub fn new(cache_home: impl Into<PathBuf>, data_dirs: Vec<PathBuf>) -> Self {
        Self {
            cache_home: cache_home.into(),
            data_dirs,
            ..Self::default()
        }
    }
}

impl BaseDirs for StaticBaseDirs {
    fn data_home(&self) -> PathBuf {
        self.data_home.clone()
    }

    fn config_home(&self) -> PathBuf {
        self.config_home.clone()
    }

    fn state_home(&self) -> PathBuf {
        self.state_home.clone()
    }

    fn cache_home(&self) -> PathBuf {
        self.cache_home.clone()
    }

    fn runtime_dir(&self) -> Option<PathBuf> {
        self.runtime_dir.clone()
    }

    fn data_dirs(&self) -> Vec<PathBuf> {
        self.data_dirs.clone()
    }

    fn config_dirs(&self) -> Vec<PathBuf> {
        self.config_dirs.clone()
    }
}
