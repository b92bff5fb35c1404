#![warn(missing_docs)]

//! Implementations of freedesktop.org specifications.
//!
//! The facade re-exports the member crates:
//!
//! - [`basedir`]: XDG Base Directory resolution.
//! - [`icons`]: Icon Theme parsing, theme map caching and icon lookup.

pub use libxdg_basedir as basedir;
pub use libxdg_icons as icons;

/// A "prelude" for users of libxdg.
///
/// ```rust
/// use libxdg::prelude::*;
/// ```
pub mod prelude {
    pub use crate::basedir::{BaseDirs, StaticBaseDirs, XdgBaseDirs, XdgDirectory, XdgPath};
    pub use crate::icons::{
        find_icon_defaults, DirectoryType, IconDirectory, IconError, IconLookup, IconRegistry,
        IconSettings, IconTheme, ThemeMap, ThemeMapCache,
    };
}
