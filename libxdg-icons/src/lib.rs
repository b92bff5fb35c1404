// SPDX-License-Identifier: LGPL-3.0-only
//! freedesktop.org Icon Theme lookup.
//!
//! Resolves an icon name, size and scale to an image file by walking the
//! requested theme, its ancestors, `hicolor` and finally the unthemed
//! fallback directories. The discovered themes are cached on disk.
pub mod icon;
pub mod settings;

pub use icon::{
    find_icon_defaults, lookup_icon, DirectoryType, IconDirectory, IconError, IconLookup,
    IconRegistry, IconTheme, ThemeMap, ThemeMapCache,
};
pub use settings::IconSettings;
