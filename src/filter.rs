//! Start menu noise filter.
//!
//! Checks run in a fixed order and the first hit wins, which is what the
//! per-reason counters in a [`crate::discovery::PassStats`] report.

use crate::catalog::AppCatalog;
use crate::config::DiscoveryConfig;
use crate::shortcut::ResolvedShortcut;
use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The shortcut sits under a denylisted menu category.
    MenuCategory,
    /// The target is missing or not an executable.
    NotExecutable,
    Uninstaller,
    /// A graphics entry for this executable already has a path.
    GraphicsResolved,
    AlreadyMisc,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rejection::MenuCategory => "menu category",
            Rejection::NotExecutable => "not an executable",
            Rejection::Uninstaller => "uninstaller",
            Rejection::GraphicsResolved => "graphics app already resolved",
            Rejection::AlreadyMisc => "already listed",
        })
    }
}

/// `Ok` when the shortcut should be listed, otherwise the first rule it broke.
pub fn check(
    shortcut: &ResolvedShortcut,
    category: &Regex,
    config: &DiscoveryConfig,
    catalog: &AppCatalog,
) -> Result<(), Rejection> {
    if category.is_match(&shortcut.link.to_string_lossy()) {
        return Err(Rejection::MenuCategory);
    }
    let filename = shortcut.target_file_name();
    if !filename.ends_with(config.exe_suffix.as_str()) {
        return Err(Rejection::NotExecutable);
    }
    if shortcut.target_stem().contains(config.uninstaller_marker.as_str()) {
        return Err(Rejection::Uninstaller);
    }
    // an empty allowlist seed must stay updatable
    if catalog.graphics_app(filename).is_some_and(|app| app.is_resolved()) {
        return Err(Rejection::GraphicsResolved);
    }
    if catalog.misc_app(filename).is_some() {
        return Err(Rejection::AlreadyMisc);
    }
    Ok(())
}
