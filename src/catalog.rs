//! The two app lists a discovery run fills in.
//!
//! Both lists are keyed by the target executable's file name (`gimp.exe`),
//! never by full path or shortcut name. A key lives in at most one list.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::path::PathBuf;

/// Opaque display icon. On Windows this is the index into the system image
/// list, which needs no cleanup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Icon(Option<i32>);

impl Icon {
    pub fn from_system_index(index: i32) -> Self {
        Self(Some(index))
    }

    pub fn system_index(&self) -> Option<i32> {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct App {
    /// Shortcut file name without its extension.
    pub name: String,
    #[serde(skip)]
    pub icon: Icon,
    /// Absolute path of the resolved executable, empty for an unresolved
    /// allowlist placeholder.
    pub filepath: PathBuf,
}

impl App {
    pub fn is_resolved(&self) -> bool {
        !self.filepath.as_os_str().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppList {
    Graphics,
    Misc,
}

/// Insertion-ordered records with a file name index on the side.
#[derive(Debug, Default)]
struct OrderedApps {
    entries: Vec<(String, App)>,
    index: FxHashMap<String, usize>,
}

impl OrderedApps {
    fn get(&self, filename: &str) -> Option<&App> {
        self.index.get(filename).map(|&i| &self.entries[i].1)
    }

    fn contains(&self, filename: &str) -> bool {
        self.index.contains_key(filename)
    }

    // overwrites in place so the first discovery keeps its position
    fn upsert(&mut self, filename: &str, app: App) {
        match self.index.get(filename) {
            Some(&i) => self.entries[i].1 = app,
            None => {
                self.index.insert(filename.to_string(), self.entries.len());
                self.entries.push((filename.to_string(), app));
            }
        }
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &App)> {
        self.entries.iter().map(|(k, app)| (k.as_str(), app))
    }
}

/// Graphics and misc app lists. Seeding and a discovery run are the only ways
/// in; nothing is ever removed.
#[derive(Debug, Default)]
pub struct AppCatalog {
    graphics: OrderedApps,
    misc: OrderedApps,
}

impl AppCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unresolved placeholder for a registered image handler.
    /// Returns false, and changes nothing, when the file name is already known
    /// to either list; a seed never overwrites another record.
    pub fn seed_graphics(&mut self, filename: &str) -> bool {
        if self.graphics.contains(filename) || self.misc.contains(filename) {
            return false;
        }
        self.graphics.upsert(filename, App::default());
        true
    }

    /// Stores a discovered app. Known graphics handlers get their record
    /// replaced, everything else goes to misc.
    ///
    /// Only for shortcuts that passed [`crate::filter::check`], so the key is
    /// never a resolved graphics record or a misc record.
    pub(crate) fn classify(&mut self, filename: &str, app: App) -> AppList {
        debug_assert!(
            !self.graphics_app(filename).is_some_and(App::is_resolved)
                && !self.misc.contains(filename),
            "{filename} is already listed"
        );
        if self.graphics.contains(filename) {
            self.graphics.upsert(filename, app);
            AppList::Graphics
        } else {
            self.misc.upsert(filename, app);
            AppList::Misc
        }
    }

    pub fn graphics_app(&self, filename: &str) -> Option<&App> {
        self.graphics.get(filename)
    }

    pub fn misc_app(&self, filename: &str) -> Option<&App> {
        self.misc.get(filename)
    }

    pub fn list_of(&self, filename: &str) -> Option<AppList> {
        if self.graphics.contains(filename) {
            Some(AppList::Graphics)
        } else if self.misc.contains(filename) {
            Some(AppList::Misc)
        } else {
            None
        }
    }

    pub fn graphics(&self) -> impl Iterator<Item = (&str, &App)> {
        self.graphics.iter()
    }

    pub fn misc(&self) -> impl Iterator<Item = (&str, &App)> {
        self.misc.iter()
    }

    /// Graphics first, then misc, each in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (AppList, &str, &App)> {
        self.graphics()
            .map(|(k, app)| (AppList::Graphics, k, app))
            .chain(self.misc().map(|(k, app)| (AppList::Misc, k, app)))
    }

    pub fn graphics_len(&self) -> usize {
        self.graphics.entries.len()
    }

    pub fn misc_len(&self) -> usize {
        self.misc.entries.len()
    }
}
