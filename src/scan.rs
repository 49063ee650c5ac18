use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Every shortcut file below a launcher directory, in traversal order.
///
/// Single pass: once exhausted it stays exhausted. A missing root, or a
/// subdirectory that can't be read, just contributes nothing.
pub struct ShortcutScan {
    walker: walkdir::IntoIter,
    extension: String,
}

impl ShortcutScan {
    pub fn new(root: &Path, extension: &str) -> Self {
        Self {
            // symlinked directories aren't descended into
            walker: WalkDir::new(root).follow_links(false).into_iter(),
            extension: extension.to_string(),
        }
    }

    fn is_shortcut(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
    }
}

impl Iterator for ShortcutScan {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable launcher entry: {e}");
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }
            if self.is_shortcut(entry.path()) {
                return Some(entry.into_path());
            }
        }
    }
}

/// Shorthand for [`ShortcutScan::new`].
pub fn scan(root: &Path, extension: &str) -> ShortcutScan {
    ShortcutScan::new(root, extension)
}
