//! "Open with" handler lookup for image file types.

use crate::error::{DiscoveryError, Result};
use image::ImageFormat;
use log::{debug, warn};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Read-only view of a per-file-type association store.
pub trait AssociationStore {
    /// Handlers registered for `extension` (no leading dot), in registration
    /// order. An extension nobody registered for is an empty list, not an error.
    fn lookup_handlers(&self, extension: &str) -> Result<Vec<String>>;
}

/// Association store backed by a JSON map of extension to handler list,
/// e.g. `{ "png": ["mspaint.exe", "gimp.exe"] }`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(transparent)]
pub struct JsonAssociationStore {
    handlers: FxHashMap<String, Vec<String>>,
}

impl JsonAssociationStore {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| DiscoveryError::AssociationFile {
            path: path.to_path_buf(),
            source,
        })?;
        let store: Self =
            serde_json::from_str(&text).map_err(|source| DiscoveryError::AssociationFormat {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(store.normalized())
    }

    pub fn insert(&mut self, extension: &str, handlers: Vec<String>) {
        self.handlers.insert(normalize_extension(extension), handlers);
    }

    fn normalized(self) -> Self {
        let handlers = self
            .handlers
            .into_iter()
            .map(|(ext, list)| (normalize_extension(&ext), list))
            .collect();
        Self { handlers }
    }
}

impl AssociationStore for JsonAssociationStore {
    fn lookup_handlers(&self, extension: &str) -> Result<Vec<String>> {
        Ok(self
            .handlers
            .get(&normalize_extension(extension))
            .cloned()
            .unwrap_or_default())
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}

/// Executable names registered to open any of `extensions`, deduplicated and
/// in first-seen order. A failing lookup only costs that one extension.
pub fn resolve_image_handlers(
    store: &dyn AssociationStore,
    extensions: &[String],
    exe_suffix: &str,
) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut handlers = vec![];
    for ext in extensions {
        let registered = match store.lookup_handlers(ext) {
            Ok(list) => list,
            Err(e) => {
                warn!("Skipping .{ext} associations: {e}");
                continue;
            }
        };
        for handler in registered {
            if handler.ends_with(exe_suffix) && seen.insert(handler.clone()) {
                debug!(".{ext} is opened by {handler}");
                handlers.push(handler);
            }
        }
    }
    handlers
}

/// File extensions of every image format the `image` crate can write.
pub fn image_extensions() -> Vec<String> {
    let mut seen = FxHashSet::default();
    ImageFormat::all()
        .filter(|format| format.writing_enabled())
        .flat_map(|format| format.extensions_str().iter())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| seen.insert(ext.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_file(prefix: &str) -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|value| value.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("{prefix}-{}-{now}.json", std::process::id()))
    }

    struct FlakyStore;

    impl AssociationStore for FlakyStore {
        fn lookup_handlers(&self, extension: &str) -> Result<Vec<String>> {
            match extension {
                "png" => Ok(vec!["paint.exe".into(), "gimp.exe".into()]),
                "jpg" => Err(DiscoveryError::AssociationLookup {
                    extension: extension.into(),
                    reason: "access denied".into(),
                }),
                "bmp" => Ok(vec!["gimp.exe".into(), "PhotosApp".into(), "viewer.exe".into()]),
                _ => Ok(vec![]),
            }
        }
    }

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn collects_exe_handlers_across_extensions() {
        let handlers = resolve_image_handlers(&FlakyStore, &exts(&["png", "bmp", "tiff"]), ".exe");
        assert_eq!(handlers, ["paint.exe", "gimp.exe", "viewer.exe"]);
    }

    #[test]
    fn failing_extension_does_not_affect_others() {
        let handlers = resolve_image_handlers(&FlakyStore, &exts(&["jpg", "png"]), ".exe");
        assert_eq!(handlers, ["paint.exe", "gimp.exe"]);
    }

    #[test]
    fn no_extensions_means_no_handlers() {
        assert!(resolve_image_handlers(&FlakyStore, &[], ".exe").is_empty());
    }

    #[test]
    fn association_file_loads_with_normalized_extensions() {
        let path = unique_temp_file("start-menu-assoc");
        fs::write(&path, r#"{ ".PNG": ["paint.exe", "gimp.exe"], "jpg": [] }"#).unwrap();

        let store = JsonAssociationStore::from_file(&path).unwrap();
        assert_eq!(store.lookup_handlers("png").unwrap(), ["paint.exe", "gimp.exe"]);
        assert_eq!(store.lookup_handlers(".png").unwrap(), ["paint.exe", "gimp.exe"]);
        assert!(store.lookup_handlers("jpg").unwrap().is_empty());
        assert!(store.lookup_handlers("gif").unwrap().is_empty());

        fs::remove_file(&path).ok();
    }

    #[test]
    fn malformed_association_file_is_a_format_error() {
        let path = unique_temp_file("start-menu-assoc-bad");
        fs::write(&path, "[1, 2]").unwrap();

        let err = JsonAssociationStore::from_file(&path).unwrap_err();
        assert!(
            matches!(&err, DiscoveryError::AssociationFormat { path: p, .. } if *p == path),
            "got {err:?}"
        );

        fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_association_file_is_a_read_error() {
        let path = unique_temp_file("start-menu-assoc-missing");
        let err = JsonAssociationStore::from_file(&path).unwrap_err();
        assert!(
            matches!(&err, DiscoveryError::AssociationFile { source, .. } if source.kind() == std::io::ErrorKind::NotFound),
            "got {err:?}"
        );
    }

    #[test]
    fn image_extensions_cover_common_formats() {
        let exts = image_extensions();
        assert!(exts.iter().any(|e| e == "png"));
        assert!(exts.iter().any(|e| e == "jpg"));
        assert_eq!(
            exts.len(),
            exts.iter().collect::<FxHashSet<_>>().len(),
            "extensions are deduplicated"
        );
    }
}
