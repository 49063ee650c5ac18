//! One discovery run: seed the graphics allowlist, then walk the per-user and
//! all-users start menus.

use crate::associations::{resolve_image_handlers, AssociationStore};
use crate::catalog::{App, AppCatalog, AppList};
use crate::config::DiscoveryConfig;
use crate::error::Result;
use crate::filter::{self, Rejection};
use crate::icon::IconProvider;
use crate::scan::scan;
use crate::shortcut::{self, LinkResolver};
use log::{debug, info, warn};
use regex::Regex;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

/// Counters for one launcher directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassStats {
    pub root: PathBuf,
    pub shortcuts: usize,
    pub graphics: usize,
    pub misc: usize,
    pub rejected: FxHashMap<Rejection, usize>,
}

impl PassStats {
    pub fn rejected(&self, reason: Rejection) -> usize {
        self.rejected.get(&reason).copied().unwrap_or(0)
    }

    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }
}

#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub catalog: AppCatalog,
    /// Allowlist placeholders added before scanning.
    pub seeded: usize,
    pub passes: Vec<PassStats>,
}

pub struct Discovery<'a> {
    config: DiscoveryConfig,
    associations: &'a dyn AssociationStore,
    links: &'a dyn LinkResolver,
    icons: &'a dyn IconProvider,
}

impl<'a> Discovery<'a> {
    pub fn new(
        config: DiscoveryConfig,
        associations: &'a dyn AssociationStore,
        links: &'a dyn LinkResolver,
        icons: &'a dyn IconProvider,
    ) -> Self {
        Self {
            config,
            associations,
            links,
            icons,
        }
    }

    /// Runs the whole pipeline. `all_users_root` is `None` when the host
    /// couldn't name the shared directory; that pass is then skipped.
    /// Only an unusable category denylist fails the run.
    pub fn run(
        &self,
        image_extensions: &[String],
        user_root: &Path,
        all_users_root: Option<&Path>,
    ) -> Result<DiscoveryReport> {
        let category = self.config.category_regex()?;
        let mut report = DiscoveryReport::default();

        report.seeded = self.seed(&mut report.catalog, image_extensions);
        info!(
            "{} image handlers registered for {} extensions",
            report.seeded,
            image_extensions.len()
        );

        info!("User programs: {}", user_root.display());
        let pass = self.scan_root(&mut report.catalog, user_root, &category);
        report.passes.push(pass);

        match all_users_root {
            Some(root) => {
                info!("All users programs: {}", root.display());
                let pass = self.scan_root(&mut report.catalog, root, &category);
                report.passes.push(pass);
            }
            None => warn!("No all users programs directory, scanning the user's only"),
        }

        info!(
            "Found {} graphics and {} other apps",
            report.catalog.graphics_len(),
            report.catalog.misc_len()
        );
        Ok(report)
    }

    /// Adds an empty graphics placeholder for every registered image handler.
    pub fn seed(&self, catalog: &mut AppCatalog, image_extensions: &[String]) -> usize {
        resolve_image_handlers(self.associations, image_extensions, &self.config.exe_suffix)
            .iter()
            .filter(|handler| catalog.seed_graphics(handler))
            .count()
    }

    /// Scans one launcher directory into `catalog`.
    pub fn scan_root(&self, catalog: &mut AppCatalog, root: &Path, category: &Regex) -> PassStats {
        let mut stats = PassStats {
            root: root.to_path_buf(),
            ..Default::default()
        };
        for path in scan(root, &self.config.shortcut_extension) {
            stats.shortcuts += 1;
            let resolved = shortcut::resolve(self.links, &path);
            if let Err(reason) = filter::check(&resolved, category, &self.config, catalog) {
                debug!("Skipping {} ({reason})", resolved.link.display());
                *stats.rejected.entry(reason).or_default() += 1;
                continue;
            }
            // check() only passes shortcuts with a target
            let Some(target) = resolved.target.as_deref() else {
                continue;
            };
            let app = App {
                name: resolved.link_stem(),
                icon: self.icons.icon_for(target),
                filepath: target.to_path_buf(),
            };
            match catalog.classify(resolved.target_file_name(), app) {
                AppList::Graphics => stats.graphics += 1,
                AppList::Misc => stats.misc += 1,
            }
            debug!("{} -> {}", resolved.link.display(), target.display());
        }
        info!(
            "{}: {} shortcuts, {} graphics, {} other, {} skipped",
            root.display(),
            stats.shortcuts,
            stats.graphics,
            stats.misc,
            stats.rejected_total()
        );
        stats
    }
}
