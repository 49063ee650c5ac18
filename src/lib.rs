//! Finds the applications installed through the Windows start menu and sorts
//! them into image handlers and everything else.

pub mod associations;
pub mod catalog;
pub mod config;
pub mod discovery;
pub mod error;
pub mod filter;
pub mod icon;
pub mod listing;
pub mod paths;
#[cfg(windows)]
pub mod registry;
pub mod scan;
pub mod shortcut;
mod wide_str;

pub use associations::{image_extensions, AssociationStore, JsonAssociationStore};
pub use catalog::{App, AppCatalog, AppList, Icon};
pub use config::DiscoveryConfig;
pub use discovery::{Discovery, DiscoveryReport, PassStats};
pub use error::{DiscoveryError, Result};
pub use filter::Rejection;
pub use shortcut::{LinkResolver, ResolvedShortcut};
