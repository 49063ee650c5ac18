//! Shortcut to executable resolution.
//!
//! On Windows a `.lnk` file is a Shell Link read through `IShellLinkW`; on
//! other hosts the shortcut is a symbolic link.

use crate::error::{DiscoveryError, Result};
use log::debug;
use std::env;
use std::path::{Path, PathBuf};

/// Reads the target a shortcut points at.
pub trait LinkResolver {
    fn link_target(&self, shortcut: &Path) -> Result<PathBuf>;
}

/// A shortcut together with the executable it opens, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedShortcut {
    /// Absolute path of the shortcut file itself.
    pub link: PathBuf,
    /// Absolute target path, `None` when the link is dangling or unreadable.
    pub target: Option<PathBuf>,
}

impl ResolvedShortcut {
    /// Target file name, empty when unresolved.
    pub fn target_file_name(&self) -> &str {
        self.target
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Target file name minus its extension, empty when unresolved.
    pub fn target_stem(&self) -> &str {
        self.target
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Display name: the shortcut file name minus its extension.
    pub fn link_stem(&self) -> String {
        self.link
            .file_stem()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

/// Resolves `shortcut`. A target that can't be read or doesn't name an
/// existing file leaves `target` empty rather than failing.
pub fn resolve(resolver: &dyn LinkResolver, shortcut: &Path) -> ResolvedShortcut {
    let link = absolute(shortcut);
    let target = match resolver.link_target(&link) {
        Ok(target) => {
            let target = match link.parent() {
                Some(dir) if target.is_relative() => dir.join(target),
                _ => target,
            };
            if target.is_file() {
                Some(target)
            } else {
                debug!("{} points at missing {}", link.display(), target.display());
                None
            }
        }
        Err(e) => {
            debug!("{e}");
            None
        }
    };
    ResolvedShortcut { link, target }
}

/// Follows symbolic links to their final target.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymlinkResolver;

impl LinkResolver for SymlinkResolver {
    fn link_target(&self, shortcut: &Path) -> Result<PathBuf> {
        let shortcut_error = |reason: String| DiscoveryError::Shortcut {
            path: shortcut.to_path_buf(),
            reason,
        };
        let meta = std::fs::symlink_metadata(shortcut).map_err(|e| shortcut_error(e.to_string()))?;
        if !meta.file_type().is_symlink() {
            return Err(shortcut_error("not a link".to_string()));
        }
        std::fs::canonicalize(shortcut).map_err(|e| shortcut_error(e.to_string()))
    }
}

#[cfg(windows)]
pub use shell_link::ShellLinkResolver;

#[cfg(windows)]
mod shell_link {
    use super::LinkResolver;
    use crate::error::{DiscoveryError, Result};
    use crate::wide_str::{string_from_utf16_buffer, to_wide_nul};
    use std::path::{Path, PathBuf};
    use windows::core::{ComInterface, PCWSTR};
    use windows::Win32::Foundation::MAX_PATH;
    use windows::Win32::System::Com::{
        CoCreateInstance, CoInitializeEx, CoUninitialize, IPersistFile, CLSCTX_INPROC_SERVER,
        COINIT_APARTMENTTHREADED, STGM_READ,
    };
    use windows::Win32::UI::Shell::{IShellLinkW, ShellLink, SLGP_UNCPRIORITY};

    /// Shell Link reader. Keeps COM initialised on this thread while alive.
    pub struct ShellLinkResolver {
        _apartment: ComApartment,
    }

    struct ComApartment;

    impl Drop for ComApartment {
        fn drop(&mut self) {
            unsafe { CoUninitialize() }
        }
    }

    impl ShellLinkResolver {
        pub fn new() -> Result<Self> {
            unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }.map_err(|e| {
                DiscoveryError::Shortcut {
                    path: PathBuf::new(),
                    reason: format!("COM initialisation failed: {}", e.message()),
                }
            })?;
            Ok(Self {
                _apartment: ComApartment,
            })
        }
    }

    impl LinkResolver for ShellLinkResolver {
        fn link_target(&self, shortcut: &Path) -> Result<PathBuf> {
            let shortcut_error = |e: windows::core::Error| DiscoveryError::Shortcut {
                path: shortcut.to_path_buf(),
                reason: e.message().to_string(),
            };
            let wide = to_wide_nul(shortcut.as_os_str());
            let mut target = [0u16; MAX_PATH as usize];
            unsafe {
                let link: IShellLinkW =
                    CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER).map_err(shortcut_error)?;
                let file: IPersistFile = link.cast().map_err(shortcut_error)?;
                file.Load(PCWSTR(wide.as_ptr()), STGM_READ)
                    .map_err(shortcut_error)?;
                link.GetPath(&mut target, std::ptr::null_mut(), SLGP_UNCPRIORITY.0 as u32)
                    .map_err(shortcut_error)?;
            }
            Ok(PathBuf::from(string_from_utf16_buffer(&target)))
        }
    }
}

/// The link reader for this host.
pub fn platform_resolver() -> Result<Box<dyn LinkResolver>> {
    #[cfg(windows)]
    {
        Ok(Box::new(ShellLinkResolver::new()?))
    }
    #[cfg(not(windows))]
    {
        Ok(Box::new(SymlinkResolver))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeLinks(HashMap<PathBuf, PathBuf>);

    impl LinkResolver for FakeLinks {
        fn link_target(&self, shortcut: &Path) -> Result<PathBuf> {
            self.0
                .get(shortcut)
                .cloned()
                .ok_or_else(|| DiscoveryError::Shortcut {
                    path: shortcut.to_path_buf(),
                    reason: "not a shell link".into(),
                })
        }
    }

    #[test]
    fn unreadable_link_has_empty_target() {
        let resolved = resolve(&FakeLinks(HashMap::new()), Path::new("/menu/Broken.lnk"));
        assert_eq!(resolved.target, None);
        assert_eq!(resolved.target_file_name(), "");
        assert_eq!(resolved.target_stem(), "");
        assert_eq!(resolved.link_stem(), "Broken");
    }

    #[test]
    fn dangling_target_is_dropped() {
        let links = FakeLinks(HashMap::from([(
            PathBuf::from("/menu/Gone.lnk"),
            PathBuf::from("/definitely/not/here/gone.exe"),
        )]));
        assert_eq!(resolve(&links, Path::new("/menu/Gone.lnk")).target, None);
    }

    #[test]
    fn link_stem_keeps_inner_dots() {
        let resolved = ResolvedShortcut {
            link: PathBuf::from("/menu/GIMP 2.10.lnk"),
            target: Some(PathBuf::from("/apps/gimp-2.10.exe")),
        };
        assert_eq!(resolved.link_stem(), "GIMP 2.10");
        assert_eq!(resolved.target_file_name(), "gimp-2.10.exe");
        assert_eq!(resolved.target_stem(), "gimp-2.10");
    }

    #[cfg(unix)]
    #[test]
    fn symlink_resolver_follows_to_existing_file() {
        use std::time::{SystemTime, UNIX_EPOCH};
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|value| value.as_nanos())
            .unwrap_or(0);
        let root = std::env::temp_dir().join(format!("start-menu-link-{}-{now}", std::process::id()));
        std::fs::create_dir_all(root.join("bin")).unwrap();
        std::fs::write(root.join("bin/tool.exe"), b"MZ").unwrap();
        std::os::unix::fs::symlink(root.join("bin/tool.exe"), root.join("Tool.lnk")).unwrap();
        std::fs::write(root.join("Plain.lnk"), b"").unwrap();

        let resolved = resolve(&SymlinkResolver, &root.join("Tool.lnk"));
        assert_eq!(
            resolved.target,
            Some(std::fs::canonicalize(root.join("bin/tool.exe")).unwrap())
        );
        assert_eq!(resolve(&SymlinkResolver, &root.join("Plain.lnk")).target, None);

        std::fs::remove_dir_all(&root).ok();
    }
}
