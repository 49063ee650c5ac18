use crate::catalog::Icon;
use std::path::Path;

pub trait IconProvider {
    fn icon_for(&self, path: &Path) -> Icon;
}

/// Hosts without a shell icon source.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIcons;

impl IconProvider for NoIcons {
    fn icon_for(&self, _path: &Path) -> Icon {
        Icon::default()
    }
}

/// System image list index from the shell. The list is owned by the system,
/// so nothing has to be freed.
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellIcons;

#[cfg(windows)]
impl IconProvider for ShellIcons {
    fn icon_for(&self, path: &Path) -> Icon {
        use crate::wide_str::to_wide_nul;
        use windows::core::PCWSTR;
        use windows::Win32::Storage::FileSystem::FILE_FLAGS_AND_ATTRIBUTES;
        use windows::Win32::UI::Shell::{SHGetFileInfoW, SHFILEINFOW, SHGFI_SYSICONINDEX};

        let wide = to_wide_nul(path.as_os_str());
        let mut info = SHFILEINFOW::default();
        let list = unsafe {
            SHGetFileInfoW(
                PCWSTR(wide.as_ptr()),
                FILE_FLAGS_AND_ATTRIBUTES(0),
                Some(&mut info),
                std::mem::size_of::<SHFILEINFOW>() as u32,
                SHGFI_SYSICONINDEX,
            )
        };
        if list == 0 {
            return Icon::default();
        }
        Icon::from_system_index(info.iIcon)
    }
}

pub fn platform_icons() -> Box<dyn IconProvider> {
    #[cfg(windows)]
    {
        Box::new(ShellIcons)
    }
    #[cfg(not(windows))]
    {
        Box::new(NoIcons)
    }
}
