//! Locating the start menu program directories.

use crate::error::{DiscoveryError, Result};
use log::warn;
use std::path::PathBuf;

const START_MENU_PROGRAMS: [&str; 4] = ["Microsoft", "Windows", "Start Menu", "Programs"];

/// `%APPDATA%\Microsoft\Windows\Start Menu\Programs` for the current user.
pub fn user_programs_dir() -> Result<PathBuf> {
    let mut dir = dirs::data_dir().ok_or(DiscoveryError::LauncherDir("per-user"))?;
    dir.extend(START_MENU_PROGRAMS);
    Ok(dir)
}

/// The programs directory shared by all users, `None` when the shell can't
/// tell us (or there is no shell).
pub fn all_users_programs_dir() -> Option<PathBuf> {
    match common_programs() {
        Ok(dir) => Some(dir),
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}

#[cfg(windows)]
fn common_programs() -> Result<PathBuf> {
    use crate::wide_str::string_from_utf16_buffer;
    use windows::Win32::Foundation::{HANDLE, HWND, MAX_PATH};
    use windows::Win32::UI::Shell::{SHGetFolderPathW, CSIDL_COMMON_PROGRAMS};

    let mut path = [0u16; MAX_PATH as usize];
    unsafe {
        SHGetFolderPathW(
            HWND::default(),
            CSIDL_COMMON_PROGRAMS as i32,
            HANDLE::default(),
            0,
            &mut path,
        )
    }
    .map_err(|_| DiscoveryError::LauncherDir("all-users"))?;
    let dir = string_from_utf16_buffer(&path);
    if dir.is_empty() {
        return Err(DiscoveryError::LauncherDir("all-users"));
    }
    Ok(PathBuf::from(dir))
}

#[cfg(not(windows))]
fn common_programs() -> Result<PathBuf> {
    Err(DiscoveryError::LauncherDir("all-users"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_dir_ends_in_start_menu_programs() {
        if let Ok(dir) = user_programs_dir() {
            assert!(dir.ends_with("Microsoft/Windows/Start Menu/Programs"));
        }
    }

    #[cfg(windows)]
    #[test]
    fn shell_names_the_all_users_dir() {
        let dir = all_users_programs_dir().expect("all-users programs dir");
        assert!(dir.is_absolute());
        assert!(dir.ends_with("Programs"));
    }

    #[cfg(not(windows))]
    #[test]
    fn all_users_dir_is_unavailable_without_a_shell() {
        assert_eq!(all_users_programs_dir(), None);
    }
}
