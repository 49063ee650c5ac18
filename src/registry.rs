// HKEY_CURRENT_USER\Software\Microsoft\Windows\CurrentVersion\Explorer\FileExts\.<ext>\OpenWithList

use crate::associations::AssociationStore;
use crate::error::{DiscoveryError, Result};
use crate::wide_str::{string_from_utf16_buffer, words_from_bytes};
use windows::core::{HSTRING, PWSTR};
use windows::Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_MORE_DATA, ERROR_NO_MORE_ITEMS};
use windows::Win32::System::Registry::{
    RegCloseKey, RegEnumValueW, RegOpenKeyExW, HKEY, HKEY_CURRENT_USER, KEY_READ, REG_SZ,
};

const FILE_EXTS: &str = r"Software\Microsoft\Windows\CurrentVersion\Explorer\FileExts";

/// Explorer's per-user "Open with" lists.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegistryAssociationStore;

// closes the key on every way out of a lookup
struct OpenKey(HKEY);

impl Drop for OpenKey {
    fn drop(&mut self) {
        unsafe {
            let _ = RegCloseKey(self.0);
        }
    }
}

impl AssociationStore for RegistryAssociationStore {
    fn lookup_handlers(&self, extension: &str) -> Result<Vec<String>> {
        let path = format!(r"{FILE_EXTS}\.{extension}\OpenWithList");
        let lookup_error = |reason: String| DiscoveryError::AssociationLookup {
            extension: extension.to_string(),
            reason,
        };

        let mut key = HKEY::default();
        match unsafe {
            RegOpenKeyExW(
                HKEY_CURRENT_USER,
                &HSTRING::from(path),
                0,
                KEY_READ,
                &mut key as *mut HKEY,
            )
        } {
            Ok(_) => {}
            // nothing registered for this type
            Err(e) if e == ERROR_FILE_NOT_FOUND.into() => return Ok(vec![]),
            Err(e) => return Err(lookup_error(e.message().to_string())),
        }
        let key = OpenKey(key);

        let mut entries: Vec<(String, String)> = vec![];
        let mut index = 0u32;
        loop {
            let mut name = [0u16; 256];
            let mut name_len = name.len() as u32;
            // handler values are bare file names, MAX_PATH wide chars is plenty
            let mut data = [0u8; 520];
            let mut data_len = data.len() as u32;
            let mut value_type = 0u32;
            let read = unsafe {
                RegEnumValueW(
                    key.0,
                    index,
                    PWSTR(name.as_mut_ptr()),
                    &mut name_len,
                    None,
                    Some(&mut value_type),
                    Some(data.as_mut_ptr()),
                    Some(&mut data_len),
                )
            };
            index += 1;
            match read {
                Ok(_) => {}
                Err(e) if e == ERROR_NO_MORE_ITEMS.into() => break,
                Err(e) if e == ERROR_MORE_DATA.into() => continue,
                Err(e) => return Err(lookup_error(e.message().to_string())),
            }
            // handlers sit under a, b, c, ...; MRUList only records their order
            if name_len != 1 || value_type != REG_SZ.0 {
                continue;
            }
            let name = string_from_utf16_buffer(&name[..name_len as usize]);
            let value =
                string_from_utf16_buffer(&words_from_bytes(&data[..data_len as usize]));
            entries.push((name, value));
        }
        drop(key);

        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries.into_iter().map(|(_, value)| value).collect())
    }
}
