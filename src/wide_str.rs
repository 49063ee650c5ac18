// UTF-16 plumbing for the Win32 adapters
#![cfg_attr(not(windows), allow(dead_code))]

use std::ffi::OsStr;

/// Decodes a fixed-size UTF-16 buffer, stopping at the first nul.
/// Unpaired surrogates are replaced rather than rejected.
pub fn string_from_utf16_buffer(utf16: &[u16]) -> String {
    let end = utf16.iter().position(|c| *c == 0).unwrap_or(utf16.len());
    String::from_utf16_lossy(&utf16[..end])
}

/// Registry data comes back as raw bytes; pair them up into native-endian words.
pub fn words_from_bytes(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_ne_bytes([chunk[0], chunk[1]]))
        .collect()
}

/// Nul terminated wide string for `PCWSTR` parameters.
#[cfg(windows)]
pub fn to_wide_nul(s: &OsStr) -> Vec<u16> {
    use std::os::windows::ffi::OsStrExt;
    s.encode_wide().chain(std::iter::once(0)).collect()
}

#[cfg(not(windows))]
pub fn to_wide_nul(s: &OsStr) -> Vec<u16> {
    s.to_string_lossy()
        .encode_utf16()
        .chain(std::iter::once(0))
        .collect()
}
