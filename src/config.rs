use crate::error::Result;
use regex::Regex;

/// Start menu folders that hold administrative or maintenance entries rather
/// than applications.
pub const MENU_CATEGORY_DENYLIST: [&str; 8] = [
    "Accessibility",
    "Administrative Tools",
    "Setup",
    "System Tools",
    "Uninstall",
    "Update",
    "Updater",
    "Windows PowerShell",
];

/// Knobs of a discovery run. `Default` gives the stock start menu behaviour.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub menu_categories: Vec<String>,
    pub exe_suffix: String,
    pub uninstaller_marker: String,
    pub shortcut_extension: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            menu_categories: MENU_CATEGORY_DENYLIST.iter().map(|c| c.to_string()).collect(),
            exe_suffix: ".exe".to_string(),
            uninstaller_marker: "unins".to_string(),
            shortcut_extension: "lnk".to_string(),
        }
    }
}

impl DiscoveryConfig {
    /// Word-boundary alternation over the category denylist, e.g.
    /// `\b(Accessibility|Setup)\b`. Matching is case-sensitive.
    pub fn category_regex(&self) -> Result<Regex> {
        if self.menu_categories.is_empty() {
            // empty class, never matches
            return Ok(Regex::new(r"[^\s\S]")?);
        }
        let alternation = self
            .menu_categories
            .iter()
            .map(|c| regex::escape(c))
            .collect::<Vec<_>>()
            .join("|");
        Ok(Regex::new(&format!(r"\b({alternation})\b"))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_regex_matches_folder_names_anywhere_in_path() {
        let re = DiscoveryConfig::default().category_regex().unwrap();
        assert!(re.is_match(r"C:\ProgramData\Start Menu\Programs\Administrative Tools\Disk Cleanup.lnk"));
        assert!(re.is_match("/menu/Windows PowerShell/Windows PowerShell ISE.lnk"));
        assert!(re.is_match("/menu/Update Notes/Readme.lnk"));
        assert!(!re.is_match("/menu/GIMP/GIMP 2.10.lnk"));
    }

    #[test]
    fn category_regex_respects_word_boundaries_and_case() {
        let re = DiscoveryConfig::default().category_regex().unwrap();
        assert!(!re.is_match("/menu/Updates/Foo.lnk"));
        assert!(!re.is_match("/menu/Setups/Foo.lnk"));
        assert!(!re.is_match("/menu/system tools/Foo.lnk"));
        assert!(re.is_match("/menu/Game Setup.lnk"));
    }

    #[test]
    fn category_names_are_escaped() {
        let config = DiscoveryConfig {
            menu_categories: vec!["C++ Tools".to_string()],
            ..Default::default()
        };
        let re = config.category_regex().unwrap();
        assert!(re.is_match("/menu/C++ Tools/x.lnk"));
    }

    #[test]
    fn empty_denylist_matches_nothing() {
        let config = DiscoveryConfig {
            menu_categories: vec![],
            ..Default::default()
        };
        let re = config.category_regex().unwrap();
        assert!(!re.is_match("/menu/Setup/x.lnk"));
        assert!(!re.is_match(""));
    }
}
