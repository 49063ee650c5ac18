use crate::catalog::{App, AppCatalog};
use serde::Serialize;
use std::fmt::Write;

const NAME_WIDTH: usize = 32;
const SEPARATOR: &str = "--------------------------------------";

/// Two column table: graphics apps, a dashed separator row, then the rest.
pub fn render_table(catalog: &AppCatalog) -> String {
    let mut out = String::new();
    let mut row = |name: &str, path: &str| {
        let _ = writeln!(out, "{name:<NAME_WIDTH$} {path}");
    };
    row("Program", "Exe Filepath");
    for (_, app) in catalog.graphics() {
        row(&app.name, &app.filepath.to_string_lossy());
    }
    row(SEPARATOR, SEPARATOR);
    for (_, app) in catalog.misc() {
        row(&app.name, &app.filepath.to_string_lossy());
    }
    out
}

#[derive(Serialize)]
struct Entry<'a> {
    filename: &'a str,
    #[serde(flatten)]
    app: &'a App,
}

#[derive(Serialize)]
struct Listing<'a> {
    graphics: Vec<Entry<'a>>,
    misc: Vec<Entry<'a>>,
}

fn entries<'a>(list: impl Iterator<Item = (&'a str, &'a App)>) -> Vec<Entry<'a>> {
    list.map(|(filename, app)| Entry { filename, app }).collect()
}

/// `{ "graphics": [...], "misc": [...] }`, each entry carrying its file name key.
pub fn render_json(catalog: &AppCatalog) -> serde_json::Result<String> {
    let listing = Listing {
        graphics: entries(catalog.graphics()),
        misc: entries(catalog.misc()),
    };
    serde_json::to_string_pretty(&listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample() -> AppCatalog {
        let mut catalog = AppCatalog::new();
        catalog.seed_graphics("paint.exe");
        catalog.seed_graphics("gimp.exe");
        catalog.classify(
            "gimp.exe",
            App {
                name: "GIMP".into(),
                filepath: PathBuf::from("/apps/gimp.exe"),
                ..Default::default()
            },
        );
        catalog.classify(
            "vlc.exe",
            App {
                name: "VLC".into(),
                filepath: PathBuf::from("/apps/vlc.exe"),
                ..Default::default()
            },
        );
        catalog
    }

    #[test]
    fn table_puts_separator_between_lists() {
        let table = render_table(&sample());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Program"));
        assert_eq!(lines[1].trim(), "");
        assert!(lines[2].starts_with("GIMP") && lines[2].ends_with("/apps/gimp.exe"));
        assert!(lines[3].starts_with(SEPARATOR));
        assert!(lines[4].starts_with("VLC"));
    }

    #[test]
    fn json_lists_both_buckets_with_keys() {
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&sample()).unwrap()).unwrap();
        assert_eq!(json["graphics"][0]["filename"], "paint.exe");
        assert_eq!(json["graphics"][0]["filepath"], "");
        assert_eq!(json["graphics"][1]["name"], "GIMP");
        assert_eq!(json["misc"][0]["filepath"], "/apps/vlc.exe");
        assert!(json["misc"][0].get("icon").is_none());
    }
}
