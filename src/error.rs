use std::io;
use std::path::PathBuf;

// adapters fail with this, the discovery pass itself only logs them
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("association store lookup for .{extension} failed: {reason}")]
    AssociationLookup { extension: String, reason: String },
    #[error("unable to read association file {path}: {source}")]
    AssociationFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed association file {path}: {source}")]
    AssociationFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("couldn't resolve the {0} launcher directory")]
    LauncherDir(&'static str),
    #[error("couldn't resolve shortcut {path}: {reason}")]
    Shortcut { path: PathBuf, reason: String },
    #[error("invalid menu category pattern: {0}")]
    CategoryPattern(#[from] regex::Error),
}

pub type Result<T, E = DiscoveryError> = core::result::Result<T, E>;
