pub mod convert;
pub mod eval;
pub mod reports;
pub mod speakers;

use std::path::Path;

/// Recording identifier fallback: the file name without extension.
pub fn uri_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}
