use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use super::error::Result;

/// Create parent directories for a path when missing.
pub fn make_parent_dirs<P: AsRef<Path>>(path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Detect whether a path uses a gzip-compatible extension (`.gz`, `.gzip`, `.bgzf`).
pub fn is_gzipped<P: AsRef<Path>>(path: P) -> bool {
    matches!(
        path.as_ref().extension().unwrap_or_else(|| OsStr::new("")),
        ext if ext == "gz" || ext == "gzip" || ext == "bgzf"
    )
}

/// `-` stands for stdin/stdout.
#[inline]
pub fn is_stdio<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().as_os_str() == "-"
}

/// Detect a pre-decoded profile by its `.mprofile` extension, looking through a
/// trailing compression suffix.
pub fn is_profile_path<P: AsRef<Path>>(path: P) -> bool {
    let path = path.as_ref();
    let stem_path = if is_gzipped(path) {
        path.file_stem().map(Path::new)
    } else {
        Some(path)
    };
    stem_path
        .and_then(|p| p.extension())
        .map_or(false, |ext| ext == "mprofile")
}
