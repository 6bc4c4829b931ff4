//! Output file lifecycle.
//!
//! Downloads land in `<final>.part` and are renamed onto the final name only
//! after the archive check passes. A `.part` file is never the committed
//! output and may be removed at any time.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::identifier::ExtensionRef;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Deterministic output name: `{publisher}.{extension}-{version}.vsix`.
pub fn package_file_name(ext: &ExtensionRef, version: &str) -> String {
    format!("{}.{}-{}.vsix", ext.publisher(), ext.extension(), version)
}

/// Path for the temp file: appends `.part` to the final path.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Create the output directory (and parents) if missing.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))
}

/// Create (or truncate) the temp file for a new attempt.
pub fn create_temp(temp_path: &Path) -> io::Result<File> {
    File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
}

/// Remove a file if present. Missing files are not an error.
pub fn discard(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => tracing::debug!("removed {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("could not remove {}: {}", path.display(), e),
    }
}

/// Atomically rename the verified temp file onto the final path, replacing
/// any previous file of the same name.
pub fn promote(temp_path: &Path, final_path: &Path) -> Result<()> {
    fs::rename(temp_path, final_path).with_context(|| {
        format!(
            "failed to rename {} to {}",
            temp_path.display(),
            final_path.display()
        )
    })
}
