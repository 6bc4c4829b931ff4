//! Package archive verification.
//!
//! A VSIX is a ZIP file. A downloaded body counts as a package only if it
//! starts with the ZIP local file header and the `zip` crate can read the
//! central directory and every entry (CRC included). Marketplace error
//! responses (JSON or HTML saved under the package name) and truncated
//! transfers fail one of these checks.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// ZIP local file header signature `PK\x03\x04`.
pub const ZIP_LOCAL_HEADER: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Readable ZIP with this many entries.
    Valid { entries: usize },
    Invalid(InvalidReason),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidReason {
    #[error("file does not exist")]
    Missing,
    #[error("file is empty")]
    Empty,
    #[error("file is only {0} bytes, too short for a ZIP header")]
    TooShort(u64),
    #[error("file does not start with a ZIP header (content looks like {0})")]
    NotZip(&'static str),
    #[error("ZIP structure is corrupt: {0}")]
    Corrupt(String),
    #[error("could not read file: {0}")]
    Unreadable(String),
}

/// True if `bytes` begins with the ZIP local file header.
pub fn has_zip_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(&ZIP_LOCAL_HEADER)
}

/// Verify the file at `path` is a well-formed ZIP archive.
pub fn verify(path: &Path) -> Verification {
    match verify_inner(path) {
        Ok(entries) => Verification::Valid { entries },
        Err(reason) => Verification::Invalid(reason),
    }
}

fn verify_inner(path: &Path) -> Result<usize, InvalidReason> {
    let len = match path.metadata() {
        Ok(m) => m.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(InvalidReason::Missing),
        Err(e) => return Err(InvalidReason::Unreadable(e.to_string())),
    };
    if len == 0 {
        return Err(InvalidReason::Empty);
    }

    let mut file = File::open(path).map_err(|e| InvalidReason::Unreadable(e.to_string()))?;
    let mut prefix = [0u8; 64];
    let n = read_prefix(&mut file, &mut prefix).map_err(|e| InvalidReason::Unreadable(e.to_string()))?;
    let prefix = &prefix[..n];
    if len < ZIP_LOCAL_HEADER.len() as u64 {
        return Err(InvalidReason::TooShort(len));
    }
    if !has_zip_signature(prefix) {
        return Err(InvalidReason::NotZip(sniff(prefix)));
    }

    let file = File::open(path).map_err(|e| InvalidReason::Unreadable(e.to_string()))?;
    check_structure(file).map_err(|e| InvalidReason::Corrupt(e.to_string()))
}

fn read_prefix(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

/// Opens the central directory and reads every entry to the end so the
/// per-entry CRC is checked.
fn check_structure(file: File) -> zip::result::ZipResult<usize> {
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        io::copy(&mut entry, &mut io::sink())?;
    }
    Ok(archive.len())
}

/// Best-effort description of a non-ZIP body for diagnostics.
fn sniff(prefix: &[u8]) -> &'static str {
    let text = String::from_utf8_lossy(prefix);
    let trimmed = text.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        "JSON"
    } else if trimmed.starts_with('<') {
        "HTML/XML"
    } else {
        "unknown data"
    }
}
