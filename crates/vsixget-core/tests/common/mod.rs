pub mod gallery_server;

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

/// Small two-entry VSIX built in memory.
pub fn vsix_bytes(name: &str) -> Vec<u8> {
    let opts = || SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file("extension.vsixmanifest", opts()).unwrap();
    writer
        .write_all(format!("<PackageManifest><Identity Id=\"{}\"/></PackageManifest>", name).as_bytes())
        .unwrap();
    writer.start_file("extension/package.json", opts()).unwrap();
    writer
        .write_all(format!("{{\"name\":\"{}\"}}", name).as_bytes())
        .unwrap();
    writer.finish().unwrap().into_inner()
}
