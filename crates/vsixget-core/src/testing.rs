//! Test helpers: in-memory VSIX fixture and a scripted transport.

use crate::http::{HttpResponse, Transport, TransportError};
use crate::progress::ProgressStats;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

/// Minimal stored (uncompressed) VSIX with two entries.
pub(crate) fn zip_fixture() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file("extension.vsixmanifest", stored()).unwrap();
    writer
        .write_all(b"<PackageManifest Version=\"2.0.0\"/>")
        .unwrap();
    writer.start_file("extension/package.json", stored()).unwrap();
    writer
        .write_all(br#"{"name":"fixture","version":"1.0.0"}"#)
        .unwrap();
    writer.finish().unwrap().into_inner()
}

fn stored() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored)
}

/// Canned reply for one URL.
#[derive(Clone)]
pub(crate) enum Reply {
    Body {
        status: u32,
        content_type: Option<&'static str>,
        body: Vec<u8>,
    },
    Fail(fn() -> TransportError),
}

impl Reply {
    pub(crate) fn ok(body: Vec<u8>) -> Self {
        Reply::Body {
            status: 200,
            content_type: Some("application/octet-stream"),
            body,
        }
    }

    pub(crate) fn json(status: u32, body: &str) -> Self {
        Reply::Body {
            status,
            content_type: Some("application/json; charset=utf-8"),
            body: body.as_bytes().to_vec(),
        }
    }
}

/// Transport answering from a URL -> reply table and recording every request.
/// Unknown URLs answer 404.
#[derive(Default)]
pub(crate) struct FakeTransport {
    replies: HashMap<String, Reply>,
    requests: RefCell<Vec<String>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(mut self, url: impl Into<String>, reply: Reply) -> Self {
        self.replies.insert(url.into(), reply);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub(crate) fn hits(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|u| *u == url).count()
    }
}

impl Transport for FakeTransport {
    fn get(
        &self,
        url: &str,
        sink: &mut dyn Write,
        progress: &mut dyn FnMut(&ProgressStats),
    ) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(url.to_string());
        let reply = self.replies.get(url).cloned().unwrap_or(Reply::Body {
            status: 404,
            content_type: None,
            body: Vec::new(),
        });
        match reply {
            Reply::Fail(make) => Err(make()),
            Reply::Body {
                status,
                content_type,
                body,
            } => {
                sink.write_all(&body).map_err(TransportError::Storage)?;
                progress(&ProgressStats {
                    bytes_done: body.len() as u64,
                    total_bytes: Some(body.len() as u64),
                    elapsed_secs: 0.0,
                });
                Ok(HttpResponse {
                    status,
                    content_type: content_type.map(str::to_string),
                    content_length: Some(body.len() as u64),
                    bytes_received: body.len() as u64,
                })
            }
        }
    }
}
