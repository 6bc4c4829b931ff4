//! Integration test: version lookup and package download against a local
//! gallery server, through the real curl transport.

mod common;

use common::gallery_server::{GalleryServer, Reply};
use std::fs;
use tempfile::tempdir;
use vsixget_core::config::{RetryConfig, VsixgetConfig};
use vsixget_core::fetcher::{self, AttemptOutcome, CandidateKind, Silent};
use vsixget_core::http::{CurlTransport, TransportOptions};
use vsixget_core::version::{self, Lookup};
use vsixget_core::{ExtensionRef, FetchContext, VersionSpec};

const META: &str = "/_apis/public/gallery/publishers/ms-python/vsextensions/python";
const PLATFORM: &str = "/_apis/public/gallery/publishers/ms-python/vsextensions/python/1.2.3/vspackage?targetPlatform=linux-x64";
const UNIVERSAL: &str = "/_apis/public/gallery/publishers/ms-python/vsextensions/python/1.2.3/vspackage";

fn config(server: &GalleryServer) -> VsixgetConfig {
    let mut cfg = VsixgetConfig::default();
    cfg.gallery_url = server.gallery_url();
    cfg.timeout_secs = 5;
    cfg.retry = Some(RetryConfig {
        max_attempts: 2,
        base_delay_secs: 0.0,
        max_delay_secs: 0,
    });
    cfg
}

fn python() -> ExtensionRef {
    ExtensionRef::new("ms-python", "python").unwrap()
}

#[test]
fn platform_package_downloads_and_universal_is_never_requested() {
    let server = GalleryServer::start();
    let body = common::vsix_bytes("python-linux");
    server
        .route(PLATFORM, vec![Reply::package(body.clone())])
        .route(UNIVERSAL, vec![Reply::package(common::vsix_bytes("python"))]);
    let cfg = config(&server);
    let transport = CurlTransport::new(TransportOptions::from_config(&cfg));
    let ctx = FetchContext::new(&cfg, &transport);
    let dir = tempdir().unwrap();

    let report = fetcher::fetch_package(
        &ctx,
        &python(),
        &VersionSpec::explicit("1.2.3").unwrap(),
        dir.path(),
        &Silent,
    )
    .expect("fetch");

    assert_eq!(report.path, dir.path().join("ms-python.python-1.2.3.vsix"));
    assert_eq!(fs::read(&report.path).unwrap(), body);
    assert_eq!(server.hits(PLATFORM), 1);
    assert_eq!(server.hits(UNIVERSAL), 0);
    assert!(!dir.path().join("ms-python.python-1.2.3.vsix.part").exists());
}

#[test]
fn json_error_for_platform_falls_back_to_universal() {
    let server = GalleryServer::start();
    let body = common::vsix_bytes("python");
    server
        .route(
            PLATFORM,
            vec![Reply::json(200, r#"{"$id":"1","message":"not available for linux-x64"}"#)],
        )
        .route(UNIVERSAL, vec![Reply::package(body.clone())]);
    let cfg = config(&server);
    let transport = CurlTransport::new(TransportOptions::from_config(&cfg));
    let ctx = FetchContext::new(&cfg, &transport);
    let dir = tempdir().unwrap();

    let report = fetcher::fetch_package(
        &ctx,
        &python(),
        &VersionSpec::explicit("1.2.3").unwrap(),
        dir.path(),
        &Silent,
    )
    .expect("fetch");

    assert_eq!(fs::read(&report.path).unwrap(), body);
    assert_eq!(report.attempts.len(), 2);
    assert!(matches!(
        report.attempts[0].outcome,
        AttemptOutcome::InvalidFormat { status: 200, .. }
    ));
    assert!(report.attempts[0]
        .outcome
        .detail()
        .unwrap()
        .contains("not available"));
    assert_eq!(report.attempts[1].kind, CandidateKind::Universal);
}

#[test]
fn every_candidate_failing_leaves_no_files() {
    let server = GalleryServer::start();
    server.route(
        UNIVERSAL,
        vec![Reply::json(500, r#"{"message":"internal"}"#)],
    );
    let cfg = config(&server);
    let transport = CurlTransport::new(TransportOptions::from_config(&cfg));
    let ctx = FetchContext::new(&cfg, &transport);
    let dir = tempdir().unwrap();

    let err = fetcher::fetch_package(
        &ctx,
        &python(),
        &VersionSpec::explicit("1.2.3").unwrap(),
        dir.path(),
        &Silent,
    )
    .unwrap_err();

    assert_eq!(err.attempts.len(), 2);
    // 404 is final, 500 is retried up to max_attempts.
    assert_eq!(server.hits(PLATFORM), 1);
    assert_eq!(server.hits(UNIVERSAL), 2);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn metadata_lookup_resolves_newest_version() {
    let server = GalleryServer::start();
    server.route(
        META,
        vec![Reply::json(
            200,
            r#"{"versions":[{"version":"1.2.3"},{"version":"1.2.2"}]}"#,
        )],
    );
    let cfg = config(&server);
    let transport = CurlTransport::new(TransportOptions::from_config(&cfg));
    let ctx = FetchContext::new(&cfg, &transport);

    let spec = version::resolve(&ctx, &python(), None, Lookup::Remote).unwrap();

    assert_eq!(spec.resolved, "1.2.3");
    assert_eq!(spec.requested, None);
}

#[test]
fn metadata_server_error_is_retried() {
    let server = GalleryServer::start();
    server.route(
        META,
        vec![
            Reply::json(500, r#"{"message":"try again"}"#),
            Reply::json(200, r#"{"version":"2.0.0"}"#),
        ],
    );
    let cfg = config(&server);
    let transport = CurlTransport::new(TransportOptions::from_config(&cfg));
    let ctx = FetchContext::new(&cfg, &transport);

    let spec = version::resolve(&ctx, &python(), None, Lookup::Remote).unwrap();

    assert_eq!(spec.resolved, "2.0.0");
    assert_eq!(server.hits(META), 2);
}

#[test]
fn missing_metadata_degrades_to_latest_alias() {
    let server = GalleryServer::start();
    let cfg = config(&server);
    let transport = CurlTransport::new(TransportOptions::from_config(&cfg));
    let ctx = FetchContext::new(&cfg, &transport);

    let spec = version::resolve(&ctx, &python(), None, Lookup::Remote).unwrap();

    assert!(spec.is_latest());
    assert_eq!(server.hits(META), 1);
}
