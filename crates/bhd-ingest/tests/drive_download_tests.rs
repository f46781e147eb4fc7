//! Drive download tests against a mock Drive endpoint
//!
//! Covers the direct download, the large-file confirmation page, and the
//! failure paths that must surface as the wrapped error.

mod common;

use bhd_ingest::drive::DriveClient;
use common::{zip_bytes, FILE_ID};
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn client_for(server: &MockServer) -> DriveClient {
    DriveClient::new().unwrap().with_base_url(server.uri()).quiet(true)
}

#[tokio::test]
async fn test_direct_download() {
    let server = MockServer::start().await;
    let archive = zip_bytes(&[("data.yaml", "nc: 2\n")]);

    Mock::given(method("GET"))
        .and(path("/uc"))
        .and(query_param("id", FILE_ID))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("data.zip");
    let written = client_for(&server).download(FILE_ID, &dest).await.unwrap();

    assert_eq!(written, archive.len() as u64);
    assert_eq!(std::fs::read(&dest).unwrap(), archive);
}

#[tokio::test]
async fn test_download_replaces_existing_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/uc"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fresh".to_vec()))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("data.zip");
    std::fs::write(&dest, b"stale archive from an earlier run").unwrap();

    client_for(&server).download(FILE_ID, &dest).await.unwrap();
    assert_eq!(std::fs::read(&dest).unwrap(), b"fresh");
}

#[tokio::test]
async fn test_follows_confirmation_form() {
    let server = MockServer::start().await;
    let archive = zip_bytes(&[("train/", ""), ("valid/", "")]);

    let page = format!(
        r#"<!DOCTYPE html><html><body>
        <p>Google Drive can't scan this file for viruses.</p>
        <form id="download-form" action="{}/download" method="get">
          <input type="submit" id="uc-download-link" value="Download anyway"/>
          <input type="hidden" name="id" value="{}">
          <input type="hidden" name="confirm" value="t">
          <input type="hidden" name="uuid" value="a1b2c3">
        </form></body></html>"#,
        server.uri(),
        FILE_ID
    );

    Mock::given(method("GET"))
        .and(path("/uc"))
        .and(query_param("id", FILE_ID))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page, "text/html; charset=utf-8"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/download"))
        .and(query_param("id", FILE_ID))
        .and(query_param("confirm", "t"))
        .and(query_param("uuid", "a1b2c3"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("data.zip");
    client_for(&server).download(FILE_ID, &dest).await.unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), archive);
}

#[tokio::test]
async fn test_page_without_link_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/uc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body>Access denied</body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let err = client_for(&server)
        .download(FILE_ID, &temp.path().join("data.zip"))
        .await
        .unwrap_err();

    assert!(err.message().contains("shared publicly"));
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/uc"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("data.zip");
    let err = client_for(&server).download(FILE_ID, &dest).await.unwrap_err();

    assert!(err.message().contains("404"));
    assert!(err.to_string().starts_with("Error occurred in script: [ "));
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_unreachable_server() {
    // Port 9 (discard) is not expected to serve HTTP
    let client = DriveClient::new()
        .unwrap()
        .with_base_url("http://127.0.0.1:9")
        .quiet(true);

    let temp = TempDir::new().unwrap();
    let err = client
        .download(FILE_ID, &temp.path().join("data.zip"))
        .await
        .unwrap_err();

    assert!(err.message().starts_with("Failed to request http://127.0.0.1:9/uc?id="));
}
