//! Integration tests for the multipart HTTP uploader against a mock server.

use std::sync::Arc;
use std::time::Duration;

use ricecoder_gallery::{
    FileSelection, GalleryConfig, GalleryController, GalleryData, GalleryEffect, HttpUploader,
    UploadError, UploadRequest, Uploader,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request_for(server: &MockServer) -> UploadRequest {
    let config = GalleryConfig::new()
        .with_endpoint(format!("{}/upload", server.uri()))
        .with_header("X-Token", "abc")
        .with_request_data("album", "summer");
    UploadRequest::from_config(&config)
}

fn uploader() -> HttpUploader {
    HttpUploader::new(Duration::from_secs(5)).expect("Failed to build uploader")
}

#[tokio::test]
async fn test_upload_sends_multipart_with_headers_and_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header("X-Token", "abc"))
        .and(body_string_contains(r#"name="image"; filename="a.png""#))
        .and(body_string_contains(r#"name="album""#))
        .and(body_string_contains("summer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "file": {"url": "https://cdn.example.com/a.png", "width": 640}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = uploader()
        .upload_by_file(&FileSelection::new("a.png", b"png-bytes".to_vec()), &request_for(&server))
        .await
        .expect("upload should succeed");

    assert_eq!(file.url, "https://cdn.example.com/a.png");
    assert_eq!(file.metadata.get("width"), Some(&json!(640)));
}

#[tokio::test]
async fn test_upload_rejected_by_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let result = uploader()
        .upload_by_file(&FileSelection::new("a.png", vec![0]), &request_for(&server))
        .await;

    assert_eq!(result, Err(UploadError::Rejected));
}

#[tokio::test]
async fn test_upload_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = uploader()
        .upload_by_file(&FileSelection::new("a.png", vec![0]), &request_for(&server))
        .await;

    assert_eq!(
        result,
        Err(UploadError::Status {
            status: 500,
            body: "boom".to_string()
        })
    );
}

#[tokio::test]
async fn test_upload_non_json_reply_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let result = uploader()
        .upload_by_file(&FileSelection::new("a.png", vec![0]), &request_for(&server))
        .await;

    assert!(matches!(result, Err(UploadError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_controller_uploads_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "file": {"url": "https://cdn.example.com/b.jpg"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = GalleryConfig::new().with_endpoint(format!("{}/upload", server.uri()));
    let mut gallery =
        GalleryController::new(GalleryData::default(), config).expect("Failed to create controller");

    let effects = gallery
        .request_upload(FileSelection::new("b.jpg", vec![0xff, 0xd8]))
        .await
        .unwrap();
    assert!(effects.is_empty());

    let saved = gallery.serialize();
    assert_eq!(saved.images.len(), 1);
    assert_eq!(saved.images[0].file.url, "https://cdn.example.com/b.jpg");
}

#[tokio::test]
async fn test_controller_unreachable_endpoint_notifies() {
    let config = GalleryConfig::new().with_endpoint("http://127.0.0.1:9/upload");
    let mut gallery = GalleryController::new(GalleryData::default(), config)
        .expect("Failed to create controller");
    gallery.set_uploader(Arc::new(
        HttpUploader::new(Duration::from_millis(500)).expect("Failed to build uploader"),
    ));

    let effects = gallery
        .request_upload(FileSelection::new("b.jpg", vec![0]))
        .await
        .unwrap();

    assert!(matches!(effects.as_slice(), [GalleryEffect::Notify(_)]));
    assert!(gallery.ledger().is_empty());
    assert_eq!(gallery.slots().len(), 1);
}
