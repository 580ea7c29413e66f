use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
};
use http_body_util::BodyExt;
use publish_gateway::config::AppConfig;
use publish_gateway::services::publisher::{BlobPublisher, MemoryPublisher};
use publish_gateway::{AppState, create_app};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];

fn test_config(tmp: &tempfile::TempDir) -> AppConfig {
    AppConfig {
        html_dir: tmp.path().join("html_output").to_string_lossy().into_owned(),
        image_dir: tmp.path().join("images").to_string_lossy().into_owned(),
        ..AppConfig::development()
    }
}

fn image_request(file_url: &str, filename: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload-image/")
        .header("Authorization", "Bearer dev-token")
        .header("Content-Type", "application/json")
        .body(Body::from(format!(
            r#"{{"file_url": "{}", "filename": "{}"}}"#,
            file_url, filename
        )))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Serves a fixed PNG payload on /cat.png from an ephemeral local port.
async fn spawn_image_source() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let source = axum::Router::new().route("/cat.png", get(|| async { PNG_BYTES.to_vec() }));
    tokio::spawn(async move {
        axum::serve(listener, source).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_image_publish_flow() {
    let tmp = tempfile::tempdir().unwrap();
    let publisher = Arc::new(MemoryPublisher::default());
    let app = create_app(AppState::new(test_config(&tmp), publisher.clone()));

    let source = spawn_image_source().await;
    let response = app
        .clone()
        .oneshot(image_request(&format!("{}/cat.png", source), "cat.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["filename"], "cat.png");
    assert_eq!(
        json["local_url"],
        "https://test-bucket.blob.test/images/cat.png"
    );

    // Published under the images/ prefix with the fetched bytes.
    {
        let objects = publisher.objects.lock().unwrap();
        assert_eq!(objects.get("images/cat.png").unwrap(), PNG_BYTES);
    }

    // Retrievable from the read-only image mount as well.
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/images/cat.png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], PNG_BYTES);
}

#[tokio::test]
async fn test_unreachable_source_is_400() {
    let tmp = tempfile::tempdir().unwrap();
    let publisher = Arc::new(MemoryPublisher::default());
    let app = create_app(AppState::new(test_config(&tmp), publisher));

    let response = app
        .oneshot(image_request("http://127.0.0.1:1/cat.png", "cat.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["detail"], "Failed to download image from URL");
}

#[tokio::test]
async fn test_source_404_is_400() {
    let tmp = tempfile::tempdir().unwrap();
    let publisher = Arc::new(MemoryPublisher::default());
    let app = create_app(AppState::new(test_config(&tmp), publisher));

    let source = spawn_image_source().await;
    let response = app
        .oneshot(image_request(&format!("{}/missing.png", source), "m.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["detail"], "Failed to download image from URL");
}

#[tokio::test]
async fn test_publisher_failure_is_500_and_keeps_local_file() {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(&tmp);
    let image_dir = config.image_dir.clone();
    let publisher: Arc<dyn BlobPublisher> = Arc::new(MemoryPublisher::failing());
    let app = create_app(AppState::new(config, publisher));

    let source = spawn_image_source().await;
    let response = app
        .oneshot(image_request(&format!("{}/cat.png", source), "cat.png"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = json_body(response).await;
    assert_eq!(json["detail"], "Failed to upload image");

    // Fetched bytes were persisted before the upload attempt and stay put.
    let on_disk = std::fs::read(std::path::Path::new(&image_dir).join("cat.png")).unwrap();
    assert_eq!(on_disk, PNG_BYTES);
}
