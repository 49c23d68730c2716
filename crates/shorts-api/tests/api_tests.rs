//! API integration tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use shorts_api::{create_router, ApiConfig, AppState};
use shorts_media::{MediaError, MediaResult, RemoteFetcher};

/// Fetcher that either writes fixed bytes or fails, recording each call.
struct FakeFetcher {
    fail: bool,
    calls: AtomicUsize,
    last_dest: Mutex<Option<PathBuf>>,
}

impl FakeFetcher {
    fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            calls: AtomicUsize::new(0),
            last_dest: Mutex::new(None),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            calls: AtomicUsize::new(0),
            last_dest: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteFetcher for FakeFetcher {
    async fn fetch_to_file(&self, _url: &str, dest: &Path) -> MediaResult<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_dest.lock().unwrap() = Some(dest.to_path_buf());
        if self.fail {
            return Err(MediaError::download_failed("HTTP 404 Not Found"));
        }
        tokio::fs::write(dest, b"fake video").await?;
        Ok(10)
    }
}

fn test_router(fetcher: Arc<FakeFetcher>) -> Router {
    test_router_with_config(ApiConfig::default(), fetcher)
}

fn test_router_with_config(config: ApiConfig, fetcher: Arc<FakeFetcher>) -> Router {
    create_router(AppState::with_fetcher(config, fetcher), None)
}

fn post_json(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/process-video")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn sample_body(video_url: &str) -> Value {
    json!({
        "videoUrl": video_url,
        "videoId": "vid1",
        "segments": [
            {"title": "A", "timestamp": "00:10-00:40"},
            {"title": "B", "timestamp": "00:00-00:00"}
        ]
    })
}

#[tokio::test]
async fn test_index_reports_running() {
    let app = test_router(FakeFetcher::succeeding());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body["status"].as_str().unwrap().contains("running"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_router(FakeFetcher::succeeding());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_missing_video_id_is_rejected_without_download() {
    let fetcher = FakeFetcher::succeeding();
    let app = test_router(fetcher.clone());

    let response = app
        .oneshot(post_json(&json!({
            "videoUrl": "https://cdn.example.com/video.mp4",
            "segments": []
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "Missing required parameters");
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_non_json_body_is_rejected() {
    let fetcher = FakeFetcher::succeeding();
    let app = test_router(fetcher.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/process-video")
                .body(Body::from("videoUrl=x"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_youtube_source_returns_placeholders() {
    let fetcher = FakeFetcher::succeeding();
    let app = test_router(fetcher.clone());

    let response = app
        .oneshot(post_json(&json!({
            "videoUrl": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "videoId": "yt1",
            "segments": [{"title": "Intro", "timestamp": "00:00-05:00"}, {}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "placeholder");
    assert_eq!(body["message"], "YouTube processing not implemented yet");
    assert_eq!(body["error"], "YouTube processing not implemented yet");

    let segments = body["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0]["duration"], "00:30");
    assert_eq!(segments[0]["timestamp"], "00:00-05:00");
    assert_eq!(segments[1]["title"], "Segment 2");
    assert_eq!(segments[1]["video_filename"], "yt1_short_2.mp4");
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_download_failure_returns_placeholders() {
    let fetcher = FakeFetcher::failing();
    let app = test_router(fetcher.clone());

    let response = app
        .oneshot(post_json(&json!({
            "videoUrl": "https://cdn.example.com/missing.mp4",
            "videoId": "vid1",
            "segments": [{"title": "A", "timestamp": "00:00-02:00"}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "placeholder");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to download video:"));
    assert_eq!(body["segments"][0]["duration"], "00:30");
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_successful_processing_builds_records() {
    let fetcher = FakeFetcher::succeeding();
    let app = test_router(fetcher.clone());

    let response = app
        .oneshot(post_json(&sample_body("https://cdn.example.com/video.mp4")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Video processing completed");
    assert_eq!(body["dropped_segments"], 0);
    assert!(body.get("error").is_none());

    let segments = body["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0]["duration"], "00:30");
    assert_eq!(segments[0]["video_filename"], "vid1_short_1.mp4");
    assert_eq!(segments[0]["thumbnail_filename"], "vid1_thumb_1.jpg");
    assert_eq!(segments[0]["segment_index"], 1);
    assert_eq!(segments[1]["duration"], "00:30");
    assert_eq!(segments[1]["video_filename"], "vid1_short_2.mp4");
    assert_eq!(segments[1]["thumbnail_filename"], "vid1_thumb_2.jpg");
    assert_eq!(segments[1]["segment_index"], 2);
}

#[tokio::test]
async fn test_malformed_segment_is_dropped() {
    let app = test_router(FakeFetcher::succeeding());

    let response = app
        .oneshot(post_json(&json!({
            "videoUrl": "https://cdn.example.com/video.mp4",
            "videoId": "v",
            "segments": [
                "00:00-00:10",
                {"title": "Real", "timestamp": "00:00-01:05"}
            ]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["dropped_segments"], 1);

    let segments = body["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0]["title"], "Real");
    assert_eq!(segments[0]["duration"], "01:05");
    assert_eq!(segments[0]["segment_index"], 2);
}

#[tokio::test]
async fn test_scratch_directory_is_removed_after_request() {
    let fetcher = FakeFetcher::succeeding();
    let app = test_router(fetcher.clone());

    let response = app
        .oneshot(post_json(&sample_body("https://cdn.example.com/video.mp4")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let dest = fetcher.last_dest.lock().unwrap().clone().unwrap();
    assert!(dest.ends_with("source_video.mp4"));
    assert!(!dest.parent().unwrap().exists());
}

#[tokio::test]
async fn test_unusable_scratch_root_returns_500() {
    let root = tempfile::NamedTempFile::new().unwrap();
    let config = ApiConfig {
        // A regular file cannot hold scratch directories
        scratch_root: Some(root.path().join("nested")),
        ..ApiConfig::default()
    };
    let fetcher = FakeFetcher::succeeding();
    let app = test_router_with_config(config, fetcher.clone());

    let response = app
        .oneshot(post_json(&sample_body("https://cdn.example.com/video.mp4")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(read_json(response).await["error"].is_string());
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_unusable_scratch_root_hides_details_in_production() {
    let root = tempfile::NamedTempFile::new().unwrap();
    let config = ApiConfig {
        scratch_root: Some(root.path().join("nested")),
        environment: "production".to_string(),
        ..ApiConfig::default()
    };
    let app = test_router_with_config(config, FakeFetcher::succeeding());

    let response = app
        .oneshot(post_json(&sample_body("https://cdn.example.com/video.mp4")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        read_json(response).await,
        json!({"error": "An internal error occurred"})
    );
}

#[tokio::test]
async fn test_absolute_video_id_cannot_write_outside_scratch() {
    let outside = tempfile::TempDir::new().unwrap();
    let video_id = format!("{}/pwned", outside.path().display());
    let app = test_router(FakeFetcher::succeeding());

    let response = app
        .oneshot(post_json(&json!({
            "videoUrl": "https://cdn.example.com/video.mp4",
            "videoId": video_id,
            "segments": [{"title": "A", "timestamp": "00:00-00:40"}, {}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["dropped_segments"], 2);
    assert!(body["segments"].as_array().unwrap().is_empty());

    assert!(!outside.path().join("pwned_thumb_1.jpg").exists());
    assert!(!outside.path().join("pwned_thumb_2.jpg").exists());
    assert_eq!(std::fs::read_dir(outside.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_relative_video_id_cannot_escape_scratch() {
    let root = tempfile::TempDir::new().unwrap();
    let config = ApiConfig {
        scratch_root: Some(root.path().to_path_buf()),
        ..ApiConfig::default()
    };
    let app = test_router_with_config(config, FakeFetcher::succeeding());

    let response = app
        .oneshot(post_json(&json!({
            "videoUrl": "https://cdn.example.com/video.mp4",
            "videoId": "../escape",
            "segments": [{"title": "A"}]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["dropped_segments"], 1);
    assert!(!root.path().join("escape_thumb_1.jpg").exists());
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = test_router(FakeFetcher::succeeding());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header("origin", "https://frontend.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = test_router(FakeFetcher::succeeding());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers().get("x-request-id").unwrap(), "abc-123");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = test_router(FakeFetcher::succeeding());

    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(read_json(response).await["error"].is_string());
}
