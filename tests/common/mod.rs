//! Common test utilities and helpers

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use probcalc::config::ServerConfig;
use probcalc::probability::{AuditRecorder, ProbabilityApiServer};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

/// A router backed by a throwaway audit database
pub struct TestApp {
    pub router: Router,
    pub recorder: AuditRecorder,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_static_dir(None).await
    }

    pub async fn with_static_dir(static_dir: Option<PathBuf>) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = ServerConfig {
            database_path: temp_dir.path().join("history.db"),
            static_dir,
            ..Default::default()
        };

        let recorder = AuditRecorder::open(&config.database_path, config.chapter.clone())
            .await
            .unwrap();
        let router = ProbabilityApiServer::new(recorder.clone(), config).build_router();

        Self {
            router,
            recorder,
            temp_dir,
        }
    }

    pub async fn post_json(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn post_raw(&self, path: &str, body: &'static str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, value)
    }

    /// Audit writes are detached from the request, so poll until they land
    pub async fn wait_for_records(&self, expected: i64) {
        for _ in 0..200 {
            if self.recorder.count().await.unwrap() >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {} audit records, found {}",
            expected,
            self.recorder.count().await.unwrap()
        );
    }
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
