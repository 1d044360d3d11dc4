use super::*;

use axum::{routing::get, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

async fn spawn_health_stub(ai_mode: &'static str) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route(
        "/health",
        get(move || async move {
            Json(json!({
                "status": "ok",
                "service": "test-generation-engine",
                "ai_mode": ai_mode,
            }))
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn verdict_reports_connected_ai_backend() {
    let url = spawn_health_stub("connected").await;
    let outcome = GenerationClient::new(url).health().await;
    assert_eq!(health_verdict(&outcome), "reachable; AI backend connected");
}

#[tokio::test]
async fn verdict_reports_missing_key() {
    let url = spawn_health_stub("missing_key").await;
    let outcome = GenerationClient::new(url).health().await;
    assert_eq!(health_verdict(&outcome), "reachable; AI key missing");
}

#[test]
fn verdict_reports_unreachable_service() {
    let outcome = Err(ServiceCallError::Transport("connection refused".into()));
    assert_eq!(health_verdict(&outcome), "unreachable: connection refused");
}

#[tokio::test]
async fn verdict_distinguishes_failing_health_endpoint_from_unreachable() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new().route(
        "/health",
        get(|| async {
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "detail": "warming up" })),
            )
        }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let outcome = GenerationClient::new(format!("http://{addr}")).health().await;
    let verdict = health_verdict(&outcome);
    assert!(verdict.starts_with("reachable; health check failed"), "{verdict}");
    assert!(verdict.contains("503"));
    assert!(verdict.contains("warming up"));

    let outcome = Err(ServiceCallError::Decode("expected value".into()));
    assert!(health_verdict(&outcome).starts_with("reachable;"));
}

#[test]
fn analysis_request_uses_source_file_name() {
    let dir = std::env::temp_dir().join(format!("testgen_tools_{}", std::process::id()));
    fs::create_dir_all(&dir).expect("dir");
    let path = dir.join("stock.py");
    fs::write(&path, "def restock(n): return n + 1\n").expect("write");

    let request = analysis_request(&path, &client_core::Settings::default()).expect("request");
    assert_eq!(request.file_name, "stock.py");
    assert_eq!(request.language, "python");
    assert!(request.code_content.starts_with("def restock"));

    fs::remove_dir_all(dir).expect("cleanup");
}
