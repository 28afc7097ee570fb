//! Liveness, readiness and readiness toggling over real HTTP.

use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn test_readyz_follows_toggles() {
    let server = common::start_server(common::StubRemediator::succeeding("")).await;

    let res = server.http.get(server.url("/readyz")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "ready");

    assert!(!server.client.toggle_ready().await.unwrap());

    let res = server.http.get(server.url("/readyz")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.text().await.unwrap(), "not-ready");

    assert!(server.client.toggle_ready().await.unwrap());
    assert!(server.client.readyz().await.unwrap());
}

#[tokio::test]
async fn test_healthz_ignores_readiness() {
    let server = common::start_server(common::StubRemediator::succeeding("")).await;

    server.client.toggle_ready().await.unwrap();
    assert!(!server.client.readyz().await.unwrap());

    let res = server.http.get(server.url("/healthz")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_toggle_response_body() {
    let server = common::start_server(common::StubRemediator::succeeding("")).await;

    let res = server.http.post(server.url("/toggle-ready")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "ready": false }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_toggles_are_not_lost() {
    let server = common::start_server(common::StubRemediator::succeeding("")).await;

    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let client = server.client.clone();
            tokio::spawn(async move { client.toggle_ready().await.unwrap() })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    // An even number of toggles lands back on the initial value.
    assert!(server.client.readyz().await.unwrap());
    assert!(server.state.readiness.get_ready());
}

#[tokio::test]
async fn test_root_status() {
    let server = common::start_server(common::StubRemediator::succeeding("")).await;
    let status = server.client.status().await.unwrap();
    assert_eq!(status.service, "selfheal-api");
    assert_eq!(status.status, "running");
}
