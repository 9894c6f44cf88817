use crate::server::config::ServerConfig;
use crate::server::service::handler::{AppService, RequestView, router};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use core::time::Duration;
use reqtrack::{RegistryConfig, RequestState};
use tower::ServiceExt;

fn test_config(auto_complete: bool, work_delay: Duration) -> ServerConfig {
    ServerConfig {
        server_addr: "127.0.0.1:0".to_owned(),
        num_workers: 2,
        work_delay,
        auto_complete,
        registry: RegistryConfig::default(),
        seed: Some(42),
        shutdown_timeout: Duration::from_millis(200),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_owned()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn submit(app: &Router, payload: i64) -> RequestView {
    let (status, body) = send(app, post_json("/requests", &format!(r#"{{"payload":{payload}}}"#))).await;
    assert_eq!(status, StatusCode::CREATED);
    serde_json::from_slice(&body).unwrap()
}

async fn view(app: &Router, uri: &str) -> RequestView {
    let (status, body) = send(app, get(uri)).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn submit_query_complete() {
    let service = AppService::new(&test_config(false, Duration::ZERO));
    let app = router(service.clone());

    let created = submit(&app, 42).await;
    assert_eq!(created.state, RequestState::New);
    assert_eq!(created.id.len(), 10);

    let uri = format!("/requests/{}", created.id);
    assert_eq!(view(&app, &uri).await.state, RequestState::New);

    let (status, body) = send(&app, post_empty(&format!("{uri}/complete"))).await;
    assert_eq!(status, StatusCode::OK);
    let completed: RequestView = serde_json::from_slice(&body).unwrap();
    assert_eq!(completed.state, RequestState::Finished);

    assert_eq!(view(&app, &uri).await.state, RequestState::Finished);
    assert_eq!(service.registry().len(), 1);
}

#[tokio::test]
async fn unknown_ids_are_not_errors() {
    let service = AppService::new(&test_config(false, Duration::ZERO));
    let app = router(service.clone());

    let queried = view(&app, "/requests/doesnotexist").await;
    assert_eq!(queried.state, RequestState::Unknown);

    let (status, body) = send(&app, post_empty("/requests/doesnotexist/complete")).await;
    assert_eq!(status, StatusCode::OK);
    let completed: RequestView = serde_json::from_slice(&body).unwrap();
    assert_eq!(completed.state, RequestState::Unknown);

    assert!(service.registry().is_empty());
}

#[tokio::test]
async fn detail_reports_payload_or_404() {
    let service = AppService::new(&test_config(false, Duration::ZERO));
    let app = router(service);

    let created = submit(&app, -7).await;
    let detail = view(&app, &format!("/requests/{}/detail", created.id)).await;
    assert_eq!(detail.payload, Some(-7));
    assert_eq!(detail.state, RequestState::New);

    let (status, body) = send(&app, get("/requests/doesnotexist/detail")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Request doesnotexist not found");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let service = AppService::new(&test_config(false, Duration::ZERO));
    let app = router(service.clone());

    let (status, _) = send(&app, post_json("/requests", r#"{"payload":"x"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, post_json("/requests", "not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(service.registry().is_empty());
}

#[tokio::test]
async fn workers_complete_submitted_requests() {
    let service = AppService::new(&test_config(true, Duration::from_millis(5)));
    let app = router(service.clone());

    let mut ids = Vec::new();
    for payload in 0..20 {
        ids.push(submit(&app, payload).await.id);
    }

    tokio::time::timeout(Duration::from_secs(5), async {
        while !ids
            .iter()
            .all(|id| service.registry().query(id.as_str()) == RequestState::Finished)
        {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("workers did not finish in time");

    assert_eq!(service.registry().len(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions() {
    let service = AppService::new(&test_config(false, Duration::ZERO));
    let app = router(service.clone());

    let tasks: Vec<_> = (0..100)
        .map(|payload| {
            let app = app.clone();
            tokio::spawn(async move {
                let created = submit(&app, payload).await;
                let uri = format!("/requests/{}", created.id);
                let (status, _) = send(&app, post_empty(&format!("{uri}/complete"))).await;
                assert_eq!(status, StatusCode::OK);
                view(&app, &uri).await.state
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap(), RequestState::Finished);
    }
    assert_eq!(service.registry().len(), 100);
}

#[tokio::test]
async fn shutdown_refuses_new_work() {
    let service = AppService::new(&test_config(true, Duration::ZERO));
    let app = router(service.clone());

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");

    let created = submit(&app, 1).await;
    service.shutdown().await.unwrap();

    // Queued work drained before the workers stopped.
    assert_eq!(
        service.registry().query(created.id.as_str()),
        RequestState::Finished
    );

    let (status, _) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = send(&app, post_json("/requests", r#"{"payload":2}"#)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    // Reads keep working while the server winds down.
    assert_eq!(
        view(&app, &format!("/requests/{}", created.id)).await.state,
        RequestState::Finished
    );

    // A second shutdown is a no-op.
    service.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_abandons_slow_work() {
    let service = AppService::new(&test_config(true, Duration::from_secs(60)));
    let app = router(service.clone());

    let created = submit(&app, 1).await;
    service.shutdown().await.unwrap();

    assert_eq!(
        service.registry().query(created.id.as_str()),
        RequestState::New
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn submissions_racing_shutdown_leave_no_stray_entries() {
    for _ in 0..10 {
        let service = AppService::new(&test_config(true, Duration::ZERO));

        let submitters: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::task::spawn_blocking(move || {
                    (0..500_i64)
                        .filter(|&payload| service.submit(payload).is_ok())
                        .count()
                })
            })
            .collect();

        tokio::task::yield_now().await;
        service.shutdown().await.unwrap();

        let mut accepted = 0;
        for submitter in submitters {
            accepted += submitter.await.unwrap();
        }
        // Every entry left in the registry was acknowledged to its client.
        assert_eq!(service.registry().len(), accepted);
    }
}
