mod common;

use chrono::{Duration, Utc};
use serde_json::json;
use ttl_shortener::domain::notification::DEACTIVATION_SUBJECT;

#[tokio::test]
async fn test_visit_unknown_code_not_found() {
    let app = common::create_test_app();
    let server = app.server();

    let response = server.get("/doesNotExist").await;

    response.assert_status_not_found();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["message"], "Link not found");
}

#[tokio::test]
async fn test_single_use_link_resolves_once() {
    let app = common::create_test_app();
    let server = app.server();
    let auth = common::sign_up(&server, "owner@example.com").await;
    let code = common::create_link(&server, &auth, "AFTER_THE_LINK").await;

    let response = server.get(&format!("/{code}")).await;
    response.assert_status_ok();
    response.assert_json(&json!({ "link": "https://example.com/page" }));

    server.get(&format!("/{code}")).await.assert_status_not_found();

    let stored = app.links.by_code(&code).unwrap();
    assert!(!stored.is_active);
    assert_eq!(stored.clicks, 0);

    let sent = app.drain_notifications().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, DEACTIVATION_SUBJECT);
    assert_eq!(sent[0].recipient, "owner@example.com");
    assert!(sent[0].body.contains(&code));
}

#[tokio::test]
async fn test_concurrent_single_use_visits_notify_once() {
    let app = common::create_test_app();
    let server = app.server();
    let auth = common::sign_up(&server, "owner@example.com").await;
    let code = common::create_link(&server, &auth, "AFTER_THE_LINK").await;

    let service = app.state.link_service.clone();
    let visits: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            let code = code.clone();
            tokio::spawn(async move { service.resolve(&code).await })
        })
        .collect();

    let mut resolved = 0;
    for visit in visits {
        if visit.await.unwrap().is_ok() {
            resolved += 1;
        }
    }

    assert_eq!(resolved, 1);
    assert_eq!(app.queue.pending(), 1);
}

#[tokio::test]
async fn test_deadline_link_counts_clicks_until_swept() {
    let app = common::create_test_app();
    let server = app.server();
    let auth = common::sign_up(&server, "owner@example.com").await;
    let code = common::create_link(&server, &auth, "1_DAY").await;

    server.get(&format!("/{code}")).await.assert_status_ok();
    server.get(&format!("/{code}")).await.assert_status_ok();
    assert_eq!(app.links.by_code(&code).unwrap().clicks, 2);

    // Not matured yet
    let report = app
        .state
        .link_service
        .expire_matured(Utc::now())
        .await
        .unwrap();
    assert_eq!(report.deactivated, 0);

    let later = Utc::now() + Duration::days(2);
    let report = app.state.link_service.expire_matured(later).await.unwrap();
    assert_eq!(report.scanned, 1);
    assert_eq!(report.deactivated, 1);
    assert_eq!(report.notification_failures, 0);

    server.get(&format!("/{code}")).await.assert_status_not_found();
    assert_eq!(app.links.by_code(&code).unwrap().clicks, 2);

    // A second sweep finds nothing left to do
    let report = app.state.link_service.expire_matured(later).await.unwrap();
    assert_eq!(report.scanned, 0);
    assert_eq!(report.deactivated, 0);

    assert_eq!(app.queue.pending(), 1);
}

#[tokio::test]
async fn test_sweep_only_touches_matured_links() {
    let app = common::create_test_app();
    let server = app.server();
    let auth = common::sign_up(&server, "owner@example.com").await;
    let short = common::create_link(&server, &auth, "1_DAY").await;
    let long = common::create_link(&server, &auth, "7_DAYS").await;
    let single = common::create_link(&server, &auth, "AFTER_THE_LINK").await;

    let report = app
        .state
        .link_service
        .expire_matured(Utc::now() + Duration::days(4))
        .await
        .unwrap();

    assert_eq!(report.deactivated, 1);
    assert!(!app.links.by_code(&short).unwrap().is_active);
    assert!(app.links.by_code(&long).unwrap().is_active);
    assert!(app.links.by_code(&single).unwrap().is_active);
}
