// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard shell routes end to end.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use common::Reply;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = common::test_app().await;

    let response = app.router().oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_dashboard_snapshot_defaults() {
    let app = common::test_app().await;

    let response = app.router().oneshot(get("/api/dashboard")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("Cache-Control").unwrap(),
        "no-store"
    );
    let body = json_body(response).await;
    assert_eq!(body["user"], Value::Null);
    assert_eq!(body["goal"], "maintain");
    assert_eq!(body["goal_label"], "Maintaining");
    assert_eq!(body["filter"], json!({"mode": "weeks", "weeks_limit": 4}));
    assert_eq!(body["heading"], "Summary for the past 4 weeks");
    assert_eq!(body["daily"], json!({"loading": false, "data": []}));
    assert_eq!(body["sync_in_progress"], false);
    assert_eq!(body["summary_cards"], Value::Null);
    assert_eq!(
        body["sources"],
        json!([
            {"id": "gfit", "label": "Get Google Fit Data"},
            {"id": "mfp", "label": "Get MyFitnessPal Data"},
        ])
    );
}

#[tokio::test]
async fn test_snapshot_formats_summary_cards() {
    let app = common::signed_in_app().await;
    app.backend.set_reply(
        "summary",
        Reply::ok(json!({"metrics": {
            "total_change": -1.8,
            "avg_change": -0.45,
            "avg_change_prc": -0.56,
            "avg_net_calories": -420
        }})),
    );
    app.state.views.refresh_summary().await;

    let response = app.router().oneshot(get("/api/dashboard")).await.unwrap();

    let body = json_body(response).await;
    assert_eq!(body["summary"]["data"]["total_change"], -1.8);
    assert_eq!(
        body["summary_cards"],
        json!({
            "total_change": "-1.80",
            "avg_change": "-0.45",
            "avg_change_prc": "-0.56",
            "avg_net_calories": "-420"
        })
    );
}

#[tokio::test]
async fn test_session_hand_off() {
    let app = common::test_app().await;

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/api/session",
            json!({"access_token": common::provider_token("user-42")}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["user"]["id"], "user-42");
    assert_eq!(body["user"]["email"], "user-42@example.com");

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/session")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(json_body(response).await["user"], Value::Null);

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/api/session",
            json!({"access_token": "not-a-jwt"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_goal_is_persisted() {
    let app = common::test_app().await;

    let response = app
        .router()
        .oneshot(json_request("PUT", "/api/goal", json!({"goal": "gain"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["goal_label"], "Gaining Muscle");

    let stored = std::fs::read_to_string(app.storage_dir.path().join("storage.json")).unwrap();
    let stored: Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored["goalSelected"], "gain");

    let response = app
        .router()
        .oneshot(json_request("PUT", "/api/goal", json!({"goal": "bulk"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_filter_changes() {
    let app = common::test_app().await;

    let response = app
        .router()
        .oneshot(json_request("PUT", "/api/filter/weeks", json!({"weeks_limit": 6})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["filter"]["weeks_limit"], 6);

    let response = app
        .router()
        .oneshot(json_request("PUT", "/api/filter/weeks", json!({"weeks_limit": "0"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["filter"]["weeks_limit"], 6);
    assert_eq!(body["toast"]["category"], "error");

    let response = app
        .router()
        .oneshot(json_request("POST", "/api/filter/mode", json!({"mode": "dates"})))
        .await
        .unwrap();
    assert_eq!(
        json_body(response).await["filter"],
        json!({"mode": "dates", "date_from": null, "date_to": null})
    );

    let response = app
        .router()
        .oneshot(json_request(
            "PUT",
            "/api/filter/dates",
            json!({"date_from": "2024-02-01", "date_to": "2024-01-01"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        json_body(response).await["toast"]["message"],
        "'Date To' must be after 'Date From'"
    );

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/filter")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        json_body(response).await["filter"],
        json!({"mode": "weeks", "weeks_limit": 4})
    );
}

#[tokio::test]
async fn test_landing_resumes_and_cleans_address() {
    let app = common::signed_in_app().await;

    let response = app
        .router()
        .oneshot(get(
            "/?tab=weekly&initiator=data_source_auth_success&source=gfit",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/?tab=weekly");
    assert_eq!(app.backend.requests_to("sync-data").len(), 1);
}

#[tokio::test]
async fn test_plain_landing_returns_snapshot() {
    let app = common::signed_in_app().await;

    let response = app.router().oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["user"]["id"], "user-1");
    assert!(app.backend.requests().is_empty());
}

#[tokio::test]
async fn test_sync_route_redirects_to_consent_screen() {
    let app = common::signed_in_app().await;
    app.backend.set_reply(
        "sync-data",
        Reply::status(401, json!({"auth_url": "/api/mfp/auth"})),
    );

    let response = app
        .router()
        .oneshot(json_request("POST", "/api/sync", json!({"data_source": "mfp"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        format!("{}/api/mfp/auth", app.backend.origin).as_str()
    );
}

#[tokio::test]
async fn test_sync_route_without_body_uses_default_source() {
    let app = common::signed_in_app().await;

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/sync")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["toast"]["message"], "No new data");
    assert_eq!(
        app.backend.requests_to("sync-data")[0].body,
        Some(json!({"data_source": "gfit"}))
    );
}

#[tokio::test]
async fn test_entry_routes() {
    let app = common::signed_in_app().await;

    let response = app
        .router()
        .oneshot(json_request(
            "POST",
            "/api/entries",
            json!({"entry_date": "2024-03-03", "weight": 80.2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["toast"]["message"],
        "Entry added for 2024-03-03"
    );

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/entries/2024-03-03")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/entries/yesterday")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_auth_url_does_not_break_redirect() {
    let app = common::signed_in_app().await;
    app.backend.set_reply(
        "sync-data",
        Reply::status(401, json!({"auth_url": "/api/gfit/auth\r\nx"})),
    );

    let response = app
        .router()
        .oneshot(json_request("POST", "/api/sync", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["toast"]["category"], "error");
    assert_eq!(body["toast"]["message"], "Error while syncing data");
}

#[tokio::test]
async fn test_shell_headers_on_redirects() {
    let app = common::signed_in_app().await;

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .uri("/?initiator=data_source_auth_success&source=gfit")
                .header(header::ORIGIN, "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let headers = response.headers();
    for (name, value) in weight_dashboard::middleware::security::SECURITY_HEADERS {
        assert_eq!(headers.get(name).unwrap(), value, "{}", name);
    }
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn test_foreign_origin_is_not_allowed() {
    let app = common::test_app().await;

    let response = app
        .router()
        .oneshot(
            Request::builder()
                .uri("/api/dashboard")
                .header(header::ORIGIN, "https://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
