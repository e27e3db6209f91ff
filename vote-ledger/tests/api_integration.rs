//! End-to-end tests of the HTTP API over the in-memory store.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use vote_ledger::server::auth::StaticTokenVerifier;
use vote_ledger::server::create_app;
use vote_ledger::server::state::AppState;
use vote_ledger_repository::{InMemoryStore, VoteLedgerService};

const ALICE: &str = "alice-token";
const BOB: &str = "bob-token";

fn test_app() -> (Arc<InMemoryStore>, Router) {
    let store = Arc::new(InMemoryStore::new());
    let service = Arc::new(VoteLedgerService::new(store.clone()));
    let verifier = StaticTokenVerifier::new(HashMap::from([
        (ALICE.to_string(), "alice".to_string()),
        (BOB.to_string(), "bob".to_string()),
    ]));
    let state = AppState::new(service, Arc::new(verifier));
    (store, create_app(state, CorsLayer::new()))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn add_item(app: &Router, name: &str, description: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/voteitem",
        Some(ALICE),
        Some(json!({ "name": name, "description": description })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["message"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let (store, app) = test_app();

    let (status, _) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    store.set_unavailable(true).await;
    let (status, _) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_routes_reject_missing_or_unknown_token() {
    let (_, app) = test_app();
    let routes = [
        (Method::POST, "/uservotes/Norway-1"),
        (Method::GET, "/voteitem"),
        (Method::POST, "/voteitem"),
        (Method::PUT, "/voteitem"),
        (Method::DELETE, "/voteitem/Norway-1"),
        (Method::DELETE, "/clearvote"),
    ];

    for (method, uri) in routes {
        let body = Some(json!({ "name": "Norway", "description": "d" }));

        let (status, json) = send(&app, method.clone(), uri, None, body.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(json, json!({ "message": "Unauthorized" }));

        let (status, _) = send(&app, method.clone(), uri, Some("nope"), body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn test_invalid_bodies_are_rejected() {
    let (store, app) = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/voteitem",
        Some(ALICE),
        Some(json!({ "name": " ", "description": "d" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "name should not be empty");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/voteitem",
        Some(ALICE),
        Some(json!({ "name": "Norway-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "description should not be empty");

    assert_eq!(store.key_count().await, 0);
}

#[tokio::test]
async fn test_add_and_list() {
    let (_, app) = test_app();
    let item_id = add_item(&app, "Norway", "Fjords").await;

    let (status, body) = send(&app, Method::GET, "/voteitem", Some(BOB), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "totalVote": 0,
            "voteitem": [
                { "itemId": item_id, "name": "Norway", "description": "Fjords", "voteCount": 0 }
            ]
        })
    );
}

#[tokio::test]
async fn test_item_name_is_kept_verbatim() {
    let (_, app) = test_app();
    let item_id = add_item(&app, " Norway ", "Fjords").await;

    assert!(item_id.starts_with(" Norway -"), "{}", item_id);

    let (_, body) = send(&app, Method::GET, "/voteitem", Some(BOB), None).await;
    assert_eq!(body["voteitem"][0]["itemId"], item_id);
    assert_eq!(body["voteitem"][0]["name"], " Norway ");
}

#[tokio::test]
async fn test_voting_scenario() {
    let (_, app) = test_app();
    let a = add_item(&app, "A", "first").await;
    let b = add_item(&app, "B", "second").await;

    let (status, body) = send(&app, Method::POST, &format!("/uservotes/{}", a), Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "OK" }));

    send(&app, Method::POST, &format!("/uservotes/{}", b), Some(ALICE), None).await;
    send(&app, Method::POST, &format!("/uservotes/{}", b), Some(BOB), None).await;

    let (_, body) = send(&app, Method::GET, "/voteitem", Some(ALICE), None).await;
    assert_eq!(body["totalVote"], 2);
    assert_eq!(body["voteitem"][0]["itemId"], b.as_str());
    assert_eq!(body["voteitem"][0]["voteCount"], 2);
    assert_eq!(body["voteitem"][1]["itemId"], a.as_str());
    assert_eq!(body["voteitem"][1]["voteCount"], 0);
}

#[tokio::test]
async fn test_vote_for_unknown_item() {
    let (_, app) = test_app();

    let (status, body) = send(&app, Method::POST, "/uservotes/ghost-1", Some(ALICE), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Vote item does not exist." }));
}

#[tokio::test]
async fn test_edit_item() {
    let (_, app) = test_app();
    let item_id = add_item(&app, "Norway", "old").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/voteitem",
        Some(ALICE),
        Some(json!({ "name": item_id, "description": "new" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "itemId": item_id, "name": "Norway", "description": "new" })
    );

    let (_, body) = send(&app, Method::GET, "/voteitem", Some(ALICE), None).await;
    assert_eq!(body["voteitem"][0]["description"], "new");
}

#[tokio::test]
async fn test_delete_item() {
    let (_, app) = test_app();
    let item_id = add_item(&app, "Norway", "d").await;

    let (status, body) = send(&app, Method::DELETE, "/voteitem/ghost-1", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Vote item can only be deleted while it is tracked in the tally."
    );

    let uri = format!("/voteitem/{}", item_id);
    let (status, body) = send(&app, Method::DELETE, &uri, Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "OK" }));

    let (status, body) = send(&app, Method::DELETE, &uri, Some(ALICE), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Vote item does not exist.");
}

#[tokio::test]
async fn test_clear_votes() {
    let (store, app) = test_app();
    let item_id = add_item(&app, "Norway", "d").await;
    send(&app, Method::POST, &format!("/uservotes/{}", item_id), Some(BOB), None).await;

    let (status, body) = send(&app, Method::DELETE, "/clearvote", Some(ALICE), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "All data was deleted successfully." }));
    assert_eq!(store.key_count().await, 0);

    let (_, body) = send(&app, Method::GET, "/voteitem", Some(ALICE), None).await;
    assert_eq!(body, json!({ "totalVote": 0, "voteitem": [] }));
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let (store, app) = test_app();
    store.set_unavailable(true).await;

    let (status, body) = send(&app, Method::GET, "/voteitem", Some(ALICE), None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "An error occurred while fetching vote items.");
    assert!(body["error"].as_str().unwrap().contains("Connection error"));
}
