use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    server::router(Arc::new(engine))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

/// Creates the dinner group: A pays 90.00 for A, B and C.
async fn dinner(app: &Router) -> (i64, [i64; 3]) {
    let (status, body) = send(app, Method::POST, "/api/groups", Some(json!({"name": "Dinner"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let group_id = parse(&body)["id"].as_i64().unwrap();

    let mut ids = [0; 3];
    for (slot, name) in ids.iter_mut().zip(["A", "B", "C"]) {
        let (status, body) = send(
            app,
            Method::POST,
            &format!("/api/groups/{group_id}/people"),
            Some(json!({"name": name})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        *slot = parse(&body)["id"].as_i64().unwrap();
    }

    let (status, _) = send(
        app,
        Method::POST,
        &format!("/api/groups/{group_id}/events"),
        Some(json!({
            "title": "Pizza",
            "amount": "90.00",
            "payerId": ids[0],
            "participants": [
                {"personId": ids[0]},
                {"personId": ids[1]},
                {"personId": ids[2], "share": 1},
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    (group_id, ids)
}

#[tokio::test]
async fn create_group_defaults_name() {
    let app = app().await;

    let (status, body) = send(&app, Method::POST, "/api/groups", Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let group = parse(&body);
    assert_eq!(group["name"], "Unnamed Group");
    assert_eq!(group["finalized"], false);
    assert_eq!(group["people"], json!([]));

    let (status, body) = send(&app, Method::GET, "/api/groups", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body).as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn settle_debug_reports_balances_with_two_decimals() {
    let app = app().await;
    let (group_id, [a, b, c]) = dinner(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/groups/{group_id}/settle-debug"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""paid":90.00"#), "{body}");
    assert!(body.contains(r#""balance":60.00"#), "{body}");
    assert!(body.contains(r#""balance":-30.00"#), "{body}");
    assert!(body.contains(r#""amount":30.00"#), "{body}");

    let debug = parse(&body);
    let transactions = debug["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0]["fromId"], b);
    assert_eq!(transactions[0]["toId"], a);
    assert_eq!(transactions[0]["fromName"], "B");
    assert_eq!(transactions[1]["fromId"], c);
    assert_eq!(transactions[1]["toName"], "A");

    // Preview leaves the group open.
    let (_, body) = send(&app, Method::GET, &format!("/api/groups/{group_id}"), None).await;
    assert_eq!(parse(&body)["finalized"], false);
}

#[tokio::test]
async fn settle_finalizes_and_reopen_clears() {
    let app = app().await;
    let (group_id, [a, b, _]) = dinner(&app).await;

    let (status, body) = send(&app, Method::POST, &format!("/api/groups/{group_id}/settle"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with('['), "{body}");
    assert!(body.contains(r#""amount":30.00"#), "{body}");
    let transactions = parse(&body);
    assert_eq!(transactions[0]["fromId"], b);
    assert_eq!(transactions[0]["toId"], a);

    let (status, body) = send(&app, Method::GET, &format!("/api/groups/{group_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["finalized"], true);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/groups/{group_id}/settlement"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let stored = parse(&body);
    assert_eq!(stored["groupId"], group_id);
    assert_eq!(stored["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(stored["people"].as_array().unwrap().len(), 3);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/groups/{group_id}/people"),
        Some(json!({"name": "D"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(parse(&body)["error"].is_string());

    let (status, _) = send(&app, Method::POST, &format!("/api/groups/{group_id}/reopen"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/groups/{group_id}/settlement"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn participants_added_later_with_weights() {
    let app = app().await;
    let (status, body) = send(&app, Method::POST, "/api/groups", Some(json!({"name": "Trip"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let group_id = parse(&body)["id"].as_i64().unwrap();

    let mut ids = Vec::new();
    for name in ["A", "B", "Payer"] {
        let (_, body) = send(
            &app,
            Method::POST,
            &format!("/api/groups/{group_id}/people"),
            Some(json!({"name": name})),
        )
        .await;
        ids.push(parse(&body)["id"].as_i64().unwrap());
    }

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/groups/{group_id}/events"),
        Some(json!({"amount": 100, "payerId": ids[2]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let event = parse(&body);
    assert_eq!(event["title"], "Untitled Event");
    let event_id = event["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/groups/{group_id}/events/{event_id}/participants"),
        Some(json!({"participants": [
            {"personId": ids[0], "share": 1},
            {"personId": ids[1], "share": "3"},
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body).as_array().unwrap().len(), 2);

    let (_, body) = send(
        &app,
        Method::POST,
        &format!("/api/groups/{group_id}/settle-debug"),
        None,
    )
    .await;
    assert!(body.contains(r#""owed":25.00"#), "{body}");
    assert!(body.contains(r#""owed":75.00"#), "{body}");

    let (status, body) = send(&app, Method::GET, &format!("/api/groups/{group_id}/events"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""amount":100.00"#), "{body}");
    assert!(body.contains(r#""share":3"#), "{body}");
}

#[tokio::test]
async fn errors_are_mapped() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/groups/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(parse(&body)["error"].is_string());

    let (group_id, [a, _, _]) = dinner(&app).await;

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/groups/{group_id}/people"),
        Some(json!({"name": "a"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/groups/{group_id}/events"),
        Some(json!({"amount": 0, "payerId": a})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/groups/{group_id}/events"),
        Some(json!({"amount": 10, "payerId": 999})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/groups/{group_id}/events/999/participants"),
        Some(json!({"participants": [{"personId": a}]})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rename_person() {
    let app = app().await;
    let (group_id, [_, b, _]) = dinner(&app).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/groups/{group_id}/people/{b}"),
        Some(json!({"name": "  Bruno  "})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["name"], "Bruno");

    let (_, body) = send(&app, Method::GET, &format!("/api/groups/{group_id}"), None).await;
    let names: Vec<String> = parse(&body)["people"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["A", "Bruno", "C"]);
}

#[tokio::test]
async fn serves_over_tcp() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server::spawn_with_listener(engine, listener).unwrap();

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /api/groups HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with("[]"), "{response}");
}
