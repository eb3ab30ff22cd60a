use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use social_messenger::app_state::AppState;
use social_messenger::routes;
use social_messenger::store::MemStore;

fn app() -> Router {
    routes::create_routes().with_state(AppState::new(Arc::new(MemStore::new())))
}

async fn send_request(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<Uuid>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user.to_string());
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = app.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn register(app: &Router, email: &str, name: &str) -> Uuid {
    let (status, body) = send_request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": email, "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["user"]["id"]
        .as_str()
        .expect("user id in response")
        .parse()
        .expect("valid uuid")
}

#[tokio::test]
async fn liveness_route_responds() {
    let app = app();
    let (status, _) = send_request(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_then_duplicate_email_conflicts() {
    let app = app();
    register(&app, "alice@example.com", "Alice").await;

    let (status, body) = send_request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": "alice@example.com", "name": "Imposter" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
async fn invalid_registration_is_rejected() {
    let app = app();
    let (status, _) = send_request(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": "not-an-email", "name": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_identity_header_is_unauthorized() {
    let app = app();
    let (status, _) = send_request(&app, "GET", "/api/auth/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn friend_request_flow_over_http() {
    let app = app();
    let alice = register(&app, "alice@example.com", "Alice").await;
    let bob = register(&app, "bob@example.com", "Bob").await;

    let (status, body) = send_request(
        &app,
        "POST",
        "/api/friends",
        Some(alice),
        Some(json!({ "receiverId": bob.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["selectedUserId"], bob.to_string());
    assert_eq!(body["requestStatus"], "pending");

    let (status, _) = send_request(
        &app,
        "POST",
        "/api/friends",
        Some(alice),
        Some(json!({ "receiverId": bob.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send_request(
        &app,
        "POST",
        "/api/friends/accept",
        Some(bob),
        Some(json!({ "selectedUserId": alice.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selectedUserId"], alice.to_string());

    let (status, body) = send_request(
        &app,
        "GET",
        &format!("/api/friends/friends/{alice}"),
        Some(alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let friends = body["friends"].as_array().expect("friends array");
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0]["id"], bob.to_string());
    assert!(body["pendingRequests"].as_array().expect("pending").is_empty());

    // accepting twice hits the gone pending row
    let (status, _) = send_request(
        &app,
        "POST",
        "/api/friends/accept",
        Some(bob),
        Some(json!({ "selectedUserId": alice.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pending_requests_carry_the_sender_summary() {
    let app = app();
    let alice = register(&app, "alice@example.com", "Alice").await;
    let bob = register(&app, "bob@example.com", "Bob").await;

    send_request(
        &app,
        "POST",
        "/api/friends",
        Some(bob),
        Some(json!({ "receiverId": alice.to_string(), "message": "hello" })),
    )
    .await;

    let (status, body) = send_request(
        &app,
        "GET",
        &format!("/api/friends/friends/{alice}"),
        Some(alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let pending = body["pendingRequests"].as_array().expect("pending");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["senderId"], bob.to_string());
    assert_eq!(pending[0]["email"], "bob@example.com");
    assert!(pending[0]["requestId"].is_number());
}

#[tokio::test]
async fn invalid_receiver_id_is_a_bad_request() {
    let app = app();
    let alice = register(&app, "alice@example.com", "Alice").await;

    let (status, _) = send_request(
        &app,
        "POST",
        "/api/friends",
        Some(alice),
        Some(json!({ "receiverId": "not-a-uuid" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn conversation_is_participant_only_and_camel_cased() {
    let app = app();
    let alice = register(&app, "alice@example.com", "Alice").await;
    let bob = register(&app, "bob@example.com", "Bob").await;
    let carol = register(&app, "carol@example.com", "Carol").await;

    let (status, _) = send_request(
        &app,
        "POST",
        "/api/messages",
        Some(alice),
        Some(json!({ "recipientId": bob.to_string(), "content": "hello bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send_request(
        &app,
        "GET",
        &format!("/api/messages/{alice}/{bob}"),
        Some(carol),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send_request(
        &app,
        "GET",
        &format!("/api/messages/{alice}/{bob}"),
        Some(alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().expect("message array");
    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item["sender"]["id"], alice.to_string());
    assert_eq!(item["recipientId"], bob.to_string());
    assert_eq!(item["messageType"], "text");
    assert_eq!(item["content"], "hello bob");
    assert_eq!(item["isRead"], false);
    assert!(item["messageId"].is_string());
}

#[tokio::test]
async fn bulk_delete_reports_the_owned_count() {
    let app = app();
    let alice = register(&app, "alice@example.com", "Alice").await;
    let bob = register(&app, "bob@example.com", "Bob").await;

    send_request(
        &app,
        "POST",
        "/api/messages",
        Some(alice),
        Some(json!({ "recipientId": bob.to_string(), "content": "mine" })),
    )
    .await;

    let (_, body) = send_request(
        &app,
        "GET",
        &format!("/api/messages/{alice}/{bob}"),
        Some(alice),
        None,
    )
    .await;
    let message_id = body[0]["messageId"].as_str().expect("message id").to_string();

    // bob does not own the row; it is skipped, not an error
    let (status, body) = send_request(
        &app,
        "POST",
        "/api/messages/delete",
        Some(bob),
        Some(json!({ "messages": [message_id.clone()] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedCount"], 0);
    assert_eq!(body["message"], "0 message(s) deleted successfully");

    let (status, body) = send_request(
        &app,
        "POST",
        "/api/messages/delete",
        Some(alice),
        Some(json!({ "messages": [message_id] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deletedCount"], 1);
}

#[tokio::test]
async fn mark_read_round_trip() {
    let app = app();
    let alice = register(&app, "alice@example.com", "Alice").await;
    let bob = register(&app, "bob@example.com", "Bob").await;

    send_request(
        &app,
        "POST",
        "/api/messages",
        Some(alice),
        Some(json!({ "recipientId": bob.to_string(), "content": "ping" })),
    )
    .await;

    let (_, body) = send_request(
        &app,
        "GET",
        &format!("/api/messages/{alice}/{bob}"),
        Some(bob),
        None,
    )
    .await;
    let message_id = body[0]["messageId"].as_str().expect("message id").to_string();

    let (status, _) = send_request(
        &app,
        "POST",
        "/api/messages/read",
        Some(alice),
        Some(json!({ "messageId": message_id.clone() })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "sender cannot mark read");

    let (status, body) = send_request(
        &app,
        "POST",
        "/api/messages/read",
        Some(bob),
        Some(json!({ "messageId": message_id.clone() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messageId"], message_id);

    let (_, body) = send_request(
        &app,
        "GET",
        &format!("/api/messages/{alice}/{bob}"),
        Some(bob),
        None,
    )
    .await;
    assert_eq!(body[0]["isRead"], true);
}

#[tokio::test]
async fn chats_route_is_self_only() {
    let app = app();
    let alice = register(&app, "alice@example.com", "Alice").await;
    let bob = register(&app, "bob@example.com", "Bob").await;

    send_request(
        &app,
        "POST",
        "/api/messages",
        Some(alice),
        Some(json!({ "recipientId": bob.to_string(), "content": "hey" })),
    )
    .await;

    let (status, _) = send_request(
        &app,
        "GET",
        &format!("/api/messages/chats/{bob}"),
        Some(alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send_request(
        &app,
        "GET",
        &format!("/api/messages/chats/{alice}"),
        Some(alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"].as_array().expect("messages").len(), 1);
}
