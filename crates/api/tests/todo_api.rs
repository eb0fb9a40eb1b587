mod common;

use axum::http::{Method, StatusCode};
use bizhub_core::messages::todo as msg;
use common::{body_json, build_test_app};
use serde_json::json;

#[tokio::test]
async fn test_todos_are_private_to_their_owner() {
    let app = build_test_app();
    let (client_id, _, token) = app.tenant("Acme").await;
    let colleague = app.seed_user(client_id, "ravi").await;
    let colleague_token = app.token_for(&colleague);

    let response = app
        .post("/api/v1/todos", &token, json!({ "task": "Call the courier" }))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].clone();

    let response = app.get(&format!("/api/v1/todos/{id}"), &colleague_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], msg::INVALID_ID);

    let response = app.get("/api/v1/todos", &colleague_token).await;
    assert_eq!(body_json(response).await["data"], json!([]));

    let response = app.get("/api/v1/todos", &token).await;
    assert_eq!(body_json(response).await["data"][0]["task"], "Call the courier");
}

#[tokio::test]
async fn test_done_flag_then_hard_delete() {
    let app = build_test_app();
    let (_, _, token) = app.tenant("Acme").await;
    let response = app
        .post("/api/v1/todos", &token, json!({ "task": "Restock shelves" }))
        .await;
    let id = body_json(response).await["data"]["id"].clone();

    let response = app.patch(&format!("/api/v1/todos/{id}/done"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_done"], true);

    let response = app
        .send(Method::DELETE, &format!("/api/v1/todos/{id}"), Some(token.as_str()), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(app.mem.todos.all().await.is_empty());
}
