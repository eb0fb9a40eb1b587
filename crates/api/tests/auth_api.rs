//! Login and bearer-token enforcement.

mod common;

use axum::http::{Method, StatusCode};
use bizhub_core::messages::login as msg;
use bizhub_db::TenantStore;
use common::{body_json, build_test_app, PASSWORD};
use serde_json::json;

async fn login(app: &common::TestApp, login_name: &str, password: &str) -> axum::response::Response {
    app.send(
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "login_name": login_name, "password": password })),
    )
    .await
}

#[tokio::test]
async fn test_login_returns_user_and_client() {
    let app = build_test_app();
    let client_id = app.seed_client("Acme").await;
    let user = app.seed_user(client_id, "asha").await;

    let response = login(&app, "ASHA", PASSWORD).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user_id"], user.id);
    assert_eq!(json["data"]["client"]["id"], client_id);
    assert_eq!(json["data"]["client"]["name"], "Acme");
    assert!(json["data"].get("access_token").is_none());
}

#[tokio::test]
async fn test_wrong_password_counts_down_then_locks() {
    let app = build_test_app();
    let client_id = app.seed_client("Acme").await;
    let user = app.seed_user(client_id, "asha").await;

    for _ in 0..4 {
        let response = login(&app, "asha", "wrong password").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], msg::INVALID_CREDENTIALS);
    }
    let response = login(&app, "asha", "wrong password").await;
    assert_eq!(body_json(response).await["error"], msg::LOCKED_AFTER_ATTEMPTS);

    let response = login(&app, "asha", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], msg::ACCOUNT_LOCKED);

    let stored = app.mem.users.find(user.id, client_id).await.unwrap().unwrap();
    assert!(stored.locked);
    assert_eq!(stored.login_attempts, 0);
}

#[tokio::test]
async fn test_unknown_login_is_not_found() {
    let app = build_test_app();

    let response = login(&app, "nobody", PASSWORD).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], msg::INVALID_EMAIL);
}

#[tokio::test]
async fn test_missing_credentials_rejected() {
    let app = build_test_app();

    let response = login(&app, "", "").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], msg::CREDENTIALS_REQUIRED);
}

#[tokio::test]
async fn test_protected_routes_need_bearer_token() {
    let app = build_test_app();

    let response = app
        .send(Method::GET, "/api/v1/clients/current", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send(Method::GET, "/api/v1/clients/current", Some("not-a-jwt"), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_successful_login_is_audited() {
    let app = build_test_app();
    let client_id = app.seed_client("Acme").await;
    app.seed_user(client_id, "asha").await;

    login(&app, "asha", PASSWORD).await;

    let logs = app.mem.user_logs.all().await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, "login");
    assert_eq!(logs[0].route, "/api/v1/auth/login");
}

#[tokio::test]
async fn test_new_user_confirms_email_then_signs_in() {
    let app = build_test_app();
    let (_, _, token) = app.tenant("Acme").await;
    let response = app
        .post(
            "/api/v1/users",
            &token,
            json!({
                "login_name": "ravi",
                "first_name": "Ravi",
                "last_name": "Shah",
                "email": "ravi@acme.test",
                "password": PASSWORD,
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["data"].get("confirmation_token").is_none());
    let user_id = json["data"]["id"].as_i64().unwrap();

    let response = login(&app, "ravi", PASSWORD).await;
    assert_eq!(body_json(response).await["error"], msg::EMAIL_NOT_CONFIRMED);

    let stored = app.mem.users.all().await.into_iter().find(|u| u.id == user_id).unwrap();
    let response = app
        .send(
            Method::POST,
            "/api/v1/auth/confirm-email",
            None,
            Some(json!({ "user_id": user_id, "token": stored.confirmation_token })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["email_confirmed"], true);

    let response = login(&app, "ravi", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_confirmation_token_is_unauthorized() {
    let app = build_test_app();
    let client_id = app.seed_client("Acme").await;
    let user = app.seed_user(client_id, "asha").await;

    let response = app
        .send(
            Method::POST,
            "/api/v1/auth/confirm-email",
            None,
            Some(json!({ "user_id": user.id, "token": "guess" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], msg::INVALID_TOKEN);
}

#[tokio::test]
async fn test_reset_password_unlocks_account() {
    let app = build_test_app();
    let client_id = app.seed_client("Acme").await;
    let user = app.seed_user(client_id, "asha").await;
    for _ in 0..5 {
        login(&app, "asha", "wrong password").await;
    }

    let response = app
        .send(
            Method::POST,
            "/api/v1/auth/reset-password",
            None,
            Some(json!({ "login_name": "asha" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], msg::PASSWORD_RESET);
    let stored = app.mem.users.find(user.id, client_id).await.unwrap().unwrap();
    assert!(!stored.locked);
    assert_eq!(stored.login_attempts, 5);
    assert_ne!(stored.password_hash, user.password_hash);
}
