mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{
    TEST_PASSWORD, body_json, create_test_user, generate_unique_email, json_request,
    setup_test_app, test_state,
};
use devcamper::devcamper_config::Environment;
use devcamper::devcamper_models::Role;
use devcamper::middleware::auth::PASSWORD_CHANGED_MESSAGE;
use devcamper::router::init_router;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "./migrations")]
async fn test_register_login_and_me(pool: PgPool) {
    let app = setup_test_app(pool);
    let email = generate_unique_email();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "name": "Jane Doe",
                "email": email.to_uppercase(),
                "password": TEST_PASSWORD,
                "passwordConfirm": TEST_PASSWORD,
                "role": "publisher"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("set-cookie").is_some());
    let body = body_json(response).await;
    assert_eq!(body["success"], true);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": TEST_PASSWORD })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["token"].as_str().unwrap().to_string();

    let response = app
        .oneshot(json_request("GET", "/api/v1/auth/me", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["email"], email);
    assert_eq!(body["data"]["role"], "publisher");
    assert!(body["data"].get("passwordHash").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_rejects_admin_role(pool: PgPool) {
    let app = setup_test_app(pool);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            Some(json!({
                "name": "Mallory",
                "email": generate_unique_email(),
                "password": TEST_PASSWORD,
                "passwordConfirm": TEST_PASSWORD,
                "role": "admin"
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_wrong_password_is_unauthorized(pool: PgPool) {
    let user = create_test_user(&pool, Role::User).await;
    let app = setup_test_app(pool);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": user.email, "password": "wrong-password" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["message"], "Invalid credentials");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_password_change_revokes_older_tokens(pool: PgPool) {
    let user = create_test_user(&pool, Role::User).await;
    let app = setup_test_app(pool);

    // tokens carry whole-second issue times
    tokio::time::sleep(Duration::from_millis(2100)).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/auth/updatepassword",
            Some(&user.token),
            Some(json!({ "currentPassword": TEST_PASSWORD, "newPassword": "brand-new-pass" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let new_token = body_json(response).await["token"].as_str().unwrap().to_string();

    let stale = app
        .clone()
        .oneshot(json_request("GET", "/api/v1/auth/me", Some(&user.token), None))
        .await
        .unwrap();
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(stale).await["message"], PASSWORD_CHANGED_MESSAGE);

    let fresh = app
        .oneshot(json_request("GET", "/api/v1/auth/me", Some(&new_token), None))
        .await
        .unwrap();
    assert_eq!(fresh.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_forgot_and_reset_password(pool: PgPool) {
    let user = create_test_user(&pool, Role::User).await;
    let mut state = test_state(pool);
    state.environment = Environment::Development;
    let app = init_router(state);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/forgotpassword",
            None,
            Some(json!({ "email": user.email })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let reset_url = body_json(response).await["resetUrl"]
        .as_str()
        .unwrap()
        .to_string();
    let raw_token = reset_url.rsplit('/').next().unwrap().to_string();

    let reset_uri = format!("/api/v1/auth/resetpassword/{}", raw_token);
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &reset_uri,
            None,
            Some(json!({ "password": "after-reset" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // single use
    let reused = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &reset_uri,
            None,
            Some(json!({ "password": "again-reset" })),
        ))
        .await
        .unwrap();
    assert_eq!(reused.status(), StatusCode::BAD_REQUEST);

    let login = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": user.email, "password": "after-reset" })),
        ))
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_forgot_password_unknown_email(pool: PgPool) {
    let app = setup_test_app(pool);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/forgotpassword",
            None,
            Some(json!({ "email": generate_unique_email() })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
