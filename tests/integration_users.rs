mod common;

use axum::http::StatusCode;
use common::{
    body_json, bootcamp_averages, create_test_bootcamp, create_test_user, generate_unique_email,
    json_request, setup_test_app,
};
use devcamper::devcamper_models::{BootcampId, Role};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

async fn count(pool: &PgPool, sql: &str, id: BootcampId) -> i64 {
    sqlx::query_scalar(sql).bind(id).fetch_one(pool).await.unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_non_admin_is_forbidden(pool: PgPool) {
    let publisher = create_test_user(&pool, Role::Publisher).await;
    let app = setup_test_app(pool);

    for (method, uri) in [
        ("GET", "/api/v1/users".to_string()),
        ("GET", format!("/api/v1/users/{}", publisher.id)),
        ("DELETE", format!("/api/v1/users/{}", publisher.id)),
    ] {
        let response = app
            .clone()
            .oneshot(json_request(method, &uri, Some(&publisher.token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{} {}", method, uri);
        assert_eq!(
            body_json(response).await["message"],
            "User role publisher is not authorized to access this route"
        );
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_user_crud(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let app = setup_test_app(pool);
    let email = generate_unique_email();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users",
            Some(&admin.token),
            Some(json!({ "name": "Kevin Smith", "email": email, "password": "123456" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["role"], "user");
    assert!(body["data"].get("passwordHash").is_none());
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/users/{}", id);

    let response = app
        .clone()
        .oneshot(json_request("GET", "/api/v1/users?select=name,email", Some(&admin.token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["data"].as_array().unwrap().iter().any(|u| u["email"] == email));

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            Some(&admin.token),
            Some(json!({ "name": "Kevin J. Smith", "role": "publisher" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["name"], "Kevin J. Smith");
    assert_eq!(body["data"]["role"], "publisher");

    let response = app
        .clone()
        .oneshot(json_request("DELETE", &uri, Some(&admin.token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true, "data": {} }));

    let response = app
        .oneshot(json_request("GET", &uri, Some(&admin.token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_demoting_admin_with_several_bootcamps_conflicts(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let owner = create_test_user(&pool, Role::Admin).await;
    create_test_bootcamp(&pool, &owner, 42.3362, -71.0709).await;
    create_test_bootcamp(&pool, &owner, 42.2793, -71.4162).await;
    let app = setup_test_app(pool.clone());
    let uri = format!("/api/v1/users/{}", owner.id);

    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, Some(&admin.token), Some(json!({ "role": "publisher" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let role: String = sqlx::query_scalar("SELECT role::TEXT FROM users WHERE id = $1")
        .bind(owner.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(role, "admin");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_demoted_admin_with_one_bootcamp_is_limited_to_it(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let owner = create_test_user(&pool, Role::Admin).await;
    create_test_bootcamp(&pool, &owner, 42.3362, -71.0709).await;
    let app = setup_test_app(pool.clone());

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/users/{}", owner.id),
            Some(&admin.token),
            Some(json!({ "role": "publisher" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let flagged: bool =
        sqlx::query_scalar("SELECT bool_or(owner_is_admin) FROM bootcamps WHERE user_id = $1")
            .bind(owner.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(!flagged);

    // a second bootcamp for the same owner now hits the one-per-publisher index
    let second = sqlx::query(
        "INSERT INTO bootcamps
            (id, user_id, owner_is_admin, name, slug, description, location_lat, location_lng)
         VALUES ($1, $2, false, 'Second Camp', 'second-camp', 'Another', 42.36, -71.06)",
    )
    .bind(BootcampId::new())
    .bind(owner.id)
    .execute(&pool)
    .await;
    assert!(second.is_err());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_user_cascades(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let publisher = create_test_user(&pool, Role::Publisher).await;
    let reviewer = create_test_user(&pool, Role::User).await;
    let other_owner = create_test_user(&pool, Role::Publisher).await;
    let owned = create_test_bootcamp(&pool, &publisher, 42.3362, -71.0709).await;
    let reviewed = create_test_bootcamp(&pool, &other_owner, 42.2793, -71.4162).await;
    let app = setup_test_app(pool.clone());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/bootcamps/{}/courses", owned),
            Some(&publisher.token),
            Some(json!({
                "title": "Data Science",
                "description": "Python and statistics",
                "weeks": 10,
                "tuition": 10000,
                "minimumSkill": "advanced"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for (bootcamp, rating) in [(owned, 4), (reviewed, 6)] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/v1/bootcamps/{}/reviews", bootcamp),
                Some(&reviewer.token),
                Some(json!({ "title": "Fine", "text": "It was fine", "rating": rating })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    assert_eq!(bootcamp_averages(&pool, reviewed).await.1, Some(6.0));

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/api/v1/users/{}", publisher.id),
            Some(&admin.token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM bootcamps WHERE id = $1", owned).await, 0);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM courses WHERE bootcamp_id = $1", owned).await, 0);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM reviews WHERE bootcamp_id = $1", owned).await, 0);

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/api/v1/users/{}", reviewer.id),
            Some(&admin.token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM reviews WHERE bootcamp_id = $1", reviewed).await, 0);
    assert_eq!(bootcamp_averages(&pool, reviewed).await.1, None);
}
