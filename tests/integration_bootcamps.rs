mod common;

use std::io::Cursor;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    body_json, create_test_bootcamp, create_test_user, generate_unique_bootcamp_name,
    json_request, setup_test_app,
};
use devcamper::devcamper_models::{BootcampId, Role};
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

const BOUNDARY: &str = "devcamper-test-boundary";

fn bootcamp_payload() -> Value {
    json!({
        "name": generate_unique_bootcamp_name(),
        "description": "Full stack web development bootcamp",
        "website": "https://devworks.com",
        "email": "enroll@devworks.com",
        "address": "233 Bay State Rd Boston MA 02118",
        "careers": ["Web Development", "UI/UX"],
        "housing": true,
        "acceptGi": true
    })
}

fn multipart_request(uri: &str, token: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn png_bytes() -> Vec<u8> {
    let image = image::RgbImage::from_pixel(300, 200, image::Rgb([200, 40, 40]));
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

async fn count(pool: &PgPool, sql: &str, id: BootcampId) -> i64 {
    sqlx::query_scalar(sql).bind(id).fetch_one(pool).await.unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_publisher_may_publish_one_bootcamp(pool: PgPool) {
    let publisher = create_test_user(&pool, Role::Publisher).await;
    let app = setup_test_app(pool);

    let first = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/bootcamps",
            Some(&publisher.token),
            Some(bootcamp_payload()),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);
    let body = body_json(first).await;
    assert_eq!(body["data"]["user"], publisher.id.to_string());
    assert_eq!(body["data"]["location"]["zipcode"], "02118");
    assert_eq!(body["data"]["photo"], "no-photo.jpg");

    let second = app
        .oneshot(json_request(
            "POST",
            "/api/v1/bootcamps",
            Some(&publisher.token),
            Some(bootcamp_payload()),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(second).await["message"],
        format!(
            "The user with ID {} has already published a bootcamp",
            publisher.id
        )
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_may_publish_several_bootcamps(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    let app = setup_test_app(pool);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/bootcamps",
                Some(&admin.token),
                Some(bootcamp_payload()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_plain_user_cannot_publish(pool: PgPool) {
    let user = create_test_user(&pool, Role::User).await;
    let app = setup_test_app(pool);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/v1/bootcamps",
            Some(&user.token),
            Some(bootcamp_payload()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_only_owner_or_admin_may_modify(pool: PgPool) {
    let owner = create_test_user(&pool, Role::Publisher).await;
    let other = create_test_user(&pool, Role::Publisher).await;
    let admin = create_test_user(&pool, Role::Admin).await;
    let bootcamp = create_test_bootcamp(&pool, &owner, 42.3362, -71.0709).await;
    let app = setup_test_app(pool);
    let uri = format!("/api/v1/bootcamps/{}", bootcamp);

    let denied = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            Some(&other.token),
            Some(json!({ "housing": true })),
        ))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let allowed = app
        .oneshot(json_request(
            "PUT",
            &uri,
            Some(&admin.token),
            Some(json!({ "housing": true })),
        ))
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
    let body = body_json(allowed).await;
    assert_eq!(body["data"]["housing"], true);
    assert_eq!(body["data"]["user"], owner.id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_filters_select_and_paging(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    for cost in [3000.0, 8000.0, 12000.0] {
        let id = create_test_bootcamp(&pool, &admin, 42.3362, -71.0709).await;
        sqlx::query("UPDATE bootcamps SET average_cost = $2 WHERE id = $1")
            .bind(id)
            .bind(cost)
            .execute(&pool)
            .await
            .unwrap();
    }
    let app = setup_test_app(pool);

    let response = app
        .clone()
        .oneshot(json_request(
            "GET",
            "/api/v1/bootcamps?averageCost%5Blte%5D=10000&select=name,averageCost&sort=-averageCost",
            None,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["averageCost"], 8000.0);
    assert_eq!(body["data"][1]["averageCost"], 3000.0);
    assert!(body["data"][0].get("description").is_none());
    assert!(body["data"][0]["courses"].is_array());

    let response = app
        .clone()
        .oneshot(json_request("GET", "/api/v1/bootcamps?page=2&limit=2", None, None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["pagination"]["prev"], json!({ "page": 1, "limit": 2 }));
    assert!(body["pagination"].get("next").is_none());

    let response = app
        .oneshot(json_request("GET", "/api/v1/bootcamps?password=1", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_radius_search(pool: PgPool) {
    let admin = create_test_user(&pool, Role::Admin).await;
    // Boston, and Framingham about 19 miles west
    let near = create_test_bootcamp(&pool, &admin, 42.3505, -71.1054).await;
    create_test_bootcamp(&pool, &admin, 42.3011, -71.4350).await;
    let app = setup_test_app(pool);

    let response = app
        .clone()
        .oneshot(json_request("GET", "/api/v1/bootcamps/radius/02118/10", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["id"], near.to_string());

    let response = app
        .clone()
        .oneshot(json_request("GET", "/api/v1/bootcamps/radius/02118/30", None, None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["count"], 2);

    let unknown = app
        .oneshot(json_request("GET", "/api/v1/bootcamps/radius/99999/10", None, None))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_photo_upload(pool: PgPool) {
    let owner = create_test_user(&pool, Role::Publisher).await;
    let bootcamp = create_test_bootcamp(&pool, &owner, 42.3362, -71.0709).await;
    let app = setup_test_app(pool.clone());
    let uri = format!("/api/v1/bootcamps/{}/photo", bootcamp);

    let rejected = app
        .clone()
        .oneshot(multipart_request(&uri, &owner.token, "notes.txt", "text/plain", b"hello"))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(rejected).await["message"],
        "Please upload an image file"
    );

    let accepted = app
        .oneshot(multipart_request(&uri, &owner.token, "logo.png", "image/png", &png_bytes()))
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::OK);
    let expected = format!("photo_{}.png", bootcamp);
    assert_eq!(body_json(accepted).await["data"], expected);

    let stored: String = sqlx::query_scalar("SELECT photo FROM bootcamps WHERE id = $1")
        .bind(bootcamp)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, expected);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_removes_courses_and_reviews(pool: PgPool) {
    let owner = create_test_user(&pool, Role::Publisher).await;
    let reviewer = create_test_user(&pool, Role::User).await;
    let bootcamp = create_test_bootcamp(&pool, &owner, 42.3362, -71.0709).await;
    let app = setup_test_app(pool.clone());

    let course = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/bootcamps/{}/courses", bootcamp),
            Some(&owner.token),
            Some(json!({
                "title": "Front End Web Development",
                "description": "HTML, CSS and JavaScript",
                "weeks": 8,
                "tuition": 8000,
                "minimumSkill": "beginner"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(course.status(), StatusCode::OK);

    let review = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/bootcamps/{}/reviews", bootcamp),
            Some(&reviewer.token),
            Some(json!({ "title": "Great", "text": "Learned a lot", "rating": 9 })),
        ))
        .await
        .unwrap();
    assert_eq!(review.status(), StatusCode::CREATED);

    let response = app
        .oneshot(json_request(
            "DELETE",
            &format!("/api/v1/bootcamps/{}", bootcamp),
            Some(&owner.token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true, "data": {} }));

    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM courses WHERE bootcamp_id = $1", bootcamp).await,
        0
    );
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM reviews WHERE bootcamp_id = $1", bootcamp).await,
        0
    );
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM bootcamps WHERE id = $1", bootcamp).await,
        0
    );
}
