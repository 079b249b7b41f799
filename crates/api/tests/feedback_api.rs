//! Integration tests for `POST /api/feedback` and `GET /api/feedback/{id}`.

mod common;

use aerofeedback_db::repositories::FeedbackRepo;
use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{body_json, get, post_json};
use serde_json::json;
use sqlx::PgPool;

fn valid_body() -> serde_json::Value {
    json!({
        "name": "Jordan Smith",
        "phone": "5551234567",
        "email": "j@x.com",
        "rating": 5,
        "feedback_areas": ["Safety & Security"],
        "comments": "",
    })
}

// ---------------------------------------------------------------------------
// POST /api/feedback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn submit_persists_and_returns_record(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/feedback", valid_body()).await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Feedback submitted successfully");

    let data = &json["data"];
    assert_matches!(data["id"].as_i64(), Some(id) if id > 0);
    assert_eq!(data["name"], "Jordan Smith");
    assert_eq!(data["phone"], "5551234567");
    assert_eq!(data["email"], "j@x.com");
    assert_eq!(data["rating"], 5);
    assert_eq!(data["feedback_areas"], json!(["Safety & Security"]));
    assert_eq!(data["comments"], "");

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM airport_feedback")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submit_without_categories_or_comments_is_accepted(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({
        "name": "Jordan Smith",
        "phone": "5551234567",
        "email": "j@x.com",
        "rating": 3,
    });

    let response = post_json(app, "/api/feedback", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["feedback_areas"], json!([]));
    assert_eq!(json["data"]["comments"], "");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submit_rejects_out_of_range_rating(pool: PgPool) {
    let app = common::build_test_app(pool);
    let mut body = valid_body();
    body["rating"] = json!(7);

    let response = post_json(app, "/api/feedback", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("Rating 7"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submit_rejects_unknown_category(pool: PgPool) {
    let app = common::build_test_app(pool);
    let mut body = valid_body();
    body["feedback_areas"] = json!(["Parking"]);

    let response = post_json(app, "/api/feedback", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Parking"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submit_with_mistyped_rating_is_refused_before_validation(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let mut body = valid_body();
    body["rating"] = json!("five");

    let response = post_json(app, "/api/feedback", body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(FeedbackRepo::count(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submit_rejects_short_name(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let mut body = valid_body();
    body["name"] = json!("Al");

    let response = post_json(app, "/api/feedback", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM airport_feedback")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submit_stores_sanitized_phone(pool: PgPool) {
    let app = common::build_test_app(pool);
    let mut body = valid_body();
    body["phone"] = json!("(555) 123-4567");

    let response = post_json(app, "/api/feedback", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["phone"], "5551234567");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn storage_failure_returns_500_with_error_text(pool: PgPool) {
    sqlx::query("DROP TABLE airport_feedback")
        .execute(&pool)
        .await
        .unwrap();
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/feedback", valid_body()).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to save feedback to database");
}

// ---------------------------------------------------------------------------
// GET /api/feedback/{id}
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_returns_stored_record(pool: PgPool) {
    let app = common::build_test_app(pool);
    let created = body_json(post_json(app.clone(), "/api/feedback", valid_body()).await).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = get(app, &format!("/api/feedback/{id}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], id);
    assert_eq!(json["data"]["rating"], 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_missing_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/feedback/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}
