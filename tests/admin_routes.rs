use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use user_admin::{
    db::entities::{address, user},
    test_helpers::{test_router, user_model},
};

async fn json_response(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.expect("request should succeed");
    let status = response.status();
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("body should be json");
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

fn post_json(uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request should build")
}

fn empty_db() -> sea_orm::DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

#[tokio::test]
async fn index_lists_users_and_not_groups() {
    let (status, json) = json_response(test_router(empty_db()), get("/admin/")).await;

    assert_eq!(status, StatusCode::OK);
    let labels: Vec<_> = json["data"]
        .as_array()
        .expect("data should be a list")
        .iter()
        .map(|entry| entry["label"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(labels, ["users.user"]);
    assert_eq!(json["data"][0]["add_url"], "/admin/users/user/add/");
}

#[tokio::test]
async fn add_form_exposes_the_wide_fieldset_and_one_extra_address() {
    let (status, json) =
        json_response(test_router(empty_db()), get("/admin/users/user/add/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["data"]["fieldsets"][0]["fields"],
        json!(["email", "phone_number", "password1", "password2"])
    );
    assert_eq!(json["data"]["inlines"][0]["extra"], 1);
    assert_eq!(json["data"]["inlines"][0]["forms"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn add_with_mismatched_passwords_returns_field_errors() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let request = post_json(
        "/admin/users/user/add/",
        json!({
            "email": "ann@example.com",
            "password1": "Secret123",
            "password2": "Secret124"
        }),
    );

    let (status, json) = json_response(test_router(db), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert_eq!(json["message"], "Please correct the errors below.");
    assert_eq!(json["data"]["fields"]["password2"], json!(["Passwords don't match"]));
}

#[tokio::test]
async fn add_creates_the_user_and_hides_the_hash() {
    let saved = user_model("ann@example.com");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new(), vec![saved.clone()]])
        .append_query_results([Vec::<address::Model>::new()])
        .into_connection();
    let request = post_json(
        "/admin/users/user/add/",
        json!({
            "email": "ann@example.com",
            "password1": "Secret123",
            "password2": "Secret123",
            "addresses": [{}]
        }),
    );

    let (status, json) = json_response(test_router(db), request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["id"], saved.id.to_string());
    let body = json.to_string();
    assert!(!body.contains("Secret123"));
    assert!(!body.contains("password_hash"));
}

#[tokio::test]
async fn change_page_shows_password_summary() {
    let mut stored = user_model("ann@example.com");
    stored.password_hash = "!".to_string();
    let id = stored.id;
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[stored]])
        .append_query_results([Vec::<address::Model>::new()])
        .into_connection();

    let (status, json) = json_response(
        test_router(db),
        get(&format!("/admin/users/user/{id}/change/")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let password = &json["data"]["fieldsets"][0]["fields"]["password"];
    assert_eq!(password["state"], "not_set");
    assert_eq!(password["message"], "No password set.");
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let id = Uuid::new_v4();

    let (status, json) = json_response(
        test_router(db),
        get(&format!("/admin/users/user/{id}/change/")),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn password_reset_mismatch_is_rejected() {
    let stored = user_model("ann@example.com");
    let id = stored.id;
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[stored]])
        .into_connection();
    let request = post_json(
        &format!("/admin/users/user/{id}/password/"),
        json!({ "password1": "NewSecret1", "password2": "NewSecret2" }),
    );

    let (status, json) = json_response(test_router(db), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["data"]["fields"]["password2"], json!(["Passwords don't match"]));
}

#[tokio::test]
async fn delete_returns_the_removed_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let id = Uuid::new_v4();

    let (status, json) = json_response(
        test_router(db),
        post_json(&format!("/admin/users/user/{id}/delete/"), json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], id.to_string());
}

#[tokio::test]
async fn bad_changelist_parameters_use_the_json_envelope() {
    let (status, json) = json_response(
        test_router(empty_db()),
        get("/admin/users/user/?o=password_hash"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Cannot order by password_hash");

    let (status, json) = json_response(
        test_router(empty_db()),
        get("/admin/users/user/?p=not-a-number"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() {
    let (status, json) = json_response(
        test_router(empty_db()),
        get("/admin/users/user/not-a-uuid/change/"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}
