use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    admin::{ChangeListParams, ModelAdminSpec, USER_ADMIN},
    auth::PasswordHashSummary,
    error::AppError,
    forms::AdminPasswordChangeInput,
    response::{ApiResult, JsonApiResponse},
    services::{
        AddFormLayout, AddUserRequest, ChangeListPage, ChangeUserRequest, ServiceContext,
        UserAdminService, UserDetail,
    },
    state::AppState,
};

use super::ADMIN_PREFIX;

#[derive(Debug, Serialize)]
pub struct ModelEntry {
    pub label: String,
    pub verbose_name: &'static str,
    pub changelist_url: String,
    pub add_url: String,
}

impl From<&ModelAdminSpec> for ModelEntry {
    fn from(spec: &ModelAdminSpec) -> Self {
        let base = format!("{ADMIN_PREFIX}/{}/{}", spec.app_label, spec.model_name);
        Self {
            label: spec.label(),
            verbose_name: spec.verbose_name,
            changelist_url: format!("{base}/"),
            add_url: format!("{base}/add/"),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/admin/", get(index))
        .route("/admin/users/user/", get(changelist))
        .route("/admin/users/user/add/", get(add_form).post(add_user))
        .route("/admin/users/user/{id}/change/", get(change_form).post(change_user))
        .route("/admin/users/user/{id}/password/", post(reset_password))
        .route("/admin/users/user/{id}/delete/", post(delete_user))
        .with_state(state)
}

/// The user pages answer only while the user admin is registered.
fn user_admin(state: &AppState) -> Result<UserAdminService, AppError> {
    let label = USER_ADMIN.label();
    if !state.site.is_registered(&label) {
        return Err(AppError::not_found(format!("Model is not registered: {label}")));
    }
    Ok(ServiceContext::from_state(state).user_admin())
}

async fn index(State(state): State<Arc<AppState>>) -> ApiResult<Vec<ModelEntry>> {
    JsonApiResponse::ok(state.site.registered().map(ModelEntry::from).collect())
}

async fn changelist(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChangeListParams>,
) -> ApiResult<ChangeListPage> {
    let page = user_admin(&state)?.changelist(&params).await?;
    JsonApiResponse::ok(page)
}

async fn add_form(State(state): State<Arc<AppState>>) -> ApiResult<AddFormLayout> {
    JsonApiResponse::ok(user_admin(&state)?.add_form())
}

async fn add_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddUserRequest>,
) -> ApiResult<UserDetail> {
    let detail = user_admin(&state)?.add_user(request).await?;
    JsonApiResponse::created("User created", detail)
}

async fn change_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<UserDetail> {
    JsonApiResponse::ok(user_admin(&state)?.user_detail(&id).await?)
}

async fn change_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangeUserRequest>,
) -> ApiResult<UserDetail> {
    JsonApiResponse::ok(user_admin(&state)?.change_user(&id, request).await?)
}

async fn reset_password(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<AdminPasswordChangeInput>,
) -> ApiResult<PasswordHashSummary> {
    let summary = user_admin(&state)?.reset_password(&id, input).await?;
    JsonApiResponse::with_status(
        StatusCode::OK,
        "Password changed successfully.",
        summary,
    )
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    let deleted = user_admin(&state)?.delete_user(&id).await?;
    JsonApiResponse::ok(serde_json::json!({ "id": deleted }))
}
