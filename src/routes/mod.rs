use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

pub mod admin;

pub const ADMIN_PREFIX: &str = "/admin";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().merge(admin::router(state))
}
