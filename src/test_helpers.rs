use std::sync::Arc;

use axum::{Router, middleware};
use chrono::{DateTime, FixedOffset, TimeZone};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{
    admin::{self, AdminSite},
    config::AppConfig,
    db::entities::{address, user},
    middleware::{catch_panic_layer, json_error_middleware},
    routes::router,
    state::AppState,
};

pub fn fixed_timestamp() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .and_then(|offset| offset.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single())
        .unwrap_or_default()
}

/// A stored account with a placeholder hash.
pub fn user_model(email: &str) -> user::Model {
    let now = fixed_timestamp();
    user::Model {
        id: Uuid::new_v4(),
        date_joined: now,
        updated_at: now,
        email: email.to_string(),
        first_name: "Ann".to_string(),
        last_name: "Smith".to_string(),
        phone_number: None,
        profile_picture: None,
        user_type: "customer".to_string(),
        is_active: true,
        is_staff: false,
        is_superuser: false,
        password_hash: "hash".to_string(),
        last_login: None,
    }
}

pub fn address_model(user_id: Uuid, city: &str) -> address::Model {
    let now = fixed_timestamp();
    address::Model {
        id: Uuid::new_v4(),
        created_at: now,
        updated_at: now,
        user_id,
        line1: "1 Canal St".to_string(),
        line2: None,
        city: city.to_string(),
        region: None,
        postal_code: "2611".to_string(),
        country: "NL".to_string(),
    }
}

/// Default config and a site that went through `admin::setup`.
pub fn test_state(db: DatabaseConnection) -> Arc<AppState> {
    let mut site = AdminSite::with_builtin_models();
    admin::setup(&mut site).unwrap_or_else(|err| panic!("admin setup failed: {err}"));
    AppState::new(AppConfig::default(), db, site)
}

/// The full router with the same middleware stack as the binary.
pub fn test_router(db: DatabaseConnection) -> Router {
    router(test_state(db))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
}
