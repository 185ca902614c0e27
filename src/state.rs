use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{admin::AdminSite, config::AppConfig};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub site: Arc<AdminSite>,
}

impl AppState {
    /// `site` is expected to have gone through `admin::setup` already.
    pub fn new(config: AppConfig, db: DatabaseConnection, site: AdminSite) -> Arc<Self> {
        Arc::new(Self {
            config,
            db,
            site: Arc::new(site),
        })
    }
}
