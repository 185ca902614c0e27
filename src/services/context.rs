use sea_orm::DatabaseConnection;

use crate::{
    admin::USER_ADMIN,
    config::defaults::DEFAULT_LIST_PER_PAGE,
    db::dao::DaoContext,
    services::user_admin_service::UserAdminService,
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
    list_per_page: u64,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
            list_per_page: DEFAULT_LIST_PER_PAGE as u64,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db).with_list_per_page(state.config.admin.list_per_page)
    }

    pub fn with_list_per_page(mut self, list_per_page: u64) -> Self {
        self.list_per_page = list_per_page;
        self
    }

    pub fn user_admin(&self) -> UserAdminService {
        UserAdminService::new(
            self.daos.user(),
            self.daos.address(),
            &USER_ADMIN,
            self.list_per_page,
        )
    }
}
