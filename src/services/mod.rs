mod context;
pub mod user_admin_service;

pub use context::ServiceContext;
pub use user_admin_service::{
    AddFormLayout, AddUserRequest, ChangeListPage, ChangeUserRequest, UserAdminService,
    UserDetail,
};
