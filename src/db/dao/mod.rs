pub mod address_dao;
pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod user_dao;

pub use address_dao::{AddressDao, AddressFields};
pub use base::{DaoBase, PaginatedResponse};
pub use base_traits::{HasCreatedAtColumn, HasIdActiveModel, TimestampedActiveModel};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use user_dao::{UserDao, UserListQuery};
