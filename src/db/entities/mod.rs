#[allow(unused_imports)]
pub mod prelude {
    pub use super::address::Entity as Address;
    pub use super::user::Entity as User;
}

pub mod address;
pub mod user;
