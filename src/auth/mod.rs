pub mod password;
mod types;

pub use password::PasswordHashSummary;
pub use types::UserType;
