pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: i64 = 8000;
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info,sea_orm=warn";
pub const DEFAULT_DB_MAX_CONNECTIONS: i64 = 10;
pub const DEFAULT_DB_MIN_IDLE: i64 = 2;
pub const DEFAULT_LIST_PER_PAGE: i64 = 100;
pub const MAX_LIST_PER_PAGE: u64 = 100;
