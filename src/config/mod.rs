pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{AdminConfig, AppConfig, DatabaseConfig, GeneralConfig, LoggingConfig};
pub use envconfig::EnvConfig;
