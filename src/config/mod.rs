//! Configuration
//!
//! A JSON file loaded and validated once at startup. Validation failures
//! stop the process before anything is served.

mod errors;
mod model;

pub use errors::{ConfigError, ConfigResult};
pub use model::{
    default_resources, AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, QueryConfig,
    ResourceConfig, ServerConfig, JWT_SECRET_ENV,
};
