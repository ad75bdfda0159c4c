//! Configuration file structure
//!
//! ```json
//! {
//!   "server":   { "host": "0.0.0.0", "port": 8080, "cors_origins": [] },
//!   "database": { "url": "sqlite://recordgate.db", "max_connections": 5 },
//!   "auth":     { "jwt_secret": "..." },
//!   "query":    { "default_limit": 10, "max_limit": 1000, "default_sort_field": "id",
//!                 "strict_boolean": true, "timeout_ms": 30000 },
//!   "logging":  { "level": "info", "format": "json" },
//!   "resources": [ { "name": "invoice", "table": "invoices",
//!                    "access": { "type": "owned", "owner_column": "user_id" } } ]
//! }
//! ```
//!
//! Only `database.url` is required. `resources` defaults to the user,
//! tax-profile and invoice resources.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigResult};
use crate::auth::{AccessRule, OwnershipPolicy};
use crate::engine::EngineSettings;
use crate::filter::BooleanCoercion;
use crate::observability::LogFormat;
use crate::planner::{PaginationPolicy, DEFAULT_LIMIT, DEFAULT_MAX_LIMIT, DEFAULT_SORT_FIELD};

/// Environment variable overriding `auth.jwt_secret`
pub const JWT_SECRET_ENV: &str = "RECORDGATE_JWT_SECRET";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default = "default_resources")]
    pub resources: Vec<ResourceConfig>,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty disables CORS headers
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Record store connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx SQLite URL, e.g. `sqlite://data.db` or `sqlite::memory:`
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

/// Bearer-token verification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret; `RECORDGATE_JWT_SECRET` takes precedence
    #[serde(default, skip_serializing)]
    pub jwt_secret: Option<String>,
}

/// Query engine tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// `null` disables the cap
    #[serde(default = "default_max_limit")]
    pub max_limit: Option<u32>,

    /// Default order and tie-break column; `null` disables both
    #[serde(default = "default_sort_field")]
    pub default_sort_field: Option<String>,

    /// Reject unparsable boolean filter values instead of reading them as NULL
    #[serde(default = "default_strict_boolean")]
    pub strict_boolean: bool,

    /// Statement timeout in milliseconds; `null` disables it
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: Option<u64>,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_max_limit() -> Option<u32> {
    Some(DEFAULT_MAX_LIMIT)
}

fn default_sort_field() -> Option<String> {
    Some(DEFAULT_SORT_FIELD.to_string())
}

fn default_strict_boolean() -> bool {
    true
}

fn default_timeout_ms() -> Option<u64> {
    Some(30_000)
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            default_sort_field: default_sort_field(),
            strict_boolean: default_strict_boolean(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Log output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `recordgate=debug`
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// A listable resource: route name, backing table, ownership rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Route segment in `/api/{name}/list`
    pub name: String,

    pub table: String,

    #[serde(default)]
    pub access: AccessRule,
}

impl ResourceConfig {
    pub fn new(name: &str, table: &str, access: AccessRule) -> Self {
        Self {
            name: name.to_string(),
            table: table.to_string(),
            access,
        }
    }
}

/// Users, tax profiles and invoices. A plain user lists only their own user
/// row.
pub fn default_resources() -> Vec<ResourceConfig> {
    vec![
        ResourceConfig::new("user", "users", AccessRule::owned("id")),
        ResourceConfig::new("tax-profile", "tax_profiles", AccessRule::owned("user_id")),
        ResourceConfig::new("invoice", "invoices", AccessRule::owned("user_id")),
    ]
}

impl AppConfig {
    /// Configuration with defaults everywhere except the database URL
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: database_url.into(),
                max_connections: default_max_connections(),
            },
            auth: AuthConfig::default(),
            query: QueryConfig::default(),
            logging: LoggingConfig::default(),
            resources: default_resources(),
        }
    }

    /// Load, apply environment overrides, and validate
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_json(&content)?;
        if let Ok(secret) = std::env::var(JWT_SECRET_ENV) {
            config.auth.jwt_secret = Some(secret);
        }
        config.validate()?;

        Ok(config)
    }

    /// Parse without environment overrides or validation
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::invalid("database.url must not be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::invalid("database.max_connections must be > 0"));
        }

        let query = &self.query;
        if query.default_limit == 0 {
            return Err(ConfigError::invalid("query.default_limit must be > 0"));
        }
        if let Some(max) = query.max_limit {
            if max == 0 {
                return Err(ConfigError::invalid("query.max_limit must be > 0 or null"));
            }
            if query.default_limit > max {
                return Err(ConfigError::invalid(format!(
                    "query.default_limit ({}) exceeds query.max_limit ({max})",
                    query.default_limit
                )));
            }
        }
        if query.timeout_ms == Some(0) {
            return Err(ConfigError::invalid("query.timeout_ms must be > 0 or null"));
        }
        if query.default_sort_field.as_deref().is_some_and(|f| f.trim().is_empty()) {
            return Err(ConfigError::invalid("query.default_sort_field must not be empty"));
        }

        self.validate_resources()
    }

    fn validate_resources(&self) -> ConfigResult<()> {
        let mut names = HashSet::new();
        let mut rules: HashMap<&str, &AccessRule> = HashMap::new();

        for resource in &self.resources {
            if resource.name.trim().is_empty() || resource.name.contains('/') {
                return Err(ConfigError::invalid(format!(
                    "Invalid resource name: '{}'",
                    resource.name
                )));
            }
            if resource.table.trim().is_empty() {
                return Err(ConfigError::invalid(format!(
                    "Resource '{}' has no table",
                    resource.name
                )));
            }
            if resource.access.owner_column().is_some_and(|c| c.trim().is_empty()) {
                return Err(ConfigError::invalid(format!(
                    "Resource '{}' has an empty owner_column",
                    resource.name
                )));
            }
            if !names.insert(resource.name.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "Duplicate resource name: '{}'",
                    resource.name
                )));
            }

            // Rules are enforced per table, so aliases must agree.
            if let Some(existing) = rules.insert(&resource.table, &resource.access) {
                if existing != &resource.access {
                    return Err(ConfigError::invalid(format!(
                        "Conflicting access rules for table '{}'",
                        resource.table
                    )));
                }
            }
        }
        Ok(())
    }

    /// Look up a resource by route name
    pub fn resource(&self, name: &str) -> Option<&ResourceConfig> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// The HS256 secret, required to serve HTTP
    pub fn jwt_secret(&self) -> ConfigResult<&str> {
        self.auth
            .jwt_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ConfigError::invalid(format!(
                    "auth.jwt_secret (or {JWT_SECRET_ENV}) is required to serve"
                ))
            })
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            pagination: PaginationPolicy {
                default_limit: self.query.default_limit,
                max_limit: self.query.max_limit,
                default_sort_field: self.query.default_sort_field.clone(),
            },
            boolean_coercion: if self.query.strict_boolean {
                BooleanCoercion::Strict
            } else {
                BooleanCoercion::Lenient
            },
            timeout: self.query.timeout_ms.map(Duration::from_millis),
        }
    }

    /// Ownership rules keyed by table
    pub fn access_policy(&self) -> OwnershipPolicy {
        self.resources
            .iter()
            .fold(OwnershipPolicy::new(), |policy, resource| {
                policy.with_rule(&resource.table, resource.access.clone())
            })
    }
}
