//! CLI command implementations
//!
//! Every command loads and validates the configuration first and refuses to
//! continue on any configuration error.

use std::io;
use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_json};
use crate::auth::{CallerIdentity, Role, TokenVerifier};
use crate::config::{AppConfig, ResourceConfig};
use crate::engine::QueryEngine;
use crate::http::{AppState, HttpServer};
use crate::observability::{init_logging, Event};
use crate::storage::SqliteStore;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a command on a fresh multi-threaded runtime
pub fn run_command(command: Command) -> CliResult<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::startup_failed(format!("Failed to start runtime: {}", e)))?;

    runtime.block_on(async move {
        match command {
            Command::Serve { config } => serve(&config).await,
            Command::Query {
                config,
                resource,
                caller_id,
                admin,
            } => {
                let role = if admin { Role::Admin } else { Role::User };
                query(&config, &resource, CallerIdentity::new(caller_id, role)).await
            }
            Command::Columns { config, resource } => columns(&config, &resource).await,
        }
    })
}

/// Start the HTTP server
pub async fn serve(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let verifier = TokenVerifier::new(config.jwt_secret()?);
    let engine = open_engine(&config).await?;

    let state = AppState::new(engine, verifier, &config.resources);
    HttpServer::new(config.server.clone(), state)
        .start()
        .await
        .map_err(|e| CliError::startup_failed(format!("HTTP server failed: {}", e)))
}

/// Read a request from stdin and print one page
pub async fn query(config_path: &Path, resource: &str, caller: CallerIdentity) -> CliResult<()> {
    let config = load_config(config_path)?;
    let table = resource_table(&config, resource)?.table.clone();
    let request = read_request(io::stdin().lock())?;

    let engine = open_engine(&config).await?;
    let page = engine
        .list(&caller, &table, request, &CancellationToken::new())
        .await?;

    write_json(io::stdout().lock(), &page)
}

/// Print the live columns of a resource
pub async fn columns(config_path: &Path, resource: &str) -> CliResult<()> {
    let config = load_config(config_path)?;
    let table = resource_table(&config, resource)?.table.clone();

    let engine = open_engine(&config).await?;
    let schema = engine.columns(&table).await?;

    write_json(
        io::stdout().lock(),
        &json!({
            "resource": resource,
            "table": schema.entity,
            "columns": schema.columns,
        }),
    )
}

fn load_config(path: &Path) -> CliResult<AppConfig> {
    let config = AppConfig::load(path)?;
    init_logging(&config.logging.level, config.logging.format);
    info!(
        event = %Event::ConfigLoaded,
        path = %path.display(),
        resources = config.resources.len(),
        "Configuration loaded"
    );
    Ok(config)
}

fn resource_table<'a>(config: &'a AppConfig, name: &str) -> CliResult<&'a ResourceConfig> {
    config
        .resource(name)
        .ok_or_else(|| CliError::config_error(format!("Unknown resource: '{}'", name)))
}

async fn open_engine(config: &AppConfig) -> CliResult<QueryEngine> {
    let store = SqliteStore::connect(&config.database.url, config.database.max_connections)
        .await
        .map_err(|e| CliError::startup_failed(format!("Failed to open database: {}", e)))?;

    Ok(QueryEngine::with_store(
        Arc::new(store),
        Arc::new(config.access_policy()),
        config.engine_settings(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliErrorCode;
    use std::io::Write;

    #[test]
    fn test_unknown_resource() {
        let config = AppConfig::new("sqlite::memory:");
        let err = resource_table(&config, "widgets").unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_load_config_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"database": {{"url": ""}}}}"#).unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[tokio::test]
    async fn test_serve_requires_secret() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"database": {{"url": "sqlite::memory:"}}}}"#).unwrap();

        if std::env::var(crate::config::JWT_SECRET_ENV).is_ok() {
            return;
        }
        let err = serve(file.path()).await.unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
