//! SQLite record store (sqlx)
//!
//! Columns are read from `pragma_table_info` on every call, so a migration
//! is visible to the next request. A page is read inside one transaction:
//! column list, count and rows all come from the same snapshot.

use std::str::FromStr;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};

use super::errors::{StorageError, StorageResult};
use super::sql;
use super::store::{PageQuery, RecordStore, StoredPage};
use crate::schema::{SchemaDescriptor, SchemaError, SchemaIntrospector, SchemaResult};

/// Record store backed by a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open a pool for `url`. In-memory databases are private to a
    /// connection, so they always get a single, never-recycled connection.
    pub async fn connect(url: &str, max_connections: u32) -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?;
        let max_connections = if is_in_memory(url) {
            1
        } else {
            max_connections.max(1)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        tracing::debug!(url, max_connections, "Opened SQLite pool");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Live column names in declaration order; empty if the table does not exist
async fn table_columns(conn: &mut SqliteConnection, entity: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT name FROM pragma_table_info(?) ORDER BY cid")
        .bind(entity)
        .fetch_all(conn)
        .await
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn fetch_page(&self, query: PageQuery<'_>) -> StorageResult<StoredPage> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("PRAGMA case_sensitive_like = ON")
            .execute(&mut *tx)
            .await?;

        let columns = table_columns(&mut tx, query.entity).await?;
        if columns.is_empty() {
            return Err(StorageError::UnknownEntity(query.entity.to_string()));
        }

        let mut count = sql::count_query(query.entity, query.predicates);
        let total: i64 = count.build_query_scalar().fetch_one(&mut *tx).await?;

        let mut page = sql::page_query(
            query.entity,
            &columns,
            query.predicates,
            query.order,
            query.offset,
            query.limit,
        );
        let encoded: Vec<String> = page.build_query_scalar().fetch_all(&mut *tx).await?;

        tx.rollback().await?;

        let rows = encoded
            .iter()
            .map(|row| serde_json::from_str::<Value>(row).map_err(|e| StorageError::decode(query.entity, e)))
            .collect::<StorageResult<Vec<_>>>()?;

        Ok(StoredPage {
            total: u64::try_from(total).unwrap_or_default(),
            rows,
        })
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

#[async_trait]
impl SchemaIntrospector for SqliteStore {
    async fn columns(&self, entity: &str) -> SchemaResult<SchemaDescriptor> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| SchemaError::introspection(entity, e))?;

        let columns = table_columns(&mut conn, entity)
            .await
            .map_err(|e| SchemaError::introspection(entity, e))?;

        if columns.is_empty() {
            return Err(SchemaError::UnknownEntity(entity.to_string()));
        }
        Ok(SchemaDescriptor::new(entity, columns))
    }
}
