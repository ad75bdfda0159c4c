//! In-memory record store
//!
//! Tables are ordered column lists plus JSON object rows. Columns can be
//! added or dropped at runtime, which makes schema drift observable through
//! [`SchemaIntrospector`].

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::errors::{StorageError, StorageResult};
use super::matcher::RowMatcher;
use super::sorter::RowSorter;
use super::store::{PageQuery, RecordStore, StoredPage};
use crate::schema::{SchemaDescriptor, SchemaError, SchemaIntrospector, SchemaResult};

#[derive(Debug, Default)]
struct Table {
    columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

/// Record store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or replace) a table with the given columns
    pub fn create_table<I, S>(&self, name: &str, columns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = Table {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        };
        self.write().insert(name.to_string(), table);
    }

    /// Insert one row. Keys must be known columns; absent columns are NULL.
    pub fn insert(&self, table: &str, row: Value) -> StorageResult<()> {
        let Value::Object(fields) = row else {
            return Err(StorageError::invalid_row(table, "row must be a JSON object"));
        };

        let mut tables = self.write();
        let target = tables
            .get_mut(table)
            .ok_or_else(|| StorageError::UnknownEntity(table.to_string()))?;

        if let Some(unknown) = fields.keys().find(|k| !target.columns.contains(*k)) {
            return Err(StorageError::invalid_row(
                table,
                format!("unknown column '{unknown}'"),
            ));
        }

        let mut stored = Map::with_capacity(target.columns.len());
        for column in &target.columns {
            let value = fields.get(column).cloned().unwrap_or(Value::Null);
            stored.insert(column.clone(), value);
        }
        target.rows.push(stored);
        Ok(())
    }

    pub fn insert_many<I>(&self, table: &str, rows: I) -> StorageResult<()>
    where
        I: IntoIterator<Item = Value>,
    {
        rows.into_iter().try_for_each(|row| self.insert(table, row))
    }

    /// Add a column; existing rows get NULL
    pub fn add_column(&self, table: &str, column: &str) -> StorageResult<()> {
        let mut tables = self.write();
        let target = tables
            .get_mut(table)
            .ok_or_else(|| StorageError::UnknownEntity(table.to_string()))?;

        if !target.columns.iter().any(|c| c == column) {
            target.columns.push(column.to_string());
            for row in &mut target.rows {
                row.insert(column.to_string(), Value::Null);
            }
        }
        Ok(())
    }

    /// Drop a column and its values
    pub fn drop_column(&self, table: &str, column: &str) -> StorageResult<()> {
        let mut tables = self.write();
        let target = tables
            .get_mut(table)
            .ok_or_else(|| StorageError::UnknownEntity(table.to_string()))?;

        target.columns.retain(|c| c != column);
        for row in &mut target.rows {
            row.remove(column);
        }
        Ok(())
    }

    /// Number of rows in `table`, or `None` if it does not exist
    pub fn row_count(&self, table: &str) -> Option<usize> {
        self.read().get(table).map(|t| t.rows.len())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Table>> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Table>> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_page(&self, query: PageQuery<'_>) -> StorageResult<StoredPage> {
        // Count and page come from the same read guard.
        let tables = self.read();
        let table = tables
            .get(query.entity)
            .ok_or_else(|| StorageError::UnknownEntity(query.entity.to_string()))?;

        let mut matched: Vec<Value> = table
            .rows
            .iter()
            .map(|row| Value::Object(row.clone()))
            .filter(|row| RowMatcher::matches(row, query.predicates))
            .collect();
        drop(tables);

        RowSorter::sort(&mut matched, query.order);

        let total = matched.len() as u64;
        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let rows = matched
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .collect();

        Ok(StoredPage { total, rows })
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl SchemaIntrospector for MemoryStore {
    async fn columns(&self, entity: &str) -> SchemaResult<SchemaDescriptor> {
        self.read()
            .get(entity)
            .map(|table| SchemaDescriptor::new(entity, table.columns.iter().cloned()))
            .ok_or_else(|| SchemaError::UnknownEntity(entity.to_string()))
    }
}
