//! Schema introspection sources

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::errors::{SchemaError, SchemaResult};
use super::types::SchemaDescriptor;

/// Source of the live column set for an entity.
///
/// Implementations must reflect the schema as it is at call time. Callers
/// invoke this once per request and never cache the result.
#[async_trait]
pub trait SchemaIntrospector: Send + Sync {
    /// Returns the columns of `entity`, or `SchemaError::UnknownEntity`
    async fn columns(&self, entity: &str) -> SchemaResult<SchemaDescriptor>;
}

/// Registry of entity schemas held in memory.
///
/// Entries are replaced wholesale when a migration changes an entity, so a
/// lookup always sees either the old or the new column set.
#[derive(Debug, Default)]
pub struct StaticSchemaRegistry {
    entities: RwLock<HashMap<String, SchemaDescriptor>>,
}

impl StaticSchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity (builder style)
    pub fn with_entity<I, S>(self, entity: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register(SchemaDescriptor::new(entity, columns));
        self
    }

    /// Register or replace an entity's schema
    pub fn register(&self, schema: SchemaDescriptor) {
        self.entities
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(schema.entity.clone(), schema);
    }

    /// Remove an entity
    pub fn remove(&self, entity: &str) -> Option<SchemaDescriptor> {
        self.entities
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(entity)
    }
}

#[async_trait]
impl SchemaIntrospector for StaticSchemaRegistry {
    async fn columns(&self, entity: &str) -> SchemaResult<SchemaDescriptor> {
        self.entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(entity)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownEntity(entity.to_string()))
    }
}
