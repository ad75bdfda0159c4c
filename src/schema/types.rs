//! Schema descriptor types

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The set of valid column names for one entity, as seen by the live schema
/// at the time of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Entity (table) name
    pub entity: String,
    /// Column names in lexicographic order
    pub columns: BTreeSet<String>,
}

impl SchemaDescriptor {
    /// Create a descriptor from an entity name and its columns
    pub fn new<I, S>(entity: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entity: entity.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `name` is a column of this entity
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    /// Iterates the column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the entity has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_column() {
        let schema = SchemaDescriptor::new("invoices", ["id", "invoice_number", "user_id"]);

        assert!(schema.has_column("invoice_number"));
        assert!(!schema.has_column("__nonexistent"));
        assert!(!schema.has_column("Invoice_Number"));
    }

    #[test]
    fn test_columns_are_ordered_and_deduplicated() {
        let schema = SchemaDescriptor::new("t", ["b", "a", "b"]);

        assert_eq!(schema.column_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(schema.len(), 2);
    }
}
