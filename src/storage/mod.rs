//! Record storage backends
//!
//! The executor sees storage only through [`RecordStore`]: run conjunctive
//! predicates with ordering and offset/limit, and count the matches, from a
//! single consistent read.
//!
//! Two backends:
//! - [`MemoryStore`]: JSON rows in process memory, predicates evaluated in Rust
//! - [`SqliteStore`]: sqlx over SQLite, predicates rendered to parameterized SQL
//!
//! Both also implement [`crate::schema::SchemaIntrospector`], so the column set
//! used for validation is the one the backend actually has.

mod errors;
mod matcher;
mod memory;
mod sorter;
mod sql;
mod sqlite;
mod store;

pub use errors::{StorageError, StorageResult};
pub use matcher::RowMatcher;
pub use memory::MemoryStore;
pub use sorter::RowSorter;
pub use sqlite::SqliteStore;
pub use store::{PageQuery, RecordStore, StoredPage};
