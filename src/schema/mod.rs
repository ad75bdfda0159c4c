//! Schema introspection for recordgate
//!
//! Filter and sort validation treat any field that is not a column of the
//! target entity as invalid input. The set of columns is read from a live
//! schema source on every request, never from a compiled model list.
//!
//! # Design Principles
//!
//! - Fresh per request: no cross-request schema cache
//! - Unknown entity is a deployment fault, not a client error
//! - Column sets are ordered so error messages and plans are deterministic

mod errors;
mod introspector;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use introspector::{SchemaIntrospector, StaticSchemaRegistry};
pub use types::SchemaDescriptor;
