//! The dynamic query-filter engine
//!
//! Wires schema introspection, access control, planning and execution into
//! one `list` call. Validation is eager: every error except cancellation and
//! storage failure is raised before the store is touched.

mod engine;
mod errors;

pub use engine::{EngineSettings, QueryEngine};
pub use errors::{QueryError, QueryResult, Severity};
