//! recordgate - owner-scoped dynamic filtering, sorting and pagination
//!
//! A client sends a declarative list request (typed filters, one sort key,
//! page and limit). The engine validates it against the live schema, prepends
//! the caller's ownership predicate and runs one page against the record store.

pub mod auth;
pub mod cli;
pub mod config;
pub mod engine;
pub mod executor;
pub mod filter;
pub mod http;
pub mod observability;
pub mod planner;
pub mod schema;
pub mod storage;

pub use engine::{EngineSettings, QueryEngine, QueryError, QueryResult};
