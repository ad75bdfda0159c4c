//! # HTTP Surface
//!
//! - `POST /api/{resource}/list`: one page of a configured resource, scoped
//!   to the bearer-token caller
//! - `GET /health`

mod errors;
mod routes;
mod server;

pub use errors::{ApiError, ErrorResponse};
pub use routes::{routes, AppState, Caller, HealthResponse};
pub use server::{build_router, HttpServer};
