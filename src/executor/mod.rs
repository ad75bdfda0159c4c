//! Query execution
//!
//! # Execution Flow
//!
//! 1. Bail out if the request is already canceled
//! 2. Hand the plan's predicates, order and window to the store
//! 3. Race the store call against cancellation and the statement timeout
//! 4. Build the page metadata from the store's unpaginated count
//!
//! No partial page is ever returned: an aborted store call is an error.

mod errors;
mod executor;
mod result;

pub use errors::{ExecutorError, ExecutorResult};
pub use executor::{QueryExecutor, DEFAULT_TIMEOUT};
pub use result::{last_page, PageResult};
