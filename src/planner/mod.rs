//! Query planning
//!
//! Turns a [`QueryRequest`] plus an optional ownership predicate into a
//! [`QueryPlan`]:
//!
//! 1. Filter Set Builder: ownership predicate first, then client filters
//! 2. Predicate Compiler: each descriptor checked against the live schema
//! 3. Sort/Paginate Planner: sort field checked, defaults applied, offset computed
//!
//! Planning never touches the store.

mod errors;
mod filter_set;
mod paginate;
mod plan;
mod request;

pub use errors::{PlannerError, PlannerResult};
pub use filter_set::{FilterSetBuilder, ScopedFilters};
pub use paginate::{
    OrderKey, PagePlan, PaginationPolicy, SortPlanner, DEFAULT_LIMIT, DEFAULT_MAX_LIMIT,
    DEFAULT_SORT_FIELD,
};
pub use plan::{QueryPlan, QueryPlanner};
pub use request::{QueryRequest, SortDirection, SortSpec};
