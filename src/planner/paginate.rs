//! Sort/Paginate Planner
//!
//! Validates the sort field, fills in defaults, and turns page/limit into an
//! offset. When a default sort key exists it is appended as a tie-break, so
//! pages stay stable across repeated requests even on non-unique sort keys.

use super::errors::{PlannerError, PlannerResult};
use super::request::{SortDirection, SortSpec};
use crate::schema::SchemaDescriptor;

/// Page size used when the request carries none
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page size accepted unless configured otherwise
pub const DEFAULT_MAX_LIMIT: u32 = 1000;

/// Column used for default ordering and tie-breaks
pub const DEFAULT_SORT_FIELD: &str = "id";

/// Pagination knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationPolicy {
    pub default_limit: u32,
    /// `None` disables the cap
    pub max_limit: Option<u32>,
    pub default_sort_field: Option<String>,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: Some(DEFAULT_MAX_LIMIT),
            default_sort_field: Some(DEFAULT_SORT_FIELD.to_string()),
        }
    }
}

/// One ORDER BY term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderKey {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Resolved ordering and window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePlan {
    pub order: Vec<OrderKey>,
    /// 1-based
    pub page: u32,
    pub limit: u32,
    pub offset: u64,
}

/// Plans ordering and pagination
#[derive(Debug, Clone, Default)]
pub struct SortPlanner {
    policy: PaginationPolicy,
}

impl SortPlanner {
    pub fn new(policy: PaginationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PaginationPolicy {
        &self.policy
    }

    pub fn plan(
        &self,
        sort: Option<&SortSpec>,
        page: Option<i64>,
        limit: Option<i64>,
        schema: &SchemaDescriptor,
    ) -> PlannerResult<PagePlan> {
        let order = self.order(sort, schema)?;
        let limit = self.limit(limit)?;
        let page = page
            .filter(|p| *p > 0)
            .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
            .unwrap_or(1);
        let offset = u64::from(page - 1).saturating_mul(u64::from(limit));

        Ok(PagePlan {
            order,
            page,
            limit,
            offset,
        })
    }

    fn order(&self, sort: Option<&SortSpec>, schema: &SchemaDescriptor) -> PlannerResult<Vec<OrderKey>> {
        let tie_break = self
            .policy
            .default_sort_field
            .as_deref()
            .filter(|field| schema.has_column(field));

        let mut order = Vec::with_capacity(2);
        if let Some(sort) = sort {
            if !schema.has_column(&sort.field) {
                return Err(PlannerError::InvalidSortField(sort.field.clone()));
            }
            order.push(OrderKey::new(sort.field.clone(), sort.direction));
        }

        if let Some(key) = tie_break {
            if order.iter().all(|o| o.field != key) {
                order.push(OrderKey::new(key, SortDirection::Asc));
            }
        }

        Ok(order)
    }

    fn limit(&self, requested: Option<i64>) -> PlannerResult<u32> {
        let Some(requested) = requested.filter(|l| *l > 0) else {
            return Ok(self.policy.default_limit);
        };

        if let Some(max) = self.policy.max_limit {
            if requested > i64::from(max) {
                return Err(PlannerError::LimitExceeded { requested, max });
            }
        }

        Ok(u32::try_from(requested).unwrap_or(u32::MAX))
    }
}
