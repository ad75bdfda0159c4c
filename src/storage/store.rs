//! Storage backend contract

use async_trait::async_trait;
use serde_json::Value;

use super::errors::StorageResult;
use crate::filter::Predicate;
use crate::planner::{OrderKey, QueryPlan};

/// One page request against a backend
#[derive(Debug, Clone, Copy)]
pub struct PageQuery<'a> {
    pub entity: &'a str,
    /// Conjunctive, applied in order
    pub predicates: &'a [Predicate],
    pub order: &'a [OrderKey],
    pub offset: u64,
    pub limit: u32,
}

impl<'a> PageQuery<'a> {
    pub fn from_plan(plan: &'a QueryPlan) -> Self {
        Self {
            entity: &plan.entity,
            predicates: &plan.predicates,
            order: &plan.page.order,
            offset: plan.page.offset,
            limit: plan.page.limit,
        }
    }
}

/// Rows of one page plus the unpaginated match count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredPage {
    /// Rows matching every predicate, before offset/limit
    pub total: u64,
    /// JSON objects keyed by column name
    pub rows: Vec<Value>,
}

/// A relational store able to run conjunctive predicates with ordering,
/// offset/limit and a count.
///
/// Implementations must read `total` and `rows` from the same snapshot and
/// must not write.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_page(&self, query: PageQuery<'_>) -> StorageResult<StoredPage>;

    /// Short backend name used in logs
    fn backend(&self) -> &'static str;
}
