//! Query plan assembly
//!
//! Everything is validated here, before the store is touched: a request
//! either produces a complete plan or fails without side effects.

use std::fmt;

use super::errors::{PlannerError, PlannerResult};
use super::filter_set::{FilterSetBuilder, ScopedFilters};
use super::paginate::{PagePlan, PaginationPolicy, SortPlanner};
use super::request::QueryRequest;
use crate::filter::{BooleanCoercion, FilterDescriptor, FilterError, Predicate, PredicateCompiler};
use crate::schema::SchemaDescriptor;

/// A validated, ready-to-execute query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub entity: String,
    /// Conjunctive predicates, ownership first
    pub predicates: Vec<Predicate>,
    /// Whether an ownership predicate leads `predicates`
    pub scoped: bool,
    pub page: PagePlan,
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entity)?;
        if !self.predicates.is_empty() {
            let clauses: Vec<String> = self.predicates.iter().map(ToString::to_string).collect();
            write!(f, " WHERE {}", clauses.join(" AND "))?;
        }
        if !self.page.order.is_empty() {
            let keys: Vec<String> = self
                .page
                .order
                .iter()
                .map(|key| format!("{} {}", key.field, key.direction))
                .collect();
            write!(f, " ORDER BY {}", keys.join(", "))?;
        }
        write!(f, " LIMIT {} OFFSET {}", self.page.limit, self.page.offset)
    }
}

/// Compiles filters and plans pagination against one schema snapshot
#[derive(Debug, Clone, Default)]
pub struct QueryPlanner {
    compiler: PredicateCompiler,
    sorter: SortPlanner,
}

impl QueryPlanner {
    pub fn new(policy: PaginationPolicy, boolean: BooleanCoercion) -> Self {
        Self {
            compiler: PredicateCompiler::new().with_boolean_coercion(boolean),
            sorter: SortPlanner::new(policy),
        }
    }

    pub fn policy(&self) -> &PaginationPolicy {
        self.sorter.policy()
    }

    /// Plan `request` for `schema.entity`, with `ownership` injected ahead of
    /// every client filter.
    pub fn plan(
        &self,
        schema: &SchemaDescriptor,
        request: QueryRequest,
        ownership: Option<FilterDescriptor>,
    ) -> PlannerResult<QueryPlan> {
        let QueryRequest {
            filters,
            sort,
            limit,
            page,
        } = request;

        let scoped = FilterSetBuilder::build(filters, ownership);
        let predicates = self.compile(schema, &scoped)?;
        let page = self.sorter.plan(sort.as_ref(), page, limit, schema)?;

        Ok(QueryPlan {
            entity: schema.entity.clone(),
            predicates,
            scoped: scoped.is_scoped(),
            page,
        })
    }

    fn compile(&self, schema: &SchemaDescriptor, scoped: &ScopedFilters) -> PlannerResult<Vec<Predicate>> {
        let mut predicates = Vec::with_capacity(scoped.len());

        if let Some(ownership) = scoped.ownership() {
            // A bad ownership rule is a deployment fault, never a client one.
            let predicate = self.compiler.compile(ownership, schema).map_err(|err| match err {
                FilterError::InvalidFilterField(column) => PlannerError::OwnershipColumnMissing {
                    entity: schema.entity.clone(),
                    column,
                },
                other => PlannerError::Filter(other),
            })?;
            predicates.push(predicate);
        }

        predicates.extend(self.compiler.compile_all(scoped.client_filters(), schema)?);
        Ok(predicates)
    }
}
