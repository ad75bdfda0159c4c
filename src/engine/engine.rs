//! Query engine
//!
//! caller -> ownership predicate -> filter set -> compile -> plan -> execute.
//! The schema is re-read on every call and nothing is cached between calls.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::errors::{QueryResult, QueryError, Severity};
use crate::auth::{AccessControlPolicy, CallerIdentity};
use crate::executor::{PageResult, QueryExecutor, DEFAULT_TIMEOUT};
use crate::filter::BooleanCoercion;
use crate::observability::Event;
use crate::planner::{PaginationPolicy, QueryPlanner, QueryRequest};
use crate::schema::{SchemaDescriptor, SchemaIntrospector};
use crate::storage::RecordStore;

/// Engine tuning
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub pagination: PaginationPolicy,
    pub boolean_coercion: BooleanCoercion,
    /// Statement timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            pagination: PaginationPolicy::default(),
            boolean_coercion: BooleanCoercion::default(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

/// Dynamic query-filter engine with ownership scoping
#[derive(Clone)]
pub struct QueryEngine {
    introspector: Arc<dyn SchemaIntrospector>,
    policy: Arc<dyn AccessControlPolicy>,
    planner: QueryPlanner,
    executor: QueryExecutor,
}

impl QueryEngine {
    pub fn new(
        introspector: Arc<dyn SchemaIntrospector>,
        policy: Arc<dyn AccessControlPolicy>,
        store: Arc<dyn RecordStore>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            introspector,
            policy,
            planner: QueryPlanner::new(settings.pagination, settings.boolean_coercion),
            executor: QueryExecutor::new(store).with_timeout(settings.timeout),
        }
    }

    /// Build an engine over a backend that is also its own schema source
    pub fn with_store<S>(
        store: Arc<S>,
        policy: Arc<dyn AccessControlPolicy>,
        settings: EngineSettings,
    ) -> Self
    where
        S: RecordStore + SchemaIntrospector + 'static,
    {
        Self::new(store.clone(), policy, store, settings)
    }

    /// Live columns of `entity`
    pub async fn columns(&self, entity: &str) -> QueryResult<SchemaDescriptor> {
        self.introspector.columns(entity).await.map_err(|err| {
            let err = QueryError::from(err);
            report(entity, &err);
            err
        })
    }

    /// List one page of `entity` as seen by `caller`
    pub async fn list(
        &self,
        caller: &CallerIdentity,
        entity: &str,
        request: QueryRequest,
        cancel: &CancellationToken,
    ) -> QueryResult<PageResult<Value>> {
        let result = self.run(caller, entity, request, cancel).await;
        if let Err(err) = &result {
            report(entity, err);
        }
        result
    }

    async fn run(
        &self,
        caller: &CallerIdentity,
        entity: &str,
        request: QueryRequest,
        cancel: &CancellationToken,
    ) -> QueryResult<PageResult<Value>> {
        info!(
            event = %Event::QueryReceived,
            entity,
            caller_id = caller.id,
            role = %caller.role,
            filters = request.filters.len(),
            "List request received"
        );

        let schema = self.introspector.columns(entity).await?;

        let ownership = self.policy.resolve_ownership_predicate(caller, entity);
        match &ownership {
            Some(predicate) => debug!(
                event = %Event::ScopeApplied,
                entity,
                owner_column = %predicate.field,
                caller_id = caller.id,
                "Ownership predicate injected"
            ),
            None => debug!(
                event = %Event::ScopeBypassed,
                entity,
                role = %caller.role,
                "No ownership predicate"
            ),
        }

        let plan = self.planner.plan(&schema, request, ownership)?;
        debug!(event = %Event::QueryPlanned, plan = %plan, "Query planned");

        let page = self.executor.execute(&plan, cancel).await?;
        info!(
            event = %Event::QueryExecuted,
            entity,
            total = page.total,
            returned = page.data.len(),
            page = page.current_page,
            "Query executed"
        );

        Ok(page)
    }
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine")
            .field("planner", &self.planner)
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

fn report(entity: &str, err: &QueryError) {
    if err.is_canceled() {
        warn!(event = %Event::QueryCanceled, entity, error = %err, "Query canceled");
        return;
    }

    match err.severity() {
        Severity::Reject => warn!(
            event = %Event::QueryRejected,
            entity,
            code = err.code(),
            error = %err,
            "Query rejected"
        ),
        Severity::Error | Severity::Fatal => error!(
            event = %Event::ConfigurationFault,
            entity,
            code = err.code(),
            severity = %err.severity(),
            error = %err,
            "Query failed"
        ),
    }
}
