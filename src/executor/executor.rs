//! Query executor
//!
//! Runs a [`QueryPlan`] against the store and shapes the page. The store
//! call races the caller's cancellation token and the statement timeout;
//! losing the race drops the store future and yields `Canceled`.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::errors::{ExecutorError, ExecutorResult};
use super::result::PageResult;
use crate::planner::QueryPlan;
use crate::storage::{PageQuery, RecordStore, StoredPage};

/// Statement timeout used unless configured otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes query plans against a record store
#[derive(Clone)]
pub struct QueryExecutor {
    store: Arc<dyn RecordStore>,
    timeout: Option<Duration>,
}

impl QueryExecutor {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Set the statement timeout; `None` waits indefinitely
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Execute `plan`, returning one page of rows
    pub async fn execute(
        &self,
        plan: &QueryPlan,
        cancel: &CancellationToken,
    ) -> ExecutorResult<PageResult<Value>> {
        if cancel.is_cancelled() {
            return Err(ExecutorError::Canceled(
                "request canceled before execution".to_string(),
            ));
        }

        let stored = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(ExecutorError::Canceled("request canceled".to_string()));
            }
            result = self.fetch(PageQuery::from_plan(plan)) => result?,
        };

        Ok(PageResult::new(
            stored.rows,
            plan.page.page,
            stored.total,
            plan.page.limit,
        ))
    }

    async fn fetch(&self, query: PageQuery<'_>) -> ExecutorResult<StoredPage> {
        let fetch = self.store.fetch_page(query);

        let Some(timeout) = self.timeout else {
            return Ok(fetch.await?);
        };

        match tokio::time::timeout(timeout, fetch).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(ExecutorError::Canceled(format!(
                "statement timed out after {}ms",
                timeout.as_millis()
            ))),
        }
    }
}

impl std::fmt::Debug for QueryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExecutor")
            .field("backend", &self.store.backend())
            .field("timeout", &self.timeout)
            .finish()
    }
}
