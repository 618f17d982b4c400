//! The mapping engine: record-level statements over an [`Executor`].
//!
//! A [`Querier`] pairs an executor with a [`Dialect`] and a [`QueryMonitor`].
//! It holds no per-record state; every operation builds its statement from the
//! record's descriptor, runs it, and interprets the outcome.
//!
//! # Example
//!
//! ```rust,ignore
//! use tablemap::{Dialect, Querier};
//!
//! let querier = Querier::new(&client, Dialect::Postgres);
//! let mut person = Person { id: 0, name: "Alice".into(), email: None };
//! querier.insert(&mut person).await?;   // person.id is now set
//! person.email = Some("alice@example.com".into());
//! querier.update(&mut person).await?;
//! querier.delete(&person).await?;
//! ```

mod commands;
mod selects;
pub(crate) mod statement;


use crate::client::{ExecResult, Executor};
use crate::dialect::Dialect;
use crate::error::{OrmError, OrmResult};
use crate::monitor::{MonitorConfig, NoopMonitor, QueryContext, QueryMonitor, QueryResult};
use crate::row::Row;
use crate::value::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Reports statements to a monitor when monitoring is enabled.
#[derive(Clone)]
pub(crate) struct Instrumentation {
    monitor: Arc<dyn QueryMonitor>,
    config: MonitorConfig,
}

impl Default for Instrumentation {
    fn default() -> Self {
        Self {
            monitor: Arc::new(NoopMonitor),
            config: MonitorConfig::default(),
        }
    }
}

impl Instrumentation {
    /// Await `future`, emitting start and complete events around it.
    pub(crate) async fn observed<T, F>(
        &self,
        ctx: &QueryContext,
        future: F,
        outcome: fn(&T) -> QueryResult,
    ) -> OrmResult<T>
    where
        F: Future<Output = OrmResult<T>> + Send,
    {
        if self.config.monitoring_enabled {
            self.monitor.on_query_start(ctx);
        }

        let start = Instant::now();
        let result = future.await;
        let duration = start.elapsed();

        if self.config.monitoring_enabled {
            let query_result = match &result {
                Ok(value) => outcome(value),
                Err(OrmError::NoRows) => QueryResult::Rows(0),
                Err(e) => QueryResult::error(e.to_string()),
            };
            self.monitor.on_query_complete(ctx, duration, &query_result);
            if self.config.is_slow(duration) {
                self.monitor.on_slow_query(ctx, duration);
            }
        }
        result
    }
}

/// Runs record-level statements through an executor.
///
/// Monitoring must be explicitly enabled via `MonitorConfig::enable_monitoring()`.
pub struct Querier<E> {
    pub(crate) executor: E,
    dialect: Dialect,
    pub(crate) instrumentation: Instrumentation,
}

impl<E> Querier<E> {
    /// Create a querier with no monitoring.
    pub fn new(executor: E, dialect: Dialect) -> Self {
        Self {
            executor,
            dialect,
            instrumentation: Instrumentation::default(),
        }
    }

    /// Set the monitor configuration.
    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.instrumentation.config = config;
        self
    }

    /// Set the statement monitor.
    pub fn with_monitor<M: QueryMonitor + 'static>(mut self, monitor: M) -> Self {
        self.instrumentation.monitor = Arc::new(monitor);
        self
    }

    /// Set the statement monitor from an Arc.
    pub fn with_monitor_arc(mut self, monitor: Arc<dyn QueryMonitor>) -> Self {
        self.instrumentation.monitor = monitor;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Get the current configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.instrumentation.config
    }

    /// Get a reference to the inner executor.
    pub fn inner(&self) -> &E {
        &self.executor
    }

    /// Get the inner executor, consuming this querier.
    pub fn into_inner(self) -> E {
        self.executor
    }
}

impl<E: Executor> Querier<E> {
    pub(crate) async fn exec_inner(
        &self,
        sql: &str,
        params: &[Value],
        tag: Option<&'static str>,
    ) -> OrmResult<ExecResult> {
        let ctx = context(sql, params, tag);
        self.instrumentation
            .observed(&ctx, self.executor.execute(sql, params), |res: &ExecResult| {
                QueryResult::Affected(res.rows_affected)
            })
            .await
    }

    pub(crate) async fn query_inner(
        &self,
        sql: &str,
        params: &[Value],
        tag: Option<&'static str>,
    ) -> OrmResult<Vec<Row>> {
        let ctx = context(sql, params, tag);
        self.instrumentation
            .observed(&ctx, self.executor.query(sql, params), |rows: &Vec<Row>| {
                QueryResult::Rows(rows.len())
            })
            .await
    }

    pub(crate) async fn query_one_inner(
        &self,
        sql: &str,
        params: &[Value],
        tag: Option<&'static str>,
    ) -> OrmResult<Row> {
        let ctx = context(sql, params, tag);
        self.instrumentation
            .observed(&ctx, self.executor.query_one(sql, params), |_: &Row| {
                QueryResult::Rows(1)
            })
            .await
    }
}

fn context(sql: &str, params: &[Value], tag: Option<&'static str>) -> QueryContext {
    let ctx = QueryContext::new(sql, params);
    match tag {
        Some(tag) => ctx.with_tag(tag),
        None => ctx,
    }
}

/// Raw statements run through a querier are reported to its monitor too.
impl<E: Executor> Executor for Querier<E> {
    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        self.exec_inner(sql, params, None).await
    }

    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        self.query_inner(sql, params, None).await
    }

    async fn query_one(&self, sql: &str, params: &[Value]) -> OrmResult<Row> {
        self.query_one_inner(sql, params, None).await
    }
}
