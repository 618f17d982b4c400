use super::clip_sql;
use super::types::{QueryContext, QueryMonitor, QueryResult, QueryType};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// A monitor that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMonitor;

impl QueryMonitor for NoopMonitor {
    fn on_query_complete(&self, _ctx: &QueryContext, _duration: Duration, _result: &QueryResult) {}
}

/// Writes one line per completed statement to stderr.
///
/// Lines look like `[tablemap] insert/Insert 1.2ms 1 affected | INSERT ... | params=2`.
/// With [`show_params`](Self::show_params) the bound values are printed instead
/// of their count.
#[derive(Debug, Clone)]
pub struct LoggingMonitor {
    /// Statements faster than this are not printed.
    pub min_duration: Option<Duration>,
    /// Truncate SQL longer than this many bytes.
    pub max_sql_length: Option<usize>,
    pub prefix: String,
    /// Print bound values rather than just their count.
    pub show_params: bool,
}

impl Default for LoggingMonitor {
    fn default() -> Self {
        Self {
            min_duration: None,
            max_sql_length: Some(200),
            prefix: "[tablemap]".to_string(),
            show_params: false,
        }
    }
}

impl LoggingMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip statements that finish faster than `duration`.
    pub fn min_duration(mut self, duration: Duration) -> Self {
        self.min_duration = Some(duration);
        self
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Print bound parameter values. They may contain sensitive data.
    pub fn show_params(mut self) -> Self {
        self.show_params = true;
        self
    }

    pub(crate) fn line(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) -> String {
        let params = if self.show_params {
            let rendered: Vec<String> = ctx.params.iter().map(ToString::to_string).collect();
            format!("params=[{}]", rendered.join(", "))
        } else {
            format!("params={}", ctx.param_count())
        };
        format!(
            "{} {}/{:?} {:?} {} | {} | {}",
            self.prefix,
            ctx.tag.unwrap_or("-"),
            ctx.query_type,
            duration,
            result,
            clip_sql(&ctx.sql, self.max_sql_length),
            params
        )
    }
}

impl QueryMonitor for LoggingMonitor {
    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        if self.min_duration.is_some_and(|min| duration < min) {
            return;
        }
        eprintln!("{}", self.line(ctx, duration, result));
    }

    fn on_slow_query(&self, ctx: &QueryContext, duration: Duration) {
        eprintln!(
            "{} slow {}/{:?} {:?} | {}",
            self.prefix,
            ctx.tag.unwrap_or("-"),
            ctx.query_type,
            duration,
            clip_sql(&ctx.sql, self.max_sql_length)
        );
    }
}

/// Counters collected by [`StatsMonitor`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryStats {
    /// Statements completed, failed ones included.
    pub total_queries: u64,
    pub failed_queries: u64,
    /// Sum of statement durations, saturating at `u64::MAX` nanoseconds.
    pub total_duration: Duration,
    pub select_count: u64,
    pub insert_count: u64,
    pub update_count: u64,
    pub delete_count: u64,
    /// COMMIT and ROLLBACK statements.
    pub transaction_count: u64,
    /// Rows reported by mutations, summed.
    pub rows_affected: u64,
    /// Reads that returned no row.
    pub empty_results: u64,
    pub max_duration: Duration,
    /// SQL of the statement that took `max_duration`.
    pub slowest_query: Option<String>,
}

impl QueryStats {
    fn record(&mut self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        self.total_queries += 1;
        self.total_duration = self
            .total_duration
            .checked_add(duration)
            .map_or(Duration::from_nanos(u64::MAX), |total| {
                total.min(Duration::from_nanos(u64::MAX))
            });

        match ctx.query_type {
            QueryType::Select => self.select_count += 1,
            QueryType::Insert => self.insert_count += 1,
            QueryType::Update => self.update_count += 1,
            QueryType::Delete => self.delete_count += 1,
            QueryType::Transaction => self.transaction_count += 1,
            QueryType::Other => {}
        }

        match result {
            QueryResult::Error(_) => self.failed_queries += 1,
            QueryResult::Affected(n) => self.rows_affected = self.rows_affected.saturating_add(*n),
            QueryResult::Rows(0) => self.empty_results += 1,
            QueryResult::Rows(_) | QueryResult::Done => {}
        }

        if duration > self.max_duration {
            self.max_duration = duration;
            self.slowest_query = Some(ctx.sql.clone());
        }
    }
}

/// Aggregates statement counts and timings in memory.
///
/// Share it through an `Arc` (see `Querier::with_monitor_arc`) to read the
/// numbers back while statements run.
#[derive(Debug, Default)]
pub struct StatsMonitor {
    stats: Mutex<QueryStats>,
}

impl StatsMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the counters so far.
    pub fn stats(&self) -> QueryStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn reset(&self) {
        *self.stats.lock().unwrap_or_else(PoisonError::into_inner) = QueryStats::default();
    }
}

impl QueryMonitor for StatsMonitor {
    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(ctx, duration, result);
    }
}

/// Forwards every event to each added monitor, in the order they were added.
#[derive(Default)]
pub struct CompositeMonitor {
    monitors: Vec<Arc<dyn QueryMonitor>>,
}

impl CompositeMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add<M: QueryMonitor + 'static>(self, monitor: M) -> Self {
        self.add_arc(Arc::new(monitor))
    }

    /// Add a monitor the caller keeps a handle to (e.g. a shared [`StatsMonitor`]).
    pub fn add_arc(mut self, monitor: Arc<dyn QueryMonitor>) -> Self {
        self.monitors.push(monitor);
        self
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl QueryMonitor for CompositeMonitor {
    fn on_query_start(&self, ctx: &QueryContext) {
        self.monitors.iter().for_each(|m| m.on_query_start(ctx));
    }

    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        self.monitors
            .iter()
            .for_each(|m| m.on_query_complete(ctx, duration, result));
    }

    fn on_slow_query(&self, ctx: &QueryContext, duration: Duration) {
        self.monitors.iter().for_each(|m| m.on_slow_query(ctx, duration));
    }
}
