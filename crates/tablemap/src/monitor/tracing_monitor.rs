use super::clip_sql;
use super::types::{QueryContext, QueryMonitor, QueryResult};
use std::time::Duration;
use tracing::Level;

/// Reports statements as `tracing` events under the `tablemap.sql` target.
///
/// Each completed statement becomes one event carrying the engine operation
/// (`tag`), statement kind, parameter count, elapsed time and outcome. Failures
/// are raised to at least `WARN`; slow statements always log at `WARN`.
///
/// ```ignore
/// tracing_subscriber::fmt()
///     .with_env_filter("tablemap.sql=debug")
///     .init();
/// let querier = Querier::new(&db, Dialect::Sqlite)
///     .with_config(MonitorConfig::new().enable_monitoring())
///     .with_monitor(TracingMonitor::new());
/// ```
#[derive(Debug, Clone)]
pub struct TracingMonitor {
    /// Level for successful statements.
    pub level: Level,
    /// SQL longer than this many bytes is cut; `None` keeps it whole.
    pub max_sql_length: Option<usize>,
    /// Also emit an event when a statement starts.
    pub log_start: bool,
}

impl Default for TracingMonitor {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
            log_start: false,
        }
    }
}

impl TracingMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn log_start(mut self) -> Self {
        self.log_start = true;
        self
    }

    fn level_for(&self, result: &QueryResult) -> Level {
        // Lower `Level` values are more severe.
        if result.is_error() {
            self.level.min(Level::WARN)
        } else {
            self.level
        }
    }
}

// `tracing` macros need the level as a constant.
macro_rules! event_at {
    ($level:expr, $($rest:tt)*) => {
        match $level {
            Level::ERROR => tracing::error!($($rest)*),
            Level::WARN => tracing::warn!($($rest)*),
            Level::INFO => tracing::info!($($rest)*),
            Level::DEBUG => tracing::debug!($($rest)*),
            Level::TRACE => tracing::trace!($($rest)*),
        }
    };
}

impl QueryMonitor for TracingMonitor {
    fn on_query_start(&self, ctx: &QueryContext) {
        if !self.log_start {
            return;
        }
        let sql = clip_sql(&ctx.sql, self.max_sql_length);
        event_at!(
            self.level,
            target: "tablemap.sql",
            tag = ctx.tag.unwrap_or("-"),
            kind = ?ctx.query_type,
            params = ctx.param_count(),
            sql = %sql,
            "statement start",
        );
    }

    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        let sql = clip_sql(&ctx.sql, self.max_sql_length);
        event_at!(
            self.level_for(result),
            target: "tablemap.sql",
            tag = ctx.tag.unwrap_or("-"),
            kind = ?ctx.query_type,
            params = ctx.param_count(),
            elapsed = ?duration,
            outcome = %result,
            sql = %sql,
            "statement complete",
        );
    }

    fn on_slow_query(&self, ctx: &QueryContext, duration: Duration) {
        tracing::warn!(
            target: "tablemap.sql",
            tag = ctx.tag.unwrap_or("-"),
            kind = ?ctx.query_type,
            elapsed = ?duration,
            sql = %clip_sql(&ctx.sql, self.max_sql_length),
            "slow statement",
        );
    }
}
