//! Statement monitoring for the mapping engine.
//!
//! Every statement the engine issues (including `COMMIT`/`ROLLBACK`) is reported
//! to a [`QueryMonitor`] before and after it runs. Monitors observe only; they
//! never change what is executed.
//!
//! # Example
//!
//! ```rust,ignore
//! use tablemap::monitor::{MonitorConfig, TracingMonitor};
//! use std::time::Duration;
//!
//! let config = MonitorConfig::new()
//!     .with_slow_query_threshold(Duration::from_millis(200))
//!     .enable_monitoring();
//!
//! let querier = Querier::new(executor, Dialect::Sqlite)
//!     .with_config(config)
//!     .with_monitor(TracingMonitor::new());
//! ```

mod config;
mod monitors;
mod tracing_monitor;
mod types;


pub use config::MonitorConfig;
pub use monitors::{CompositeMonitor, LoggingMonitor, NoopMonitor, QueryStats, StatsMonitor};
pub use tracing_monitor::TracingMonitor;
pub use types::{QueryContext, QueryMonitor, QueryResult, QueryType};

use std::borrow::Cow;

/// `sql` cut to at most `max` bytes (plus `...`), on a char boundary.
pub(crate) fn clip_sql(sql: &str, max: Option<usize>) -> Cow<'_, str> {
    match max {
        Some(max) if sql.len() > max => Cow::Owned(format!("{}...", truncate_sql_bytes(sql, max))),
        _ => Cow::Borrowed(sql),
    }
}

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
