use crate::value::Value;
use std::fmt;
use std::time::Duration;

/// Statement category, taken from the leading SQL keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    /// SELECT query
    Select,
    /// INSERT statement
    Insert,
    /// UPDATE statement
    Update,
    /// DELETE statement
    Delete,
    /// BEGIN / COMMIT / ROLLBACK
    Transaction,
    /// Anything else (DDL, pragmas)
    Other,
}

impl QueryType {
    /// Detect query type from the leading keyword of a SQL string.
    pub fn from_sql(sql: &str) -> Self {
        let keyword = sql
            .trim_start()
            .split(|c: char| c.is_whitespace() || c == '(' || c == ';')
            .next()
            .unwrap_or("");

        if keyword.eq_ignore_ascii_case("SELECT") {
            QueryType::Select
        } else if keyword.eq_ignore_ascii_case("INSERT") {
            QueryType::Insert
        } else if keyword.eq_ignore_ascii_case("UPDATE") {
            QueryType::Update
        } else if keyword.eq_ignore_ascii_case("DELETE") {
            QueryType::Delete
        } else if ["BEGIN", "COMMIT", "ROLLBACK"]
            .iter()
            .any(|k| keyword.eq_ignore_ascii_case(k))
        {
            QueryType::Transaction
        } else {
            QueryType::Other
        }
    }
}

/// Context information about the statement being executed.
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// The SQL statement sent to the executor.
    pub sql: String,
    /// Bound parameters, in placeholder order.
    pub params: Vec<Value>,
    pub query_type: QueryType,
    /// Engine operation that issued the statement (e.g. `insert`, `commit`).
    pub tag: Option<&'static str>,
}

impl QueryContext {
    pub fn new(sql: &str, params: &[Value]) -> Self {
        Self {
            sql: sql.to_string(),
            params: params.to_vec(),
            query_type: QueryType::from_sql(sql),
            tag: None,
        }
    }

    /// Add a tag to identify this statement.
    pub fn with_tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}

/// Error messages longer than this are cut before reaching monitors.
const MAX_ERROR_LEN: usize = 512;

/// Result of a statement execution for monitoring purposes.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Rows returned by a read.
    Rows(usize),
    /// Statement affected rows (for mutations).
    Affected(u64),
    /// Transaction boundary completed.
    Done,
    /// Statement failed with an error (truncated to 512 bytes).
    Error(String),
}

impl QueryResult {
    /// An error outcome; long messages are truncated to 512 bytes.
    pub fn error(msg: String) -> Self {
        if msg.len() > MAX_ERROR_LEN {
            Self::Error(format!("{}...", super::truncate_sql_bytes(&msg, MAX_ERROR_LEN)))
        } else {
            Self::Error(msg)
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Rows(n) => write!(f, "{n} rows"),
            QueryResult::Affected(n) => write!(f, "{n} affected"),
            QueryResult::Done => f.write_str("ok"),
            QueryResult::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// Trait for observing statement execution.
///
/// Monitors only observe: they cannot change or abort a statement.
pub trait QueryMonitor: Send + Sync {
    /// Called before a statement is sent to the executor.
    fn on_query_start(&self, _ctx: &QueryContext) {}

    /// Called once the executor returns, whatever the outcome.
    fn on_query_complete(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult);

    /// Called after `on_query_complete` when the statement exceeded the
    /// configured slow-query threshold.
    fn on_slow_query(&self, _ctx: &QueryContext, _duration: Duration) {}
}
