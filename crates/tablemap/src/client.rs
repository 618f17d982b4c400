//! The execution capability the engine runs statements through.

use crate::error::{OrmError, OrmResult};
use crate::row::Row;
use crate::value::Value;
use std::future::Future;

/// Outcome of a non-query statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecResult {
    /// Number of rows the statement affected.
    pub rows_affected: u64,
    /// Generated id reported by the driver, if it reports one.
    pub last_insert_id: Option<i64>,
}

impl ExecResult {
    pub fn new(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            last_insert_id: None,
        }
    }

    pub fn with_last_insert_id(mut self, id: i64) -> Self {
        self.last_insert_id = Some(id);
        self
    }
}

/// A trait that unifies connections, pooled clients and transactions.
///
/// Implementations must return driver errors unchanged (wrapped in the matching
/// [`OrmError`] variant); the engine never retries or reclassifies them.
pub trait Executor: Send + Sync {
    /// Execute a statement and return rows affected (and a generated id, if any).
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = OrmResult<ExecResult>> + Send;

    /// Execute a query and return all rows.
    fn query(&self, sql: &str, params: &[Value]) -> impl Future<Output = OrmResult<Vec<Row>>> + Send;

    /// Execute a query and return the **first** row.
    ///
    /// Semantics:
    /// - 0 rows: returns [`OrmError::NoRows`]
    /// - 1 or more rows: returns the first row
    fn query_one(&self, sql: &str, params: &[Value]) -> impl Future<Output = OrmResult<Row>> + Send {
        async move {
            let rows = self.query(sql, params).await?;
            rows.into_iter().next().ok_or(OrmError::NoRows)
        }
    }
}

/// An executor scoped to an open transaction.
///
/// Both methods consume the transaction: nothing can run on it afterwards.
pub trait TransactionExecutor: Executor + Sized {
    fn commit(self) -> impl Future<Output = OrmResult<()>> + Send;

    fn rollback(self) -> impl Future<Output = OrmResult<()>> + Send;
}

impl<E: Executor> Executor for &E {
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = OrmResult<ExecResult>> + Send {
        (**self).execute(sql, params)
    }

    fn query(&self, sql: &str, params: &[Value]) -> impl Future<Output = OrmResult<Vec<Row>>> + Send {
        (**self).query(sql, params)
    }

    fn query_one(&self, sql: &str, params: &[Value]) -> impl Future<Output = OrmResult<Row>> + Send {
        (**self).query_one(sql, params)
    }
}
