//! SQLite support through `rusqlite`.
//!
//! [`SqliteExecutor`] owns one connection behind a mutex; statements run to
//! completion while the lock is held. Use [`SqliteExecutor::begin`] for a
//! transaction that rolls back if it is dropped unfinished.

use crate::client::{ExecResult, Executor, TransactionExecutor};
use crate::error::{OrmError, OrmResult};
use crate::row::Row;
use crate::value::Value;
use rusqlite::types::{ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{Connection, params_from_iter};
use std::path::Path;
use std::sync::Mutex;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

impl rusqlite::ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let out = match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Bool(v) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*v))),
            Value::Int(v) => ToSqlOutput::Owned(SqlValue::Integer(*v)),
            Value::Float(v) => ToSqlOutput::Owned(SqlValue::Real(*v)),
            Value::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
            Value::Bytes(v) => ToSqlOutput::Borrowed(ValueRef::Blob(v)),
            Value::Timestamp(v) => {
                ToSqlOutput::Owned(SqlValue::Text(v.format(TIMESTAMP_FORMAT).to_string()))
            }
            Value::Json(v) => ToSqlOutput::Owned(SqlValue::Text(v.to_string())),
            Value::Uuid(v) => ToSqlOutput::Owned(SqlValue::Text(v.to_string())),
        };
        Ok(out)
    }
}

fn from_sqlite(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Int(v),
        ValueRef::Real(v) => Value::Float(v),
        ValueRef::Text(v) => Value::Text(String::from_utf8_lossy(v).into_owned()),
        ValueRef::Blob(v) => Value::Bytes(v.to_vec()),
    }
}

fn run_execute(conn: &Connection, sql: &str, params: &[Value]) -> rusqlite::Result<ExecResult> {
    let mut stmt = conn.prepare_cached(sql)?;
    let affected = stmt.execute(params_from_iter(params.iter()))?;
    Ok(ExecResult::new(affected as u64).with_last_insert_id(conn.last_insert_rowid()))
}

fn run_query(conn: &Connection, sql: &str, params: &[Value]) -> rusqlite::Result<Vec<Row>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let columns: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|c| (*c).to_string())
        .collect();

    let mut rows = stmt.query(params_from_iter(params.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            values.push(from_sqlite(row.get_ref(idx)?));
        }
        out.push(Row::new(columns.clone(), values));
    }
    Ok(out)
}

/// An [`Executor`] over a single SQLite connection.
///
/// `last_insert_id` in [`ExecResult`] is the connection's most recent insert
/// rowid.
pub struct SqliteExecutor {
    conn: Mutex<Connection>,
}

impl SqliteExecutor {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> OrmResult<Self> {
        Ok(Self::from_connection(Connection::open(path)?))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> OrmResult<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Run one or more `;`-separated statements without parameters (DDL, pragmas).
    pub fn execute_batch(&self, sql: &str) -> OrmResult<()> {
        self.with_conn(|conn| conn.execute_batch(sql))
    }

    /// Start a transaction on this connection.
    ///
    /// Until it finishes, statements run through this executor directly are
    /// part of the transaction too.
    pub async fn begin(&self) -> OrmResult<SqliteTransaction<'_>> {
        self.execute_batch("BEGIN")?;
        Ok(SqliteTransaction {
            executor: self,
            done: false,
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> OrmResult<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| OrmError::Other("sqlite connection mutex poisoned".to_string()))?;
        Ok(f(&conn)?)
    }
}

impl Executor for SqliteExecutor {
    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        self.with_conn(|conn| run_execute(conn, sql, params))
    }

    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        self.with_conn(|conn| run_query(conn, sql, params))
    }
}

/// An open SQLite transaction.
///
/// Dropping it without [`commit`](TransactionExecutor::commit) or
/// [`rollback`](TransactionExecutor::rollback) rolls it back.
pub struct SqliteTransaction<'a> {
    executor: &'a SqliteExecutor,
    done: bool,
}

impl Executor for SqliteTransaction<'_> {
    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        self.executor.execute(sql, params).await
    }

    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        self.executor.query(sql, params).await
    }
}

impl TransactionExecutor for SqliteTransaction<'_> {
    async fn commit(mut self) -> OrmResult<()> {
        self.executor.execute_batch("COMMIT")?;
        self.done = true;
        Ok(())
    }

    async fn rollback(mut self) -> OrmResult<()> {
        self.executor.execute_batch("ROLLBACK")?;
        self.done = true;
        Ok(())
    }
}

impl Drop for SqliteTransaction<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        tracing::warn!(
            target: "tablemap",
            "SQLite transaction dropped without commit or rollback; rolling back"
        );
        if let Err(e) = self.executor.execute_batch("ROLLBACK") {
            tracing::warn!(target: "tablemap", error = %e, "rollback on drop failed");
        }
    }
}
