//! Postgres support through `tokio-postgres` (and `deadpool-postgres` with the
//! `pool` feature).
//!
//! [`Value`] implements `ToSql`/`FromSql`, so parameters bind to whatever type
//! the server infers for each placeholder. Integers are narrowed with a range
//! check for `int2`/`int4` columns.

use crate::client::{ExecResult, Executor, TransactionExecutor};
use crate::error::{OrmError, OrmResult};
use crate::row::Row;
use crate::value::Value;
use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::error::Error;
use tokio_postgres::types::{FromSql, IsNull, ToSql, Type};

type BoxError = Box<dyn Error + Sync + Send>;

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql_checked(ty, out),
            Value::Int(v) => match *ty {
                Type::INT2 => i16::try_from(*v)?.to_sql_checked(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql_checked(ty, out),
                Type::OID => u32::try_from(*v)?.to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Float(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Text(v) => v.to_sql_checked(ty, out),
            Value::Bytes(v) => v.to_sql_checked(ty, out),
            Value::Timestamp(v) => match *ty {
                Type::TIMESTAMPTZ => v.and_utc().to_sql_checked(ty, out),
                Type::DATE => v.date().to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Json(v) => v.to_sql_checked(ty, out),
            Value::Uuid(v) => v.to_sql_checked(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

impl<'a> FromSql<'a> for Value {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, BoxError> {
        let value = match *ty {
            Type::BOOL => Value::Bool(bool::from_sql(ty, raw)?),
            Type::INT2 => Value::Int(i16::from_sql(ty, raw)?.into()),
            Type::INT4 => Value::Int(i32::from_sql(ty, raw)?.into()),
            Type::INT8 => Value::Int(i64::from_sql(ty, raw)?),
            Type::OID => Value::Int(u32::from_sql(ty, raw)?.into()),
            Type::FLOAT4 => Value::Float(f32::from_sql(ty, raw)?.into()),
            Type::FLOAT8 => Value::Float(f64::from_sql(ty, raw)?),
            Type::BYTEA => Value::Bytes(Vec::<u8>::from_sql(ty, raw)?),
            Type::TIMESTAMP => Value::Timestamp(NaiveDateTime::from_sql(ty, raw)?),
            Type::TIMESTAMPTZ => Value::Timestamp(DateTime::<Utc>::from_sql(ty, raw)?.naive_utc()),
            Type::DATE => Value::Timestamp(NaiveDate::from_sql(ty, raw)?.and_time(NaiveTime::MIN)),
            Type::JSON | Type::JSONB => Value::Json(serde_json::Value::from_sql(ty, raw)?),
            Type::UUID => Value::Uuid(uuid::Uuid::from_sql(ty, raw)?),
            _ if <String as FromSql<'_>>::accepts(ty) => Value::Text(String::from_sql(ty, raw)?),
            _ => return Err(format!("unsupported column type: {ty}").into()),
        };
        Ok(value)
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, BoxError> {
        Ok(Value::Null)
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

fn bind(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

fn convert_row(row: &tokio_postgres::Row) -> OrmResult<Row> {
    let mut columns = Vec::with_capacity(row.len());
    let mut values = Vec::with_capacity(row.len());
    for (idx, column) in row.columns().iter().enumerate() {
        let value = row
            .try_get::<_, Value>(idx)
            .map_err(|e| OrmError::decode(column.name(), e.to_string()))?;
        columns.push(column.name().to_string());
        values.push(value);
    }
    Ok(Row::new(columns, values))
}

fn convert_rows(rows: Vec<tokio_postgres::Row>) -> OrmResult<Vec<Row>> {
    rows.iter().map(convert_row).collect()
}

impl Executor for tokio_postgres::Client {
    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        let n = tokio_postgres::Client::execute(self, sql, &bind(params)).await?;
        Ok(ExecResult::new(n))
    }

    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        let rows = tokio_postgres::Client::query(self, sql, &bind(params)).await?;
        convert_rows(rows)
    }
}

impl Executor for tokio_postgres::Transaction<'_> {
    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        let n = tokio_postgres::Transaction::execute(self, sql, &bind(params)).await?;
        Ok(ExecResult::new(n))
    }

    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        let rows = tokio_postgres::Transaction::query(self, sql, &bind(params)).await?;
        convert_rows(rows)
    }
}

impl TransactionExecutor for tokio_postgres::Transaction<'_> {
    async fn commit(self) -> OrmResult<()> {
        tokio_postgres::Transaction::commit(self).await?;
        Ok(())
    }

    async fn rollback(self) -> OrmResult<()> {
        tokio_postgres::Transaction::rollback(self).await?;
        Ok(())
    }
}

// ===== deadpool-postgres support =====

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::Client {
    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        // Delegate to the deref target (tokio_postgres::Client).
        Executor::execute(&***self, sql, params).await
    }

    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        Executor::query(&***self, sql, params).await
    }
}

#[cfg(feature = "pool")]
impl Executor for deadpool_postgres::Transaction<'_> {
    async fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<ExecResult> {
        Executor::execute(&**self, sql, params).await
    }

    async fn query(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        Executor::query(&**self, sql, params).await
    }
}

#[cfg(feature = "pool")]
impl TransactionExecutor for deadpool_postgres::Transaction<'_> {
    async fn commit(self) -> OrmResult<()> {
        deadpool_postgres::Transaction::commit(self).await?;
        Ok(())
    }

    async fn rollback(self) -> OrmResult<()> {
        deadpool_postgres::Transaction::rollback(self).await?;
        Ok(())
    }
}
