use super::{Querier, statement};
use crate::client::Executor;
use crate::descriptor::View;
use crate::error::{OrmError, OrmResult};
use crate::record::{Record, Struct};
use crate::value::Value;

impl<E: Executor> Querier<E> {
    /// Scan the first row of `SELECT <columns> FROM <view> <tail>` into `target`.
    ///
    /// Returns [`OrmError::NoRows`] when the query yields nothing.
    pub async fn select_one_to(
        &self,
        target: &mut dyn Struct,
        tail: &str,
        args: &[Value],
    ) -> OrmResult<()> {
        let view = target.view();
        let sql = statement::select(self.dialect(), view.name(), view.columns(), tail);
        let row = self.query_one_inner(&sql, args, Some("select")).await?;
        target.scan(row)
    }

    /// Every row of `SELECT <columns> FROM <view> <tail>`, scanned into fresh structs.
    pub async fn select_all<S>(&self, tail: &str, args: &[Value]) -> OrmResult<Vec<S>>
    where
        S: Struct + Default,
    {
        let view = S::default().view();
        let sql = statement::select(self.dialect(), view.name(), view.columns(), tail);
        let rows = self.query_inner(&sql, args, Some("select")).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let mut item = S::default();
            item.scan(row)?;
            out.push(item);
        }
        Ok(out)
    }

    /// Load the row whose primary key equals `pk` into `record`.
    pub async fn find_by_primary_key_to(
        &self,
        record: &mut dyn Record,
        pk: impl Into<Value>,
    ) -> OrmResult<()> {
        let pk = pk.into();
        let table = record.table();
        let tail = format!(
            "WHERE {} = {}",
            self.dialect().quote_identifier(table.pk_column()),
            self.dialect().placeholder(1)
        );
        let sql = statement::select(self.dialect(), table.name(), table.columns(), &tail);
        let row = self.query_one_inner(&sql, &[pk], Some("find")).await?;
        record.scan(row)
    }

    /// Re-read the record's row by its primary key.
    pub async fn reload(&self, record: &mut dyn Record) -> OrmResult<()> {
        if !record.has_pk() {
            return Err(OrmError::NoPrimaryKey);
        }
        let pk = record.pk_value();
        self.find_by_primary_key_to(record, pk).await
    }

    /// `SELECT COUNT(*) FROM <view> <tail>`.
    pub async fn count(&self, view: &View, tail: &str, args: &[Value]) -> OrmResult<u64> {
        let sql = statement::count(self.dialect(), view.name(), tail);
        let row = self.query_one_inner(&sql, args, Some("count")).await?;
        let n = row.try_get::<i64>(0)?;
        u64::try_from(n).map_err(|_| OrmError::decode("COUNT(*)", format!("negative count {n}")))
    }
}
