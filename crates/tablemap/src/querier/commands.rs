use super::{Querier, statement};
use crate::client::Executor;
use crate::columns::ColumnValues;
use crate::descriptor::View;
use crate::dialect::LastInsertIdMethod;
use crate::error::{OrmError, OrmResult};
use crate::record::{Record, Struct};
use crate::value::Value;

/// Interpret rows affected by a primary-key scoped mutation.
fn single_row(statement: &'static str, affected: u64) -> OrmResult<()> {
    match affected {
        0 => Err(OrmError::NoRows),
        1 => Ok(()),
        n => {
            tracing::error!(
                target: "tablemap",
                statement,
                affected = n,
                "primary-key scoped statement affected several rows"
            );
            Err(OrmError::InvariantViolation {
                statement,
                affected: n,
            })
        }
    }
}

impl<E: Executor> Querier<E> {
    /// Insert a struct into its table.
    ///
    /// Runs [`BeforeInsert`](crate::BeforeInsert) first when the struct has it.
    /// For records without a primary key the key column is left out and the
    /// generated key is written back after the statement.
    pub async fn insert(&self, target: &mut dyn Struct) -> OrmResult<()> {
        if let Some(hook) = target.as_before_insert() {
            hook.before_insert()?;
        }

        let view = target.view();
        let mut pairs = ColumnValues::new(view.columns(), target.values());
        let mut record = target.as_record_mut();

        let mut pk_unset = false;
        if let Some(record) = record.as_deref() {
            if !record.has_pk() {
                pairs.remove(record.table().pk_index());
                pk_unset = true;
            }
        }

        let dialect = self.dialect();
        match dialect.last_insert_id_method() {
            LastInsertIdMethod::LastInsertId => {
                let sql = statement::insert(dialect, view.name(), pairs.columns(), None);
                let res = self
                    .exec_inner(&sql, &pairs.into_values(), Some("insert"))
                    .await?;
                if let Some(record) = record {
                    if pk_unset {
                        let id = res.last_insert_id.ok_or(OrmError::MissingInsertId)?;
                        record.set_pk(Value::Int(id))?;
                    }
                }
                Ok(())
            }
            LastInsertIdMethod::Returning => match record.as_deref_mut() {
                Some(record) => {
                    let pk = record.table().pk_column();
                    let sql = statement::insert(dialect, view.name(), pairs.columns(), Some(pk));
                    let mut row = self
                        .query_one_inner(&sql, &pairs.into_values(), Some("insert"))
                        .await?;
                    record.set_pk(row.take(0)?)
                }
                None => {
                    let sql = statement::insert(dialect, view.name(), pairs.columns(), None);
                    self.exec_inner(&sql, &pairs.into_values(), Some("insert"))
                        .await?;
                    Ok(())
                }
            },
        }
    }

    fn before_update(record: &mut dyn Record) -> OrmResult<()> {
        if !record.has_pk() {
            return Err(OrmError::NoPrimaryKey);
        }
        if let Some(hook) = record.as_before_update() {
            hook.before_update()?;
        }
        Ok(())
    }

    async fn update_pairs(&self, record: &dyn Record, pairs: ColumnValues) -> OrmResult<()> {
        let table = record.table();
        let sql = statement::update(self.dialect(), table.name(), pairs.columns(), table.pk_column());
        let mut args = pairs.into_values();
        args.push(record.pk_value());

        let res = self.exec_inner(&sql, &args, Some("update")).await?;
        single_row("UPDATE", res.rows_affected)
    }

    /// Update every non-key column of the row identified by the record's key.
    ///
    /// Returns [`OrmError::NoPrimaryKey`] without running SQL when the key is
    /// unset, and [`OrmError::NoRows`] when no row matched.
    pub async fn update(&self, record: &mut dyn Record) -> OrmResult<()> {
        Self::before_update(record)?;

        let table = record.table();
        let mut pairs = ColumnValues::new(table.columns(), record.values());
        pairs.remove(table.pk_index());
        self.update_pairs(record, pairs).await
    }

    /// Update only the named columns of the row identified by the record's key.
    ///
    /// The key column is never part of the SET list. Unknown names fail with
    /// [`OrmError::UnexpectedColumns`]; an empty SET list fails with
    /// [`OrmError::NothingToUpdate`]. Neither runs SQL.
    pub async fn update_columns(&self, record: &mut dyn Record, columns: &[&str]) -> OrmResult<()> {
        Self::before_update(record)?;

        let table = record.table();
        let mut pairs = ColumnValues::new(table.columns(), record.values());
        let unexpected = pairs.retain_named(columns, table.pk_index());
        if !unexpected.is_empty() {
            return Err(OrmError::UnexpectedColumns(unexpected));
        }
        if pairs.is_empty() {
            return Err(OrmError::NothingToUpdate);
        }
        self.update_pairs(record, pairs).await
    }

    /// Update the record when it has a key and its row exists; insert otherwise.
    pub async fn save(&self, record: &mut dyn Record) -> OrmResult<()> {
        if record.has_pk() {
            match self.update(record).await {
                Err(OrmError::NoRows) => {}
                other => return other,
            }
        }
        self.insert(record).await
    }

    /// Delete the row identified by the record's key.
    pub async fn delete(&self, record: &dyn Record) -> OrmResult<()> {
        if !record.has_pk() {
            return Err(OrmError::NoPrimaryKey);
        }

        let table = record.table();
        let sql = statement::delete_by_pk(self.dialect(), table.name(), table.pk_column());
        let res = self
            .exec_inner(&sql, &[record.pk_value()], Some("delete"))
            .await?;
        single_row("DELETE", res.rows_affected)
    }

    /// Delete rows from `view` matching `tail` (e.g. `WHERE ...`).
    ///
    /// Returns the number of rows deleted; zero is not an error.
    pub async fn delete_from(&self, view: &View, tail: &str, args: &[Value]) -> OrmResult<u64> {
        let sql = statement::delete_from(self.dialect(), view.name(), tail);
        let res = self.exec_inner(&sql, args, Some("delete_from")).await?;
        Ok(res.rows_affected)
    }
}
