//! Transactions: a [`Querier`] bound to an open transaction.
//!
//! [`Tx`] dereferences to [`Querier`], so every record operation runs inside the
//! transaction. [`Tx::commit`] and [`Tx::rollback`] consume the value and are
//! reported to the monitor as `COMMIT` / `ROLLBACK` statements.
//!
//! # Example
//!
//! ```rust,ignore
//! use tablemap::{Dialect, SqliteExecutor, Tx};
//!
//! let db = SqliteExecutor::open_in_memory()?;
//! let tx = Tx::new(db.begin().await?, Dialect::Sqlite);
//! tx.insert(&mut person).await?;
//! tx.commit().await?;
//! ```

use crate::client::TransactionExecutor;
use crate::dialect::Dialect;
use crate::error::OrmResult;
use crate::monitor::{MonitorConfig, QueryContext, QueryMonitor, QueryResult};
use crate::querier::Querier;
use std::ops::Deref;
use std::sync::Arc;

/// A querier over an open transaction.
pub struct Tx<E> {
    querier: Querier<E>,
}

impl<E: TransactionExecutor> Tx<E> {
    pub fn new(executor: E, dialect: Dialect) -> Self {
        Self {
            querier: Querier::new(executor, dialect),
        }
    }

    /// Set the monitor configuration.
    pub fn with_config(self, config: MonitorConfig) -> Self {
        Self {
            querier: self.querier.with_config(config),
        }
    }

    /// Set the statement monitor.
    pub fn with_monitor<M: QueryMonitor + 'static>(self, monitor: M) -> Self {
        Self {
            querier: self.querier.with_monitor(monitor),
        }
    }

    /// Set the statement monitor from an Arc.
    pub fn with_monitor_arc(self, monitor: Arc<dyn QueryMonitor>) -> Self {
        Self {
            querier: self.querier.with_monitor_arc(monitor),
        }
    }

    /// Commit the transaction.
    pub async fn commit(self) -> OrmResult<()> {
        let Querier {
            executor,
            instrumentation,
            ..
        } = self.querier;
        let ctx = QueryContext::new("COMMIT", &[]).with_tag("commit");
        instrumentation
            .observed(&ctx, executor.commit(), |_: &()| QueryResult::Done)
            .await
    }

    /// Abort the transaction.
    pub async fn rollback(self) -> OrmResult<()> {
        let Querier {
            executor,
            instrumentation,
            ..
        } = self.querier;
        let ctx = QueryContext::new("ROLLBACK", &[]).with_tag("rollback");
        instrumentation
            .observed(&ctx, executor.rollback(), |_: &()| QueryResult::Done)
            .await
    }
}

impl<E> Deref for Tx<E> {
    type Target = Querier<E>;

    fn deref(&self) -> &Querier<E> {
        &self.querier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ExecResult, Executor};
    use crate::error::OrmError;
    use crate::monitor::QueryType;
    use crate::row::Row;
    use crate::value::Value;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Journal {
        entries: Mutex<Vec<String>>,
    }

    impl Journal {
        fn push(&self, entry: impl Into<String>) {
            self.entries.lock().unwrap().push(entry.into());
        }
    }

    struct FakeTx {
        journal: Arc<Journal>,
        fail_commit: bool,
    }

    impl Executor for FakeTx {
        async fn execute(&self, sql: &str, _: &[Value]) -> OrmResult<ExecResult> {
            self.journal.push(sql);
            Ok(ExecResult::new(1))
        }

        async fn query(&self, sql: &str, _: &[Value]) -> OrmResult<Vec<Row>> {
            self.journal.push(sql);
            Ok(vec![])
        }
    }

    impl TransactionExecutor for FakeTx {
        async fn commit(self) -> OrmResult<()> {
            self.journal.push("commit");
            if self.fail_commit {
                return Err(OrmError::Other("serialization failure".into()));
            }
            Ok(())
        }

        async fn rollback(self) -> OrmResult<()> {
            self.journal.push("rollback");
            Ok(())
        }
    }

    #[derive(Default)]
    struct Events(Mutex<Vec<(String, QueryType, QueryResult)>>);

    impl QueryMonitor for Events {
        fn on_query_start(&self, ctx: &QueryContext) {
            self.0
                .lock()
                .unwrap()
                .push((format!("start {}", ctx.sql), ctx.query_type, QueryResult::Done));
        }

        fn on_query_complete(&self, ctx: &QueryContext, _: Duration, result: &QueryResult) {
            self.0
                .lock()
                .unwrap()
                .push((format!("complete {}", ctx.sql), ctx.query_type, result.clone()));
        }
    }

    fn tx(journal: &Arc<Journal>, events: &Arc<Events>, fail_commit: bool) -> Tx<FakeTx> {
        Tx::new(
            FakeTx {
                journal: journal.clone(),
                fail_commit,
            },
            Dialect::Postgres,
        )
        .with_config(MonitorConfig::new().enable_monitoring())
        .with_monitor_arc(events.clone())
    }

    #[tokio::test]
    async fn commit_is_reported() {
        let journal = Arc::new(Journal::default());
        let events = Arc::new(Events::default());
        let tx = tx(&journal, &events, false);

        let deleted = tx
            .delete_from(&crate::descriptor::View::new("t", &["a"]), "", &[])
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        tx.commit().await.unwrap();

        assert_eq!(
            *journal.entries.lock().unwrap(),
            vec![r#"DELETE FROM "t""#.to_string(), "commit".to_string()]
        );
        let events = events.0.lock().unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[2],
            ("start COMMIT".to_string(), QueryType::Transaction, QueryResult::Done)
        );
        assert_eq!(
            events[3],
            ("complete COMMIT".to_string(), QueryType::Transaction, QueryResult::Done)
        );
    }

    #[tokio::test]
    async fn rollback_is_reported() {
        let journal = Arc::new(Journal::default());
        let events = Arc::new(Events::default());
        tx(&journal, &events, false).rollback().await.unwrap();

        assert_eq!(*journal.entries.lock().unwrap(), vec!["rollback".to_string()]);
        let events = events.0.lock().unwrap();
        assert_eq!(events[0].0, "start ROLLBACK");
        assert_eq!(events[1].0, "complete ROLLBACK");
    }

    #[tokio::test]
    async fn commit_error_is_returned_and_reported() {
        let journal = Arc::new(Journal::default());
        let events = Arc::new(Events::default());
        let err = tx(&journal, &events, true).commit().await.unwrap_err();

        assert!(matches!(err, OrmError::Other(ref m) if m == "serialization failure"));
        let events = events.0.lock().unwrap();
        assert_eq!(
            events[1].2,
            QueryResult::Error("serialization failure".to_string())
        );
    }
}
