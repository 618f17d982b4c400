//! # tablemap
//!
//! Struct-to-table mapping for SQL databases.
//!
//! ## Features
//!
//! - **Descriptors**: each mapped struct names its table (or view), its ordered
//!   columns and its primary-key column, built at compile time by
//!   `#[derive(Record)]` / `#[derive(View)]`
//! - **Dialects**: Postgres, MySQL and SQLite quoting, placeholders and
//!   generated-key retrieval (`RETURNING` or driver-reported ids)
//! - **Record commands**: insert, update, update selected columns, save,
//!   delete by primary key, delete by condition
//! - **Transactions**: [`Tx`] runs every command inside a transaction and
//!   reports `COMMIT` / `ROLLBACK` like any other statement
//! - **Monitoring**: every statement is reported to a [`QueryMonitor`]
//!   (`tracing`, stderr, statistics, or your own)
//!
//! ## Example
//!
//! ```ignore
//! use tablemap::{Dialect, Querier, Record, SqliteExecutor};
//!
//! #[derive(Debug, Default, Record)]
//! #[orm(table = "people")]
//! struct Person {
//!     #[orm(pk)]
//!     id: i64,
//!     name: String,
//!     email: Option<String>,
//! }
//!
//! let db = SqliteExecutor::open_in_memory()?;
//! let querier = Querier::new(&db, Dialect::Sqlite);
//!
//! let mut person = Person { name: "Alice".into(), ..Default::default() };
//! querier.insert(&mut person).await?;      // INSERT ... RETURNING "id"
//! person.email = Some("alice@example.com".into());
//! querier.update(&mut person).await?;      // UPDATE ... WHERE "id" = ?
//! querier.delete(&person).await?;
//! ```

pub mod client;
pub mod descriptor;
pub mod dialect;
pub mod error;
pub mod monitor;
pub mod querier;
pub mod record;
pub mod row;
pub mod transaction;
pub mod value;

mod columns;
mod postgres;

pub use client::{ExecResult, Executor, TransactionExecutor};
pub use descriptor::{Table, View};
pub use dialect::{Dialect, LastInsertIdMethod, PlaceholderStyle};
pub use error::{OrmError, OrmResult};
pub use monitor::{
    CompositeMonitor, LoggingMonitor, MonitorConfig, NoopMonitor, QueryContext, QueryMonitor,
    QueryResult, QueryStats, QueryType, StatsMonitor, TracingMonitor,
};
pub use querier::Querier;
pub use record::{BeforeInsert, BeforeUpdate, Record, Struct};
pub use row::Row;
pub use transaction::Tx;
pub use value::{FromValue, IsZero, ToValue, Value};

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteExecutor, SqliteTransaction};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config, create_pool_with_manager_config};

#[cfg(feature = "derive")]
pub use tablemap_derive::{Record, View};
