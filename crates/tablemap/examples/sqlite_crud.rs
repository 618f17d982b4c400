//! Record CRUD against an in-memory SQLite database, with statement tracing.
//!
//! Run with:
//!   RUST_LOG=tablemap=debug cargo run --example sqlite_crud -p tablemap

use std::sync::Arc;
use std::time::Duration;
use tablemap::{
    CompositeMonitor, Dialect, MonitorConfig, OrmResult, Querier, Record, SqliteExecutor,
    StatsMonitor, TracingMonitor, Tx, Value,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Record)]
#[orm(table = "items")]
struct Item {
    #[orm(pk)]
    id: i64,
    name: String,
    #[orm(column = "qty")]
    quantity: i64,
}

#[tokio::main]
async fn main() -> OrmResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tablemap=debug")),
        )
        .init();

    let db = SqliteExecutor::open_in_memory()?;
    db.execute_batch(
        "CREATE TABLE items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            qty INTEGER NOT NULL
        )",
    )?;

    let stats = Arc::new(StatsMonitor::new());
    let monitor = CompositeMonitor::new()
        .add(TracingMonitor::new().log_start())
        .add_arc(stats.clone());
    let config = MonitorConfig::new()
        .with_slow_query_threshold(Duration::from_millis(50))
        .enable_monitoring();

    let q = Querier::new(&db, Dialect::Sqlite)
        .with_config(config.clone())
        .with_monitor(monitor);

    let mut apple = Item {
        name: "apple".into(),
        quantity: 3,
        ..Item::default()
    };
    q.insert(&mut apple).await?;
    println!("inserted {apple:?}");

    apple.quantity = 5;
    q.update_columns(&mut apple, &["qty"]).await?;

    let mut pear = Item {
        name: "pear".into(),
        quantity: 1,
        ..Item::default()
    };
    q.save(&mut pear).await?;

    let items: Vec<Item> = q.select_all("ORDER BY id", &[]).await?;
    println!("items: {items:?}");

    let tx = Tx::new(db.begin().await?, Dialect::Sqlite)
        .with_config(config)
        .with_monitor_arc(stats.clone());
    let removed = tx
        .delete_from(Item::descriptor().view(), "WHERE qty < ?", &[Value::Int(2)])
        .await?;
    println!("removed {removed} item(s) inside a transaction, rolling back");
    tx.rollback().await?;

    let remaining = q.count(Item::descriptor().view(), "", &[]).await?;
    println!("{remaining} item(s) remain");

    q.delete(&pear).await?;
    println!("stats: {:?}", stats.stats());
    Ok(())
}
