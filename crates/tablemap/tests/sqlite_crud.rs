#![cfg(all(feature = "derive", feature = "sqlite"))]

use std::sync::Arc;
use tablemap::{
    BeforeInsert, Dialect, MonitorConfig, OrmError, OrmResult, Querier, Record, SqliteExecutor,
    StatsMonitor, Tx, Value,
};

#[derive(Debug, Default, Clone, PartialEq, Record)]
#[orm(table = "people", before_insert)]
struct Person {
    #[orm(pk)]
    id: i64,
    name: String,
    email: Option<String>,
    created_at: Option<chrono::NaiveDateTime>,
}

impl BeforeInsert for Person {
    fn before_insert(&mut self) -> OrmResult<()> {
        if self.name.trim().is_empty() {
            return Err(OrmError::validation("name must not be blank"));
        }
        if self.created_at.is_none() {
            self.created_at = Some(
                chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .unwrap_or_default(),
            );
        }
        Ok(())
    }
}

fn setup() -> SqliteExecutor {
    let db = SqliteExecutor::open_in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE people (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT,
            created_at TEXT
        )",
    )
    .unwrap();
    db
}

fn person(name: &str) -> Person {
    Person {
        name: name.to_string(),
        ..Person::default()
    }
}

async fn count(q: &Querier<&SqliteExecutor>) -> u64 {
    q.count(Person::descriptor().view(), "", &[]).await.unwrap()
}

#[tokio::test]
async fn insert_sets_generated_pk() {
    let db = setup();
    let q = Querier::new(&db, Dialect::Sqlite);

    let mut alice = person("Alice");
    q.insert(&mut alice).await.unwrap();
    let mut bob = person("Bob");
    q.insert(&mut bob).await.unwrap();

    assert_eq!(alice.id, 1);
    assert_eq!(bob.id, 2);
    assert!(alice.created_at.is_some());

    let mut loaded = Person::default();
    q.find_by_primary_key_to(&mut loaded, 2_i64).await.unwrap();
    assert_eq!(loaded, bob);
}

#[tokio::test]
async fn insert_hook_failure_writes_nothing() {
    let db = setup();
    let q = Querier::new(&db, Dialect::Sqlite);

    let err = q.insert(&mut person("  ")).await.unwrap_err();
    assert!(matches!(err, OrmError::Validation(_)));
    assert_eq!(count(&q).await, 0);
}

#[tokio::test]
async fn update_and_update_columns() {
    let db = setup();
    let q = Querier::new(&db, Dialect::Sqlite);

    let mut alice = person("Alice");
    q.insert(&mut alice).await.unwrap();

    alice.name = "Alicia".into();
    alice.email = Some("alicia@example.com".into());
    q.update(&mut alice).await.unwrap();

    alice.name = "Ignored".into();
    alice.email = None;
    q.update_columns(&mut alice, &["email"]).await.unwrap();

    q.reload(&mut alice).await.unwrap();
    assert_eq!(alice.name, "Alicia");
    assert_eq!(alice.email, None);
}

#[tokio::test]
async fn update_missing_row_changes_nothing() {
    let db = setup();
    let q = Querier::new(&db, Dialect::Sqlite);

    let mut alice = person("Alice");
    q.insert(&mut alice).await.unwrap();

    let mut ghost = Person {
        id: 42,
        ..person("Ghost")
    };
    assert!(q.update(&mut ghost).await.unwrap_err().is_no_rows());

    let all: Vec<Person> = q.select_all("ORDER BY id", &[]).await.unwrap();
    assert_eq!(all, vec![alice]);
}

#[tokio::test]
async fn update_columns_errors_run_no_sql() {
    let db = setup();
    let stats = Arc::new(StatsMonitor::new());
    let q = Querier::new(&db, Dialect::Sqlite)
        .with_config(MonitorConfig::new().enable_monitoring())
        .with_monitor_arc(stats.clone());

    let mut unsaved = person("Nobody");
    assert!(q.update(&mut unsaved).await.unwrap_err().is_no_primary_key());

    let mut alice = Person {
        id: 1,
        ..person("Alice")
    };
    let err = q
        .update_columns(&mut alice, &["nickname"])
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::UnexpectedColumns(ref c) if c == &["nickname"]));

    let err = q.update_columns(&mut alice, &["id"]).await.unwrap_err();
    assert!(matches!(err, OrmError::NothingToUpdate));

    assert_eq!(stats.stats().total_queries, 0);
}

#[tokio::test]
async fn save_inserts_or_updates() {
    let db = setup();
    let q = Querier::new(&db, Dialect::Sqlite);

    // No pk: plain insert.
    let mut alice = person("Alice");
    q.save(&mut alice).await.unwrap();
    assert_eq!(alice.id, 1);

    // Existing pk: update.
    alice.name = "Alicia".into();
    q.save(&mut alice).await.unwrap();
    assert_eq!(count(&q).await, 1);

    // Pk set but no row: update falls through to insert with that pk.
    let mut carol = Person {
        id: 10,
        ..person("Carol")
    };
    q.save(&mut carol).await.unwrap();
    assert_eq!(carol.id, 10);
    assert_eq!(count(&q).await, 2);

    let mut loaded = Person::default();
    q.find_by_primary_key_to(&mut loaded, 1_i64).await.unwrap();
    assert_eq!(loaded.name, "Alicia");
}

#[tokio::test]
async fn delete_and_delete_from() {
    let db = setup();
    let q = Querier::new(&db, Dialect::Sqlite);

    let mut alice = person("Alice");
    q.insert(&mut alice).await.unwrap();
    let mut bob = person("Bob");
    q.insert(&mut bob).await.unwrap();

    q.delete(&alice).await.unwrap();
    assert!(q.delete(&alice).await.unwrap_err().is_no_rows());
    assert!(q.delete(&person("Unsaved")).await.unwrap_err().is_no_primary_key());

    let view = Person::descriptor().view();
    let none = q
        .delete_from(view, "WHERE name = ?", &[Value::from("Nobody")])
        .await
        .unwrap();
    assert_eq!(none, 0);

    let deleted = q.delete_from(view, "", &[]).await.unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(count(&q).await, 0);
}

#[tokio::test]
async fn select_one_to_and_count_with_args() {
    let db = setup();
    let q = Querier::new(&db, Dialect::Sqlite);

    for name in ["Alice", "Bob", "Carol"] {
        q.insert(&mut person(name)).await.unwrap();
    }

    let mut found = Person::default();
    q.select_one_to(&mut found, "WHERE name = ?", &[Value::from("Bob")])
        .await
        .unwrap();
    assert_eq!(found.id, 2);

    let err = q
        .select_one_to(&mut found, "WHERE name = ?", &[Value::from("Dave")])
        .await
        .unwrap_err();
    assert!(err.is_no_rows());

    let n = q
        .count(Person::descriptor().view(), "WHERE id > ?", &[Value::Int(1)])
        .await
        .unwrap();
    assert_eq!(n, 2);
}

#[tokio::test]
async fn transaction_commit_and_rollback() {
    let db = setup();
    let stats = Arc::new(StatsMonitor::new());

    let tx = Tx::new(db.begin().await.unwrap(), Dialect::Sqlite)
        .with_config(MonitorConfig::new().enable_monitoring())
        .with_monitor_arc(stats.clone());
    let mut alice = person("Alice");
    tx.insert(&mut alice).await.unwrap();
    tx.commit().await.unwrap();

    let tx = Tx::new(db.begin().await.unwrap(), Dialect::Sqlite)
        .with_config(MonitorConfig::new().enable_monitoring())
        .with_monitor_arc(stats.clone());
    let mut bob = person("Bob");
    tx.insert(&mut bob).await.unwrap();
    tx.rollback().await.unwrap();

    let q = Querier::new(&db, Dialect::Sqlite);
    let all: Vec<Person> = q.select_all("", &[]).await.unwrap();
    assert_eq!(all, vec![alice]);

    let stats = stats.stats();
    assert_eq!(stats.insert_count, 2);
    assert_eq!(stats.transaction_count, 2);
    assert_eq!(stats.failed_queries, 0);
}

#[tokio::test]
async fn dropped_transaction_rolls_back() {
    let db = setup();
    {
        let tx = Tx::new(db.begin().await.unwrap(), Dialect::Sqlite);
        tx.insert(&mut person("Temp")).await.unwrap();
    }
    let q = Querier::new(&db, Dialect::Sqlite);
    assert_eq!(count(&q).await, 0);
}
