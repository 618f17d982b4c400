use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::sync::LazyLock;
use tablemap::{Dialect, ExecResult, Executor, OrmResult, Querier, Record, Row, Value};
use tokio::runtime::Runtime;

static RUNTIME: LazyLock<Runtime> =
    LazyLock::new(|| Runtime::new().expect("create tokio runtime"));

/// Executor that accepts every statement without touching a database.
struct NullExecutor;

impl Executor for NullExecutor {
    async fn execute(&self, _sql: &str, _params: &[Value]) -> OrmResult<ExecResult> {
        Ok(ExecResult::new(1).with_last_insert_id(1))
    }

    async fn query(&self, _sql: &str, _params: &[Value]) -> OrmResult<Vec<Row>> {
        Ok(vec![Row::from_values(vec![Value::Int(1)])])
    }
}

#[derive(Debug, Default, Record)]
#[orm(table = "events")]
struct Event {
    #[orm(pk)]
    id: i64,
    kind: String,
    payload: Option<String>,
    attempts: i32,
    created_at: Option<chrono::NaiveDateTime>,
}

fn event() -> Event {
    Event {
        kind: "signup".into(),
        payload: Some("{}".into()),
        attempts: 1,
        ..Event::default()
    }
}

const DIALECTS: [Dialect; 3] = [Dialect::Postgres, Dialect::MySql, Dialect::Sqlite];

fn bench_placeholders(c: &mut Criterion) {
    let mut group = c.benchmark_group("dialect/placeholders");

    for dialect in DIALECTS {
        for n in [5, 50] {
            group.bench_with_input(
                BenchmarkId::new(dialect.name(), n),
                &n,
                |b, &n| b.iter(|| black_box(dialect.placeholders(1, n))),
            );
        }
    }

    group.finish();
}

fn bench_quote_identifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("dialect/quote_identifier");

    for dialect in DIALECTS {
        group.bench_function(dialect.name(), |b| {
            b.iter(|| black_box(dialect.quote_identifier(black_box("reporting.active_people"))))
        });
    }

    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("querier/insert");

    for dialect in DIALECTS {
        let q = Querier::new(NullExecutor, dialect);
        group.bench_function(dialect.name(), |b| {
            b.iter(|| {
                let mut e = event();
                RUNTIME
                    .block_on(q.insert(&mut e))
                    .expect("insert against null executor");
                black_box(e.id);
            })
        });
    }

    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("querier/update");

    for dialect in DIALECTS {
        let q = Querier::new(NullExecutor, dialect);
        let mut e = Event { id: 7, ..event() };
        group.bench_function(dialect.name(), |b| {
            b.iter(|| {
                RUNTIME
                    .block_on(q.update(&mut e))
                    .expect("update against null executor");
            })
        });
        group.bench_function(format!("{}/columns", dialect.name()), |b| {
            b.iter(|| {
                RUNTIME
                    .block_on(q.update_columns(&mut e, &["kind", "attempts"]))
                    .expect("update_columns against null executor");
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_placeholders,
    bench_quote_identifier,
    bench_insert,
    bench_update
);
criterion_main!(benches);
