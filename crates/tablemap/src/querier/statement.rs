//! SQL text for the engine's statements.
//!
//! Builders here only render text: identifiers are quoted and placeholders are
//! numbered from 1 in the order the caller binds values.

use crate::dialect::Dialect;

fn quoted_list(dialect: Dialect, columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| dialect.quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn with_tail(mut sql: String, tail: &str) -> String {
    let tail = tail.trim();
    if !tail.is_empty() {
        sql.push(' ');
        sql.push_str(tail);
    }
    sql
}

/// `INSERT INTO <table> (<cols>) VALUES (<placeholders>) [RETURNING <pk>]`.
///
/// With no columns left, Postgres and SQLite get `DEFAULT VALUES` and MySQL
/// gets `() VALUES ()`.
pub(crate) fn insert(
    dialect: Dialect,
    table: &str,
    columns: &[&str],
    returning: Option<&str>,
) -> String {
    let mut sql = format!("INSERT INTO {}", dialect.quote_identifier(table));
    if columns.is_empty() && dialect != Dialect::MySql {
        sql.push_str(" DEFAULT VALUES");
    } else {
        sql.push_str(&format!(
            " ({}) VALUES ({})",
            quoted_list(dialect, columns),
            dialect.placeholders(1, columns.len()).join(", ")
        ));
    }
    if let Some(pk) = returning {
        sql.push_str(" RETURNING ");
        sql.push_str(&dialect.quote_identifier(pk));
    }
    sql
}

/// `UPDATE <table> SET a = p1, b = p2 WHERE <pk> = p(n+1)`.
pub(crate) fn update(dialect: Dialect, table: &str, columns: &[&str], pk: &str) -> String {
    let set = columns
        .iter()
        .zip(dialect.placeholders(1, columns.len()))
        .map(|(c, p)| format!("{} = {}", dialect.quote_identifier(c), p))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {} WHERE {} = {}",
        dialect.quote_identifier(table),
        set,
        dialect.quote_identifier(pk),
        dialect.placeholder(columns.len() + 1)
    )
}

/// `DELETE FROM <table> WHERE <pk> = p1`.
pub(crate) fn delete_by_pk(dialect: Dialect, table: &str, pk: &str) -> String {
    format!(
        "DELETE FROM {} WHERE {} = {}",
        dialect.quote_identifier(table),
        dialect.quote_identifier(pk),
        dialect.placeholder(1)
    )
}

/// `DELETE FROM <table> <tail>`.
pub(crate) fn delete_from(dialect: Dialect, table: &str, tail: &str) -> String {
    with_tail(
        format!("DELETE FROM {}", dialect.quote_identifier(table)),
        tail,
    )
}

/// `SELECT <cols> FROM <view> <tail>`.
pub(crate) fn select(dialect: Dialect, view: &str, columns: &[&str], tail: &str) -> String {
    with_tail(
        format!(
            "SELECT {} FROM {}",
            quoted_list(dialect, columns),
            dialect.quote_identifier(view)
        ),
        tail,
    )
}

/// `SELECT COUNT(*) FROM <view> <tail>`.
pub(crate) fn count(dialect: Dialect, view: &str, tail: &str) -> String {
    with_tail(
        format!("SELECT COUNT(*) FROM {}", dialect.quote_identifier(view)),
        tail,
    )
}
