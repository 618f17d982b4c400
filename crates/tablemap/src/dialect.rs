//! SQL dialects: identifier quoting, placeholders and generated-key retrieval.
//!
//! # Example
//!
//! ```rust
//! use tablemap::{Dialect, LastInsertIdMethod};
//!
//! let dialect: Dialect = "postgres".parse().unwrap();
//! assert_eq!(dialect.placeholder(2), "$2");
//! assert_eq!(dialect.quote_identifier("public.users"), r#""public"."users""#);
//! assert_eq!(dialect.last_insert_id_method(), LastInsertIdMethod::Returning);
//! ```

use crate::error::{OrmError, OrmResult};
use std::fmt;
use std::str::FromStr;

/// How placeholders are spelled in statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `$1`, `$2`, ...
    Numbered,
    /// `?` for every parameter
    Positional,
}

/// How the database reports a generated primary key after INSERT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastInsertIdMethod {
    /// The driver reports the id alongside rows affected.
    LastInsertId,
    /// The statement carries a `RETURNING <pk>` clause.
    Returning,
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
}

impl Dialect {
    /// Resolve a dialect from a driver name.
    ///
    /// Unknown names are a configuration error; resolve the dialect once at
    /// setup rather than per statement.
    pub fn from_driver_name(name: &str) -> OrmResult<Self> {
        let lower = name.trim().to_ascii_lowercase();
        match lower.as_str() {
            "postgres" | "postgresql" | "pgx" | "tokio-postgres" | "deadpool-postgres" => {
                Ok(Self::Postgres)
            }
            "mysql" | "mymysql" | "mariadb" => Ok(Self::MySql),
            "sqlite" | "sqlite3" | "rusqlite" => Ok(Self::Sqlite),
            _ => Err(OrmError::UnknownDialect(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::Sqlite => "sqlite",
        }
    }

    pub fn placeholder_style(self) -> PlaceholderStyle {
        match self {
            Self::Postgres => PlaceholderStyle::Numbered,
            Self::MySql | Self::Sqlite => PlaceholderStyle::Positional,
        }
    }

    pub fn last_insert_id_method(self) -> LastInsertIdMethod {
        match self {
            // SQLite supports RETURNING since 3.35.
            Self::Postgres | Self::Sqlite => LastInsertIdMethod::Returning,
            Self::MySql => LastInsertIdMethod::LastInsertId,
        }
    }

    /// Placeholder for the 1-based parameter `position`.
    pub fn placeholder(self, position: usize) -> String {
        match self.placeholder_style() {
            PlaceholderStyle::Numbered => format!("${position}"),
            PlaceholderStyle::Positional => "?".to_string(),
        }
    }

    /// `count` placeholders starting at 1-based `start`.
    pub fn placeholders(self, start: usize, count: usize) -> Vec<String> {
        (start..start + count).map(|p| self.placeholder(p)).collect()
    }

    /// Quote an identifier; dotted names are quoted per segment.
    pub fn quote_identifier(self, name: &str) -> String {
        let quote = match self {
            Self::Postgres | Self::Sqlite => '"',
            Self::MySql => '`',
        };
        let mut out = String::with_capacity(name.len() + 2);
        for (i, part) in name.split('.').enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push(quote);
            for c in part.chars() {
                if c == quote {
                    out.push(quote);
                }
                out.push(c);
            }
            out.push(quote);
        }
        out
    }
}

impl FromStr for Dialect {
    type Err = OrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_driver_name(s)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_placeholders_follow_position() {
        let d = Dialect::Postgres;
        assert_eq!(d.placeholder(1), "$1");
        assert_eq!(d.placeholder(2), "$2");
        assert_eq!(d.placeholder(3), d.placeholder(3));
        assert_eq!(d.placeholders(3, 3), vec!["$3", "$4", "$5"]);
    }

    #[test]
    fn positional_placeholders_repeat() {
        for d in [Dialect::MySql, Dialect::Sqlite] {
            assert_eq!(d.placeholder(1), "?");
            assert_eq!(d.placeholder(1), d.placeholder(2));
            assert_eq!(d.placeholders(1, 3), vec!["?", "?", "?"]);
        }
    }

    #[test]
    fn placeholders_empty_when_count_zero() {
        assert!(Dialect::Postgres.placeholders(1, 0).is_empty());
    }

    #[test]
    fn quoting_per_dialect() {
        assert_eq!(Dialect::Postgres.quote_identifier("users"), r#""users""#);
        assert_eq!(Dialect::Sqlite.quote_identifier("users"), r#""users""#);
        assert_eq!(Dialect::MySql.quote_identifier("users"), "`users`");
        assert_eq!(
            Dialect::MySql.quote_identifier("app.users"),
            "`app`.`users`"
        );
        assert_eq!(
            Dialect::Postgres.quote_identifier(r#"we"ird"#),
            r#""we""ird""#
        );
    }

    #[test]
    fn key_retrieval_strategies() {
        assert_eq!(
            Dialect::Postgres.last_insert_id_method(),
            LastInsertIdMethod::Returning
        );
        assert_eq!(
            Dialect::Sqlite.last_insert_id_method(),
            LastInsertIdMethod::Returning
        );
        assert_eq!(
            Dialect::MySql.last_insert_id_method(),
            LastInsertIdMethod::LastInsertId
        );
    }

    #[test]
    fn driver_names_resolve() {
        assert_eq!(Dialect::from_driver_name("pgx").unwrap(), Dialect::Postgres);
        assert_eq!(Dialect::from_driver_name("MySQL").unwrap(), Dialect::MySql);
        assert_eq!("sqlite3".parse::<Dialect>().unwrap(), Dialect::Sqlite);
        let err = Dialect::from_driver_name("oracle").unwrap_err();
        assert!(matches!(err, OrmError::UnknownDialect(ref n) if n == "oracle"));
    }
}
