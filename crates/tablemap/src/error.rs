//! Error types for tablemap

use thiserror::Error;

/// Result type alias for tablemap operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for mapping and database operations
#[derive(Debug, Error)]
pub enum OrmError {
    /// A primary-key scoped UPDATE/DELETE or a single-row read matched nothing
    #[error("no matching row")]
    NoRows,

    /// The record's primary key is not set
    #[error("primary key is not set")]
    NoPrimaryKey,

    /// `update_columns` was asked for columns the descriptor does not have
    #[error("unexpected columns: {0:?}")]
    UnexpectedColumns(Vec<String>),

    /// `update_columns` resolved to an empty SET list
    #[error("nothing to update")]
    NothingToUpdate,

    /// A primary-key scoped mutation touched more than one row.
    ///
    /// This means the descriptor and the schema disagree about the primary key.
    #[error("{affected} rows affected by {statement} by primary key; descriptor and schema disagree")]
    InvariantViolation {
        statement: &'static str,
        affected: u64,
    },

    /// Driver name with no known dialect
    #[error("unknown dialect for driver '{0}'")]
    UnknownDialect(String),

    /// The driver did not report a generated id after INSERT
    #[error("driver did not report a generated id")]
    MissingInsertId,

    /// Value decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error (for hooks)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Postgres error, passed through unchanged
    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    /// SQLite error, passed through unchanged
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Error from a third-party executor
    #[error(transparent)]
    Driver(Box<dyn std::error::Error + Send + Sync>),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap an arbitrary driver error
    pub fn driver(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Driver(Box::new(err))
    }

    /// Check if this is the "no matching row" outcome
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::NoRows)
    }

    /// Check if this is a missing primary key error
    pub fn is_no_primary_key(&self) -> bool {
        matches!(self, Self::NoPrimaryKey)
    }

    /// Check if this signals a broken primary-key invariant
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }

    /// Attach a column name to a decode error raised without one.
    pub fn at_column(self, column: &str) -> Self {
        match self {
            Self::Decode { column: c, message } if c.is_empty() => Self::Decode {
                column: column.to_string(),
                message,
            },
            other => other,
        }
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for OrmError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
