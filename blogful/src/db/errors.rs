//! Classification of storage failures into the cases handlers can answer meaningfully.

use thiserror::Error;

/// Storage failure, shared by the PostgreSQL and in-memory repositories.
///
/// Constraint variants carry the constraint and table names so the HTTP layer can pick a
/// message; for the in-memory backend these mirror the names the migrations create.
#[derive(Error, Debug)]
pub enum DbError {
    /// A `UNIQUE` constraint rejected the write
    #[error("Unique constraint violation")]
    UniqueViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// A write referenced a row that does not exist
    #[error("Foreign key constraint violation")]
    ForeignKeyViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DbError {
    /// Whether this is a constraint violation on `constraint`.
    pub fn violates(&self, constraint: &str) -> bool {
        match self {
            DbError::UniqueViolation { constraint: Some(name), .. } | DbError::ForeignKeyViolation { constraint: Some(name), .. } => {
                name == constraint
            }
            _ => false,
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().map(|s| s.to_string());
                let table = db_err.table().map(|s| s.to_string());
                let message = db_err.message().to_string();

                if db_err.is_unique_violation() {
                    DbError::UniqueViolation { constraint, table, message }
                } else if db_err.is_foreign_key_violation() {
                    DbError::ForeignKeyViolation { constraint, table, message }
                } else {
                    DbError::Other(anyhow::Error::from(err))
                }
            }
            // Lookups use `fetch_optional`, so `RowNotFound` lands here along with pool timeouts
            // and I/O errors
            _ => DbError::Other(anyhow::Error::from(err)),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
