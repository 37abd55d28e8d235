/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Errors surfaced by any [`crate::Repository`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// Raised by stores that enforce uniqueness themselves (see [`crate::memory`]).
    #[error("Duplicate value violates unique constraint: {constraint}")]
    UniqueViolation { constraint: String },
}

impl DbError {
    /// Name of the violated unique constraint, whichever store raised it.
    pub fn unique_constraint(&self) -> Option<&str> {
        match self {
            DbError::UniqueViolation { constraint } => Some(constraint),
            DbError::Sqlx(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Some(db_err.constraint().unwrap_or("unknown"))
            }
            DbError::Sqlx(_) => None,
        }
    }
}
