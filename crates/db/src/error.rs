/// Errors surfaced by any [`crate::store`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the constraint name.
    #[error("Duplicate value violates unique constraint: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    /// PostgreSQL unique violations (code 23505) on `uq_*` constraints become
    /// [`StoreError::Duplicate`]; everything else is passed through.
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return StoreError::Duplicate(constraint.to_string());
                }
            }
        }
        StoreError::Database(err)
    }
}
