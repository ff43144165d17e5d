use thiserror::Error;

pub type DatabaseResult<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl DatabaseError {
    /// The message reported by the database itself, when there is one.
    pub fn backend_message(&self) -> String {
        match self {
            Self::SqlxError(sqlx::Error::Database(e)) => e.message().to_string(),
            Self::SqlxError(e) => e.to_string(),
            Self::SqlxMigrateError(e) => e.to_string(),
            Self::SerdeError(e) => e.to_string(),
        }
    }
}
