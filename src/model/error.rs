use thiserror::Error;
use uuid::Uuid;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlx migrate error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Transient I/O failure. Retryable; the caller owns retry policy.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// A save raced another writer for the same user: the loaded version was
    /// stale. Reload and reapply.
    #[error("version conflict for user {0}")]
    Conflict(Uuid),

    #[error("progress document error: {0}")]
    Document(#[from] serde_json::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        Self::Unavailable(error)
    }
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
