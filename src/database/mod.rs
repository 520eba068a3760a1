// Storage seam: the handlers only see these traits, the backends live in
// `repositories`.

pub mod models;
pub mod repositories;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

pub use models::{Document, NewUser, Role, User};
pub use repositories::{MemoryStore, PgStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("corrupt record: {0}")]
    Corrupt(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Emails are matched case-insensitively.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Fails with `StoreError::Conflict` when the email is taken.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Option<User>, StoreError>;
}

/// Per-user JSON collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: &str, user_id: Uuid, body: Value) -> Result<Document, StoreError>;

    /// Newest first.
    async fn list(&self, collection: &str, user_id: Uuid) -> Result<Vec<Document>, StoreError>;

    async fn get(&self, collection: &str, user_id: Uuid, id: Uuid) -> Result<Option<Document>, StoreError>;

    async fn replace(
        &self,
        collection: &str,
        user_id: Uuid,
        id: Uuid,
        body: Value,
    ) -> Result<Option<Document>, StoreError>;

    /// Returns whether a document was removed.
    async fn delete(&self, collection: &str, user_id: Uuid, id: Uuid) -> Result<bool, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_or_closed_pool_is_unavailable() {
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolClosed),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::Database(_)
        ));
    }
}
