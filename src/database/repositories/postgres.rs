use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{Executor, PgPool};
use uuid::Uuid;

use crate::database::models::{Document, DocumentEntity, NewUser, User, UserEntity};
use crate::database::{DocumentStore, StoreError, UserRepository};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, is_active, created_at, updated_at";
const DOCUMENT_COLUMNS: &str = "id, user_id, collection, body, created_at, updated_at";

/// PostgreSQL backend: users in a table, tracked entries as JSONB documents.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens the pool and applies pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute("SET application_name = 'fitrack_backend';")
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self::new(pool))
    }
}

fn into_user(row: UserEntity) -> Result<User, StoreError> {
    User::try_from(row).map_err(StoreError::Corrupt)
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_user).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, role)
            VALUES ($1, $2, lower($3), $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => {
                tracing::info!("Created user: {}", row.id);
                into_user(row)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::Conflict("User already exists".to_string()))
            }
            Err(e) => {
                tracing::error!("Failed to create user: {:?}", e);
                Err(e.into())
            }
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(into_user).collect()
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            UPDATE users SET is_active = $2, updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_user).transpose()
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert(&self, collection: &str, user_id: Uuid, body: Value) -> Result<Document, StoreError> {
        let row = sqlx::query_as::<_, DocumentEntity>(&format!(
            r#"
            INSERT INTO documents (id, user_id, collection, body)
            VALUES ($1, $2, $3, $4)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(collection)
        .bind(Json(body))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list(&self, collection: &str, user_id: Uuid) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentEntity>(&format!(
            r#"
            SELECT {DOCUMENT_COLUMNS} FROM documents
            WHERE collection = $1 AND user_id = $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(collection)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn get(&self, collection: &str, user_id: Uuid, id: Uuid) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentEntity>(&format!(
            r#"
            SELECT {DOCUMENT_COLUMNS} FROM documents
            WHERE collection = $1 AND user_id = $2 AND id = $3
            "#
        ))
        .bind(collection)
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn replace(
        &self,
        collection: &str,
        user_id: Uuid,
        id: Uuid,
        body: Value,
    ) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentEntity>(&format!(
            r#"
            UPDATE documents SET body = $4, updated_at = now()
            WHERE collection = $1 AND user_id = $2 AND id = $3
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(collection)
        .bind(user_id)
        .bind(id)
        .bind(Json(body))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn delete(&self, collection: &str, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "DELETE FROM documents WHERE collection = $1 AND user_id = $2 AND id = $3",
        )
        .bind(collection)
        .bind(user_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
