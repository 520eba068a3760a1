use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// A JSON entry owned by one user inside a named collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub collection: String,
    pub body: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row shape of the `documents` table.
#[derive(Debug, FromRow)]
pub struct DocumentEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub collection: String,
    pub body: Json<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DocumentEntity> for Document {
    fn from(row: DocumentEntity) -> Self {
        Document {
            id: row.id,
            user_id: row.user_id,
            collection: row.collection,
            body: row.body.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
