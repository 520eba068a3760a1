use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Document, NewUser, User};
use crate::database::{DocumentStore, StoreError, UserRepository};

/// Process-local backend used when no database is configured, and by tests.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    // insertion order, oldest first
    documents: RwLock<Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let email = user.email.to_lowercase();
        if users.values().any(|u| u.email == email) {
            return Err(StoreError::Conflict("User already exists".to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email,
            password_hash: user.password_hash,
            role: user.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.is_active = is_active;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, user_id: Uuid, body: Value) -> Result<Document, StoreError> {
        let now = Utc::now();
        let document = Document {
            id: Uuid::new_v4(),
            user_id,
            collection: collection.to_string(),
            body,
            created_at: now,
            updated_at: now,
        };
        self.documents.write().await.push(document.clone());
        Ok(document)
    }

    async fn list(&self, collection: &str, user_id: Uuid) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .rev()
            .filter(|d| d.collection == collection && d.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get(&self, collection: &str, user_id: Uuid, id: Uuid) -> Result<Option<Document>, StoreError> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .find(|d| d.id == id && d.collection == collection && d.user_id == user_id)
            .cloned())
    }

    async fn replace(
        &self,
        collection: &str,
        user_id: Uuid,
        id: Uuid,
        body: Value,
    ) -> Result<Option<Document>, StoreError> {
        let mut documents = self.documents.write().await;
        Ok(documents
            .iter_mut()
            .find(|d| d.id == id && d.collection == collection && d.user_id == user_id)
            .map(|d| {
                d.body = body;
                d.updated_at = Utc::now();
                d.clone()
            }))
    }

    async fn delete(&self, collection: &str, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|d| !(d.id == id && d.collection == collection && d.user_id == user_id));
        Ok(documents.len() != before)
    }
}
