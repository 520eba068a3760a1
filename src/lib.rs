use config::Config;
use database::{DocumentStore, MemoryStore, UserRepository};
use std::sync::Arc;

pub mod common;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod result;
pub mod router;
pub mod routes;
pub mod utils;

pub use router::{create_app, create_router, with_layers};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserRepository>,
    pub documents: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        users: Arc<dyn UserRepository>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            config,
            users,
            documents,
        }
    }

    /// State backed by a fresh process-local store.
    pub fn in_memory(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(config, store.clone(), store)
    }
}
