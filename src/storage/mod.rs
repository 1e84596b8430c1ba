//! Hero persistence.
//!
//! [`HeroStore`] is the capability handlers depend on. [`KvHeroStore`] maps it
//! onto any [`KvBackend`]: Redis in production, an in-process map otherwise.

pub mod keys;
pub mod kv;
pub mod memory;
pub mod redis_backend;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{Config, StorageKind};
use crate::models::Hero;

pub use kv::{KvBackend, KvHeroStore};
pub use memory::MemoryBackend;
pub use redis_backend::RedisBackend;

/// Outcome kinds callers branch on
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("hero {0} does not exist")]
    HeroNotExist(String),
    #[error("nothing to delete for hero {0}")]
    NothingToDelete(String),
    #[error("invalid hero: {0}")]
    Validation(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[async_trait]
pub trait HeroStore: Send + Sync {
    /// Liveness token reported by the backend
    async fn status(&self) -> StorageResult<String>;

    async fn list_heroes(&self) -> StorageResult<Vec<Hero>>;

    async fn get_hero(&self, id: &str) -> StorageResult<Hero>;

    /// Upsert: an existing hero with the same id is overwritten
    async fn create_hero(&self, id: &str, name: &str) -> StorageResult<()>;

    async fn delete_hero(&self, id: &str) -> StorageResult<()>;
}

/// Build the store selected by `config`
pub async fn connect(config: &Config) -> Result<Arc<dyn HeroStore>> {
    match config.storage {
        StorageKind::Redis => {
            let backend = RedisBackend::connect(
                &config.db_host,
                config.db_port,
                config.db_password.as_deref(),
            )
            .await?;
            Ok(Arc::new(KvHeroStore::new(backend)))
        }
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage, heroes will not survive a restart");
            Ok(Arc::new(KvHeroStore::new(MemoryBackend::new())))
        }
    }
}
