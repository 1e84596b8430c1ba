use std::collections::HashSet;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::keys::{self, SEPARATOR};
use super::{HeroStore, StorageError, StorageResult};
use crate::models::Hero;

/// Number of keys requested per SCAN round trip
pub const SCAN_BATCH: usize = 100;

/// Primitive key-value operations a hero store needs
///
/// `scan` follows the Redis cursor protocol: start at `0`, feed back the
/// returned cursor, stop when it comes back as `0`. A batch may be empty
/// while the cursor is still non-zero, and a key may be returned more than
/// once.
#[async_trait]
pub trait KvBackend: Send + Sync {
    async fn ping(&self) -> Result<String>;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set without expiry
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Returns the number of keys removed
    async fn del(&self, key: &str) -> Result<u64>;

    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> Result<(u64, Vec<String>)>;
}

/// [`HeroStore`] over any key-value backend
pub struct KvHeroStore<B> {
    backend: B,
}

impl<B: KvBackend> KvHeroStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: KvBackend> HeroStore for KvHeroStore<B> {
    async fn status(&self) -> StorageResult<String> {
        let token = self.backend.ping().await.context("Failed to ping backend")?;
        Ok(token)
    }

    async fn list_heroes(&self) -> StorageResult<Vec<Hero>> {
        let pattern = keys::scan_pattern();
        let mut heroes = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = 0u64;

        loop {
            let (next, batch) = self
                .backend
                .scan(cursor, &pattern, SCAN_BATCH)
                .await
                .with_context(|| format!("Failed to scan hero keys at cursor {}", cursor))?;

            for key in batch {
                let Some(id) = keys::id_from_key(&key) else {
                    tracing::warn!("Skipping key outside the hero namespace: {}", key);
                    continue;
                };
                if !seen.insert(id.to_string()) {
                    continue;
                }

                let name = self
                    .backend
                    .get(&key)
                    .await
                    .with_context(|| format!("Failed to read key {}", key))?;

                match name {
                    Some(name) => heroes.push(Hero::new(id, name)),
                    // removed between SCAN and GET
                    None => tracing::debug!("Key vanished during listing: {}", key),
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        tracing::debug!("Listed {} heroes", heroes.len());
        Ok(heroes)
    }

    async fn get_hero(&self, id: &str) -> StorageResult<Hero> {
        let key = keys::hero_key(id);
        let name = self
            .backend
            .get(&key)
            .await
            .with_context(|| format!("Failed to read key {}", key))?;

        match name {
            Some(name) => {
                tracing::debug!("Read hero with id: {}", id);
                Ok(Hero::new(id, name))
            }
            None => Err(StorageError::HeroNotExist(id.to_string())),
        }
    }

    async fn create_hero(&self, id: &str, name: &str) -> StorageResult<()> {
        let hero = Hero::new(id, name);
        if !hero.is_valid() {
            return Err(StorageError::Validation(
                "id and name must not be empty".to_string(),
            ));
        }
        if id.contains(SEPARATOR) {
            return Err(StorageError::Validation(format!(
                "id must not contain '{}'",
                SEPARATOR
            )));
        }

        let key = keys::hero_key(id);
        self.backend
            .set(&key, name)
            .await
            .with_context(|| format!("Failed to write key {}", key))?;

        tracing::debug!("Stored hero with id: {}", id);
        Ok(())
    }

    async fn delete_hero(&self, id: &str) -> StorageResult<()> {
        let key = keys::hero_key(id);
        let removed = self
            .backend
            .del(&key)
            .await
            .with_context(|| format!("Failed to delete key {}", key))?;

        if removed == 0 {
            return Err(StorageError::NothingToDelete(id.to_string()));
        }

        tracing::debug!("Deleted hero with id: {}", id);
        Ok(())
    }
}
