//! Test doubles and request helpers shared by module tests.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes},
    http::{Method, Request, StatusCode},
};
use tower::ServiceExt;

use crate::app;
use crate::server::ServerSettings;
use crate::state::AppState;
use crate::storage::{KvBackend, KvHeroStore, MemoryBackend};

/// Backend whose every call fails as if the connection were down
pub struct FailingBackend;

#[async_trait]
impl KvBackend for FailingBackend {
    async fn ping(&self) -> Result<String> {
        bail!("connection refused")
    }

    async fn get(&self, _key: &str) -> Result<Option<String>> {
        bail!("connection refused")
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        bail!("connection refused")
    }

    async fn del(&self, _key: &str) -> Result<u64> {
        bail!("connection refused")
    }

    async fn scan(
        &self,
        _cursor: u64,
        _pattern: &str,
        _count: usize,
    ) -> Result<(u64, Vec<String>)> {
        bail!("connection refused")
    }
}

/// In-memory backend that answers every call after a delay
pub struct SlowBackend {
    inner: MemoryBackend,
    delay: Duration,
}

#[async_trait]
impl KvBackend for SlowBackend {
    async fn ping(&self) -> Result<String> {
        tokio::time::sleep(self.delay).await;
        self.inner.ping().await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.set(key, value).await
    }

    async fn del(&self, key: &str) -> Result<u64> {
        tokio::time::sleep(self.delay).await;
        self.inner.del(key).await
    }

    async fn scan(
        &self,
        cursor: u64,
        pattern: &str,
        count: usize,
    ) -> Result<(u64, Vec<String>)> {
        tokio::time::sleep(self.delay).await;
        self.inner.scan(cursor, pattern, count).await
    }
}

pub fn memory_state() -> AppState {
    AppState::new(Arc::new(KvHeroStore::new(MemoryBackend::new())))
}

pub fn failing_state() -> AppState {
    AppState::new(Arc::new(KvHeroStore::new(FailingBackend)))
}

pub fn slow_state(delay: Duration) -> AppState {
    AppState::new(Arc::new(KvHeroStore::new(SlowBackend {
        inner: MemoryBackend::new(),
        delay,
    })))
}

pub fn test_settings() -> ServerSettings {
    ServerSettings {
        host: "127.0.0.1".to_string(),
        port: 0,
        read_timeout: Duration::from_secs(1),
        write_timeout: Duration::from_secs(5),
        shutdown_timeout: Duration::from_secs(5),
    }
}

pub fn test_app(state: AppState) -> Router {
    app::router(state, &test_settings())
}

/// Send one request through the router and collect the response body
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Bytes) {
    let mut request = Request::builder().method(method).uri(uri);
    if body.is_some() {
        request = request.header("content-type", "application/json");
    }
    let request = request
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body)
}
