use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::server::ServerSettings;

/// Which key-value backend holds the heroes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Redis,
    Memory,
}

impl FromStr for StorageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(StorageKind::Redis),
            "memory" => Ok(StorageKind::Memory),
            other => bail!("STORAGE_BACKEND must be one of: redis, memory, got '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub service_host: String,
    pub service_port: u16,
    pub storage: StorageKind,
    pub db_host: String,
    pub db_port: u16,
    pub db_password: Option<String>,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub shutdown_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let service_port = parse_or(&lookup, "APP_PORT", 3001u16)
            .context("APP_PORT must be a valid port number (0-65535)")?;

        let storage = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageKind>()?,
            None => StorageKind::Redis,
        };

        let db_host = lookup("DB_HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let db_port = parse_or(&lookup, "DB_PORT", 6379u16)
            .context("DB_PORT must be a valid port number (0-65535)")?;

        let db_password = lookup("DB_PASSWORD").filter(|p| !p.is_empty());

        let read_timeout = parse_or(&lookup, "READ_TIMEOUT_MS", 1000u64)
            .map(Duration::from_millis)
            .context("READ_TIMEOUT_MS must be a whole number of milliseconds")?;

        let write_timeout = parse_or(&lookup, "WRITE_TIMEOUT_MS", 1000u64)
            .map(Duration::from_millis)
            .context("WRITE_TIMEOUT_MS must be a whole number of milliseconds")?;

        let shutdown_timeout = parse_or(&lookup, "SHUTDOWN_TIMEOUT_SECS", 5u64)
            .map(Duration::from_secs)
            .context("SHUTDOWN_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            service_host,
            service_port,
            storage,
            db_host,
            db_port,
            db_password,
            read_timeout,
            write_timeout,
            shutdown_timeout,
        })
    }

    pub fn server_settings(&self) -> ServerSettings {
        ServerSettings {
            host: self.service_host.clone(),
            port: self.service_port,
            read_timeout: self.read_timeout,
            write_timeout: self.write_timeout,
            shutdown_timeout: self.shutdown_timeout,
        }
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Storage backend: {:?}", self.storage);
        if self.storage == StorageKind::Redis {
            tracing::info!(
                "  Redis: {}:{} (password {})",
                self.db_host,
                self.db_port,
                if self.db_password.is_some() { "set" } else { "unset" }
            );
        }
        tracing::info!(
            "  Read timeout: {:?}, write timeout: {:?}",
            self.read_timeout,
            self.write_timeout
        );
        tracing::info!("  Shutdown grace period: {:?}", self.shutdown_timeout);
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value '{}' for {}", raw, key)),
        None => Ok(default),
    }
}
