//! Hero CRUD service over a key-value store.
//!
//! - [`storage`]: the [`storage::HeroStore`] capability and its key-value backends
//! - [`handlers`]: HTTP handlers translating storage outcomes into responses
//! - [`middleware`]: request logging and the JSON gate on create
//! - [`app`]: route table and middleware chain
//! - [`server`]: listener lifecycle and graceful shutdown

pub mod api_doc;
pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;
pub mod storage;

#[cfg(test)]
mod testing;
