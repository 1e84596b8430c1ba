use crate::storage::HeroStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub heroes: Arc<dyn HeroStore>,
}

impl AppState {
    pub fn new(heroes: Arc<dyn HeroStore>) -> Self {
        Self { heroes }
    }
}
