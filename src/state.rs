//! Shared application state for all routes.

use crate::store::PokemonStore;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PokemonStore>,
    /// Process start, reported as `uptime` by the health check.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn PokemonStore>) -> Self {
        AppState {
            store,
            started_at: Instant::now(),
        }
    }
}
