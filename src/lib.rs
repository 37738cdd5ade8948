//! Pokedex API: REST CRUD service for Pokemon records over PostgreSQL.

pub mod case;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod query;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{AppConfig, Environment, StorageBackend};
pub use error::{set_verbose_errors, AppError, ConfigError};
pub use model::{Pokemon, PokemonInput, PokemonType, StatBlock};
pub use routes::app;
pub use service::PokemonService;
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, PokemonStore};
