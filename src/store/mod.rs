//! Data store abstraction with PostgreSQL and in-memory implementations.

mod memory;
mod postgres;
pub mod seed;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use crate::error::AppError;
use crate::model::{Pokemon, PokemonDraft, PokemonType};
use crate::query::{Found, ListQuery};
use async_trait::async_trait;

/// Turns the stored entity into the draft to write back. Runs while the row is held by the store.
pub type Merge<'a> = &'a (dyn Fn(&Pokemon) -> Result<PokemonDraft, AppError> + Send + Sync);

#[async_trait]
pub trait PokemonStore: Send + Sync {
    /// One page of rows matching the predicate, in the requested order, with the overall match count.
    async fn find(&self, query: &ListQuery) -> Result<Found<Pokemon>, AppError>;

    async fn get(&self, id: i32) -> Result<Option<Pokemon>, AppError>;

    /// Insert a validated draft. Duplicate names or ids are a `Validation` error.
    async fn create(&self, draft: PokemonDraft) -> Result<Pokemon, AppError>;

    /// Read-modify-write of one row. `None` when the id does not exist.
    async fn update(&self, id: i32, merge: Merge<'_>) -> Result<Option<Pokemon>, AppError>;

    /// Remove one row and return it. `None` when the id does not exist.
    async fn delete(&self, id: i32) -> Result<Option<Pokemon>, AppError>;

    /// Every type row, ordered by name.
    async fn list_types(&self) -> Result<Vec<PokemonType>, AppError>;

    /// Cheap connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), AppError>;
}

pub(crate) fn duplicate_name(name: &str) -> AppError {
    AppError::Validation(format!("a Pokemon named '{}' already exists", name))
}

pub(crate) fn duplicate_id(id: i32) -> AppError {
    AppError::Validation(format!("a Pokemon with id {} already exists", id))
}
