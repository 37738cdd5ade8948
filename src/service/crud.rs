//! Pokemon CRUD on top of a [`PokemonStore`]: validation in, not-found mapping out.

use super::validation::PokemonValidator;
use crate::error::AppError;
use crate::model::{Pokemon, PokemonInput};
use crate::query::{Found, ListQuery};
use crate::store::PokemonStore;

pub struct PokemonService;

impl PokemonService {
    pub async fn list(store: &dyn PokemonStore, query: &ListQuery) -> Result<Found<Pokemon>, AppError> {
        store.find(query).await
    }

    pub async fn read(store: &dyn PokemonStore, id: i32) -> Result<Pokemon, AppError> {
        store
            .get(id)
            .await?
            .ok_or_else(|| AppError::pokemon_not_found(id))
    }

    /// Validate and insert; the stat total is computed from the six named stats.
    pub async fn create(store: &dyn PokemonStore, input: PokemonInput) -> Result<Pokemon, AppError> {
        let draft = PokemonValidator::for_create(input)?;
        let created = store.create(draft).await?;
        tracing::info!(id = created.id, name = %created.name, "pokemon created");
        Ok(created)
    }

    /// Merge `input` onto the stored entity and validate the result before writing.
    pub async fn update(store: &dyn PokemonStore, id: i32, input: PokemonInput) -> Result<Pokemon, AppError> {
        let merge = move |existing: &Pokemon| PokemonValidator::merge(existing, input.clone());
        let updated = store
            .update(id, &merge)
            .await?
            .ok_or_else(|| AppError::pokemon_not_found(id))?;
        tracing::info!(id, "pokemon updated");
        Ok(updated)
    }

    pub async fn delete(store: &dyn PokemonStore, id: i32) -> Result<Pokemon, AppError> {
        let deleted = store
            .delete(id)
            .await?
            .ok_or_else(|| AppError::pokemon_not_found(id))?;
        tracing::info!(id, "pokemon deleted");
        Ok(deleted)
    }
}
