//! In-process store with the same semantics as the PostgreSQL one. Used by tests and `STORAGE_BACKEND=memory`.

use super::{duplicate_id, duplicate_name, seed, Merge, PokemonStore};
use crate::error::AppError;
use crate::model::{Pokemon, PokemonDraft, PokemonType};
use crate::query::{Found, ListQuery};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    pokemon: BTreeMap<i32, Pokemon>,
    types: BTreeMap<String, PokemonType>,
    last_id: i32,
}

impl Tables {
    fn name_taken(&self, name: &str, except: Option<i32>) -> bool {
        self.pokemon
            .values()
            .any(|p| p.name == name && Some(p.id) != except)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `types` table holds the canonical chart.
    pub fn with_default_types() -> Self {
        let store = Self::default();
        if let Ok(mut tables) = store.tables.write() {
            for t in seed::default_types() {
                tables.types.insert(t.name.clone(), t);
            }
        }
        store
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|_| AppError::Internal("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::Internal("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl PokemonStore for MemoryStore {
    async fn find(&self, query: &ListQuery) -> Result<Found<Pokemon>, AppError> {
        let tables = self.read()?;
        let mut matched: Vec<&Pokemon> = tables
            .pokemon
            .values()
            .filter(|p| query.predicate.matches(p))
            .collect();
        matched.sort_by(|a, b| query.sort.compare(a, b));
        let total = matched.len() as u64;
        let items = match query.page {
            Some(page) => matched
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.limit as usize)
                .cloned()
                .collect(),
            None => matched.into_iter().cloned().collect(),
        };
        Ok(Found { items, total })
    }

    async fn get(&self, id: i32) -> Result<Option<Pokemon>, AppError> {
        Ok(self.read()?.pokemon.get(&id).cloned())
    }

    async fn create(&self, draft: PokemonDraft) -> Result<Pokemon, AppError> {
        let mut tables = self.write()?;
        if tables.name_taken(&draft.name, None) {
            return Err(duplicate_name(&draft.name));
        }
        let id = match draft.id {
            Some(id) if tables.pokemon.contains_key(&id) => return Err(duplicate_id(id)),
            Some(id) => id,
            None => tables
                .last_id
                .checked_add(1)
                .ok_or_else(|| AppError::Validation("id space exhausted".into()))?,
        };
        tables.last_id = tables.last_id.max(id);
        let now = Utc::now();
        let pokemon = draft.into_pokemon(id, now, now);
        tables.pokemon.insert(id, pokemon.clone());
        Ok(pokemon)
    }

    async fn update(&self, id: i32, merge: Merge<'_>) -> Result<Option<Pokemon>, AppError> {
        let mut tables = self.write()?;
        let Some(existing) = tables.pokemon.get(&id) else {
            return Ok(None);
        };
        let created_at = existing.created_at;
        let draft = merge(existing)?;
        if tables.name_taken(&draft.name, Some(id)) {
            return Err(duplicate_name(&draft.name));
        }
        let updated = draft.into_pokemon(id, created_at, Utc::now());
        tables.pokemon.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<Option<Pokemon>, AppError> {
        Ok(self.write()?.pokemon.remove(&id))
    }

    async fn list_types(&self) -> Result<Vec<PokemonType>, AppError> {
        Ok(self.read()?.types.values().cloned().collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }
}
