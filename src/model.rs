//! Pokemon and Type entities, plus the write-side input shared by create and update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Six base stats and their derived total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBlock {
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub special_attack: i32,
    pub special_defense: i32,
    pub speed: i32,
    pub total: i32,
}

/// Stat block as sent by clients. There is no `total`; a client-supplied one is dropped by serde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsInput {
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub special_attack: i32,
    pub special_defense: i32,
    pub speed: i32,
}

impl StatsInput {
    pub fn named(&self) -> [(&'static str, i32); 6] {
        [
            ("hp", self.hp),
            ("attack", self.attack),
            ("defense", self.defense),
            ("specialAttack", self.special_attack),
            ("specialDefense", self.special_defense),
            ("speed", self.speed),
        ]
    }
}

impl From<StatsInput> for StatBlock {
    fn from(s: StatsInput) -> Self {
        StatBlock {
            hp: s.hp,
            attack: s.attack,
            defense: s.defense,
            special_attack: s.special_attack,
            special_defense: s.special_defense,
            speed: s.speed,
            total: s.hp + s.attack + s.defense + s.special_attack + s.special_defense + s.speed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenderRatio {
    pub male: f64,
    pub female: f64,
}

impl Default for GenderRatio {
    fn default() -> Self {
        GenderRatio {
            male: 50.0,
            female: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pokemon {
    pub id: i32,
    pub name: String,
    pub species: String,
    pub types: Vec<String>,
    pub height: f64,
    pub weight: f64,
    pub abilities: Vec<String>,
    pub stats: StatBlock,
    pub generation: i32,
    pub evolution_chain: Vec<i32>,
    pub habitat: String,
    pub capture_rate: i32,
    pub base_experience: i32,
    pub gender_ratio: GenderRatio,
    pub egg_groups: Vec<String>,
    pub description: String,
    pub sprite: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for create and update. Every field is optional here; create enforces the
/// required ones, update merges whatever is present onto the stored entity.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonInput {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub species: Option<String>,
    pub types: Option<Vec<String>>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub abilities: Option<Vec<String>>,
    pub stats: Option<StatsInput>,
    pub generation: Option<i32>,
    pub evolution_chain: Option<Vec<i32>>,
    pub habitat: Option<String>,
    pub capture_rate: Option<i32>,
    pub base_experience: Option<i32>,
    pub gender_ratio: Option<GenderRatio>,
    pub egg_groups: Option<Vec<String>>,
    pub description: Option<String>,
    pub sprite: Option<String>,
}

/// A validated entity ready to be written. `id` is only set when the client chose one on create.
#[derive(Debug, Clone, PartialEq)]
pub struct PokemonDraft {
    pub id: Option<i32>,
    pub name: String,
    pub species: String,
    pub types: Vec<String>,
    pub height: f64,
    pub weight: f64,
    pub abilities: Vec<String>,
    pub stats: StatBlock,
    pub generation: i32,
    pub evolution_chain: Vec<i32>,
    pub habitat: String,
    pub capture_rate: i32,
    pub base_experience: i32,
    pub gender_ratio: GenderRatio,
    pub egg_groups: Vec<String>,
    pub description: String,
    pub sprite: Option<String>,
}

impl PokemonDraft {
    /// Materialize the draft with store-assigned id and timestamps.
    pub fn into_pokemon(self, id: i32, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Pokemon {
        Pokemon {
            id,
            name: self.name,
            species: self.species,
            types: self.types,
            height: self.height,
            weight: self.weight,
            abilities: self.abilities,
            stats: self.stats,
            generation: self.generation,
            evolution_chain: self.evolution_chain,
            habitat: self.habitat,
            capture_rate: self.capture_rate,
            base_experience: self.base_experience,
            gender_ratio: self.gender_ratio,
            egg_groups: self.egg_groups,
            description: self.description,
            sprite: self.sprite,
            created_at,
            updated_at,
        }
    }
}

impl From<&Pokemon> for PokemonDraft {
    fn from(p: &Pokemon) -> Self {
        PokemonDraft {
            id: Some(p.id),
            name: p.name.clone(),
            species: p.species.clone(),
            types: p.types.clone(),
            height: p.height,
            weight: p.weight,
            abilities: p.abilities.clone(),
            stats: p.stats,
            generation: p.generation,
            evolution_chain: p.evolution_chain.clone(),
            habitat: p.habitat.clone(),
            capture_rate: p.capture_rate,
            base_experience: p.base_experience,
            gender_ratio: p.gender_ratio,
            egg_groups: p.egg_groups.clone(),
            description: p.description.clone(),
            sprite: p.sprite.clone(),
        }
    }
}

/// Row of the `types` table. Type names referenced by a Pokemon need not exist here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PokemonType {
    pub name: String,
    pub weaknesses: Vec<String>,
    pub strengths: Vec<String>,
    pub immunities: Vec<String>,
}
