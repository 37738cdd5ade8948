//! Write-side validation: required fields on create, merge-then-validate on update.

use crate::error::AppError;
use crate::model::{GenderRatio, Pokemon, PokemonDraft, PokemonInput, StatBlock, StatsInput};

const DEFAULT_CAPTURE_RATE: i32 = 45;
const DEFAULT_HABITAT: &str = "unknown";
const MAX_BASE_STAT: i32 = 255;
const MAX_CAPTURE_RATE: i32 = 255;

pub struct PokemonValidator;

impl PokemonValidator {
    /// Build a draft from a create body. `name`, `species`, `types`, `generation` and `stats` are required.
    pub fn for_create(input: PokemonInput) -> Result<PokemonDraft, AppError> {
        let name = required(input.name, "name")?;
        let species = required(input.species, "species")?;
        let types = required(input.types, "types")?;
        let generation = required(input.generation, "generation")?;
        let stats = required(input.stats, "stats")?;
        validate_stats(&stats)?;

        let draft = PokemonDraft {
            id: input.id,
            name,
            species,
            types,
            height: input.height.unwrap_or(0.0),
            weight: input.weight.unwrap_or(0.0),
            abilities: input.abilities.unwrap_or_default(),
            stats: StatBlock::from(stats),
            generation,
            evolution_chain: input.evolution_chain.unwrap_or_default(),
            habitat: input.habitat.unwrap_or_else(|| DEFAULT_HABITAT.to_string()),
            capture_rate: input.capture_rate.unwrap_or(DEFAULT_CAPTURE_RATE),
            base_experience: input.base_experience.unwrap_or(0),
            gender_ratio: input.gender_ratio.unwrap_or_default(),
            egg_groups: input.egg_groups.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
            sprite: input.sprite,
        };
        validate(draft)
    }

    /// Merge the provided fields onto `existing`. The stat total is recomputed only when `stats` is present.
    pub fn merge(existing: &Pokemon, input: PokemonInput) -> Result<PokemonDraft, AppError> {
        let mut draft = PokemonDraft::from(existing);
        if let Some(v) = input.name {
            draft.name = v;
        }
        if let Some(v) = input.species {
            draft.species = v;
        }
        if let Some(v) = input.types {
            draft.types = v;
        }
        if let Some(v) = input.height {
            draft.height = v;
        }
        if let Some(v) = input.weight {
            draft.weight = v;
        }
        if let Some(v) = input.abilities {
            draft.abilities = v;
        }
        if let Some(stats) = input.stats {
            validate_stats(&stats)?;
            draft.stats = StatBlock::from(stats);
        }
        if let Some(v) = input.generation {
            draft.generation = v;
        }
        if let Some(v) = input.evolution_chain {
            draft.evolution_chain = v;
        }
        if let Some(v) = input.habitat {
            draft.habitat = v;
        }
        if let Some(v) = input.capture_rate {
            draft.capture_rate = v;
        }
        if let Some(v) = input.base_experience {
            draft.base_experience = v;
        }
        if let Some(v) = input.gender_ratio {
            draft.gender_ratio = v;
        }
        if let Some(v) = input.egg_groups {
            draft.egg_groups = v;
        }
        if let Some(v) = input.description {
            draft.description = v;
        }
        if input.sprite.is_some() {
            draft.sprite = input.sprite;
        }
        validate(draft)
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("{} is required", field)))
}

fn validate_stats(stats: &StatsInput) -> Result<(), AppError> {
    for (name, value) in stats.named() {
        if !(0..=MAX_BASE_STAT).contains(&value) {
            return Err(AppError::Validation(format!(
                "stats.{} must be between 0 and {}",
                name, MAX_BASE_STAT
            )));
        }
    }
    Ok(())
}

/// Trim, drop blanks, and dedupe keeping first occurrence.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

fn validate(mut draft: PokemonDraft) -> Result<PokemonDraft, AppError> {
    draft.name = draft.name.trim().to_string();
    draft.species = draft.species.trim().to_string();
    draft.types = normalize_tags(draft.types);
    draft.abilities = normalize_tags(draft.abilities);
    draft.egg_groups = normalize_tags(draft.egg_groups);
    draft.sprite = draft.sprite.filter(|s| !s.trim().is_empty());

    if draft.name.is_empty() {
        return Err(AppError::Validation("name must not be empty".into()));
    }
    if draft.species.is_empty() {
        return Err(AppError::Validation("species must not be empty".into()));
    }
    if draft.types.is_empty() {
        return Err(AppError::Validation("types must contain at least one type".into()));
    }
    if let Some(id) = draft.id {
        if id < 1 {
            return Err(AppError::Validation("id must be at least 1".into()));
        }
    }
    if draft.generation < 1 {
        return Err(AppError::Validation("generation must be at least 1".into()));
    }
    for (field, value) in [("height", draft.height), ("weight", draft.weight)] {
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::Validation(format!("{} must be a non-negative number", field)));
        }
    }
    if !(0..=MAX_CAPTURE_RATE).contains(&draft.capture_rate) {
        return Err(AppError::Validation(format!(
            "captureRate must be between 0 and {}",
            MAX_CAPTURE_RATE
        )));
    }
    if draft.base_experience < 0 {
        return Err(AppError::Validation("baseExperience must be at least 0".into()));
    }
    if draft.evolution_chain.iter().any(|id| *id < 1) {
        return Err(AppError::Validation("evolutionChain ids must be at least 1".into()));
    }
    validate_gender_ratio(&draft.gender_ratio)?;
    Ok(draft)
}

fn validate_gender_ratio(ratio: &GenderRatio) -> Result<(), AppError> {
    let in_range = |v: f64| v.is_finite() && (0.0..=100.0).contains(&v);
    if !in_range(ratio.male) || !in_range(ratio.female) {
        return Err(AppError::Validation(
            "genderRatio values must be between 0 and 100".into(),
        ));
    }
    if (ratio.male + ratio.female - 100.0).abs() > 1e-6 {
        return Err(AppError::Validation("genderRatio must sum to 100".into()));
    }
    Ok(())
}
