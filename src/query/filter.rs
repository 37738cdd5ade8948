//! Typed filters parsed once from the query string, and the predicate they form.

use crate::error::AppError;
use crate::model::Pokemon;
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

/// Recognized filters. Unknown query keys never reach this struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stats: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_stats: Option<i32>,
}

impl PokemonFilter {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, AppError> {
        Ok(PokemonFilter {
            name: text_param(params, "name"),
            type_tag: text_param(params, "type"),
            generation: number_param(params, "generation")?,
            min_stats: number_param(params, "minStats")?,
            max_stats: number_param(params, "maxStats")?,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == PokemonFilter::default()
    }

    pub fn matches(&self, p: &Pokemon) -> bool {
        if let Some(name) = &self.name {
            if !contains_ignore_case(&p.name, name) {
                return false;
            }
        }
        if let Some(tag) = &self.type_tag {
            if !p.types.iter().any(|t| t == tag) {
                return false;
            }
        }
        if let Some(generation) = self.generation {
            if p.generation != generation {
                return false;
            }
        }
        if let Some(min) = self.min_stats {
            if p.stats.total < min {
                return false;
            }
        }
        if let Some(max) = self.max_stats {
            if p.stats.total > max {
                return false;
            }
        }
        true
    }
}

/// Filters AND-ed together, plus an optional free-text term matched against name, species or description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    pub filter: PokemonFilter,
    pub text: Option<String>,
}

impl Predicate {
    pub fn matches(&self, p: &Pokemon) -> bool {
        if !self.filter.matches(p) {
            return false;
        }
        match &self.text {
            Some(q) => {
                contains_ignore_case(&p.name, q)
                    || contains_ignore_case(&p.species, q)
                    || contains_ignore_case(&p.description, q)
            }
            None => true,
        }
    }
}

pub(crate) fn text_param(params: &HashMap<String, String>, key: &str) -> Option<String> {
    params
        .get(key)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a numeric parameter. Absent or blank is `None`; anything unparseable is a 400.
pub(crate) fn number_param<T: FromStr>(
    params: &HashMap<String, String>,
    key: &str,
) -> Result<Option<T>, AppError> {
    match text_param(params, key) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("{} must be an integer, got '{}'", key, raw))),
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
