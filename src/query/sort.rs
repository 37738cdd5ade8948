//! Sort field whitelist and direction.

use super::filter::text_param;
use crate::case::to_snake_case;
use crate::error::AppError;
use crate::model::Pokemon;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Id,
    Name,
    Species,
    Generation,
    Height,
    Weight,
    CaptureRate,
    BaseExperience,
    Habitat,
    Total,
}

impl SortField {
    /// Accepts the camelCase API name or the snake_case column name.
    pub fn parse(raw: &str) -> Option<Self> {
        Some(match to_snake_case(raw.trim()).as_str() {
            "id" => SortField::Id,
            "name" => SortField::Name,
            "species" => SortField::Species,
            "generation" => SortField::Generation,
            "height" => SortField::Height,
            "weight" => SortField::Weight,
            "capture_rate" => SortField::CaptureRate,
            "base_experience" => SortField::BaseExperience,
            "habitat" => SortField::Habitat,
            "total" | "stats.total" => SortField::Total,
            _ => return None,
        })
    }

    pub fn api_name(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Species => "species",
            SortField::Generation => "generation",
            SortField::Height => "height",
            SortField::Weight => "weight",
            SortField::CaptureRate => "captureRate",
            SortField::BaseExperience => "baseExperience",
            SortField::Habitat => "habitat",
            SortField::Total => "total",
        }
    }

    fn compare(&self, a: &Pokemon, b: &Pokemon) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Species => a.species.cmp(&b.species),
            SortField::Generation => a.generation.cmp(&b.generation),
            SortField::Height => a.height.total_cmp(&b.height),
            SortField::Weight => a.weight.total_cmp(&b.weight),
            SortField::CaptureRate => a.capture_rate.cmp(&b.capture_rate),
            SortField::BaseExperience => a.base_experience.cmp(&b.base_experience),
            SortField::Habitat => a.habitat.cmp(&b.habitat),
            SortField::Total => a.stats.total.cmp(&b.stats.total),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ASC" => Some(SortOrder::Asc),
            "DESC" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Sort {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let field = match text_param(params, "sort") {
            None => SortField::default(),
            Some(raw) => SortField::parse(&raw)
                .ok_or_else(|| AppError::BadRequest(format!("cannot sort by '{}'", raw)))?,
        };
        let order = match text_param(params, "order") {
            None => SortOrder::default(),
            Some(raw) => SortOrder::parse(&raw)
                .ok_or_else(|| AppError::BadRequest(format!("order must be ASC or DESC, got '{}'", raw)))?,
        };
        Ok(Sort { field, order })
    }

    /// Ordering used by in-memory stores: the chosen field, ties broken by ascending id.
    pub fn compare(&self, a: &Pokemon, b: &Pokemon) -> Ordering {
        let primary = match self.order {
            SortOrder::Asc => self.field.compare(a, b),
            SortOrder::Desc => self.field.compare(b, a),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}
