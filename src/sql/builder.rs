//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for the `pokemon` and `types` tables.
//! Identifiers are constants; every client-supplied value goes through a placeholder.

use super::params::PgBindValue;
use crate::model::{PokemonDraft, PokemonType};
use crate::query::{PageRequest, Predicate, Sort, SortField};

pub const POKEMON_TABLE: &str = "pokemon";
pub const TYPES_TABLE: &str = "types";

const POKEMON_COLUMNS: &str = "id, name, species, types, height, weight, abilities, stats, generation, \
     evolution_chain, habitat, capture_rate, base_experience, gender_ratio, egg_groups, description, \
     sprite, created_at, updated_at";

const TOTAL_EXPR: &str = "(stats->>'total')::int";

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a value and return its placeholder, cast to `pg_type`.
    fn push_param(&mut self, v: PgBindValue, pg_type: &str) -> String {
        self.params.push(v);
        format!("${}::{}", self.params.len(), pg_type)
    }
}

/// Escape `%`, `_` and `\` so the term matches literally inside `ILIKE '%…%'`.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn contains_pattern(term: &str) -> PgBindValue {
    PgBindValue::Text(format!("%{}%", escape_like(term)))
}

/// WHERE clause (with leading space) for the predicate, or empty when it has no terms.
fn where_clause(q: &mut QueryBuf, predicate: &Predicate) -> String {
    let f = &predicate.filter;
    let mut parts = Vec::new();
    if let Some(name) = &f.name {
        let ph = q.push_param(contains_pattern(name), "text");
        parts.push(format!("name ILIKE {}", ph));
    }
    if let Some(tag) = &f.type_tag {
        let ph = q.push_param(PgBindValue::Text(tag.clone()), "text");
        parts.push(format!("{} = ANY(types)", ph));
    }
    if let Some(generation) = f.generation {
        let ph = q.push_param(PgBindValue::Int(generation), "int");
        parts.push(format!("generation = {}", ph));
    }
    if let Some(min) = f.min_stats {
        let ph = q.push_param(PgBindValue::Int(min), "int");
        parts.push(format!("{} >= {}", TOTAL_EXPR, ph));
    }
    if let Some(max) = f.max_stats {
        let ph = q.push_param(PgBindValue::Int(max), "int");
        parts.push(format!("{} <= {}", TOTAL_EXPR, ph));
    }
    if let Some(text) = &predicate.text {
        let ph = q.push_param(contains_pattern(text), "text");
        parts.push(format!(
            "(name ILIKE {ph} OR species ILIKE {ph} OR description ILIKE {ph})"
        ));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" AND "))
    }
}

fn sort_expr(field: SortField) -> &'static str {
    match field {
        SortField::Id => "id",
        SortField::Name => "name",
        SortField::Species => "species",
        SortField::Generation => "generation",
        SortField::Height => "height",
        SortField::Weight => "weight",
        SortField::CaptureRate => "capture_rate",
        SortField::BaseExperience => "base_experience",
        SortField::Habitat => "habitat",
        SortField::Total => TOTAL_EXPR,
    }
}

/// SELECT rows matching the predicate, windowed to `page` when given. Ties on the sort field are broken by id.
pub fn select_page(predicate: &Predicate, sort: &Sort, page: Option<&PageRequest>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = where_clause(&mut q, predicate);
    let order_clause = if sort.field == SortField::Id {
        format!(" ORDER BY id {}", sort.order.as_sql())
    } else {
        format!(" ORDER BY {} {}, id ASC", sort_expr(sort.field), sort.order.as_sql())
    };
    let window = match page {
        Some(page) => {
            let limit_ph = q.push_param(PgBindValue::BigInt(page.limit as i64), "bigint");
            let offset_ph = q.push_param(PgBindValue::BigInt(page.offset() as i64), "bigint");
            format!(" LIMIT {} OFFSET {}", limit_ph, offset_ph)
        }
        None => String::new(),
    };
    q.sql = format!(
        "SELECT {} FROM {}{}{}{}",
        POKEMON_COLUMNS, POKEMON_TABLE, where_clause, order_clause, window
    );
    q
}

/// SELECT COUNT(*) of rows matching the predicate.
pub fn count(predicate: &Predicate) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = where_clause(&mut q, predicate);
    q.sql = format!("SELECT COUNT(*) FROM {}{}", POKEMON_TABLE, where_clause);
    q
}

/// SELECT by primary key; `for_update` locks the row for the surrounding transaction.
pub fn select_by_id(id: i32, for_update: bool) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(PgBindValue::Int(id), "int");
    let lock = if for_update { " FOR UPDATE" } else { "" };
    q.sql = format!(
        "SELECT {} FROM {} WHERE id = {}{}",
        POKEMON_COLUMNS, POKEMON_TABLE, ph, lock
    );
    q
}

/// Column/value pairs shared by INSERT and UPDATE (everything but id and timestamps).
fn draft_values(q: &mut QueryBuf, draft: &PokemonDraft) -> Vec<(&'static str, String)> {
    let stats = serde_json::to_value(draft.stats).unwrap_or(serde_json::Value::Null);
    let gender_ratio = serde_json::to_value(draft.gender_ratio).unwrap_or(serde_json::Value::Null);
    vec![
        ("name", q.push_param(PgBindValue::Text(draft.name.clone()), "text")),
        ("species", q.push_param(PgBindValue::Text(draft.species.clone()), "text")),
        ("types", q.push_param(PgBindValue::TextArray(draft.types.clone()), "text[]")),
        ("height", q.push_param(PgBindValue::Float(draft.height), "float8")),
        ("weight", q.push_param(PgBindValue::Float(draft.weight), "float8")),
        ("abilities", q.push_param(PgBindValue::TextArray(draft.abilities.clone()), "text[]")),
        ("stats", q.push_param(PgBindValue::Json(stats), "jsonb")),
        ("generation", q.push_param(PgBindValue::Int(draft.generation), "int")),
        ("evolution_chain", q.push_param(PgBindValue::IntArray(draft.evolution_chain.clone()), "int[]")),
        ("habitat", q.push_param(PgBindValue::Text(draft.habitat.clone()), "text")),
        ("capture_rate", q.push_param(PgBindValue::Int(draft.capture_rate), "int")),
        ("base_experience", q.push_param(PgBindValue::Int(draft.base_experience), "int")),
        ("gender_ratio", q.push_param(PgBindValue::Json(gender_ratio), "jsonb")),
        ("egg_groups", q.push_param(PgBindValue::TextArray(draft.egg_groups.clone()), "text[]")),
        ("description", q.push_param(PgBindValue::Text(draft.description.clone()), "text")),
        ("sprite", q.push_param(draft.sprite.clone().into(), "text")),
    ]
}

/// INSERT a draft. The id column is only written when the draft carries one.
pub fn insert(draft: &PokemonDraft) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut values = draft_values(&mut q, draft);
    if let Some(id) = draft.id {
        let ph = q.push_param(PgBindValue::Int(id), "int");
        values.insert(0, ("id", ph));
    }
    let (cols, placeholders): (Vec<_>, Vec<_>) = values.into_iter().unzip();
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        POKEMON_TABLE,
        cols.join(", "),
        placeholders.join(", "),
        POKEMON_COLUMNS
    );
    q
}

/// Move the id sequence past any explicitly inserted id so generated ids do not collide.
pub fn sync_id_sequence() -> String {
    format!(
        "SELECT setval(pg_get_serial_sequence('{t}', 'id'), GREATEST((SELECT MAX(id) FROM {t}), 1))",
        t = POKEMON_TABLE
    )
}

/// UPDATE every writable column of one row from the merged draft; bumps updated_at.
pub fn update(id: i32, draft: &PokemonDraft) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets: Vec<String> = draft_values(&mut q, draft)
        .into_iter()
        .map(|(col, ph)| format!("{} = {}", col, ph))
        .collect();
    sets.push("updated_at = NOW()".to_string());
    let id_ph = q.push_param(PgBindValue::Int(id), "int");
    q.sql = format!(
        "UPDATE {} SET {} WHERE id = {} RETURNING {}",
        POKEMON_TABLE,
        sets.join(", "),
        id_ph,
        POKEMON_COLUMNS
    );
    q
}

/// DELETE by id, returning the removed row.
pub fn delete(id: i32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(PgBindValue::Int(id), "int");
    q.sql = format!(
        "DELETE FROM {} WHERE id = {} RETURNING {}",
        POKEMON_TABLE, ph, POKEMON_COLUMNS
    );
    q
}

pub fn select_types() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT name, weaknesses, strengths, immunities FROM {} ORDER BY name",
        TYPES_TABLE
    );
    q
}

/// INSERT one type row; existing names are left untouched.
pub fn insert_type(t: &PokemonType) -> QueryBuf {
    let mut q = QueryBuf::new();
    let name = q.push_param(PgBindValue::Text(t.name.clone()), "text");
    let weaknesses = q.push_param(PgBindValue::TextArray(t.weaknesses.clone()), "text[]");
    let strengths = q.push_param(PgBindValue::TextArray(t.strengths.clone()), "text[]");
    let immunities = q.push_param(PgBindValue::TextArray(t.immunities.clone()), "text[]");
    q.sql = format!(
        "INSERT INTO {} (name, weaknesses, strengths, immunities) VALUES ({}, {}, {}, {}) ON CONFLICT (name) DO NOTHING",
        TYPES_TABLE, name, weaknesses, strengths, immunities
    );
    q
}
