//! PostgreSQL store: pool, DDL ("create if absent"), type seeding, and CRUD over the builder's queries.

use super::{duplicate_id, duplicate_name, seed, Merge, PokemonStore};
use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::model::{GenderRatio, Pokemon, PokemonDraft, PokemonType, StatBlock};
use crate::query::{Found, ListQuery};
use crate::sql::{self, QueryBuf};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::types::Json;
use sqlx::{ConnectOptions, FromRow, Postgres};
use std::time::Duration;

const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS pokemon (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        species TEXT NOT NULL,
        types TEXT[] NOT NULL DEFAULT '{}',
        height DOUBLE PRECISION NOT NULL DEFAULT 0,
        weight DOUBLE PRECISION NOT NULL DEFAULT 0,
        abilities TEXT[] NOT NULL DEFAULT '{}',
        stats JSONB NOT NULL,
        generation INTEGER NOT NULL,
        evolution_chain INTEGER[] NOT NULL DEFAULT '{}',
        habitat TEXT NOT NULL DEFAULT 'unknown',
        capture_rate INTEGER NOT NULL DEFAULT 45,
        base_experience INTEGER NOT NULL DEFAULT 0,
        gender_ratio JSONB NOT NULL DEFAULT '{"male": 50, "female": 50}',
        egg_groups TEXT[] NOT NULL DEFAULT '{}',
        description TEXT NOT NULL DEFAULT '',
        sprite TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS pokemon_generation_idx ON pokemon (generation)",
    "CREATE INDEX IF NOT EXISTS pokemon_types_idx ON pokemon USING GIN (types)",
    r#"
    CREATE TABLE IF NOT EXISTS types (
        name TEXT PRIMARY KEY,
        weaknesses TEXT[] NOT NULL DEFAULT '{}',
        strengths TEXT[] NOT NULL DEFAULT '{}',
        immunities TEXT[] NOT NULL DEFAULT '{}'
    )
    "#,
];

#[derive(FromRow)]
struct PokemonRow {
    id: i32,
    name: String,
    species: String,
    types: Vec<String>,
    height: f64,
    weight: f64,
    abilities: Vec<String>,
    stats: Json<StatBlock>,
    generation: i32,
    evolution_chain: Vec<i32>,
    habitat: String,
    capture_rate: i32,
    base_experience: i32,
    gender_ratio: Json<GenderRatio>,
    egg_groups: Vec<String>,
    description: String,
    sprite: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PokemonRow> for Pokemon {
    fn from(r: PokemonRow) -> Self {
        Pokemon {
            id: r.id,
            name: r.name,
            species: r.species,
            types: r.types,
            height: r.height,
            weight: r.weight,
            abilities: r.abilities,
            stats: r.stats.0,
            generation: r.generation,
            evolution_chain: r.evolution_chain,
            habitat: r.habitat,
            capture_rate: r.capture_rate,
            base_experience: r.base_experience,
            gender_ratio: r.gender_ratio.0,
            egg_groups: r.egg_groups,
            description: r.description,
            sprite: r.sprite,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

fn query_rows<'q, O>(q: &'q QueryBuf) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_as::<_, O>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query
}

fn query_count(q: &QueryBuf) -> QueryScalar<'_, Postgres, i64, PgArguments> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let mut query = sqlx::query_scalar::<_, i64>(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query
}

/// Map constraint violations on insert/update to client errors; everything else stays a database error.
fn map_write_error(e: sqlx::Error, draft: &PokemonDraft, id: Option<i32>) -> AppError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return match (db.constraint(), id) {
                (Some("pokemon_pkey"), Some(id)) => duplicate_id(id),
                _ => duplicate_name(&draft.name),
            };
        }
        if db.is_check_violation() {
            return AppError::Validation(db.message().to_string());
        }
    }
    AppError::Db(e)
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open the bounded pool described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let opts = config
            .connect_options()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(opts)
            .await?;
        Ok(PgStore { pool })
    }

    /// Close the pool, waiting for checked-out connections to come back.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Create the `pokemon` and `types` tables and their indexes if absent.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        for ddl in DDL {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        tracing::info!("schema ready");
        Ok(())
    }

    /// Insert the canonical type chart when the `types` table is empty. Returns rows inserted.
    pub async fn seed_types_if_empty(&self) -> Result<u64, AppError> {
        let existing: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", sql::TYPES_TABLE))
            .fetch_one(&self.pool)
            .await?;
        if existing > 0 {
            return Ok(0);
        }
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0u64;
        for t in seed::default_types() {
            let q = sql::insert_type(&t);
            let mut query = sqlx::query(&q.sql);
            for p in &q.params {
                query = query.bind(p.clone());
            }
            inserted += query.execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;
        tracing::info!(inserted, "seeded types");
        Ok(inserted)
    }
}

#[async_trait]
impl PokemonStore for PgStore {
    async fn find(&self, query: &ListQuery) -> Result<Found<Pokemon>, AppError> {
        let count_q = sql::count(&query.predicate);
        let total = query_count(&count_q).fetch_one(&self.pool).await?;
        let page_q = sql::select_page(&query.predicate, &query.sort, query.page.as_ref());
        let rows: Vec<PokemonRow> = query_rows(&page_q).fetch_all(&self.pool).await?;
        Ok(Found {
            items: rows.into_iter().map(Pokemon::from).collect(),
            total: total.max(0) as u64,
        })
    }

    async fn get(&self, id: i32) -> Result<Option<Pokemon>, AppError> {
        let q = sql::select_by_id(id, false);
        let row: Option<PokemonRow> = query_rows(&q).fetch_optional(&self.pool).await?;
        Ok(row.map(Pokemon::from))
    }

    async fn create(&self, draft: PokemonDraft) -> Result<Pokemon, AppError> {
        let q = sql::insert(&draft);
        let mut tx = self.pool.begin().await?;
        let row: PokemonRow = query_rows(&q)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, &draft, draft.id))?;
        if draft.id.is_some() {
            sqlx::query(&sql::sync_id_sequence()).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(row.into())
    }

    async fn update(&self, id: i32, merge: Merge<'_>) -> Result<Option<Pokemon>, AppError> {
        let mut tx = self.pool.begin().await?;
        let select = sql::select_by_id(id, true);
        let Some(row) = query_rows::<PokemonRow>(&select).fetch_optional(&mut *tx).await? else {
            return Ok(None);
        };
        let draft = merge(&Pokemon::from(row))?;
        let q = sql::update(id, &draft);
        let row: PokemonRow = query_rows(&q)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, &draft, None))?;
        tx.commit().await?;
        Ok(Some(row.into()))
    }

    async fn delete(&self, id: i32) -> Result<Option<Pokemon>, AppError> {
        let q = sql::delete(id);
        let row: Option<PokemonRow> = query_rows(&q).fetch_optional(&self.pool).await?;
        Ok(row.map(Pokemon::from))
    }

    async fn list_types(&self) -> Result<Vec<PokemonType>, AppError> {
        let q = sql::select_types();
        Ok(query_rows::<PokemonType>(&q).fetch_all(&self.pool).await?)
    }

    async fn ping(&self) -> Result<(), AppError> {
        match tokio::time::timeout(HEALTH_PROBE_TIMEOUT, sqlx::query("SELECT 1").execute(&self.pool)).await {
            Ok(result) => result.map(|_| ()).map_err(AppError::from),
            Err(_) => Err(AppError::Internal(format!(
                "database did not answer within {}s",
                HEALTH_PROBE_TIMEOUT.as_secs()
            ))),
        }
    }
}

/// Ensure the target database exists; create it if not. Connects to the `postgres`
/// maintenance database to run CREATE DATABASE. Call before opening the main pool.
pub async fn ensure_database_exists(opts: &PgConnectOptions) -> Result<(), AppError> {
    let db_name = match opts.get_database() {
        Some(name) if !name.is_empty() && name != "postgres" => name.to_string(),
        _ => return Ok(()),
    };
    let mut conn = opts.clone().database("postgres").connect().await?;
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
