//! Typed values that can be bound to a PostgreSQL query built at runtime.

use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value bound to a dynamically assembled query. Each variant reports its own
/// PostgreSQL type so placeholders do not all have to be TEXT.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Null,
    Int(i32),
    BigInt(i64),
    Float(f64),
    Text(String),
    TextArray(Vec<String>),
    IntArray(Vec<i32>),
    Json(serde_json::Value),
}

impl From<Option<String>> for PgBindValue {
    fn from(v: Option<String>) -> Self {
        v.map(PgBindValue::Text).unwrap_or(PgBindValue::Null)
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            PgBindValue::Null => <Option<String> as Encode<Postgres>>::encode_by_ref(&None, buf)?,
            PgBindValue::Int(n) => <i32 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::BigInt(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::Float(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            PgBindValue::Text(s) => <String as Encode<Postgres>>::encode_by_ref(s, buf)?,
            PgBindValue::TextArray(v) => <Vec<String> as Encode<Postgres>>::encode_by_ref(v, buf)?,
            PgBindValue::IntArray(v) => <Vec<i32> as Encode<Postgres>>::encode_by_ref(v, buf)?,
            PgBindValue::Json(v) => <serde_json::Value as Encode<Postgres>>::encode_by_ref(v, buf)?,
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            PgBindValue::Null | PgBindValue::Text(_) => <String as Type<Postgres>>::type_info(),
            PgBindValue::Int(_) => <i32 as Type<Postgres>>::type_info(),
            PgBindValue::BigInt(_) => <i64 as Type<Postgres>>::type_info(),
            PgBindValue::Float(_) => <f64 as Type<Postgres>>::type_info(),
            PgBindValue::TextArray(_) => <Vec<String> as Type<Postgres>>::type_info(),
            PgBindValue::IntArray(_) => <Vec<i32> as Type<Postgres>>::type_info(),
            PgBindValue::Json(_) => <serde_json::Value as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}
