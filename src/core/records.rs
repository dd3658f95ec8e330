//! Typed helpers over the untyped [`Database`] port.

use crate::domain::ports::{Database, Filter};
use crate::utils::error::{AppError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub async fn insert_row<T: Serialize + Sync>(
    database: &dyn Database,
    table: &str,
    row: &T,
) -> Result<Value> {
    database.insert(table, serde_json::to_value(row)?).await
}

/// Reads exactly one row by primary key.
pub async fn fetch_by_id(
    database: &dyn Database,
    table: &str,
    entity: &str,
    id: &str,
) -> Result<Value> {
    database
        .select(table, &[Filter::eq("id", id)])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::not_found(entity, id))
}

pub fn decode<T: DeserializeOwned>(row: &Value) -> Result<T> {
    Ok(serde_json::from_value(row.clone())?)
}

pub fn row_id(row: &Value) -> Result<String> {
    match row.get("id") {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(AppError::ProcessingError {
            message: "inserted row has no id".to_string(),
        }),
    }
}
