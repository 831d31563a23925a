//! Compiles equality filter documents into SQL `WHERE` clauses.

use serde_json::Value;
use sqlx::query::QueryAs;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite};

use crate::errors::{AppError, AppResult};
use crate::tenant::Filter;

#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Maps each filter field through `columns` (field name -> column name).
/// Unknown fields and non-scalar values are rejected; `null` becomes `IS NULL`.
pub fn compile_filter(filter: &Filter, columns: &[(&str, &str)]) -> AppResult<WhereClause> {
    let mut clauses = Vec::with_capacity(filter.len());
    let mut params = Vec::new();

    for (field, value) in filter {
        let column = columns
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, column)| *column)
            .ok_or_else(|| AppError::bad_request(format!("unknown filter field: {field}")))?;

        match value {
            Value::Null => clauses.push(format!("{column} IS NULL")),
            Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                clauses.push(format!("{column} = ?"));
                params.push(value.clone());
            }
            Value::Array(_) | Value::Object(_) => {
                return Err(AppError::bad_request(format!(
                    "filter field {field} must be a scalar"
                )));
            }
        }
    }

    let sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };

    Ok(WhereClause { sql, params })
}

pub fn bind_param_query_as<'q, O>(
    q: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    v: &'q Value,
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>>
where
    O: for<'r> FromRow<'r, SqliteRow>,
{
    match v {
        Value::Null => q.bind(Option::<String>::None),
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        // compile_filter never emits these
        Value::Array(_) | Value::Object(_) => q,
    }
}
