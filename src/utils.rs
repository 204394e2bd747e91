use axum::http::StatusCode;
use std::sync::OnceLock;

use crate::constants::*;
use crate::database::{Db, get_user_db};

static CACHED_DATABASE_PATH: OnceLock<String> = OnceLock::new();

pub fn get_database_path() -> &'static str {
    CACHED_DATABASE_PATH.get_or_init(|| {
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string())
    })
}

pub async fn get_user_database(user_id: &str) -> Result<Db, (StatusCode, String)> {
    let data_path = get_database_path();
    get_user_db(data_path, user_id).await.map_err(|e| {
        tracing::error!("failed to open user database for {}: {}", user_id, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ERR_DATABASE_ACCESS.to_string(),
        )
    })
}

pub fn db_error() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ERR_DATABASE_OPERATION.to_string(),
    )
}

pub fn db_error_with_context(context: &str) -> (StatusCode, String) {
    tracing::error!("database error: {}", context);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Database error: {}", context),
    )
}

/// Rejects empty input and enforces character-count bounds on the trimmed
/// value. Lengths are counted in chars so emoji icons are measured as
/// intended rather than in bytes.
pub fn validate_string_length(
    value: &str,
    field_name: &str,
    min_length: usize,
    max_length: usize,
) -> Result<(), (StatusCode, String)> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("{} cannot be empty", field_name),
        ));
    }
    let length = trimmed.chars().count();
    if length < min_length {
        return Err((
            StatusCode::BAD_REQUEST,
            format!(
                "{} must be at least {} characters",
                field_name, min_length
            ),
        ));
    }
    if length > max_length {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("{} must be at most {} characters", field_name, max_length),
        ));
    }
    Ok(())
}

pub fn validate_limit(limit: Option<u32>, default: u32) -> Result<u32, (StatusCode, String)> {
    match limit {
        Some(l) => {
            if l == 0 {
                Err((
                    StatusCode::BAD_REQUEST,
                    "Limit must be greater than 0".to_string(),
                ))
            } else if l > MAX_LIMIT {
                Err((
                    StatusCode::BAD_REQUEST,
                    format!("Limit cannot exceed {}", MAX_LIMIT),
                ))
            } else {
                Ok(l)
            }
        }
        None => Ok(default),
    }
}

pub fn validate_transactions_limit(limit: Option<u32>) -> Result<u32, (StatusCode, String)> {
    validate_limit(limit, DEFAULT_TRANSACTIONS_LIMIT)
}
