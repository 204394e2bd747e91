use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tower_sessions::Session;

use crate::auth::get_current_user;
use crate::constants::*;
use crate::database::Db;
use crate::models::{
    Category, CreateCategoryPayload, DeleteCategoryQuery, DeleteCategoryResponse,
    GetCategoriesQuery, TransactionType,
};
use crate::utils::{db_error, db_error_with_context, get_user_database, validate_string_length};

pub fn validate_category_name(name: &str) -> Result<(), (StatusCode, String)> {
    validate_string_length(
        name,
        "Category name",
        MIN_CATEGORY_NAME_LENGTH,
        MAX_CATEGORY_NAME_LENGTH,
    )
}

pub fn validate_category_icon(icon: &str) -> Result<(), (StatusCode, String)> {
    validate_string_length(icon, "Category icon", 1, MAX_CATEGORY_ICON_LENGTH)
}

pub fn extract_category_from_row(row: libsql::Row) -> Result<Category, (StatusCode, String)> {
    let name: String = row
        .get(0)
        .map_err(|_| db_error_with_context("invalid category data"))?;
    let icon: String = row
        .get(1)
        .map_err(|_| db_error_with_context("invalid category data"))?;
    let type_str: String = row
        .get(2)
        .map_err(|_| db_error_with_context("invalid category data"))?;
    let category_type = TransactionType::parse(&type_str)
        .ok_or_else(|| db_error_with_context("invalid category type"))?;

    Ok(Category {
        name,
        icon,
        category_type,
    })
}

/// Inserts a category after checking the (name, type) natural key is free.
/// Expects a write connection so the check and the insert stay logically
/// atomic.
pub async fn insert_category(
    conn: &libsql::Connection,
    name: &str,
    icon: &str,
    category_type: TransactionType,
) -> Result<Category, (StatusCode, String)> {
    let mut existing_rows = conn
        .query(
            "SELECT name FROM categories WHERE name = ? AND type = ?",
            (name, category_type.as_str()),
        )
        .await
        .map_err(|_| db_error_with_context("failed to check existing category"))?;

    if existing_rows
        .next()
        .await
        .map_err(|_| db_error())?
        .is_some()
    {
        return Err((StatusCode::CONFLICT, ERR_CATEGORY_EXISTS.to_string()));
    }

    conn.execute(
        "INSERT INTO categories (name, icon, type) VALUES (?, ?, ?)",
        (name, icon, category_type.as_str()),
    )
    .await
    .map_err(|e| {
        // UNIQUE (name, type) backs the check above against races.
        if e.to_string().contains("UNIQUE constraint failed") {
            (StatusCode::CONFLICT, ERR_CATEGORY_EXISTS.to_string())
        } else {
            db_error_with_context("category creation failed")
        }
    })?;

    Ok(Category {
        name: name.to_string(),
        icon: icon.to_string(),
        category_type,
    })
}

/// Deletes the unique (name, type) match and reports how many rows went
/// away. Transactions referencing the category are left untouched: they
/// keep the icon snapshotted at creation.
pub async fn delete_category_rows(
    conn: &libsql::Connection,
    name: &str,
    category_type: TransactionType,
) -> Result<u64, (StatusCode, String)> {
    conn.execute(
        "DELETE FROM categories WHERE name = ? AND type = ?",
        (name, category_type.as_str()),
    )
    .await
    .map_err(|_| db_error_with_context("category deletion failed"))
}

pub async fn get_categories(
    State(_main_db): State<Db>,
    session: Session,
    Query(query): Query<GetCategoriesQuery>,
) -> Result<(StatusCode, Json<Vec<Category>>), (StatusCode, String)> {
    let user = get_current_user(&session).await?;
    let user_db = get_user_database(&user.id).await?;
    let conn = user_db.read().await;

    let mut rows = match query.category_type {
        Some(category_type) => conn
            .query(
                "SELECT name, icon, type FROM categories WHERE type = ? ORDER BY name ASC",
                [category_type.as_str()],
            )
            .await
            .map_err(|_| db_error_with_context("failed to query categories"))?,
        None => conn
            .query(
                "SELECT name, icon, type FROM categories ORDER BY name ASC",
                (),
            )
            .await
            .map_err(|_| db_error_with_context("failed to query categories"))?,
    };

    let mut categories = Vec::new();
    while let Some(row) = rows.next().await.map_err(|_| db_error())? {
        categories.push(extract_category_from_row(row)?);
    }

    Ok((StatusCode::OK, Json(categories)))
}

pub async fn create_category(
    State(_main_db): State<Db>,
    session: Session,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<(StatusCode, Json<Category>), (StatusCode, String)> {
    let user = get_current_user(&session).await?;

    validate_category_name(&payload.name)?;
    validate_category_icon(&payload.icon)?;
    let name = payload.name.trim();
    let icon = payload.icon.trim();

    let user_db = get_user_database(&user.id).await?;

    // Single write connection for the duplicate check plus the insert.
    let conn = user_db.write().await;
    let category = insert_category(&conn, name, icon, payload.category_type).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn delete_category(
    State(_main_db): State<Db>,
    session: Session,
    Query(query): Query<DeleteCategoryQuery>,
) -> Result<(StatusCode, Json<DeleteCategoryResponse>), (StatusCode, String)> {
    let user = get_current_user(&session).await?;

    let name = query.name.trim();
    if name.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Category name cannot be empty".to_string(),
        ));
    }

    let user_db = get_user_database(&user.id).await?;
    let conn = user_db.write().await;

    let count = delete_category_rows(&conn, name, query.category_type).await?;
    if count == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            ERR_CATEGORY_NOT_FOUND.to_string(),
        ));
    }

    Ok((
        StatusCode::OK,
        Json(DeleteCategoryResponse {
            success: true,
            count,
        }),
    ))
}
