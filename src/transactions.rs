use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::auth::get_current_user;
use crate::constants::*;
use crate::database::Db;
use crate::models::{
    CreateTransactionPayload, GetTransactionsQuery, GetTransactionsResponse, Transaction,
    TransactionType,
};
use crate::utils::{
    db_error, db_error_with_context, get_user_database, validate_transactions_limit,
};

pub fn extract_transaction_from_row(row: libsql::Row) -> Result<Transaction, (StatusCode, String)> {
    let id: String = row
        .get(0)
        .map_err(|_| db_error_with_context("invalid transaction data"))?;
    let description: String = row
        .get(1)
        .map_err(|_| db_error_with_context("invalid transaction data"))?;
    let amount: f64 = row
        .get(2)
        .map_err(|_| db_error_with_context("invalid transaction data"))?;
    let date: i64 = row
        .get(3)
        .map_err(|_| db_error_with_context("invalid transaction data"))?;
    let type_str: String = row
        .get(4)
        .map_err(|_| db_error_with_context("invalid transaction data"))?;
    let category: String = row
        .get(5)
        .map_err(|_| db_error_with_context("invalid transaction data"))?;
    let category_icon: String = row
        .get(6)
        .map_err(|_| db_error_with_context("invalid transaction data"))?;

    let transaction_type = TransactionType::parse(&type_str)
        .ok_or_else(|| db_error_with_context("invalid transaction type"))?;

    Ok(Transaction {
        id,
        description,
        amount,
        date,
        transaction_type,
        category,
        category_icon,
    })
}

/// Looks up the icon of the category matching (name, type), or None when no
/// such category exists.
pub async fn find_category_icon(
    conn: &libsql::Connection,
    name: &str,
    category_type: TransactionType,
) -> Result<Option<String>, (StatusCode, String)> {
    let mut rows = conn
        .query(
            "SELECT icon FROM categories WHERE name = ? AND type = ?",
            (name, category_type.as_str()),
        )
        .await
        .map_err(|_| db_error_with_context("failed to look up category"))?;

    match rows.next().await.map_err(|_| db_error())? {
        Some(row) => {
            let icon: String = row
                .get(0)
                .map_err(|_| db_error_with_context("invalid category data"))?;
            Ok(Some(icon))
        }
        None => Ok(None),
    }
}

/// Looks up the referenced category and persists the transaction with the
/// category's icon snapshotted into it. Expects a write connection so the
/// lookup happens-before the insert without interleaved writes; fails with
/// 404 and writes nothing when the category is absent.
pub async fn insert_transaction(
    conn: &libsql::Connection,
    payload: &CreateTransactionPayload,
) -> Result<Transaction, (StatusCode, String)> {
    let category = payload.category.trim();
    let icon = find_category_icon(conn, category, payload.transaction_type)
        .await?
        .ok_or_else(|| (StatusCode::NOT_FOUND, ERR_CATEGORY_NOT_FOUND.to_string()))?;

    let id = Uuid::new_v4().to_string();
    let description = payload
        .description
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_string();

    conn.execute(
        "INSERT INTO transactions (id, description, amount, date, type, category, category_icon) VALUES (?, ?, ?, ?, ?, ?, ?)",
        (
            id.as_str(),
            description.as_str(),
            payload.amount,
            payload.date,
            payload.transaction_type.as_str(),
            category,
            icon.as_str(),
        ),
    )
    .await
    .map_err(|_| db_error_with_context("transaction creation failed"))?;

    Ok(Transaction {
        id,
        description,
        amount: payload.amount,
        date: payload.date,
        transaction_type: payload.transaction_type,
        category: category.to_string(),
        category_icon: icon,
    })
}

pub async fn create_transaction(
    State(_main_db): State<Db>,
    session: Session,
    Json(payload): Json<CreateTransactionPayload>,
) -> Result<(StatusCode, Json<Transaction>), (StatusCode, String)> {
    let user = get_current_user(&session).await?;

    // Amounts are magnitudes; the sign is implied by the type.
    if payload.amount < 0.0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "Transaction amount cannot be negative".to_string(),
        ));
    }
    if let Some(description) = &payload.description {
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err((
                StatusCode::BAD_REQUEST,
                format!(
                    "Description must be at most {} characters",
                    MAX_DESCRIPTION_LENGTH
                ),
            ));
        }
    }
    if payload.category.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Category name cannot be empty".to_string(),
        ));
    }

    let user_db = get_user_database(&user.id).await?;

    let conn = user_db.write().await;
    let transaction = insert_transaction(&conn, &payload).await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn get_transactions(
    State(_main_db): State<Db>,
    session: Session,
    Query(query): Query<GetTransactionsQuery>,
) -> Result<(StatusCode, Json<GetTransactionsResponse>), (StatusCode, String)> {
    let user = get_current_user(&session).await?;

    let limit = validate_transactions_limit(query.limit)?;

    let user_db = get_user_database(&user.id).await?;
    let conn = user_db.read().await;

    let (mut count_rows, mut rows) = match query.transaction_type {
        Some(transaction_type) => {
            let count_rows = conn
                .query(
                    "SELECT COUNT(*) FROM transactions WHERE type = ?",
                    [transaction_type.as_str()],
                )
                .await
                .map_err(|_| db_error_with_context("failed to count transactions"))?;
            let rows = conn
                .query(
                    "SELECT id, description, amount, date, type, category, category_icon FROM transactions WHERE type = ? ORDER BY date DESC LIMIT ?",
                    (transaction_type.as_str(), limit),
                )
                .await
                .map_err(|_| db_error_with_context("failed to query transactions"))?;
            (count_rows, rows)
        }
        None => {
            let count_rows = conn
                .query("SELECT COUNT(*) FROM transactions", ())
                .await
                .map_err(|_| db_error_with_context("failed to count transactions"))?;
            let rows = conn
                .query(
                    "SELECT id, description, amount, date, type, category, category_icon FROM transactions ORDER BY date DESC LIMIT ?",
                    [limit],
                )
                .await
                .map_err(|_| db_error_with_context("failed to query transactions"))?;
            (count_rows, rows)
        }
    };

    let total_count: u32 = if let Some(row) = count_rows.next().await.map_err(|_| db_error())? {
        row.get(0).map_err(|_| db_error())?
    } else {
        0
    };

    let mut transactions = Vec::new();
    while let Some(row) = rows.next().await.map_err(|_| db_error())? {
        transactions.push(extract_transaction_from_row(row)?);
    }

    Ok((
        StatusCode::OK,
        Json(GetTransactionsResponse {
            transactions,
            total_count,
        }),
    ))
}
