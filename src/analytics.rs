//! Read-only aggregation over a user's transactions: per-category
//! breakdowns for the current month and dense income/expense time series
//! for charting. Handlers do one bulk read scoped to a calendar window,
//! then group entirely in memory.

use std::cmp::Ordering;
use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use time::{Date, Month, OffsetDateTime};
use tower_sessions::Session;

use crate::auth::get_current_user;
use crate::database::Db;
use crate::models::{
    CategorySummary, FinancialHistoryQuery, HistoryBucket, Transaction, TransactionType,
};
use crate::transactions::extract_transaction_from_row;
use crate::utils::{db_error, db_error_with_context, get_user_database};

/// Display palette for category groups. A category's color is recomputed
/// from its name on every read instead of being persisted, so the engine
/// stays stateless.
pub const CATEGORY_COLORS: &[&str] = &[
    "hsl(346, 84%, 61%)",
    "hsl(346, 77%, 49%)",
    "hsl(347, 77%, 70%)",
    "hsl(347, 90%, 81%)",
    "hsl(347, 83%, 88%)",
];

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Deterministic color for a category name: sum of character codes modulo
/// the palette length. Not collision-free, but stable across requests.
pub fn category_color(name: &str) -> &'static str {
    let hash: u32 = name.chars().map(|c| c as u32).sum();
    CATEGORY_COLORS[hash as usize % CATEGORY_COLORS.len()]
}

/// Groups transactions by category name, summing amounts and keeping the
/// first-seen icon as the display icon. Output is sorted by summed amount
/// descending; ties keep encounter order (the sort is stable).
pub fn summarize_by_category(transactions: &[Transaction]) -> Vec<CategorySummary> {
    let mut summaries: Vec<CategorySummary> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions {
        match index.get(transaction.category.as_str()) {
            Some(&i) => summaries[i].amount += transaction.amount,
            None => {
                index.insert(transaction.category.as_str(), summaries.len());
                summaries.push(CategorySummary {
                    category: transaction.category.clone(),
                    amount: transaction.amount,
                    icon: transaction.category_icon.clone(),
                    color: category_color(&transaction.category).to_string(),
                });
            }
        }
    }

    summaries.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));
    summaries
}

/// Buckets a year's transactions into 12 month slots labeled with full
/// month names. Every slot is emitted even when empty, so the series is
/// dense and chart-ready.
pub fn monthly_history(transactions: &[Transaction], year: i32) -> Vec<HistoryBucket> {
    let mut buckets: Vec<HistoryBucket> = MONTHS
        .iter()
        .map(|month| HistoryBucket {
            label: month.to_string(),
            income: 0.0,
            expense: 0.0,
        })
        .collect();

    for transaction in transactions {
        let Ok(datetime) = OffsetDateTime::from_unix_timestamp(transaction.date) else {
            continue;
        };
        if datetime.year() != year {
            continue;
        }
        let bucket = &mut buckets[datetime.month() as usize - 1];
        match transaction.transaction_type {
            TransactionType::Income => bucket.income += transaction.amount,
            TransactionType::Expense => bucket.expense += transaction.amount,
        }
    }

    buckets
}

/// Buckets one month's transactions into one slot per day-of-month,
/// labeled "1".."N" with N leap-aware. Dense like [`monthly_history`].
pub fn daily_history(transactions: &[Transaction], year: i32, month: Month) -> Vec<HistoryBucket> {
    let days = month.length(year);
    let mut buckets: Vec<HistoryBucket> = (1..=days)
        .map(|day| HistoryBucket {
            label: day.to_string(),
            income: 0.0,
            expense: 0.0,
        })
        .collect();

    for transaction in transactions {
        let Ok(datetime) = OffsetDateTime::from_unix_timestamp(transaction.date) else {
            continue;
        };
        if datetime.year() != year || datetime.month() != month {
            continue;
        }
        let bucket = &mut buckets[datetime.day() as usize - 1];
        match transaction.transaction_type {
            TransactionType::Income => bucket.income += transaction.amount,
            TransactionType::Expense => bucket.expense += transaction.amount,
        }
    }

    buckets
}

/// Inclusive unix-timestamp bounds of a calendar month (UTC):
/// [1st 00:00:00, last day 23:59:59].
pub fn month_window(year: i32, month: Month) -> Option<(i64, i64)> {
    let last_day = month.length(year);
    let start = Date::from_calendar_date(year, month, 1).ok()?;
    let end = Date::from_calendar_date(year, month, last_day)
        .ok()?
        .with_hms(23, 59, 59)
        .ok()?;
    Some((
        start.midnight().assume_utc().unix_timestamp(),
        end.assume_utc().unix_timestamp(),
    ))
}

/// Inclusive unix-timestamp bounds of a calendar year (UTC).
pub fn year_window(year: i32) -> Option<(i64, i64)> {
    let start = Date::from_calendar_date(year, Month::January, 1).ok()?;
    let end = Date::from_calendar_date(year, Month::December, 31)
        .ok()?
        .with_hms(23, 59, 59)
        .ok()?;
    Some((
        start.midnight().assume_utc().unix_timestamp(),
        end.assume_utc().unix_timestamp(),
    ))
}

async fn fetch_transactions_in_window(
    conn: &libsql::Connection,
    transaction_type: Option<TransactionType>,
    start: i64,
    end: i64,
) -> Result<Vec<Transaction>, (StatusCode, String)> {
    // Ascending date so encounter order in the groupers is chronological.
    let mut rows = match transaction_type {
        Some(transaction_type) => conn
            .query(
                "SELECT id, description, amount, date, type, category, category_icon FROM transactions WHERE type = ? AND date BETWEEN ? AND ? ORDER BY date ASC",
                (transaction_type.as_str(), start, end),
            )
            .await
            .map_err(|_| db_error_with_context("failed to query transactions"))?,
        None => conn
            .query(
                "SELECT id, description, amount, date, type, category, category_icon FROM transactions WHERE date BETWEEN ? AND ? ORDER BY date ASC",
                (start, end),
            )
            .await
            .map_err(|_| db_error_with_context("failed to query transactions"))?,
    };

    let mut transactions = Vec::new();
    while let Some(row) = rows.next().await.map_err(|_| db_error())? {
        transactions.push(extract_transaction_from_row(row)?);
    }

    Ok(transactions)
}

async fn category_breakdown(
    session: &Session,
    transaction_type: TransactionType,
) -> Result<(StatusCode, Json<Vec<CategorySummary>>), (StatusCode, String)> {
    let user = get_current_user(session).await?;

    let now = OffsetDateTime::now_utc();
    let (start, end) = month_window(now.year(), now.month())
        .ok_or_else(|| db_error_with_context("failed to compute month window"))?;

    let user_db = get_user_database(&user.id).await?;
    let conn = user_db.read().await;
    let transactions =
        fetch_transactions_in_window(&conn, Some(transaction_type), start, end).await?;

    Ok((StatusCode::OK, Json(summarize_by_category(&transactions))))
}

pub async fn expense_by_category(
    State(_main_db): State<Db>,
    session: Session,
) -> Result<(StatusCode, Json<Vec<CategorySummary>>), (StatusCode, String)> {
    category_breakdown(&session, TransactionType::Expense).await
}

pub async fn income_by_category(
    State(_main_db): State<Db>,
    session: Session,
) -> Result<(StatusCode, Json<Vec<CategorySummary>>), (StatusCode, String)> {
    category_breakdown(&session, TransactionType::Income).await
}

pub async fn financial_history(
    State(_main_db): State<Db>,
    session: Session,
    Query(query): Query<FinancialHistoryQuery>,
) -> Result<(StatusCode, Json<Vec<HistoryBucket>>), (StatusCode, String)> {
    let user = get_current_user(&session).await?;

    let now = OffsetDateTime::now_utc();
    let year = query.year.unwrap_or_else(|| now.year());

    let user_db = get_user_database(&user.id).await?;
    let conn = user_db.read().await;

    match query.period.as_str() {
        "year" => {
            let (start, end) = year_window(year)
                .ok_or((StatusCode::BAD_REQUEST, "Invalid year".to_string()))?;
            let transactions = fetch_transactions_in_window(&conn, None, start, end).await?;
            Ok((StatusCode::OK, Json(monthly_history(&transactions, year))))
        }
        "month" => {
            let month_number = query.month.unwrap_or(now.month() as u8);
            let month = Month::try_from(month_number)
                .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid month".to_string()))?;
            let (start, end) = month_window(year, month)
                .ok_or((StatusCode::BAD_REQUEST, "Invalid year".to_string()))?;
            let transactions = fetch_transactions_in_window(&conn, None, start, end).await?;
            Ok((
                StatusCode::OK,
                Json(daily_history(&transactions, year, month)),
            ))
        }
        _ => Err((
            StatusCode::BAD_REQUEST,
            "Period must be 'year' or 'month'".to_string(),
        )),
    }
}
