#![allow(dead_code)]

use std::fs;
use tempfile::{TempDir, tempdir};
use time::{Date, Month, Time};
use uuid::Uuid;

use finance_tracker_server::database::{get_user_db, init_main_db};
use finance_tracker_server::models::{Transaction, TransactionType};

pub async fn setup_test_environment() -> (String, String, TempDir) {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    let data_path = temp_dir
        .path()
        .to_str()
        .expect("Failed to convert path to string")
        .to_string();
    let user_id = Uuid::new_v4().to_string();

    fs::create_dir_all(&data_path).expect("Failed to create data directory");

    init_main_db(&data_path)
        .await
        .unwrap_or_else(|e| panic!("Failed to initialize main database at {}: {}", data_path, e));

    // Opening the user database creates its tables.
    get_user_db(&data_path, &user_id).await.unwrap_or_else(|e| {
        panic!(
            "Failed to initialize user database for user {} at {}: {}",
            user_id, data_path, e
        )
    });

    (data_path, user_id, temp_dir)
}

pub async fn create_test_category(
    data_path: &str,
    user_id: &str,
    name: &str,
    icon: &str,
    category_type: TransactionType,
) {
    let user_db = get_user_db(data_path, user_id)
        .await
        .unwrap_or_else(|e| panic!("Failed to get user database for {}: {}", user_id, e));

    let conn = user_db.write().await;
    conn.execute(
        "INSERT INTO categories (name, icon, type) VALUES (?, ?, ?)",
        (name, icon, category_type.as_str()),
    )
    .await
    .unwrap_or_else(|e| {
        panic!(
            "Failed to insert test category '{}' for user {}: {}",
            name, user_id, e
        )
    });
}

#[allow(clippy::too_many_arguments)]
pub async fn create_test_transaction(
    data_path: &str,
    user_id: &str,
    description: &str,
    amount: f64,
    date: i64,
    transaction_type: TransactionType,
    category: &str,
    category_icon: &str,
) -> String {
    let user_db = get_user_db(data_path, user_id)
        .await
        .unwrap_or_else(|e| panic!("Failed to get user database for {}: {}", user_id, e));
    let transaction_id = Uuid::new_v4().to_string();

    let conn = user_db.write().await;
    conn.execute(
        "INSERT INTO transactions (id, description, amount, date, type, category, category_icon) VALUES (?, ?, ?, ?, ?, ?, ?)",
        (
            transaction_id.as_str(),
            description,
            amount,
            date,
            transaction_type.as_str(),
            category,
            category_icon,
        ),
    )
    .await
    .unwrap_or_else(|e| {
        panic!(
            "Failed to insert test transaction '{}' for user {}: {}",
            description, user_id, e
        )
    });

    transaction_id
}

pub async fn get_transaction_from_db(
    data_path: &str,
    user_id: &str,
    transaction_id: &str,
) -> Option<Transaction> {
    let user_db = get_user_db(data_path, user_id)
        .await
        .unwrap_or_else(|e| panic!("Failed to get user database for {}: {}", user_id, e));
    let conn = user_db.read().await;

    let mut rows = conn
        .query(
            "SELECT id, description, amount, date, type, category, category_icon FROM transactions WHERE id = ?",
            [transaction_id],
        )
        .await
        .expect("Failed to execute transaction query");

    if let Some(row) = rows.next().await.expect("Failed to read transaction row") {
        let id: String = row.get(0).expect("Failed to get transaction id");
        let description: String = row.get(1).expect("Failed to get description");
        let amount: f64 = row.get(2).expect("Failed to get amount");
        let date: i64 = row.get(3).expect("Failed to get date");
        let type_str: String = row.get(4).expect("Failed to get type");
        let category: String = row.get(5).expect("Failed to get category");
        let category_icon: String = row.get(6).expect("Failed to get category icon");

        Some(Transaction {
            id,
            description,
            amount,
            date,
            transaction_type: TransactionType::parse(&type_str).expect("Invalid type in DB"),
            category,
            category_icon,
        })
    } else {
        None
    }
}

/// Unix timestamp for a UTC date at the given time of day.
pub fn ts_at(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> i64 {
    let date = Date::from_calendar_date(year, Month::try_from(month).unwrap(), day)
        .expect("invalid test date");
    let time = Time::from_hms(hour, minute, second).expect("invalid test time");
    date.with_time(time).assume_utc().unix_timestamp()
}

/// Unix timestamp for noon UTC on the given date, away from day boundaries.
pub fn ts(year: i32, month: u8, day: u8) -> i64 {
    ts_at(year, month, day, 12, 0, 0)
}

/// Builds an in-memory transaction for pure aggregation tests.
pub fn make_transaction(
    category: &str,
    icon: &str,
    transaction_type: TransactionType,
    amount: f64,
    date: i64,
) -> Transaction {
    Transaction {
        id: Uuid::new_v4().to_string(),
        description: String::new(),
        amount,
        date,
        transaction_type,
        category: category.to_string(),
        category_icon: icon.to_string(),
    }
}
