use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tempfile::tempdir;
use tokio::runtime::Runtime;
use uuid::Uuid;

use finance_tracker_server::analytics::{daily_history, monthly_history, summarize_by_category};
use finance_tracker_server::database::{get_user_db, init_main_db};
use finance_tracker_server::models::{Transaction, TransactionType};
use time::Month;

// Benchmark constants
const BENCH_BASE_TIMESTAMP: i64 = 1767225600; // Jan 1, 2026 00:00:00 UTC
const BENCH_TRANSACTION_COUNT: usize = 10_000;
const SECONDS_PER_DAY: i64 = 86_400;

fn bench_transaction(i: usize) -> Transaction {
    let transaction_type = if i % 3 == 0 {
        TransactionType::Income
    } else {
        TransactionType::Expense
    };
    Transaction {
        id: Uuid::new_v4().to_string(),
        description: format!("Benchmark Transaction {}", i),
        amount: 10.0 + (i % 100) as f64,
        // Spread across the year, several per day.
        date: BENCH_BASE_TIMESTAMP + (i as i64 % 365) * SECONDS_PER_DAY + 43_200,
        transaction_type,
        category: format!("category_{}", i % 10),
        category_icon: "💸".to_string(),
    }
}

async fn setup_benchmark_environment() -> (String, String, tempfile::TempDir) {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    let data_path = temp_dir.path().to_str().unwrap().to_string();
    let user_id = Uuid::new_v4().to_string();

    init_main_db(&data_path).await.unwrap();
    get_user_db(&data_path, &user_id).await.unwrap();

    (data_path, user_id, temp_dir)
}

async fn create_benchmark_transactions(data_path: &str, user_id: &str, count: usize) {
    let user_db = get_user_db(data_path, user_id).await.unwrap();
    let conn = user_db.write().await;

    for i in 0..count {
        let transaction = bench_transaction(i);
        conn.execute(
            "INSERT INTO transactions (id, description, amount, date, type, category, category_icon) VALUES (?, ?, ?, ?, ?, ?, ?)",
            (
                transaction.id.as_str(),
                transaction.description.as_str(),
                transaction.amount,
                transaction.date,
                transaction.transaction_type.as_str(),
                transaction.category.as_str(),
                transaction.category_icon.as_str(),
            ),
        )
        .await
        .unwrap();
    }
}

async fn benchmark_window_query(data_path: &str, user_id: &str) {
    let user_db = get_user_db(data_path, user_id).await.unwrap();
    let conn = user_db.read().await;

    let start = BENCH_BASE_TIMESTAMP + 59 * SECONDS_PER_DAY;
    let end = BENCH_BASE_TIMESTAMP + 90 * SECONDS_PER_DAY;

    let mut rows = conn
        .query(
            "SELECT id, description, amount, date, type, category, category_icon FROM transactions WHERE type = ? AND date BETWEEN ? AND ? ORDER BY date ASC",
            ("expense", start, end),
        )
        .await
        .unwrap();

    let mut count = 0;
    while let Some(_row) = rows.next().await.unwrap() {
        count += 1;
    }

    black_box(count);
}

fn criterion_benchmark(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    // Setup benchmark data once
    let (data_path, user_id, _temp_dir) = rt.block_on(setup_benchmark_environment());
    rt.block_on(create_benchmark_transactions(
        &data_path,
        &user_id,
        BENCH_TRANSACTION_COUNT,
    ));

    let transactions: Vec<Transaction> = (0..BENCH_TRANSACTION_COUNT)
        .map(bench_transaction)
        .collect();

    c.bench_function("summarize_by_category", |b| {
        b.iter(|| summarize_by_category(black_box(&transactions)))
    });

    c.bench_function("monthly_history", |b| {
        b.iter(|| monthly_history(black_box(&transactions), 2026))
    });

    c.bench_function("daily_history", |b| {
        b.iter(|| daily_history(black_box(&transactions), 2026, Month::March))
    });

    c.bench_function("window_query", |b| {
        b.to_async(&rt)
            .iter(|| benchmark_window_query(&data_path, &user_id))
    });

    // Keep temp_dir alive until the end
    std::mem::forget(_temp_dir);
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
