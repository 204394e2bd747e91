use serde::{Deserialize, Serialize};

/// Whether money moved in or out. Stored as lowercase text in the database
/// and serialized the same way on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
}

#[derive(Deserialize, Debug)]
pub struct RegisterPayload {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserSettings {
    pub currency: String,
}

#[derive(Deserialize, Debug)]
pub struct UpdateCurrencyPayload {
    pub currency: String,
}

/// A named, typed grouping of transactions. Identified by the natural key
/// (name, type) within a user's database; no surrogate id is exposed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
}

#[derive(Deserialize, Debug)]
pub struct CreateCategoryPayload {
    pub name: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
}

#[derive(Deserialize, Debug)]
pub struct GetCategoriesQuery {
    #[serde(rename = "type")]
    pub category_type: Option<TransactionType>,
}

#[derive(Deserialize, Debug)]
pub struct DeleteCategoryQuery {
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
}

#[derive(Serialize, Debug)]
pub struct DeleteCategoryResponse {
    pub success: bool,
    pub count: u64,
}

/// One recorded financial event. Immutable once written; `category_icon`
/// is a snapshot of the referenced category's icon at creation time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub date: i64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    #[serde(rename = "categoryIcon")]
    pub category_icon: String,
}

#[derive(Deserialize, Debug)]
pub struct CreateTransactionPayload {
    pub description: Option<String>,
    pub amount: f64,
    pub date: i64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
}

#[derive(Deserialize, Debug)]
pub struct GetTransactionsQuery {
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub limit: Option<u32>,
}

#[derive(Serialize, Debug)]
pub struct GetTransactionsResponse {
    pub transactions: Vec<Transaction>,
    pub total_count: u32,
}

/// One group in a category breakdown, ready for chart display.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub amount: f64,
    pub icon: String,
    pub color: String,
}

/// One time-unit slot in a financial-history series. Always emitted for the
/// whole range, zero-valued when no transactions fall inside it.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HistoryBucket {
    pub label: String,
    pub income: f64,
    pub expense: f64,
}

#[derive(Deserialize, Debug)]
pub struct FinancialHistoryQuery {
    pub period: String,
    pub year: Option<i32>,
    pub month: Option<u8>,
}
