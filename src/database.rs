use anyhow::Result;
use libsql::{Builder, Connection};
use std::{path::Path, sync::Arc};
use tokio::sync::RwLock;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id             TEXT PRIMARY KEY,
    name           TEXT UNIQUE NOT NULL,
    password_hash  TEXT NOT NULL
);
"#;

// One row per user database; id is pinned to 1.
const CREATE_SETTINGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS user_settings (
    id        INTEGER PRIMARY KEY CHECK (id = 1),
    currency  TEXT NOT NULL
);
"#;

const CREATE_CATEGORIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    name  TEXT NOT NULL,
    icon  TEXT NOT NULL,
    type  TEXT NOT NULL CHECK (type IN ('income', 'expense')),
    UNIQUE (name, type)
);
"#;

const CREATE_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id             TEXT PRIMARY KEY,
    description    TEXT NOT NULL DEFAULT '',
    amount         REAL NOT NULL,
    date           INTEGER NOT NULL,
    type           TEXT NOT NULL CHECK (type IN ('income', 'expense')),
    category       TEXT NOT NULL,
    category_icon  TEXT NOT NULL
);
"#;

pub type Db = Arc<RwLock<Connection>>;

/// Main users registry DB (users.db)
pub async fn init_main_db(data_dir: &str) -> Result<Db> {
    tokio::fs::create_dir_all(data_dir).await?;
    let path = Path::new(data_dir).join("users.db");
    let db = Builder::new_local(path).build().await?;
    let conn = db.connect()?;

    conn.execute(CREATE_USERS_TABLE, ()).await?;
    Ok(Arc::new(RwLock::new(conn)))
}

/// Per-user isolated DB (user_{id}.db). Holds that user's settings,
/// categories and transactions; cross-user reads are impossible by
/// construction.
pub async fn get_user_db(data_dir: &str, user_id: &str) -> Result<Db> {
    let path = Path::new(data_dir).join(format!("user_{}.db", user_id));
    let db = Builder::new_local(path).build().await?;
    let conn = db.connect()?;

    conn.execute(CREATE_SETTINGS_TABLE, ()).await?;
    conn.execute(CREATE_CATEGORIES_TABLE, ()).await?;
    conn.execute(CREATE_TRANSACTIONS_TABLE, ()).await?;
    Ok(Arc::new(RwLock::new(conn)))
}
