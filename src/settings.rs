use axum::{Json, extract::State, http::StatusCode};
use tower_sessions::Session;

use crate::auth::get_current_user;
use crate::constants::*;
use crate::currency::{CURRENCIES, Currency, find_currency};
use crate::database::Db;
use crate::models::{UpdateCurrencyPayload, UserSettings};
use crate::utils::{db_error, db_error_with_context, get_user_database};

/// Reads the single settings row, or None when the user has not finished
/// onboarding yet.
pub async fn read_settings(
    conn: &libsql::Connection,
) -> Result<Option<UserSettings>, (StatusCode, String)> {
    let mut rows = conn
        .query("SELECT currency FROM user_settings WHERE id = 1", ())
        .await
        .map_err(|_| db_error_with_context("failed to query user settings"))?;

    match rows.next().await.map_err(|_| db_error())? {
        Some(row) => {
            let currency: String = row
                .get(0)
                .map_err(|_| db_error_with_context("invalid settings data"))?;
            Ok(Some(UserSettings { currency }))
        }
        None => Ok(None),
    }
}

pub async fn upsert_currency(
    conn: &libsql::Connection,
    currency: &str,
) -> Result<UserSettings, (StatusCode, String)> {
    conn.execute(
        "INSERT INTO user_settings (id, currency) VALUES (1, ?) ON CONFLICT (id) DO UPDATE SET currency = excluded.currency",
        [currency],
    )
    .await
    .map_err(|_| db_error_with_context("failed to update user settings"))?;

    Ok(UserSettings {
        currency: currency.to_string(),
    })
}

/// Missing settings are a valid state meaning "onboarding incomplete"; the
/// client redirects to the setup wizard on 404.
pub async fn get_settings(
    State(_main_db): State<Db>,
    session: Session,
) -> Result<(StatusCode, Json<UserSettings>), (StatusCode, String)> {
    let user = get_current_user(&session).await?;
    let user_db = get_user_database(&user.id).await?;
    let conn = user_db.read().await;

    match read_settings(&conn).await? {
        Some(settings) => Ok((StatusCode::OK, Json(settings))),
        None => Err((
            StatusCode::NOT_FOUND,
            ERR_SETTINGS_NOT_FOUND.to_string(),
        )),
    }
}

pub async fn update_currency(
    State(_main_db): State<Db>,
    session: Session,
    Json(payload): Json<UpdateCurrencyPayload>,
) -> Result<(StatusCode, Json<UserSettings>), (StatusCode, String)> {
    let user = get_current_user(&session).await?;

    if find_currency(&payload.currency).is_none() {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Invalid currency: {}", payload.currency),
        ));
    }

    let user_db = get_user_database(&user.id).await?;
    let conn = user_db.write().await;

    let settings = upsert_currency(&conn, &payload.currency).await?;
    Ok((StatusCode::OK, Json(settings)))
}

/// Fixed currency table for the setup wizard.
pub async fn get_currencies() -> (StatusCode, Json<&'static [Currency]>) {
    (StatusCode::OK, Json(CURRENCIES))
}
