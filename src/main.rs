use axum::{
    Router,
    routing::{get, post},
};
use time::Duration;
use tower_http::cors::CorsLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::Key};
use tracing_subscriber::EnvFilter;

use finance_tracker_server::{
    analytics, auth, categories, config::Config, constants::*, database, settings, transactions,
};

#[tokio::main]
async fn main() {
    // load environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().expect("Invalid server configuration");

    let main_db = database::init_main_db(&config.data_path)
        .await
        .expect("Failed to initialize main DB");

    let store = MemoryStore::default();
    let session_key =
        Key::try_from(config.session_secret.as_bytes()).expect("Invalid session secret");
    let session_layer = SessionManagerLayer::new(store)
        .with_secure(false)
        .with_name(SESSION_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::days(SESSION_EXPIRY_DAYS)))
        .with_signed(session_key);

    let app = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_currency),
        )
        .route("/currencies", get(settings::get_currencies))
        .route(
            "/categories",
            get(categories::get_categories)
                .post(categories::create_category)
                .delete(categories::delete_category),
        )
        .route(
            "/transactions",
            get(transactions::get_transactions).post(transactions::create_transaction),
        )
        .route(
            "/analytics/expense-by-category",
            get(analytics::expense_by_category),
        )
        .route(
            "/analytics/income-by-category",
            get(analytics::income_by_category),
        )
        .route(
            "/analytics/financial-history",
            get(analytics::financial_history),
        )
        .layer(session_layer)
        .layer(CorsLayer::permissive())
        .with_state(main_db);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .expect("Failed to bind server address");
    tracing::info!("Server running on http://{}", bind_address);

    axum::serve(listener, app).await.expect("Server error");
}
