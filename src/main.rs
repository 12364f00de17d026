use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use bokning::config::AppConfig;
use bokning::db::{BookingStore, KeyValueStorage, MemoryStorage, SqliteStorage};
use bokning::handlers;
use bokning::services::calendar::CalendarApp;
use bokning::services::clock::SystemClock;
use bokning::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;

    let storage: Box<dyn KeyValueStorage> = match SqliteStorage::open(&config.storage_path) {
        Ok(storage) => {
            tracing::info!(path = %config.storage_path, "using sqlite storage");
            Box::new(storage)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %config.storage_path,
                "could not open storage, bookings will not survive a restart"
            );
            Box::new(MemoryStorage::default())
        }
    };

    let store = BookingStore::with_key(storage, config.storage_key.clone());
    let calendar = CalendarApp::new(store, Box::new(SystemClock));
    let state = Arc::new(AppState::new(calendar, config.clone()));

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/calendar", get(handlers::calendar::get_calendar))
        .route("/api/calendar/actions", post(handlers::calendar::post_action))
        .route("/api/bookings", get(handlers::bookings::list_bookings))
        .route("/api/bookings/:id", get(handlers::bookings::get_booking))
        .route("/api/my-bookings", get(handlers::bookings::my_bookings))
        .route("/api/session", get(handlers::session::get_session))
        .route("/api/session/login", post(handlers::session::login))
        .route("/api/session/logout", post(handlers::session::logout))
        .route("/api/session/register", post(handlers::session::register))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
