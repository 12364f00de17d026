use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::services::session;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionResponse {
    pub logged_in: bool,
}

// GET /api/session
pub async fn get_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionResponse>, AppError> {
    let app = state.lock()?;
    Ok(Json(SessionResponse {
        logged_in: session::is_logged_in(app.store().storage()),
    }))
}

// POST /api/session/login
pub async fn login(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionResponse>, AppError> {
    let mut app = state.lock()?;
    let storage = app.store_mut().storage_mut();
    session::log_in(storage);
    Ok(Json(SessionResponse {
        logged_in: session::is_logged_in(storage),
    }))
}

// POST /api/session/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionResponse>, AppError> {
    let mut app = state.lock()?;
    let storage = app.store_mut().storage_mut();
    session::log_out(storage);
    Ok(Json(SessionResponse {
        logged_in: session::is_logged_in(storage),
    }))
}

// POST /api/session/register
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub password: String,
    pub confirm_password: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let mut app = state.lock()?;
    let storage = app.store_mut().storage_mut();
    session::register(storage, &req.password, &req.confirm_password)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(Json(SessionResponse {
        logged_in: session::is_logged_in(storage),
    }))
}
