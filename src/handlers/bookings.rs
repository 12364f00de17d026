use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::errors::AppError;
use crate::models::Booking;
use crate::services::companion::{read_my_bookings, MyBookingEntry};
use crate::state::AppState;

// GET /api/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let app = state.lock()?;
    Ok(Json(app.store().get_all()))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let app = state.lock()?;
    app.store()
        .find_by_id(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
}

// GET /api/my-bookings
pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MyBookingEntry>>, AppError> {
    let app = state.lock()?;
    Ok(Json(read_my_bookings(
        app.store().storage(),
        &state.config.storage_key,
    )))
}
