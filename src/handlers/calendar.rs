use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::services::calendar::{Action, ConfirmationRequest, Notice};
use crate::services::form::FormOutcome;
use crate::services::render::CalendarViewModel;
use crate::state::AppState;

// GET /api/calendar
pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CalendarViewModel>, AppError> {
    let app = state.lock()?;
    Ok(Json(app.render()))
}

// POST /api/calendar/actions
#[derive(Serialize)]
pub struct ActionResponse {
    pub view: CalendarViewModel,
    pub notices: Vec<Notice>,
    pub confirmation: Option<ConfirmationRequest>,
    pub outcome: Option<FormOutcome>,
}

pub async fn post_action(
    State(state): State<Arc<AppState>>,
    Json(action): Json<Action>,
) -> Result<Json<ActionResponse>, AppError> {
    let mut app = state.lock()?;
    let feedback = app.dispatch(action);

    Ok(Json(ActionResponse {
        view: app.render(),
        notices: feedback.notices,
        confirmation: feedback.confirmation,
        outcome: feedback.outcome,
    }))
}
