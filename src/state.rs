use std::sync::{Mutex, MutexGuard};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::services::calendar::CalendarApp;

/// One calendar per process. Every request takes the lock for one action and
/// the render that follows it.
pub struct AppState {
    pub app: Mutex<CalendarApp>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(app: CalendarApp, config: AppConfig) -> Self {
        Self {
            app: Mutex::new(app),
            config,
        }
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, CalendarApp>, AppError> {
        self.app
            .lock()
            .map_err(|_| AppError::Internal("calendar state lock poisoned".to_string()))
    }
}
