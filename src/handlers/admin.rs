use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries::BookingStats;
use crate::errors::AppError;
use crate::services::{admin, bookings};
use crate::state::AppState;

/// Gate for admin-only routes: the persisted session flag must be set.
pub fn require_admin(state: &AppState) -> Result<(), AppError> {
    let db = state.db.lock().unwrap();
    if admin::is_authenticated(&db)? {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

// POST /api/admin/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ok = {
        let db = state.db.lock().unwrap();
        admin::login(&db, &state.config, &body.email, &body.password)?
    };

    if ok {
        Ok(Json(serde_json::json!({"ok": true})))
    } else {
        // Deliberately generic: never reveals which field was wrong.
        Err(AppError::Unauthorized)
    }
}

// POST /api/admin/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let db = state.db.lock().unwrap();
    admin::logout(&db)?;
    Ok(Json(serde_json::json!({"ok": true})))
}

// GET /api/admin/session
#[derive(Serialize)]
pub struct SessionResponse {
    authenticated: bool,
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionResponse>, AppError> {
    let authenticated = {
        let db = state.db.lock().unwrap();
        admin::is_authenticated(&db)?
    };
    Ok(Json(SessionResponse { authenticated }))
}

// GET /api/admin/stats
#[derive(Serialize)]
pub struct StatsResponse {
    total: i64,
    pending: i64,
    confirmed: i64,
    cancelled: i64,
    completed: i64,
}

impl From<BookingStats> for StatsResponse {
    fn from(s: BookingStats) -> Self {
        Self {
            total: s.total,
            pending: s.pending,
            confirmed: s.confirmed,
            cancelled: s.cancelled,
            completed: s.completed,
        }
    }
}

pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>, AppError> {
    require_admin(&state)?;
    let stats = bookings::stats(&state)?;
    Ok(Json(stats.into()))
}
