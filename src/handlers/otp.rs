use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::services::otp::{self, OTP_TTL_SECONDS};
use crate::state::AppState;

// POST /api/otp
#[derive(Deserialize)]
pub struct RequestCodeBody {
    pub phone: String,
}

/// The issued code is echoed back in the response as the "simulated SMS".
/// A production deployment would dispatch it through a gateway and return
/// nothing.
#[derive(Serialize)]
pub struct RequestCodeResponse {
    code: String,
    expires_in_seconds: i64,
}

pub async fn request_code(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RequestCodeBody>,
) -> Result<Json<RequestCodeResponse>, AppError> {
    if body.phone.trim().is_empty() {
        return Err(AppError::Validation("phone is required".to_string()));
    }

    let issued = {
        let db = state.db.lock().unwrap();
        otp::issue(&db, state.clock.as_ref(), state.rng.as_ref(), &body.phone)?
    };

    Ok(Json(RequestCodeResponse {
        code: issued.code,
        expires_in_seconds: OTP_TTL_SECONDS,
    }))
}

// POST /api/otp/verify
#[derive(Deserialize)]
pub struct VerifyCodeBody {
    pub phone: String,
    pub code: String,
}

#[derive(Serialize)]
pub struct VerifyCodeResponse {
    valid: bool,
}

pub async fn verify_code(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VerifyCodeBody>,
) -> Result<Json<VerifyCodeResponse>, AppError> {
    let outcome = {
        let db = state.db.lock().unwrap();
        otp::verify(&db, state.clock.as_ref(), &body.phone, &body.code)?
    };

    Ok(Json(VerifyCodeResponse {
        valid: outcome.is_verified(),
    }))
}
