use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::handlers::admin::require_admin;
use crate::models::{Booking, BookingDraft, BookingStatus};
use crate::services::bookings;
use crate::state::AppState;

#[derive(Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub service_id: String,
    pub stylist_id: Option<String>,
    pub date: String,
    pub time: String,
    pub status: String,
    pub created_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            customer_name: b.customer_name,
            customer_email: b.customer_email,
            customer_phone: b.customer_phone,
            service_id: b.service_id,
            stylist_id: b.stylist_id,
            date: b.date,
            time: b.time,
            status: b.status.as_str().to_string(),
            created_at: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

// GET /api/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    require_admin(&state)?;

    let bookings = bookings::list(&state)?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<BookingDraft>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let booking = bookings::create(&state, draft).await?;
    Ok((StatusCode::CREATED, Json(booking.into())))
}

// PATCH /api/bookings/:id/status
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    require_admin(&state)?;

    match bookings::update_status(&state, &id, body.status).await? {
        Some(booking) => Ok(Json(booking.into())),
        None => Err(AppError::NotFound(format!("booking {id}"))),
    }
}
