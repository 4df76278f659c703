use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::handlers::bookings::BookingResponse;
use crate::services::otp::OTP_TTL_SECONDS;
use crate::services::workflow::{self, WorkflowSession, WorkflowStep};
use crate::state::AppState;

/// What the presentation layer needs to render the wizard: the current
/// step, the accumulated draft, and gating flags for the navigation
/// controls.
#[derive(Serialize)]
pub struct FlowResponse {
    pub step: WorkflowStep,
    pub can_go_back: bool,
    pub service_id: Option<String>,
    pub stylist_id: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub customer_name: Option<String>,
    pub otp_remaining_seconds: Option<i64>,
    pub booking_id: Option<String>,
}

impl FlowResponse {
    fn from_session(session: WorkflowSession, state: &AppState) -> Self {
        let can_go_back = matches!(
            session.step,
            WorkflowStep::SelectingStylist
                | WorkflowStep::SelectingSchedule
                | WorkflowStep::EnteringDetails
        );
        let otp_remaining_seconds = session.otp_remaining_seconds(state.clock.now());
        Self {
            step: session.step,
            can_go_back,
            service_id: session.service_id,
            stylist_id: session.stylist_id,
            date: session.date,
            time: session.time,
            customer_name: session.customer_name,
            otp_remaining_seconds,
            booking_id: session.booking_id,
        }
    }
}

/// Issued-code responses also carry the simulated SMS code.
#[derive(Serialize)]
pub struct CodeSentResponse {
    #[serde(flatten)]
    pub flow: FlowResponse,
    pub code: String,
    pub expires_in_seconds: i64,
}

// POST /api/booking-flow
pub async fn start_flow(State(state): State<Arc<AppState>>) -> (StatusCode, Json<FlowResponse>) {
    let session = workflow::start(&state);
    (
        StatusCode::CREATED,
        Json(FlowResponse::from_session(session, &state)),
    )
}

// GET /api/booking-flow
pub async fn get_flow(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FlowResponse>, AppError> {
    let session = workflow::current(&state)?;
    Ok(Json(FlowResponse::from_session(session, &state)))
}

// DELETE /api/booking-flow
pub async fn abandon_flow(State(state): State<Arc<AppState>>) -> StatusCode {
    workflow::abandon(&state);
    StatusCode::NO_CONTENT
}

// POST /api/booking-flow/service
#[derive(Deserialize)]
pub struct SelectServiceRequest {
    pub service_id: String,
}

pub async fn select_service(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SelectServiceRequest>,
) -> Result<Json<FlowResponse>, AppError> {
    let session = workflow::select_service(&state, &body.service_id)?;
    Ok(Json(FlowResponse::from_session(session, &state)))
}

// POST /api/booking-flow/stylist
#[derive(Deserialize)]
pub struct SelectStylistRequest {
    #[serde(default)]
    pub stylist_id: Option<String>,
}

pub async fn select_stylist(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SelectStylistRequest>,
) -> Result<Json<FlowResponse>, AppError> {
    let session = workflow::select_stylist(&state, body.stylist_id.as_deref())?;
    Ok(Json(FlowResponse::from_session(session, &state)))
}

// POST /api/booking-flow/schedule
#[derive(Deserialize)]
pub struct SelectScheduleRequest {
    pub date: String,
    pub time: String,
}

pub async fn select_schedule(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SelectScheduleRequest>,
) -> Result<Json<FlowResponse>, AppError> {
    let session = workflow::select_schedule(&state, &body.date, &body.time)?;
    Ok(Json(FlowResponse::from_session(session, &state)))
}

// POST /api/booking-flow/details
#[derive(Deserialize)]
pub struct EnterDetailsRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
}

pub async fn enter_details(
    State(state): State<Arc<AppState>>,
    Json(body): Json<EnterDetailsRequest>,
) -> Result<Json<CodeSentResponse>, AppError> {
    let (session, code) = workflow::enter_details(
        &state,
        &body.customer_name,
        &body.customer_email,
        &body.customer_phone,
    )?;
    Ok(Json(CodeSentResponse {
        flow: FlowResponse::from_session(session, &state),
        code,
        expires_in_seconds: OTP_TTL_SECONDS,
    }))
}

// POST /api/booking-flow/back
pub async fn go_back(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FlowResponse>, AppError> {
    let session = workflow::back(&state)?;
    Ok(Json(FlowResponse::from_session(session, &state)))
}

// POST /api/booking-flow/resend
pub async fn resend_code(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CodeSentResponse>, AppError> {
    let (session, code) = workflow::resend(&state)?;
    Ok(Json(CodeSentResponse {
        flow: FlowResponse::from_session(session, &state),
        code,
        expires_in_seconds: OTP_TTL_SECONDS,
    }))
}

// POST /api/booking-flow/confirm
#[derive(Deserialize)]
pub struct ConfirmRequest {
    pub code: String,
}

pub async fn confirm(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ConfirmRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let booking = workflow::confirm(&state, &body.code).await?;
    Ok((StatusCode::CREATED, Json(booking.into())))
}
