use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::catalog;
use crate::errors::AppError;
use crate::models::{Booking, BookingDraft};
use crate::services::otp::{self, OtpOutcome, OTP_CODE_LEN};
use crate::services::bookings;
use crate::state::AppState;

/// The linear reservation wizard. One session is active per process; it
/// lives in `AppState` and is replaced wholesale when a new flow starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    SelectingService,
    SelectingStylist,
    SelectingSchedule,
    EnteringDetails,
    AwaitingVerification,
    Confirmed,
}

#[derive(Debug, Clone)]
pub struct WorkflowSession {
    pub step: WorkflowStep,
    pub service_id: Option<String>,
    pub stylist_id: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub otp_expires_at: Option<NaiveDateTime>,
    pub booking_id: Option<String>,
}

impl WorkflowSession {
    fn new() -> Self {
        Self {
            step: WorkflowStep::SelectingService,
            service_id: None,
            stylist_id: None,
            date: None,
            time: None,
            customer_name: None,
            customer_email: None,
            customer_phone: None,
            otp_expires_at: None,
            booking_id: None,
        }
    }

    /// Seconds of OTP validity left, derived from the stored absolute
    /// expiry rather than a ticking counter.
    pub fn otp_remaining_seconds(&self, now: NaiveDateTime) -> Option<i64> {
        self.otp_expires_at
            .map(|expiry| (expiry - now).num_seconds().max(0))
    }
}

/// Starts a fresh wizard, discarding any session already in progress.
pub fn start(state: &AppState) -> WorkflowSession {
    let session = WorkflowSession::new();
    *state.flow.lock().unwrap() = Some(session.clone());
    session
}

pub fn current(state: &AppState) -> Result<WorkflowSession, AppError> {
    state
        .flow
        .lock()
        .unwrap()
        .clone()
        .ok_or_else(|| AppError::NotFound("no active booking session".to_string()))
}

/// Abandoning discards all draft state. An already-issued OTP record stays
/// in the store until its natural expiry.
pub fn abandon(state: &AppState) {
    *state.flow.lock().unwrap() = None;
}

pub fn select_service(state: &AppState, service_id: &str) -> Result<WorkflowSession, AppError> {
    if catalog::find_service(service_id).is_none() {
        return Err(AppError::Validation(format!(
            "unknown service: {service_id}"
        )));
    }

    with_session_at(state, WorkflowStep::SelectingService, |session| {
        session.service_id = Some(service_id.to_string());
        session.step = WorkflowStep::SelectingStylist;
        Ok(())
    })
}

/// The stylist is optional; None means auto-assign.
pub fn select_stylist(
    state: &AppState,
    stylist_id: Option<&str>,
) -> Result<WorkflowSession, AppError> {
    let stylist_id = stylist_id.filter(|s| !s.is_empty());
    if let Some(id) = stylist_id {
        if catalog::find_stylist(id).is_none() {
            return Err(AppError::Validation(format!("unknown stylist: {id}")));
        }
    }

    with_session_at(state, WorkflowStep::SelectingStylist, |session| {
        session.stylist_id = stylist_id.map(str::to_string);
        session.step = WorkflowStep::SelectingSchedule;
        Ok(())
    })
}

pub fn select_schedule(
    state: &AppState,
    date: &str,
    time: &str,
) -> Result<WorkflowSession, AppError> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid date: {date}")))?;
    if parsed < state.clock.today() {
        return Err(AppError::Validation(
            "date must be today or later".to_string(),
        ));
    }
    if time.trim().is_empty() {
        return Err(AppError::Validation("time is required".to_string()));
    }

    with_session_at(state, WorkflowStep::SelectingSchedule, |session| {
        session.date = Some(date.to_string());
        session.time = Some(time.to_string());
        session.step = WorkflowStep::EnteringDetails;
        Ok(())
    })
}

/// Completing the details step issues the verification code and enters
/// AwaitingVerification. The code is returned so the caller can surface it
/// as a simulated SMS.
pub fn enter_details(
    state: &AppState,
    name: &str,
    email: &str,
    phone: &str,
) -> Result<(WorkflowSession, String), AppError> {
    for (field, value) in [("name", name), ("email", email), ("phone", phone)] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }

    // Reject before issuing: a request at the wrong step must not touch
    // the OTP store, or it would overwrite a live code for this phone.
    {
        let session = current(state)?;
        if session.step != WorkflowStep::EnteringDetails {
            return Err(wrong_step(session.step));
        }
    }

    let issued = {
        let db = state.db.lock().unwrap();
        otp::issue(&db, state.clock.as_ref(), state.rng.as_ref(), phone)?
    };

    let session = with_session_at(state, WorkflowStep::EnteringDetails, |session| {
        session.customer_name = Some(name.to_string());
        session.customer_email = Some(email.to_string());
        session.customer_phone = Some(phone.to_string());
        session.otp_expires_at = Some(issued.expires_at);
        session.step = WorkflowStep::AwaitingVerification;
        Ok(())
    })?;

    Ok((session, issued.code))
}

/// Re-issues the code for the session's phone, invalidating the previous
/// one and resetting the countdown.
pub fn resend(state: &AppState) -> Result<(WorkflowSession, String), AppError> {
    let phone = {
        let session = current(state)?;
        if session.step != WorkflowStep::AwaitingVerification {
            return Err(wrong_step(session.step));
        }
        session.customer_phone.clone().unwrap_or_default()
    };

    let issued = {
        let db = state.db.lock().unwrap();
        otp::issue(&db, state.clock.as_ref(), state.rng.as_ref(), &phone)?
    };

    let session = with_session_at(state, WorkflowStep::AwaitingVerification, |session| {
        session.otp_expires_at = Some(issued.expires_at);
        Ok(())
    })?;

    Ok((session, issued.code))
}

/// Verifies the submitted code and, on success, creates the booking and
/// moves to Confirmed. Failure leaves the session in AwaitingVerification
/// so the caller can retry or resend.
pub async fn confirm(state: &AppState, code: &str) -> Result<Booking, AppError> {
    let (phone, draft) = {
        let guard = state.flow.lock().unwrap();
        let session = guard
            .as_ref()
            .ok_or_else(|| AppError::NotFound("no active booking session".to_string()))?;
        if session.step != WorkflowStep::AwaitingVerification {
            return Err(wrong_step(session.step));
        }

        let remaining = session
            .otp_remaining_seconds(state.clock.now())
            .unwrap_or(0);
        if remaining <= 0 {
            return Err(AppError::OtpExpired);
        }
        if code.len() != OTP_CODE_LEN {
            return Err(AppError::OtpInvalid);
        }

        let phone = session.customer_phone.clone().unwrap_or_default();
        let draft = BookingDraft {
            customer_name: session.customer_name.clone().unwrap_or_default(),
            customer_email: session.customer_email.clone().unwrap_or_default(),
            customer_phone: phone.clone(),
            service_id: session.service_id.clone().unwrap_or_default(),
            stylist_id: session.stylist_id.clone(),
            date: session.date.clone().unwrap_or_default(),
            time: session.time.clone().unwrap_or_default(),
        };
        (phone, draft)
    };

    let outcome = {
        let db = state.db.lock().unwrap();
        otp::verify(&db, state.clock.as_ref(), &phone, code)?
    };

    match outcome {
        OtpOutcome::Verified => {}
        OtpOutcome::Expired => return Err(AppError::OtpExpired),
        OtpOutcome::Mismatch | OtpOutcome::Missing => return Err(AppError::OtpInvalid),
    }

    let booking = bookings::create(state, draft).await?;

    // The session may only have been abandoned meanwhile; per-process
    // single-session means no competing writer.
    let mut guard = state.flow.lock().unwrap();
    if let Some(session) = guard.as_mut() {
        session.step = WorkflowStep::Confirmed;
        session.booking_id = Some(booking.id.clone());
    }

    Ok(booking)
}

/// Backward navigation is allowed from steps 2-4 only; never once
/// verification has started.
pub fn back(state: &AppState) -> Result<WorkflowSession, AppError> {
    let mut guard = state.flow.lock().unwrap();
    let session = guard
        .as_mut()
        .ok_or_else(|| AppError::NotFound("no active booking session".to_string()))?;

    session.step = match session.step {
        WorkflowStep::SelectingStylist => WorkflowStep::SelectingService,
        WorkflowStep::SelectingSchedule => WorkflowStep::SelectingStylist,
        WorkflowStep::EnteringDetails => WorkflowStep::SelectingSchedule,
        step => return Err(wrong_step(step)),
    };

    Ok(session.clone())
}

fn wrong_step(step: WorkflowStep) -> AppError {
    AppError::Conflict(format!("action not valid at step {step:?}"))
}

fn with_session_at(
    state: &AppState,
    expected: WorkflowStep,
    apply: impl FnOnce(&mut WorkflowSession) -> Result<(), AppError>,
) -> Result<WorkflowSession, AppError> {
    let mut guard = state.flow.lock().unwrap();
    let session = guard
        .as_mut()
        .ok_or_else(|| AppError::NotFound("no active booking session".to_string()))?;

    if session.step != expected {
        return Err(wrong_step(session.step));
    }

    apply(session)?;
    Ok(session.clone())
}
