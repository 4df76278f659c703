use crate::catalog;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingDraft, BookingStatus};
use crate::services::notify::NotificationEvent;
use crate::state::AppState;

/// All bookings, most recently created first.
pub fn list(state: &AppState) -> Result<Vec<Booking>, AppError> {
    let db = state.db.lock().unwrap();
    queries::get_all_bookings(&db).map_err(AppError::Internal)
}

/// Validates the draft, assigns an id and creation timestamp, persists the
/// booking in PENDING state and emits a BookingCreated event. Every booking
/// starts life PENDING; no caller can create one in any other state.
pub async fn create(state: &AppState, draft: BookingDraft) -> Result<Booking, AppError> {
    validate_draft(&draft)?;

    let booking = {
        let db = state.db.lock().unwrap();

        // Re-draw on the (unlikely) reference number collision.
        let id = loop {
            let candidate = format!(
                "{}-{:06}",
                state.config.booking_prefix,
                state.rng.booking_number()
            );
            if !queries::booking_id_exists(&db, &candidate)? {
                break candidate;
            }
        };

        let booking = Booking {
            id,
            customer_name: draft.customer_name,
            customer_email: draft.customer_email,
            customer_phone: draft.customer_phone,
            service_id: draft.service_id,
            stylist_id: draft.stylist_id.filter(|s| !s.is_empty()),
            date: draft.date,
            time: draft.time,
            status: BookingStatus::Pending,
            created_at: state.clock.now(),
        };

        queries::create_booking(&db, &booking)?;
        booking
    };

    publish(
        state,
        NotificationEvent::BookingCreated {
            booking_id: booking.id.clone(),
        },
    )
    .await;

    Ok(booking)
}

/// Moves a booking to a new status. An unknown id is a logged no-op
/// reported as None; transitions out of CANCELLED/COMPLETED are rejected.
pub async fn update_status(
    state: &AppState,
    id: &str,
    new_status: BookingStatus,
) -> Result<Option<Booking>, AppError> {
    let updated = {
        let db = state.db.lock().unwrap();

        let Some(existing) = queries::get_booking_by_id(&db, id)? else {
            tracing::warn!(booking_id = id, "status update for unknown booking ignored");
            return Ok(None);
        };

        if existing.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "booking {} is {} and can no longer change",
                id,
                existing.status.as_str()
            )));
        }

        queries::update_booking_status(&db, id, new_status)?;
        Booking {
            status: new_status,
            ..existing
        }
    };

    publish(
        state,
        NotificationEvent::BookingStatusChanged {
            booking_id: updated.id.clone(),
            new_status,
            customer_phone: updated.customer_phone.clone(),
        },
    )
    .await;

    Ok(Some(updated))
}

pub fn stats(state: &AppState) -> Result<queries::BookingStats, AppError> {
    let db = state.db.lock().unwrap();
    queries::get_booking_stats(&db).map_err(AppError::Internal)
}

fn validate_draft(draft: &BookingDraft) -> Result<(), AppError> {
    let required = [
        ("customer_name", &draft.customer_name),
        ("customer_email", &draft.customer_email),
        ("customer_phone", &draft.customer_phone),
        ("service_id", &draft.service_id),
        ("date", &draft.date),
        ("time", &draft.time),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }

    if catalog::find_service(&draft.service_id).is_none() {
        return Err(AppError::Validation(format!(
            "unknown service: {}",
            draft.service_id
        )));
    }

    if let Some(stylist_id) = draft.stylist_id.as_deref() {
        if !stylist_id.is_empty() && catalog::find_stylist(stylist_id).is_none() {
            return Err(AppError::Validation(format!(
                "unknown stylist: {stylist_id}"
            )));
        }
    }

    Ok(())
}

/// Notification delivery is best-effort; a sink failure never fails the
/// booking operation that triggered it.
async fn publish(state: &AppState, event: NotificationEvent) {
    if let Err(e) = state.notifier.publish(event).await {
        tracing::error!(error = %e, "failed to publish notification");
    }
}
