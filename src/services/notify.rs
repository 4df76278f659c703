use async_trait::async_trait;
use serde::Serialize;

use crate::models::BookingStatus;

/// Append-only notification events consumed by an external dispatcher.
/// In this deployment the dispatcher is a log sink standing in for the
/// SMS/email gateway.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationEvent {
    BookingCreated {
        booking_id: String,
    },
    BookingStatusChanged {
        booking_id: String,
        new_status: BookingStatus,
        customer_phone: String,
    },
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, event: NotificationEvent) -> anyhow::Result<()>;
}

pub struct ConsoleSink;

#[async_trait]
impl NotificationSink for ConsoleSink {
    async fn publish(&self, event: NotificationEvent) -> anyhow::Result<()> {
        match event {
            NotificationEvent::BookingCreated { booking_id } => {
                tracing::info!(
                    booking_id,
                    "salon notification: new booking received, admin approval required"
                );
            }
            NotificationEvent::BookingStatusChanged {
                booking_id,
                new_status,
                customer_phone,
            } => {
                tracing::info!(
                    to = customer_phone,
                    "customer sms/email: your appointment {} has been {}",
                    booking_id,
                    new_status.as_str()
                );
                tracing::info!(
                    booking_id,
                    status = new_status.as_str(),
                    "salon system: booking status persisted"
                );
            }
        }
        Ok(())
    }
}
