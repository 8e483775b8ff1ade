use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle events a booking can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingEventKind {
    Confirmation,
    Cancellation,
    Completion,
}

impl std::fmt::Display for BookingEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingEventKind::Confirmation => write!(f, "confirmation"),
            BookingEventKind::Cancellation => write!(f, "cancellation"),
            BookingEventKind::Completion => write!(f, "completion"),
        }
    }
}

/// An event produced by a booking transition
///
/// Transitions return these instead of calling observers directly; the
/// surrounding service drains them into the notifier, which decouples the
/// state machine from any delivery mechanism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingEvent {
    pub kind: BookingEventKind,
    pub booking_id: String,
    pub user_id: String,
    pub message: String,
}

impl BookingEvent {
    pub fn confirmation(booking_id: &str, user_id: &str, message: String) -> Self {
        Self {
            kind: BookingEventKind::Confirmation,
            booking_id: booking_id.to_string(),
            user_id: user_id.to_string(),
            message,
        }
    }

    pub fn cancellation(booking_id: &str, user_id: &str) -> Self {
        Self {
            kind: BookingEventKind::Cancellation,
            booking_id: booking_id.to_string(),
            user_id: user_id.to_string(),
            message: format!("Booking {} has been canceled", booking_id),
        }
    }

    pub fn completion(booking_id: &str, user_id: &str) -> Self {
        Self {
            kind: BookingEventKind::Completion,
            booking_id: booking_id.to_string(),
            user_id: user_id.to_string(),
            message: format!(
                "Booking {} is completed. Please provide feedback!",
                booking_id
            ),
        }
    }
}

/// A rendered notification handed to a delivery channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: String,
    pub user_id: String,
    pub kind: BookingEventKind,
    pub message: String,
    /// Informational; the only channel actually wired up renders to the
    /// interactive session
    pub channel: String,
    pub is_sent: bool,
    pub sent_at: DateTime<Utc>,
}

impl Notification {
    pub fn from_event(event: &BookingEvent, channel: &str) -> Self {
        Self {
            notification_id: Uuid::new_v4().to_string(),
            user_id: event.user_id.clone(),
            kind: event.kind,
            message: event.message.clone(),
            channel: channel.to_string(),
            is_sent: true,
            sent_at: Utc::now(),
        }
    }
}
