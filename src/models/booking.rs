use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    generate_id, BookingEvent, BookingStatus, ServiceError, ServiceResult, ServiceSelection,
    Validate, ValidationError, ValidationResult,
};

/// Minimum lead time for cancellations, in hours
pub const CANCELLATION_WINDOW_HOURS: f64 = 2.0;

/// A booked appointment
///
/// Owns an immutable snapshot of the composed service. Transitions are pure:
/// they take the current wall-clock time where a guard needs it and return
/// the event to dispatch, so the state machine never touches the clock, the
/// store, or a delivery channel itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: String,
    pub customer_id: String,
    /// None means "any available barber"
    pub barber_id: Option<String>,
    pub service: ServiceSelection,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        customer_id: String,
        barber_id: Option<String>,
        service: ServiceSelection,
        booking_date: NaiveDate,
        booking_time: NaiveTime,
    ) -> Self {
        Self {
            booking_id: generate_id("BK"),
            customer_id,
            barber_id,
            service,
            booking_date,
            booking_time,
            status: BookingStatus::Scheduled,
            created_at: Utc::now(),
        }
    }

    pub fn appointment_datetime(&self) -> NaiveDateTime {
        self.booking_date.and_time(self.booking_time)
    }

    /// Cancel the booking.
    ///
    /// Declined on terminal bookings and inside the two-hour window before
    /// the appointment; neither case changes state. On success the status
    /// flips to canceled and the cancellation event is returned for
    /// dispatch.
    pub fn cancel(&mut self, now: NaiveDateTime) -> ServiceResult<BookingEvent> {
        if self.status.is_terminal() {
            return Err(ServiceError::IllegalTransition {
                reason: format!(
                    "Booking {} is already {}",
                    self.booking_id, self.status
                ),
            });
        }

        let seconds_until = (self.appointment_datetime() - now).num_seconds();
        let hours_until = seconds_until as f64 / 3600.0;
        if hours_until < CANCELLATION_WINDOW_HOURS {
            return Err(ServiceError::IllegalTransition {
                reason: "Cannot cancel less than 2 hours before appointment".to_string(),
            });
        }

        self.status = BookingStatus::Canceled;
        Ok(BookingEvent::cancellation(
            &self.booking_id,
            &self.customer_id,
        ))
    }

    /// Mark the booking completed.
    ///
    /// Legal from scheduled and in-progress; terminal states decline.
    pub fn complete(&mut self) -> ServiceResult<BookingEvent> {
        if self.status.is_terminal() {
            return Err(ServiceError::IllegalTransition {
                reason: format!(
                    "Booking {} is already {}",
                    self.booking_id, self.status
                ),
            });
        }

        self.status = BookingStatus::Completed;
        Ok(BookingEvent::completion(
            &self.booking_id,
            &self.customer_id,
        ))
    }

    /// Move a scheduled booking into progress.
    ///
    /// Goes through the same guarded path as the other transitions but emits
    /// no event: starting a booking has never notified anyone.
    pub fn start(&mut self) -> ServiceResult<()> {
        if self.status != BookingStatus::Scheduled {
            return Err(ServiceError::IllegalTransition {
                reason: format!(
                    "Booking {} cannot start from {}",
                    self.booking_id, self.status
                ),
            });
        }

        self.status = BookingStatus::InProgress;
        Ok(())
    }

    /// API view with the derived service totals alongside the selection
    pub fn to_response(&self) -> BookingResponse {
        BookingResponse {
            booking_id: self.booking_id.clone(),
            customer_id: self.customer_id.clone(),
            barber_id: self.barber_id.clone(),
            service: self.service.clone(),
            service_description: self.service.description(),
            service_price: self.service.price(),
            service_duration: self.service.duration_minutes(),
            booking_date: self.booking_date,
            booking_time: self.booking_time,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Request model for creating a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub customer_id: String,
    pub base_service: String,
    #[serde(default)]
    pub addons: Vec<String>,
    pub barber_id: Option<String>,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
}

impl Validate for CreateBookingRequest {
    fn validate(&self) -> ValidationResult<()> {
        if self.customer_id.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "customer_id".to_string(),
            });
        }
        if self.base_service.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "base_service".to_string(),
            });
        }
        Ok(())
    }
}

/// Response model for bookings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingResponse {
    pub booking_id: String,
    pub customer_id: String,
    pub barber_id: Option<String>,
    pub service: ServiceSelection,
    pub service_description: String,
    pub service_price: Decimal,
    pub service_duration: u32,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}
