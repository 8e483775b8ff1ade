use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::models::{
    Booking, BookingEvent, BookingStatus, CreateBookingRequest, ServiceError, ServiceResult,
    ServiceSelection, User, UserRole, Validate,
};
use crate::repositories::JsonDataStore;
use crate::services::Notifier;

/// Booking creation, lifecycle transitions, and schedule queries
///
/// Every mutation persists the booking first and then dispatches whatever
/// events the transition produced; a failed delivery never rolls back state.
pub struct BookingService {
    store: Arc<JsonDataStore>,
    notifier: Arc<Notifier>,
}

impl BookingService {
    pub fn new(store: Arc<JsonDataStore>, notifier: Arc<Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Create a booking from a composed service selection.
    ///
    /// `barber_id` of None means "any available barber". A named barber must
    /// exist, hold the barber role, and currently be available.
    #[instrument(skip(self, request), fields(customer_id = %request.customer_id, base = %request.base_service))]
    pub async fn create_booking(&self, request: CreateBookingRequest) -> ServiceResult<Booking> {
        request.validate()?;

        let customer = self
            .store
            .get_user(&request.customer_id)
            .await
            .ok_or_else(|| ServiceError::UserNotFound {
                id: request.customer_id.clone(),
            })?;

        if let Some(barber_id) = &request.barber_id {
            let barber =
                self.store
                    .get_user(barber_id)
                    .await
                    .ok_or_else(|| ServiceError::UserNotFound {
                        id: barber_id.clone(),
                    })?;
            if barber.role != UserRole::Barber {
                return Err(ServiceError::ValidationError {
                    message: format!("{} is not a barber", barber_id),
                });
            }
            if !barber.is_available_barber() {
                return Err(ServiceError::ValidationError {
                    message: format!("Barber {} is not available", barber_id),
                });
            }
        }

        let service = ServiceSelection::compose(&request.base_service, &request.addons)?;
        let booking = Booking::new(
            customer.user_id.clone(),
            request.barber_id.clone(),
            service,
            request.booking_date,
            request.booking_time,
        );

        let booking = self.store.insert_booking(booking).await?;

        let event = BookingEvent::confirmation(
            &booking.booking_id,
            &booking.customer_id,
            format!(
                "Booking {} confirmed for {} at {}",
                booking.booking_id, booking.booking_date, booking.booking_time
            ),
        );
        self.notifier.dispatch(&event);

        info!(booking_id = %booking.booking_id, "Booking created");
        Ok(booking)
    }

    pub async fn get_booking(&self, id: &str) -> ServiceResult<Booking> {
        self.store
            .get_booking(id)
            .await
            .ok_or_else(|| ServiceError::BookingNotFound { id: id.to_string() })
    }

    /// scheduled -> in-progress; emits no notification
    #[instrument(skip(self), fields(booking_id = %id))]
    pub async fn start_booking(&self, id: &str) -> ServiceResult<Booking> {
        let mut booking = self.get_booking(id).await?;
        booking.start()?;
        self.store.update_booking(booking.clone()).await?;

        info!("Booking started");
        Ok(booking)
    }

    /// Transition to completed and notify the customer
    #[instrument(skip(self), fields(booking_id = %id))]
    pub async fn complete_booking(&self, id: &str) -> ServiceResult<Booking> {
        let mut booking = self.get_booking(id).await?;
        let event = booking.complete()?;
        self.store.update_booking(booking.clone()).await?;
        self.notifier.dispatch(&event);

        info!("Booking completed");
        Ok(booking)
    }

    /// Cancel, subject to the two-hour guard, and notify the customer
    #[instrument(skip(self), fields(booking_id = %id))]
    pub async fn cancel_booking(&self, id: &str) -> ServiceResult<Booking> {
        let mut booking = self.get_booking(id).await?;
        let event = booking.cancel(Utc::now().naive_utc())?;
        self.store.update_booking(booking.clone()).await?;
        self.notifier.dispatch(&event);

        info!("Booking canceled");
        Ok(booking)
    }

    /// A customer's bookings, newest first
    pub async fn bookings_for_customer(&self, customer_id: &str) -> Vec<Booking> {
        self.store.bookings_for_customer(customer_id).await
    }

    /// A barber's working list for one day: canceled bookings dropped,
    /// sorted by appointment time
    pub async fn barber_schedule(&self, barber_id: &str, date: NaiveDate) -> Vec<Booking> {
        self.store
            .bookings_on(date)
            .await
            .into_iter()
            .filter(|booking| {
                booking.barber_id.as_deref() == Some(barber_id)
                    && booking.status != BookingStatus::Canceled
            })
            .collect()
    }

    /// The whole shop's schedule for one day, canceled bookings dropped
    pub async fn daily_schedule(&self, date: NaiveDate) -> Vec<Booking> {
        self.store
            .bookings_on(date)
            .await
            .into_iter()
            .filter(|booking| booking.status != BookingStatus::Canceled)
            .collect()
    }

    /// Barbers currently taking bookings
    pub async fn available_barbers(&self) -> Vec<User> {
        self.store
            .list_barbers()
            .await
            .into_iter()
            .filter(User::is_available_barber)
            .collect()
    }

    pub async fn list_barbers(&self) -> Vec<User> {
        self.store.list_barbers().await
    }

    /// Flip a barber's availability flag; returns the new value
    #[instrument(skip(self), fields(barber_id = %barber_id))]
    pub async fn toggle_barber_availability(&self, barber_id: &str) -> ServiceResult<bool> {
        let mut barber =
            self.store
                .get_user(barber_id)
                .await
                .ok_or_else(|| ServiceError::UserNotFound {
                    id: barber_id.to_string(),
                })?;

        let available = barber
            .toggle_availability()
            .ok_or_else(|| ServiceError::ValidationError {
                message: format!("{} is not a barber", barber_id),
            })?;

        self.store.update_user(barber).await?;
        info!(available, "Barber availability changed");
        Ok(available)
    }
}
