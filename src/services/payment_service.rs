use std::sync::Arc;
use tracing::{info, instrument};

use crate::models::{
    BookingStatus, Payment, ProcessPaymentRequest, ServiceError, ServiceResult,
};
use crate::repositories::JsonDataStore;

/// Payment processing against bookings
pub struct PaymentService {
    store: Arc<JsonDataStore>,
}

impl PaymentService {
    pub fn new(store: Arc<JsonDataStore>) -> Self {
        Self { store }
    }

    /// Take payment for a booking.
    ///
    /// The amount is always the booking's composed service price. Canceled
    /// bookings cannot be paid for, and a booking takes at most one payment.
    /// The payment is created pending and settled immediately; there is no
    /// retry path.
    #[instrument(skip(self, request), fields(booking_id = %booking_id, method = %request.payment_method))]
    pub async fn process_payment(
        &self,
        booking_id: &str,
        request: ProcessPaymentRequest,
    ) -> ServiceResult<Payment> {
        let booking = self
            .store
            .get_booking(booking_id)
            .await
            .ok_or_else(|| ServiceError::BookingNotFound {
                id: booking_id.to_string(),
            })?;

        if booking.status == BookingStatus::Canceled {
            return Err(ServiceError::IllegalTransition {
                reason: format!("Booking {} is canceled", booking_id),
            });
        }

        if self.store.payment_for_booking(booking_id).await.is_some() {
            return Err(ServiceError::DuplicatePayment {
                booking_id: booking_id.to_string(),
            });
        }

        let mut payment = Payment::new(
            booking.booking_id.clone(),
            booking.service.price(),
            request.payment_method,
        );
        payment.process();

        let payment = self.store.insert_payment(payment).await?;
        info!(
            payment_id = %payment.payment_id,
            transaction_id = ?payment.transaction_id,
            "Payment settled"
        );
        Ok(payment)
    }

    pub async fn payment_for_booking(&self, booking_id: &str) -> Option<Payment> {
        self.store.payment_for_booking(booking_id).await
    }
}
