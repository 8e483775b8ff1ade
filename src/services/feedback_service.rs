use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::models::{
    BookingStatus, Feedback, ServiceError, ServiceResult, SubmitFeedbackRequest, Validate,
};
use crate::repositories::JsonDataStore;

/// Breakdown of a barber's reviews by star rating
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSummary {
    pub barber_id: String,
    pub review_count: usize,
    pub average_rating: f64,
    /// counts[0] is 1-star, counts[4] is 5-star
    pub rating_counts: [usize; 5],
    pub reviews: Vec<Feedback>,
}

/// Feedback submission and review queries
pub struct FeedbackService {
    store: Arc<JsonDataStore>,
}

impl FeedbackService {
    pub fn new(store: Arc<JsonDataStore>) -> Self {
        Self { store }
    }

    /// Submit feedback for a completed booking.
    ///
    /// Only the booking's customer may review it, only once, and only after
    /// completion.
    #[instrument(skip(self, request), fields(booking_id = %request.booking_id))]
    pub async fn submit(&self, request: SubmitFeedbackRequest) -> ServiceResult<Feedback> {
        request.validate()?;

        let booking = self
            .store
            .get_booking(&request.booking_id)
            .await
            .ok_or_else(|| ServiceError::BookingNotFound {
                id: request.booking_id.clone(),
            })?;

        if booking.customer_id != request.customer_id {
            return Err(ServiceError::ValidationError {
                message: format!(
                    "Booking {} does not belong to customer {}",
                    request.booking_id, request.customer_id
                ),
            });
        }

        if booking.status != BookingStatus::Completed {
            return Err(ServiceError::IllegalTransition {
                reason: format!(
                    "Booking {} is {}, only completed bookings can be reviewed",
                    booking.booking_id, booking.status
                ),
            });
        }

        if self
            .store
            .feedback_for_booking(&request.booking_id)
            .await
            .is_some()
        {
            return Err(ServiceError::DuplicateFeedback {
                booking_id: request.booking_id.clone(),
            });
        }

        let feedback = Feedback::new(
            booking.booking_id.clone(),
            booking.customer_id.clone(),
            booking.barber_id.clone().unwrap_or_default(),
            request.rating,
            request.comment,
        );

        let feedback = self.store.insert_feedback(feedback).await?;
        info!(feedback_id = %feedback.feedback_id, rating = feedback.rating, "Feedback recorded");
        Ok(feedback)
    }

    /// A barber's reviews with the rating distribution, newest first
    pub async fn reviews_for_barber(&self, barber_id: &str) -> ReviewSummary {
        let reviews = self.store.feedbacks_for_barber(barber_id).await;

        let mut rating_counts = [0usize; 5];
        for feedback in &reviews {
            if (1..=5).contains(&feedback.rating) {
                rating_counts[feedback.rating as usize - 1] += 1;
            }
        }

        let average_rating = if reviews.is_empty() {
            0.0
        } else {
            reviews.iter().map(|f| f.rating as f64).sum::<f64>() / reviews.len() as f64
        };

        ReviewSummary {
            barber_id: barber_id.to_string(),
            review_count: reviews.len(),
            average_rating,
            rating_counts,
            reviews,
        }
    }
}
