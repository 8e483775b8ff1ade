use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{generate_id, validate_comment, validate_rating, Validate, ValidationResult};

/// Customer feedback on a completed booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub feedback_id: String,
    pub booking_id: String,
    pub customer_id: String,
    /// Empty string for "any available" bookings that never had a barber
    /// assigned, matching the persisted layout
    pub barber_id: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    pub fn new(
        booking_id: String,
        customer_id: String,
        barber_id: String,
        rating: u8,
        comment: String,
    ) -> Self {
        Self {
            feedback_id: generate_id("FB"),
            booking_id,
            customer_id,
            barber_id,
            rating,
            comment,
            created_at: Utc::now(),
        }
    }
}

/// Request model for submitting feedback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitFeedbackRequest {
    pub booking_id: String,
    pub customer_id: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

impl Validate for SubmitFeedbackRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_rating(self.rating)?;
        validate_comment(&self.comment)?;
        Ok(())
    }
}
