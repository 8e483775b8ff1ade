use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{generate_id, PaymentMethod, PaymentStatus};

/// A payment against a booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: String,
    pub booking_id: String,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
}

impl Payment {
    /// Create a pending payment for a booking
    pub fn new(booking_id: String, amount: Decimal, payment_method: PaymentMethod) -> Self {
        Self {
            payment_id: generate_id("PAY"),
            booking_id,
            amount,
            payment_method,
            payment_status: PaymentStatus::Pending,
            transaction_id: None,
            payment_date: None,
        }
    }

    /// Settle the payment: pending flips to paid with a generated
    /// transaction id and timestamp. Single state change, no retry.
    pub fn process(&mut self) {
        self.payment_status = PaymentStatus::Paid;
        self.payment_date = Some(Utc::now());
        self.transaction_id = Some(format!(
            "TXN-{}",
            Uuid::new_v4()
                .simple()
                .to_string()
                .get(0..8)
                .unwrap_or("00000000")
                .to_uppercase()
        ));
    }
}

/// Request model for processing a payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessPaymentRequest {
    pub payment_method: PaymentMethod,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payment_starts_pending() {
        let payment = Payment::new("BK0001".to_string(), dec!(65000), PaymentMethod::EWallet);

        assert!(payment.payment_id.starts_with("PAY"));
        assert_eq!(payment.payment_status, PaymentStatus::Pending);
        assert!(payment.transaction_id.is_none());
        assert!(payment.payment_date.is_none());
    }

    #[test]
    fn test_process_settles_payment() {
        let mut payment = Payment::new("BK0001".to_string(), dec!(65000), PaymentMethod::Cash);
        payment.process();

        assert_eq!(payment.payment_status, PaymentStatus::Paid);
        assert!(payment.payment_date.is_some());

        let txn = payment.transaction_id.as_deref().unwrap();
        assert!(txn.starts_with("TXN-"));
        assert_eq!(txn.len(), 12);
        assert!(txn[4..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut payment = Payment::new("BK0001".to_string(), dec!(40000), PaymentMethod::DebitCard);
        payment.process();

        let json = serde_json::to_string(&payment).unwrap();
        let back: Payment = serde_json::from_str(&json).unwrap();
        assert_eq!(payment, back);
    }
}
