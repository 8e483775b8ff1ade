use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

use crate::models::{Booking, BookingStatus, Payment, ServiceResult};
use crate::repositories::JsonDataStore;

/// Shop-wide headline numbers for the owner dashboard
#[derive(Debug, Clone, Serialize)]
pub struct OverviewReport {
    pub total_bookings: usize,
    pub completed_bookings: usize,
    /// Sum of paid payments
    pub total_revenue: Decimal,
    /// Average feedback rating across the shop, 0.0 when no feedback exists
    pub average_rating: f64,
}

/// Paid revenue within a date range
#[derive(Debug, Clone, Serialize)]
pub struct RevenueReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_revenue: Decimal,
    pub transaction_count: usize,
    pub average_transaction: Decimal,
    /// Matching payments, newest first
    pub payments: Vec<Payment>,
}

/// One barber's numbers
#[derive(Debug, Clone, Serialize)]
pub struct BarberStatsReport {
    pub barber_id: String,
    pub total_bookings: usize,
    pub completed_bookings: usize,
    /// Composed service prices of completed bookings
    pub revenue: Decimal,
    pub average_rating: f64,
    /// Up to five most recent bookings
    pub recent_bookings: Vec<Booking>,
}

/// Read-only aggregates over the store, matching the owner and barber
/// dashboard views
pub struct ReportService {
    store: Arc<JsonDataStore>,
}

impl ReportService {
    pub fn new(store: Arc<JsonDataStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn overview(&self) -> ServiceResult<OverviewReport> {
        let bookings = self.store.list_bookings().await;
        let completed_bookings = bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Completed)
            .count();

        let total_revenue: Decimal = self
            .store
            .paid_payments()
            .await
            .iter()
            .map(|p| p.amount)
            .sum();

        let feedbacks = self.store.list_feedbacks().await;
        let average_rating = if feedbacks.is_empty() {
            0.0
        } else {
            feedbacks.iter().map(|f| f.rating as f64).sum::<f64>() / feedbacks.len() as f64
        };

        Ok(OverviewReport {
            total_bookings: bookings.len(),
            completed_bookings,
            total_revenue,
            average_rating,
        })
    }

    /// Paid payments whose settlement date falls in `from..=to`
    #[instrument(skip(self))]
    pub async fn revenue(&self, from: NaiveDate, to: NaiveDate) -> ServiceResult<RevenueReport> {
        let mut payments: Vec<Payment> = self
            .store
            .paid_payments()
            .await
            .into_iter()
            .filter(|payment| {
                payment
                    .payment_date
                    .map(|at| {
                        let day = at.date_naive();
                        from <= day && day <= to
                    })
                    .unwrap_or(false)
            })
            .collect();
        payments.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));

        let total_revenue: Decimal = payments.iter().map(|p| p.amount).sum();
        let transaction_count = payments.len();
        let average_transaction = if transaction_count == 0 {
            Decimal::ZERO
        } else {
            total_revenue / Decimal::from(transaction_count as u64)
        };

        Ok(RevenueReport {
            from,
            to,
            total_revenue,
            transaction_count,
            average_transaction,
            payments,
        })
    }

    #[instrument(skip(self), fields(barber_id = %barber_id))]
    pub async fn barber_stats(&self, barber_id: &str) -> ServiceResult<BarberStatsReport> {
        let bookings = self.store.bookings_for_barber(barber_id).await;

        let completed: Vec<&Booking> = bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Completed)
            .collect();
        let revenue: Decimal = completed.iter().map(|b| b.service.price()).sum();

        let feedbacks = self.store.feedbacks_for_barber(barber_id).await;
        let average_rating = if feedbacks.is_empty() {
            0.0
        } else {
            feedbacks.iter().map(|f| f.rating as f64).sum::<f64>() / feedbacks.len() as f64
        };

        // bookings_for_barber comes back newest first
        let recent_bookings = bookings.iter().take(5).cloned().collect();

        Ok(BarberStatsReport {
            barber_id: barber_id.to_string(),
            total_bookings: bookings.len(),
            completed_bookings: completed.len(),
            revenue,
            average_rating,
            recent_bookings,
        })
    }
}
