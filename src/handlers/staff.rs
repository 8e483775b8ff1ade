use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, instrument};

use super::api::service_error_to_response;
use crate::models::{BookingResponse, UserResponse};
use crate::services::{
    BarberStatsReport, BookingService, FeedbackService, OverviewReport, ReportService,
    RevenueReport, ReviewSummary,
};

/// Shared state for the barber and owner surface
#[derive(Clone)]
pub struct StaffState {
    pub booking_service: Arc<BookingService>,
    pub feedback_service: Arc<FeedbackService>,
    pub report_service: Arc<ReportService>,
}

#[derive(Debug, Deserialize)]
pub struct ListBarbersQuery {
    #[serde(default)]
    pub available_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    /// Defaults to today
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct RevenueQuery {
    /// Defaults to 30 days ago
    pub from: Option<NaiveDate>,
    /// Defaults to today
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub barber_id: String,
    pub is_available: bool,
}

/// Create the staff-facing router
pub fn create_staff_router(state: StaffState) -> Router {
    Router::new()
        .route("/api/barbers", get(list_barbers))
        .route("/api/barbers/:barber_id/availability", put(toggle_availability))
        .route("/api/barbers/:barber_id/schedule", get(barber_schedule))
        .route("/api/barbers/:barber_id/stats", get(barber_stats))
        .route("/api/barbers/:barber_id/reviews", get(barber_reviews))
        .route("/api/reports/overview", get(overview_report))
        .route("/api/reports/revenue", get(revenue_report))
        .route("/api/reports/schedule", get(daily_schedule))
        .with_state(state)
}

/// List barbers, optionally only those taking bookings
#[instrument(name = "list_barbers", skip(state))]
pub async fn list_barbers(
    State(state): State<StaffState>,
    Query(query): Query<ListBarbersQuery>,
) -> Json<Vec<UserResponse>> {
    let barbers = if query.available_only {
        state.booking_service.available_barbers().await
    } else {
        state.booking_service.list_barbers().await
    };

    Json(barbers.iter().map(|barber| barber.to_response()).collect())
}

/// Flip a barber's availability flag
#[instrument(name = "toggle_availability", skip(state), fields(barber_id = %barber_id))]
pub async fn toggle_availability(
    State(state): State<StaffState>,
    Path(barber_id): Path<String>,
) -> Result<Json<AvailabilityResponse>, (StatusCode, Json<Value>)> {
    match state
        .booking_service
        .toggle_barber_availability(&barber_id)
        .await
    {
        Ok(is_available) => Ok(Json(AvailabilityResponse {
            barber_id,
            is_available,
        })),
        Err(err) => {
            error!("Availability toggle failed: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// A barber's bookings for one day, canceled dropped, sorted by time
#[instrument(name = "barber_schedule", skip(state), fields(barber_id = %barber_id))]
pub async fn barber_schedule(
    State(state): State<StaffState>,
    Path(barber_id): Path<String>,
    Query(query): Query<ScheduleQuery>,
) -> Json<Vec<BookingResponse>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let bookings = state
        .booking_service
        .barber_schedule(&barber_id, date)
        .await
        .iter()
        .map(|booking| booking.to_response())
        .collect();
    Json(bookings)
}

/// One barber's headline numbers
#[instrument(name = "barber_stats", skip(state), fields(barber_id = %barber_id))]
pub async fn barber_stats(
    State(state): State<StaffState>,
    Path(barber_id): Path<String>,
) -> Result<Json<BarberStatsReport>, (StatusCode, Json<Value>)> {
    match state.report_service.barber_stats(&barber_id).await {
        Ok(stats) => Ok(Json(stats)),
        Err(err) => {
            error!("Barber stats failed: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// A barber's reviews with the rating distribution
#[instrument(name = "barber_reviews", skip(state), fields(barber_id = %barber_id))]
pub async fn barber_reviews(
    State(state): State<StaffState>,
    Path(barber_id): Path<String>,
) -> Json<ReviewSummary> {
    Json(state.feedback_service.reviews_for_barber(&barber_id).await)
}

/// Shop-wide headline numbers
#[instrument(name = "overview_report", skip(state))]
pub async fn overview_report(
    State(state): State<StaffState>,
) -> Result<Json<OverviewReport>, (StatusCode, Json<Value>)> {
    match state.report_service.overview().await {
        Ok(report) => Ok(Json(report)),
        Err(err) => {
            error!("Overview report failed: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Paid revenue within a date range, defaulting to the last 30 days
#[instrument(name = "revenue_report", skip(state))]
pub async fn revenue_report(
    State(state): State<StaffState>,
    Query(query): Query<RevenueQuery>,
) -> Result<Json<RevenueReport>, (StatusCode, Json<Value>)> {
    let today = Utc::now().date_naive();
    let from = query.from.unwrap_or(today - Duration::days(30));
    let to = query.to.unwrap_or(today);

    match state.report_service.revenue(from, to).await {
        Ok(report) => Ok(Json(report)),
        Err(err) => {
            error!("Revenue report failed: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// The whole shop's schedule for one day
#[instrument(name = "daily_schedule", skip(state))]
pub async fn daily_schedule(
    State(state): State<StaffState>,
    Query(query): Query<ScheduleQuery>,
) -> Json<Vec<BookingResponse>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let bookings = state
        .booking_service
        .daily_schedule(date)
        .await
        .iter()
        .map(|booking| booking.to_response())
        .collect();
    Json(bookings)
}
