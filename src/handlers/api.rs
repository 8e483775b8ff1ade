use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::models::{
    Addon, BaseService, BookingResponse, CreateBookingRequest, Feedback, LoginRequest, Payment,
    ProcessPaymentRequest, RegisterRequest, ServiceError, ServiceSelection, StoreError,
    SubmitFeedbackRequest, UserResponse,
};
use crate::services::{AuthService, BookingService, FeedbackService, PaymentService};

/// Shared state for the customer-facing API
#[derive(Clone)]
pub struct ApiState {
    pub auth_service: Arc<AuthService>,
    pub booking_service: Arc<BookingService>,
    pub payment_service: Arc<PaymentService>,
    pub feedback_service: Arc<FeedbackService>,
}

/// One base service as listed in the catalog
#[derive(Debug, Serialize)]
pub struct CatalogBaseService {
    pub name: BaseService,
    pub label: String,
    pub description: String,
    pub price: Decimal,
    pub duration_minutes: u32,
}

/// One add-on as listed in the catalog
#[derive(Debug, Serialize)]
pub struct CatalogAddon {
    pub name: Addon,
    pub label: String,
    pub price_delta: Decimal,
    pub duration_delta_minutes: u32,
}

/// Response for the service catalog
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub base_services: Vec<CatalogBaseService>,
    pub addons: Vec<CatalogAddon>,
}

/// Request to price a selection without booking it
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub base_service: String,
    #[serde(default)]
    pub addons: Vec<String>,
}

/// Priced quote for a composed selection
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub selection: ServiceSelection,
    pub description: String,
    pub price: Decimal,
    pub duration_minutes: u32,
}

/// Create the customer-facing API router
pub fn create_api_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/catalog", get(get_catalog))
        .route("/api/catalog/quote", post(quote_selection))
        .route("/api/bookings", post(create_booking))
        .route("/api/bookings/:booking_id", get(get_booking))
        .route("/api/bookings/:booking_id/start", post(start_booking))
        .route("/api/bookings/:booking_id/complete", post(complete_booking))
        .route("/api/bookings/:booking_id/cancel", post(cancel_booking))
        .route(
            "/api/bookings/:booking_id/payment",
            get(get_payment).post(pay_booking),
        )
        .route("/api/customers/:customer_id/bookings", get(customer_bookings))
        .route("/api/feedback", post(submit_feedback))
        .with_state(state)
}

// =============================================================================
// AUTH ENDPOINTS
// =============================================================================

/// Register a new customer account
#[instrument(name = "register", skip(state, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<ApiState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), (StatusCode, Json<Value>)> {
    match state.auth_service.register(request).await {
        Ok(user) => {
            info!(user_id = %user.user_id, "Registration succeeded");
            Ok((StatusCode::CREATED, Json(user.to_response())))
        }
        Err(err) => {
            error!("Registration failed: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Authenticate with email and password
#[instrument(name = "login", skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<ApiState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserResponse>, (StatusCode, Json<Value>)> {
    match state
        .auth_service
        .authenticate(&request.email, &request.password)
        .await
    {
        Ok(user) => Ok(Json(user.to_response())),
        Err(err) => {
            error!("Login failed: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// CATALOG ENDPOINTS
// =============================================================================

/// List base services and add-ons with prices and durations
#[instrument(name = "get_catalog")]
pub async fn get_catalog() -> Json<CatalogResponse> {
    let base_services = BaseService::ALL
        .iter()
        .map(|base| CatalogBaseService {
            name: *base,
            label: base.label().to_string(),
            description: base.blurb().to_string(),
            price: base.price(),
            duration_minutes: base.duration_minutes(),
        })
        .collect();

    let addons = Addon::ALL
        .iter()
        .map(|addon| CatalogAddon {
            name: *addon,
            label: addon.label().to_string(),
            price_delta: addon.price_delta(),
            duration_delta_minutes: addon.duration_delta_minutes(),
        })
        .collect();

    Json(CatalogResponse {
        base_services,
        addons,
    })
}

/// Price a base + add-on selection without creating a booking
#[instrument(name = "quote_selection", skip(request), fields(base = %request.base_service))]
pub async fn quote_selection(
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, (StatusCode, Json<Value>)> {
    match ServiceSelection::compose(&request.base_service, &request.addons) {
        Ok(selection) => Ok(Json(QuoteResponse {
            description: selection.description(),
            price: selection.price(),
            duration_minutes: selection.duration_minutes(),
            selection,
        })),
        Err(err) => {
            error!("Quote failed: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// BOOKING ENDPOINTS
// =============================================================================

/// Create a booking
#[instrument(name = "create_booking", skip(state, request), fields(customer_id = %request.customer_id))]
pub async fn create_booking(
    State(state): State<ApiState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), (StatusCode, Json<Value>)> {
    match state.booking_service.create_booking(request).await {
        Ok(booking) => Ok((StatusCode::CREATED, Json(booking.to_response()))),
        Err(err) => {
            error!("Booking creation failed: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Get a booking by id
#[instrument(name = "get_booking", skip(state), fields(booking_id = %booking_id))]
pub async fn get_booking(
    State(state): State<ApiState>,
    Path(booking_id): Path<String>,
) -> Result<Json<BookingResponse>, (StatusCode, Json<Value>)> {
    match state.booking_service.get_booking(&booking_id).await {
        Ok(booking) => Ok(Json(booking.to_response())),
        Err(err) => Err(service_error_to_response(err)),
    }
}

/// A customer's bookings, newest first
#[instrument(name = "customer_bookings", skip(state), fields(customer_id = %customer_id))]
pub async fn customer_bookings(
    State(state): State<ApiState>,
    Path(customer_id): Path<String>,
) -> Json<Vec<BookingResponse>> {
    let bookings = state
        .booking_service
        .bookings_for_customer(&customer_id)
        .await
        .iter()
        .map(|booking| booking.to_response())
        .collect();
    Json(bookings)
}

/// scheduled -> in-progress
#[instrument(name = "start_booking", skip(state), fields(booking_id = %booking_id))]
pub async fn start_booking(
    State(state): State<ApiState>,
    Path(booking_id): Path<String>,
) -> Result<Json<BookingResponse>, (StatusCode, Json<Value>)> {
    match state.booking_service.start_booking(&booking_id).await {
        Ok(booking) => Ok(Json(booking.to_response())),
        Err(err) => {
            error!("Start failed: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Transition to completed and notify the customer
#[instrument(name = "complete_booking", skip(state), fields(booking_id = %booking_id))]
pub async fn complete_booking(
    State(state): State<ApiState>,
    Path(booking_id): Path<String>,
) -> Result<Json<BookingResponse>, (StatusCode, Json<Value>)> {
    match state.booking_service.complete_booking(&booking_id).await {
        Ok(booking) => Ok(Json(booking.to_response())),
        Err(err) => {
            error!("Complete failed: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Cancel, subject to the two-hour guard
#[instrument(name = "cancel_booking", skip(state), fields(booking_id = %booking_id))]
pub async fn cancel_booking(
    State(state): State<ApiState>,
    Path(booking_id): Path<String>,
) -> Result<Json<BookingResponse>, (StatusCode, Json<Value>)> {
    match state.booking_service.cancel_booking(&booking_id).await {
        Ok(booking) => Ok(Json(booking.to_response())),
        Err(err) => {
            error!("Cancel declined: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// PAYMENT AND FEEDBACK ENDPOINTS
// =============================================================================

/// Take payment for a booking
#[instrument(name = "pay_booking", skip(state, request), fields(booking_id = %booking_id))]
pub async fn pay_booking(
    State(state): State<ApiState>,
    Path(booking_id): Path<String>,
    Json(request): Json<ProcessPaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), (StatusCode, Json<Value>)> {
    match state
        .payment_service
        .process_payment(&booking_id, request)
        .await
    {
        Ok(payment) => Ok((StatusCode::CREATED, Json(payment))),
        Err(err) => {
            error!("Payment failed: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Fetch the payment attached to a booking
#[instrument(name = "get_payment", skip(state), fields(booking_id = %booking_id))]
pub async fn get_payment(
    State(state): State<ApiState>,
    Path(booking_id): Path<String>,
) -> Result<Json<Payment>, (StatusCode, Json<Value>)> {
    match state.payment_service.payment_for_booking(&booking_id).await {
        Some(payment) => Ok(Json(payment)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("No payment for booking {}", booking_id),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })),
        )),
    }
}

/// Submit feedback for a completed booking
#[instrument(name = "submit_feedback", skip(state, request), fields(booking_id = %request.booking_id))]
pub async fn submit_feedback(
    State(state): State<ApiState>,
    Json(request): Json<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<Feedback>), (StatusCode, Json<Value>)> {
    match state.feedback_service.submit(request).await {
        Ok(feedback) => Ok((StatusCode::CREATED, Json(feedback))),
        Err(err) => {
            error!("Feedback rejected: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Convert ServiceError to HTTP response
pub(crate) fn service_error_to_response(err: ServiceError) -> (StatusCode, Json<Value>) {
    let (status, message) = match &err {
        ServiceError::UnknownService { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        ServiceError::ValidationError { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        ServiceError::DuplicateEmail { .. } => (StatusCode::CONFLICT, err.to_string()),
        ServiceError::InvalidCredentials => (StatusCode::UNAUTHORIZED, err.to_string()),
        ServiceError::UserNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::BookingNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::IllegalTransition { .. } => (StatusCode::CONFLICT, err.to_string()),
        ServiceError::DuplicatePayment { .. } => (StatusCode::CONFLICT, err.to_string()),
        ServiceError::DuplicateFeedback { .. } => (StatusCode::CONFLICT, err.to_string()),
        ServiceError::PasswordHash { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        ),
        ServiceError::Store { source } => match source {
            StoreError::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            StoreError::ConstraintViolation { .. } => (StatusCode::CONFLICT, source.to_string()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Store error".to_string(),
            ),
        },
    };

    (
        status,
        Json(json!({
            "error": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let (status, _) = service_error_to_response(ServiceError::UnknownService {
            name: "Perm".to_string(),
        });
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = service_error_to_response(ServiceError::InvalidCredentials);
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = service_error_to_response(ServiceError::DuplicateEmail {
            email: "a@b.com".to_string(),
        });
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = service_error_to_response(ServiceError::BookingNotFound {
            id: "BK1".to_string(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = service_error_to_response(ServiceError::IllegalTransition {
            reason: "too late".to_string(),
        });
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_error_body_shape() {
        let (_, Json(body)) = service_error_to_response(ServiceError::IllegalTransition {
            reason: "Cannot cancel less than 2 hours before appointment".to_string(),
        });

        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("less than 2 hours"));
        assert!(body["timestamp"].is_string());
    }
}
