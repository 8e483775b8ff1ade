use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tempfile::TempDir;
use tokio::net::TcpListener;

use barberbook_rs::handlers::{create_app, ApiState, StaffState};
use barberbook_rs::repositories::JsonDataStore;
use barberbook_rs::services::{
    AuthService, BookingService, FeedbackService, Notifier, PaymentService, ReportService,
    SessionLogChannel,
};

/// Boots the real application router on an ephemeral port, backed by a
/// throwaway store file seeded with the demo data
pub struct TestEnvironment {
    pub client: Client,
    pub base_url: String,
    _data_dir: TempDir,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        let data_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(
            JsonDataStore::open(data_dir.path().join("barbershop_data.json"))
                .await
                .expect("Failed to open store"),
        );

        let mut notifier = Notifier::new();
        notifier.attach(Arc::new(SessionLogChannel));
        let notifier = Arc::new(notifier);

        let auth_service = Arc::new(AuthService::new(store.clone()));
        let booking_service = Arc::new(BookingService::new(store.clone(), notifier));
        let payment_service = Arc::new(PaymentService::new(store.clone()));
        let feedback_service = Arc::new(FeedbackService::new(store.clone()));
        let report_service = Arc::new(ReportService::new(store));

        let api_state = ApiState {
            auth_service,
            booking_service: booking_service.clone(),
            payment_service,
            feedback_service: feedback_service.clone(),
        };
        let staff_state = StaffState {
            booking_service,
            feedback_service,
            report_service,
        };

        let app = create_app(api_state, staff_state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Failed to get local address");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to serve app");
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(50)).await;

        Self {
            client: Client::new(),
            base_url,
            _data_dir: data_dir,
        }
    }

    /// Register a customer and return its user_id
    pub async fn register_customer(&self, email: &str) -> String {
        let response = self
            .client
            .post(format!("{}/api/auth/register", self.base_url))
            .json(&json!({
                "name": "Test Customer",
                "email": email,
                "phone": "081234567899",
                "password": "hunter2"
            }))
            .send()
            .await
            .expect("Failed to register");

        assert_eq!(response.status().as_u16(), 201);
        let user: serde_json::Value = response.json().await.expect("Failed to parse user");
        user["user_id"].as_str().expect("Missing user_id").to_string()
    }

    /// Create a scheduled booking `hours_ahead` from now and return its id
    pub async fn create_booking(
        &self,
        customer_id: &str,
        barber_id: Option<&str>,
        hours_ahead: i64,
    ) -> String {
        let appointment = chrono::Utc::now().naive_utc() + chrono::Duration::hours(hours_ahead);

        let response = self
            .client
            .post(format!("{}/api/bookings", self.base_url))
            .json(&json!({
                "customer_id": customer_id,
                "base_service": "Haircut",
                "addons": ["Hair Wash"],
                "barber_id": barber_id,
                "booking_date": appointment.date().format("%Y-%m-%d").to_string(),
                "booking_time": appointment.time().format("%H:%M:%S").to_string(),
            }))
            .send()
            .await
            .expect("Failed to create booking");

        assert_eq!(response.status().as_u16(), 201);
        let booking: serde_json::Value = response.json().await.expect("Failed to parse booking");
        booking["booking_id"]
            .as_str()
            .expect("Missing booking_id")
            .to_string()
    }
}
