use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use barberbook_rs::{
    handlers::{create_app, ApiState, StaffState},
    init_observability,
    repositories::JsonDataStore,
    services::{
        AuthService, BookingService, FeedbackService, Notifier, PaymentService, ReportService,
        SessionLogChannel,
    },
    Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first (basic logging only)
    let config = Config::from_environment()?;
    println!("Configuration loaded successfully");

    init_observability(
        &config.observability.service_name,
        config.observability.enable_json_logging,
    )?;

    info!("Starting barberbook-rs service");
    info!(
        "Service: {} v{}",
        config.observability.service_name, config.observability.service_version
    );
    info!("Store file: {}", config.store.data_file);

    // Open the one entity store for this process
    let store = Arc::new(JsonDataStore::open(&config.store.data_file).await?);
    info!("Entity store opened successfully");

    // Wire the notification fan-out: the session channel is the only one
    let mut notifier = Notifier::new();
    notifier.attach(Arc::new(SessionLogChannel));
    let notifier = Arc::new(notifier);

    // Initialize services
    let auth_service = Arc::new(AuthService::new(store.clone()));
    let booking_service = Arc::new(BookingService::new(store.clone(), notifier.clone()));
    let payment_service = Arc::new(PaymentService::new(store.clone()));
    let feedback_service = Arc::new(FeedbackService::new(store.clone()));
    let report_service = Arc::new(ReportService::new(store.clone()));
    info!("Services initialized successfully");

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

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL+C signal handler: {}", err);
        }
        info!("Shutdown signal received");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
