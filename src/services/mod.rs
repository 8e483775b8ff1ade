// Services module - business logic layer

pub mod auth_service;
pub mod booking_service;
pub mod feedback_service;
pub mod notifier;
pub mod payment_service;
pub mod report_service;

pub use auth_service::AuthService;
pub use booking_service::BookingService;
pub use feedback_service::{FeedbackService, ReviewSummary};
pub use notifier::{ChannelError, NotificationChannel, Notifier, SessionLogChannel};
pub use payment_service::PaymentService;
pub use report_service::{BarberStatsReport, OverviewReport, ReportService, RevenueReport};
