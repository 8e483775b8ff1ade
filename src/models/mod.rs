// Re-export all model types
pub use self::booking::*;
pub use self::enums::*;
pub use self::errors::*;
pub use self::events::*;
pub use self::feedback::*;
pub use self::payment::*;
pub use self::service::*;
pub use self::user::*;
pub use self::validation::*;

mod booking;
mod enums;
mod errors;
mod events;
mod feedback;
mod payment;
mod service;
mod user;
mod validation;

use uuid::Uuid;

/// Short prefixed identifier, e.g. "BK3f9a02c1"
pub(crate) fn generate_id(prefix: &str) -> String {
    format!(
        "{}{}",
        prefix,
        Uuid::new_v4()
            .simple()
            .to_string()
            .get(0..8)
            .unwrap_or("00000000")
    )
}
