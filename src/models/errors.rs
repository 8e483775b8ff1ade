use thiserror::Error;

/// Service-level errors that can occur in business logic
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unknown service: {name}")]
    UnknownService { name: String },

    #[error("Email already registered: {email}")]
    DuplicateEmail { email: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found: {id}")]
    UserNotFound { id: String },

    #[error("Booking not found: {id}")]
    BookingNotFound { id: String },

    #[error("Illegal transition: {reason}")]
    IllegalTransition { reason: String },

    #[error("Booking {booking_id} already has a payment")]
    DuplicatePayment { booking_id: String },

    #[error("Booking {booking_id} already has feedback")]
    DuplicateFeedback { booking_id: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Store error: {source}")]
    Store {
        #[from]
        source: StoreError,
    },

    #[error("Password hashing failed: {message}")]
    PasswordHash { message: String },
}

/// Errors raised by the persistent entity store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on store file: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// The backing file exists but does not parse. Deliberately distinct from
    /// the missing-file case, which seeds demo data instead.
    #[error("Store file is corrupt: {source}")]
    Corrupt {
        #[from]
        source: serde_json::Error,
    },

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    #[error("Failed to build seed data: {message}")]
    Seed { message: String },
}

/// Validation errors for input data
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredField { field: String },

    #[error("Invalid field value: {field}={value}, reason={reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Field too long: {field}, max_length={max_length}, actual_length={actual_length}")]
    TooLong {
        field: String,
        max_length: usize,
        actual_length: usize,
    },

    #[error("Value out of range: {field}, min={min}, max={max}, value={value}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
        value: String,
    },
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::ValidationError {
            message: err.to_string(),
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ServiceError::UnknownService {
            name: "Perm".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown service: Perm");

        let validation_error = ValidationError::RequiredField {
            field: "email".to_string(),
        };
        assert_eq!(validation_error.to_string(), "Required field missing: email");
    }

    #[test]
    fn test_error_conversion() {
        let validation_error = ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: "1".to_string(),
            max: "5".to_string(),
            value: "9".to_string(),
        };

        let service_error: ServiceError = validation_error.into();
        match service_error {
            ServiceError::ValidationError { message } => {
                assert!(message.contains("rating"));
            }
            _ => panic!("Expected ValidationError conversion"),
        }
    }

    #[test]
    fn test_store_error_from_serde() {
        let json_error = serde_json::from_str::<serde_json::Value>("not json");
        assert!(json_error.is_err());

        let store_error: StoreError = json_error.unwrap_err().into();
        match store_error {
            StoreError::Corrupt { .. } => {}
            _ => panic!("Expected Corrupt error"),
        }
    }
}
