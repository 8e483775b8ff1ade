use super::{ValidationError, ValidationResult};

/// Trait for validating input models
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

/// Validation constants
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_PHONE_LENGTH: usize = 20;
pub const MIN_PHONE_LENGTH: usize = 6;
pub const MIN_PASSWORD_LENGTH: usize = 4;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MAX_COMMENT_LENGTH: usize = 1000;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Validate a person's display name
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "name".to_string(),
        });
    }

    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max_length: MAX_NAME_LENGTH,
            actual_length: trimmed.len(),
        });
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidValue {
            field: "name".to_string(),
            value: name.to_string(),
            reason: "Contains control characters".to_string(),
        });
    }

    Ok(())
}

/// Validate an email address (shape only, not deliverability)
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "email".to_string(),
        });
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max_length: MAX_EMAIL_LENGTH,
            actual_length: trimmed.len(),
        });
    }

    let valid_shape = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && domain.contains('.') && !domain.ends_with('.')
        }
        None => false,
    };

    if !valid_shape || trimmed.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidValue {
            field: "email".to_string(),
            value: email.to_string(),
            reason: "Not a valid email address".to_string(),
        });
    }

    Ok(())
}

/// Validate a phone number
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let trimmed = phone.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "phone".to_string(),
        });
    }

    let digits = trimmed.chars().filter(|c| c.is_ascii_digit()).count();
    if digits < MIN_PHONE_LENGTH || trimmed.len() > MAX_PHONE_LENGTH {
        return Err(ValidationError::InvalidValue {
            field: "phone".to_string(),
            value: phone.to_string(),
            reason: format!("Expected {} to {} digits", MIN_PHONE_LENGTH, MAX_PHONE_LENGTH),
        });
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
    {
        return Err(ValidationError::InvalidValue {
            field: "phone".to_string(),
            value: phone.to_string(),
            reason: "Contains invalid characters".to_string(),
        });
    }

    Ok(())
}

/// Validate a plaintext password before hashing
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "password".to_string(),
        });
    }

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidValue {
            field: "password".to_string(),
            value: "<redacted>".to_string(),
            reason: format!("Shorter than {} characters", MIN_PASSWORD_LENGTH),
        });
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max_length: MAX_PASSWORD_LENGTH,
            actual_length: password.len(),
        });
    }

    Ok(())
}

/// Validate a feedback rating
pub fn validate_rating(rating: u8) -> ValidationResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: MIN_RATING.to_string(),
            max: MAX_RATING.to_string(),
            value: rating.to_string(),
        });
    }
    Ok(())
}

/// Validate a feedback comment (optional, may be empty)
pub fn validate_comment(comment: &str) -> ValidationResult<()> {
    if comment.len() > MAX_COMMENT_LENGTH {
        return Err(ValidationError::TooLong {
            field: "comment".to_string(),
            max_length: MAX_COMMENT_LENGTH,
            actual_length: comment.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_validation() {
        assert!(validate_name("Jane Smith").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"a".repeat(101)).is_err());
        assert!(validate_name("bad\x00name").is_err());
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("john@barber.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("jane@").is_err());
        assert!(validate_email("jane@nodot").is_err());
        assert!(validate_email("jane@dot.").is_err());
        assert!(validate_email("ja ne@example.com").is_err());
    }

    #[test]
    fn test_phone_validation() {
        assert!(validate_phone("081234567890").is_ok());
        assert!(validate_phone("+62 812-3456-7890").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("call-me-maybe").is_err());
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("1234").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("abc").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_comment_length() {
        assert!(validate_comment("").is_ok());
        assert!(validate_comment("great cut").is_ok());
        assert!(validate_comment(&"x".repeat(1001)).is_err());
    }
}
