use crate::models::{StoreError, StoreResult, User};
use crate::services::auth_service::hash_password;

use super::data_store::StoreDocument;

/// Built-in demo data: two barbers and one owner.
///
/// Used when the store file does not exist yet. Demo credentials match the
/// ones printed on the login screen of the original demo; they are hashed
/// here like any other password.
pub fn demo_document() -> StoreResult<StoreDocument> {
    let mut document = StoreDocument::default();

    let barber1 = User::new_barber(
        "B001".to_string(),
        "John Doe".to_string(),
        "john@barber.com".to_string(),
        hash("1234")?,
        "081234567890".to_string(),
        "Hair Specialist".to_string(),
    );
    let barber2 = User::new_barber(
        "B002".to_string(),
        "Jane Smith".to_string(),
        "jane@barber.com".to_string(),
        hash("1234")?,
        "081234567891".to_string(),
        "Beard Expert".to_string(),
    );
    let owner = User::new_owner(
        "O001".to_string(),
        "Admin Boss".to_string(),
        "admin@barber.com".to_string(),
        hash("admin")?,
        "081234567892".to_string(),
    );

    document.users.insert(barber1.user_id.clone(), barber1);
    document.users.insert(barber2.user_id.clone(), barber2);
    document.users.insert(owner.user_id.clone(), owner);

    Ok(document)
}

fn hash(password: &str) -> StoreResult<String> {
    hash_password(password).map_err(|err| StoreError::Seed {
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::services::auth_service::verify_password;

    #[test]
    fn test_demo_document_contents() {
        let document = demo_document().unwrap();

        assert_eq!(document.users.len(), 3);
        assert!(document.bookings.is_empty());
        assert!(document.payments.is_empty());
        assert!(document.feedbacks.is_empty());

        let owner = document.users.get("O001").unwrap();
        assert_eq!(owner.role, UserRole::Owner);
        assert_eq!(owner.email, "admin@barber.com");

        let barber = document.users.get("B001").unwrap();
        assert_eq!(barber.specialization(), Some("Hair Specialist"));
        assert!(barber.is_available_barber());
    }

    #[test]
    fn test_demo_passwords_are_hashed() {
        let document = demo_document().unwrap();

        let barber = document.users.get("B002").unwrap();
        assert_ne!(barber.password_hash, "1234");
        assert!(verify_password("1234", &barber.password_hash));
        assert!(!verify_password("wrong", &barber.password_hash));
    }
}
