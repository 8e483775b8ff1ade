use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::models::{
    RegisterRequest, ServiceError, ServiceResult, User, Validate,
};
use crate::repositories::JsonDataStore;

/// Hash a plaintext password with a fresh random salt
pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| ServiceError::PasswordHash {
            message: err.to_string(),
        })?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored hash
///
/// An unparsable hash counts as a failed verification, not an error.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Registration and login
pub struct AuthService {
    store: Arc<JsonDataStore>,
}

impl AuthService {
    pub fn new(store: Arc<JsonDataStore>) -> Self {
        Self { store }
    }

    /// Register a new customer account.
    ///
    /// The email must not be in use by any existing account, whatever its
    /// role.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<User> {
        request.validate()?;

        let email = request.email.trim().to_string();
        if self.store.find_user_by_email(&email).await.is_some() {
            warn!("Registration rejected, email already in use");
            return Err(ServiceError::DuplicateEmail { email });
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new_customer(
            request.name.trim().to_string(),
            email,
            password_hash,
            request.phone.trim().to_string(),
        );

        let user = self.store.insert_user(user).await?;
        info!(user_id = %user.user_id, "Customer registered");
        Ok(user)
    }

    /// Authenticate by email and password.
    ///
    /// Unknown email and wrong password are deliberately indistinguishable.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<User> {
        let user = self
            .store
            .find_user_by_email(email.trim())
            .await
            .ok_or(ServiceError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(ServiceError::InvalidCredentials);
        }

        info!(user_id = %user.user_id, role = %user.role, "User authenticated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn test_service(dir: &tempfile::TempDir) -> AuthService {
        let store = JsonDataStore::open(dir.path().join("data.json"))
            .await
            .unwrap();
        AuthService::new(Arc::new(store))
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Jane Customer".to_string(),
            email: email.to_string(),
            phone: "081234567893".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[test]
    fn test_hash_round_trip() {
        let hash = hash_password("secret").unwrap();
        assert_ne!(hash, "secret");
        assert!(verify_password("secret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_garbage_hash_fails_verification() {
        assert!(!verify_password("secret", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let dir = tempdir().unwrap();
        let service = test_service(&dir).await;

        let user = service
            .register(register_request("jane@example.com"))
            .await
            .unwrap();
        assert!(user.user_id.starts_with('C'));

        let authed = service
            .authenticate("jane@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(authed.user_id, user.user_id);
        assert!(verify_password("hunter2", &authed.password_hash));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let dir = tempdir().unwrap();
        let service = test_service(&dir).await;

        service
            .register(register_request("jane@example.com"))
            .await
            .unwrap();

        let second = service.register(register_request("jane@example.com")).await;
        assert!(matches!(second, Err(ServiceError::DuplicateEmail { .. })));
    }

    #[tokio::test]
    async fn test_email_uniqueness_spans_roles() {
        let dir = tempdir().unwrap();
        let service = test_service(&dir).await;

        // seeded barber already owns this address
        let result = service.register(register_request("john@barber.com")).await;
        assert!(matches!(result, Err(ServiceError::DuplicateEmail { .. })));
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let dir = tempdir().unwrap();
        let service = test_service(&dir).await;

        let unknown = service.authenticate("ghost@example.com", "1234").await;
        assert!(matches!(unknown, Err(ServiceError::InvalidCredentials)));

        let wrong = service.authenticate("john@barber.com", "wrong").await;
        assert!(matches!(wrong, Err(ServiceError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_seeded_demo_login() {
        let dir = tempdir().unwrap();
        let service = test_service(&dir).await;

        let owner = service.authenticate("admin@barber.com", "admin").await.unwrap();
        assert_eq!(owner.user_id, "O001");
    }
}
