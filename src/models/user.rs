use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    generate_id, validate_email, validate_name, validate_password, validate_phone, UserRole,
    Validate, ValidationResult,
};

fn default_available() -> bool {
    true
}

fn default_rating() -> f64 {
    5.0
}

/// Role-specific profile data, tagged with `type` in the persisted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RoleProfile {
    Customer {
        #[serde(default)]
        address: String,
        /// Counter carried on the record; nothing spends or awards points yet
        #[serde(default)]
        loyalty_points: u32,
    },
    Barber {
        #[serde(default)]
        specialization: String,
        #[serde(default = "default_available")]
        is_available: bool,
        /// Informational only; the reported average comes from feedback
        #[serde(default = "default_rating")]
        rating: f64,
    },
    Owner,
}

/// A user account: customer, barber, or owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub profile: RoleProfile,
}

impl User {
    /// Create a customer account with a generated ID
    pub fn new_customer(name: String, email: String, password_hash: String, phone: String) -> Self {
        Self {
            user_id: generate_id("C"),
            name,
            email,
            password_hash,
            phone,
            role: UserRole::Customer,
            created_at: Utc::now(),
            profile: RoleProfile::Customer {
                address: String::new(),
                loyalty_points: 0,
            },
        }
    }

    /// Create a barber account with a fixed ID (seed data uses stable IDs)
    pub fn new_barber(
        user_id: String,
        name: String,
        email: String,
        password_hash: String,
        phone: String,
        specialization: String,
    ) -> Self {
        Self {
            user_id,
            name,
            email,
            password_hash,
            phone,
            role: UserRole::Barber,
            created_at: Utc::now(),
            profile: RoleProfile::Barber {
                specialization,
                is_available: true,
                rating: default_rating(),
            },
        }
    }

    /// Create an owner account with a fixed ID
    pub fn new_owner(
        user_id: String,
        name: String,
        email: String,
        password_hash: String,
        phone: String,
    ) -> Self {
        Self {
            user_id,
            name,
            email,
            password_hash,
            phone,
            role: UserRole::Owner,
            created_at: Utc::now(),
            profile: RoleProfile::Owner,
        }
    }

    pub fn is_available_barber(&self) -> bool {
        matches!(
            self.profile,
            RoleProfile::Barber {
                is_available: true,
                ..
            }
        )
    }

    pub fn specialization(&self) -> Option<&str> {
        match &self.profile {
            RoleProfile::Barber { specialization, .. } => Some(specialization),
            _ => None,
        }
    }

    /// Flip a barber's availability flag; returns the new value, or None for
    /// non-barber accounts
    pub fn toggle_availability(&mut self) -> Option<bool> {
        match &mut self.profile {
            RoleProfile::Barber { is_available, .. } => {
                *is_available = !*is_available;
                Some(*is_available)
            }
            _ => None,
        }
    }

    /// Public view of the account, without the credential hash
    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            user_id: self.user_id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            role: self.role,
            created_at: self.created_at,
            profile: self.profile.clone(),
        }
    }
}

/// Request model for registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_phone(&self.phone)?;
        validate_password(&self.password)?;
        Ok(())
    }
}

/// Request model for authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response model for user data exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub profile: RoleProfile,
}
