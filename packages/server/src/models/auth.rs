use chrono::{DateTime, Utc};
use common::Role;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for registration.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Unique email, matched exactly as typed.
    #[schema(example = "alice@example.com")]
    pub email: String,
    /// Display name (1-64 characters).
    #[schema(example = "Alice")]
    pub display_name: String,
    /// Password (1-128 bytes).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
    /// Role of the new account. Cannot be changed later.
    pub role: Role,
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let well_formed = (3..=254).contains(&email.len())
        && !email.chars().any(char::is_whitespace)
        && matches!(
            email.split_once('@'),
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        );
    if !well_formed {
        return Err(AppError::Validation("Email address is not valid".into()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.is_empty() || password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 1-128 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    validate_email(&payload.email)?;
    let name = payload.display_name.trim();
    if name.is_empty() || name.chars().count() > 64 {
        return Err(AppError::Validation(
            "Display name must be 1-64 characters".into(),
        ));
    }
    validate_password(&payload.password)
}

/// Request body for login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Public view of an identity.
#[derive(Serialize, utoipa::ToSchema)]
pub struct IdentityResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "Alice")]
    pub display_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::user::Model> for IdentityResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: &'static str,
    /// Absolute expiry of the token.
    pub expires_at: DateTime<Utc>,
    pub user: IdentityResponse,
}

/// Current authenticated identity.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "Alice")]
    pub display_name: String,
    pub role: Role,
}
