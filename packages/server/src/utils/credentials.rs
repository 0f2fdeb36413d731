use common::Role;
use sea_orm::*;

use crate::entity::user;
use crate::error::AppError;
use crate::utils::hash;

/// Fields of a new identity, already validated.
pub struct NewIdentity {
    pub email: String,
    pub display_name: String,
    pub password: String,
    pub role: Role,
}

/// Hash on the blocking pool; Argon2 is deliberately slow.
async fn hash_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash::hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hash task failed: {e}")))?
        .map_err(|e| AppError::Internal(format!("Password hash error: {e}")))
}

async fn verify_blocking(password: String, stored: Option<String>) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || match stored {
        Some(stored) => hash::verify_password(&password, &stored),
        None => Ok(hash::verify_dummy(&password)),
    })
    .await
    .map_err(|e| AppError::Internal(format!("Password verify task failed: {e}")))?
    .map_err(|e| AppError::Internal(format!("Password verify error: {e}")))
}

/// Store a new identity with a salted password hash.
///
/// Fails with `DuplicateIdentity` when the email is taken, whether detected
/// by the lookup or by the unique constraint on insert.
pub async fn register_identity<C: ConnectionTrait>(
    db: &C,
    identity: NewIdentity,
) -> Result<user::Model, AppError> {
    let taken = user::Entity::find()
        .filter(user::Column::Email.eq(&identity.email))
        .one(db)
        .await?
        .is_some();
    if taken {
        return Err(AppError::DuplicateIdentity);
    }

    let hash = hash_blocking(identity.password).await?;

    let new_user = user::ActiveModel {
        email: Set(identity.email),
        display_name: Set(identity.display_name),
        password: Set(hash),
        role: Set(identity.role),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    new_user.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            tracing::debug!("Registration race condition: unique constraint caught on insert");
            AppError::DuplicateIdentity
        }
        _ => AppError::from(e),
    })
}

/// Check an email/password pair.
///
/// Unknown email, deactivated account and wrong password all produce
/// `InvalidCredentials`, after the same amount of hashing work.
pub async fn verify_credentials<C: ConnectionTrait>(
    db: &C,
    email: &str,
    password: &str,
) -> Result<user::Model, AppError> {
    let user = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?;

    let stored = user.as_ref().map(|u| u.password.clone());
    let is_valid = verify_blocking(password.to_owned(), stored).await?;

    match user {
        Some(user) if is_valid && user.is_active => Ok(user),
        _ => Err(AppError::InvalidCredentials),
    }
}

/// Fetch an identity by id, treating deactivated accounts as absent.
pub async fn find_active_identity<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|u| u.is_active)
        .ok_or(AppError::IdentityNotFound)
}
