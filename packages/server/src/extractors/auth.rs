use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::{header, request::Parts};
use common::Role;
use sea_orm::ConnectionTrait;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::credentials::find_active_identity;
use crate::utils::jwt::TokenService;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication.
/// Role checks happen via `require_role()` in the handler body, so a caller
/// with a valid token but the wrong role gets `Forbidden`, never a token error.
/// Use `Option<AuthUser>` on public routes that behave differently for
/// signed-in callers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

impl AuthUser {
    /// Returns `self` if the user's role is in `allowed`, `Err(Forbidden)` otherwise.
    pub fn require_role(&self, allowed: &[Role]) -> Result<&Self, AppError> {
        if self.role.is_in(allowed) {
            Ok(self)
        } else {
            Err(AppError::Forbidden)
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

/// Resolve a bearer token to a live identity.
///
/// The identity is re-read from the store so deleted or deactivated
/// accounts are refused even while their tokens are unexpired.
pub async fn authenticate<C: ConnectionTrait>(
    db: &C,
    tokens: &TokenService,
    token: &str,
) -> Result<AuthUser, AppError> {
    let claims = tokens.validate(token)?;
    let user = find_active_identity(db, claims.uid).await?;

    if user.role != claims.role {
        tracing::warn!(user_id = user.id, "Token role does not match stored role");
        return Err(AppError::TokenInvalid);
    }

    Ok(AuthUser {
        user_id: user.id,
        email: user.email,
        display_name: user.display_name,
        role: user.role,
    })
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AppError::TokenInvalid)?;
    // The scheme name is case-insensitive.
    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
            Ok(Some(token.trim()))
        }
        _ => Err(AppError::TokenInvalid),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or(AppError::TokenMissing)?;
        authenticate(&state.db, &state.tokens, token).await
    }
}

impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => authenticate(&state.db, &state.tokens, token)
                .await
                .map(Some),
            None => Ok(None),
        }
    }
}
