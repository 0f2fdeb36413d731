use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::utils::jwt::TokenError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code, e.g. `TOKEN_EXPIRED`, `FORBIDDEN`,
    /// `ALREADY_TEAMED`, `NOT_FOUND_OR_UNAUTHORIZED`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Title must be 1-256 characters")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),

    // Authentication
    TokenMissing,
    TokenInvalid,
    TokenExpired,
    InvalidCredentials,
    IdentityNotFound,

    // Authorization
    Forbidden,
    /// Missing resource and foreign ownership look the same from outside.
    NotFoundOrUnauthorized,
    NotTeamMember,

    // Conflicts and lifecycle gates
    DuplicateIdentity,
    AlreadyTeamed,
    SubmissionAlreadyExists,
    EventNotAvailable,
    SubmissionsNotOpen,
    InvalidTransition(String),
    TeamFull,

    NotFound(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        let (status, code, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_MISSING",
                "Authentication required".into(),
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_INVALID",
                "Invalid token".into(),
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_EXPIRED",
                "Token expired, please log in again".into(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid email or password".into(),
            ),
            AppError::IdentityNotFound => (
                StatusCode::UNAUTHORIZED,
                "IDENTITY_NOT_FOUND",
                "Account no longer exists or is deactivated".into(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Insufficient permissions".into(),
            ),
            AppError::NotFoundOrUnauthorized => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND_OR_UNAUTHORIZED",
                "Resource not found or unauthorized".into(),
            ),
            AppError::NotTeamMember => (
                StatusCode::FORBIDDEN,
                "NOT_TEAM_MEMBER",
                "Not a member of this team".into(),
            ),
            AppError::DuplicateIdentity => (
                StatusCode::CONFLICT,
                "DUPLICATE_IDENTITY",
                "Email already registered".into(),
            ),
            AppError::AlreadyTeamed => (
                StatusCode::CONFLICT,
                "ALREADY_TEAMED",
                "Already part of a team for this event".into(),
            ),
            AppError::SubmissionAlreadyExists => (
                StatusCode::CONFLICT,
                "SUBMISSION_ALREADY_EXISTS",
                "Submission already exists for this team".into(),
            ),
            AppError::EventNotAvailable => (
                StatusCode::BAD_REQUEST,
                "EVENT_NOT_AVAILABLE",
                "Event not available for team registration".into(),
            ),
            AppError::SubmissionsNotOpen => (
                StatusCode::BAD_REQUEST,
                "SUBMISSIONS_NOT_OPEN",
                "Submissions not open for this event".into(),
            ),
            AppError::InvalidTransition(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_TRANSITION", msg)
            }
            AppError::TeamFull => (
                StatusCode::BAD_REQUEST,
                "TEAM_FULL",
                "Team has reached the event's maximum size".into(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".into(),
                )
            }
        };
        (status, ErrorBody { code, message })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AppError::TokenExpired,
            TokenError::Invalid => AppError::TokenInvalid,
            TokenError::Signing(e) => AppError::Internal(format!("JWT sign error: {e}")),
        }
    }
}

impl From<common::TransitionError> for AppError {
    fn from(err: common::TransitionError) -> Self {
        AppError::InvalidTransition(err.to_string())
    }
}
