use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    IdentityResponse, LoginRequest, LoginResponse, MeResponse, RegisterRequest,
    validate_login_request, validate_register_request,
};
use crate::state::AppState;
use crate::utils::credentials::{self, NewIdentity};

#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    operation_id = "register",
    summary = "Register a new identity",
    description = "Creates an account with the chosen role. The role cannot be changed later. Emails are matched exactly, case included.",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Identity created", body = IdentityResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Email already registered (DUPLICATE_IDENTITY)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email, role = %payload.role))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_register_request(&payload)?;

    let user = credentials::register_identity(
        &state.db,
        NewIdentity {
            email: payload.email,
            display_name: payload.display_name.trim().to_string(),
            password: payload.password,
            role: payload.role,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Identity registered");

    Ok((StatusCode::CREATED, Json(IdentityResponse::from(user))))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in and obtain a bearer token",
    description = "Verifies the email/password pair and returns a signed token valid for the configured window (24 hours by default). Unknown emails and wrong passwords produce the same error.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Invalid credentials (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_login_request(&payload)?;

    let user = credentials::verify_credentials(&state.db, &payload.email, &payload.password).await?;
    let issued = state.tokens.issue(&user)?;

    Ok(Json(LoginResponse {
        access_token: issued.token,
        token_type: "bearer",
        expires_at: issued.expires_at,
        user: user.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    operation_id = "me",
    summary = "Current identity",
    responses(
        (status = 200, description = "Authenticated identity", body = MeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, TOKEN_EXPIRED, IDENTITY_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user), fields(user_id = auth_user.user_id))]
pub async fn me(auth_user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth_user.user_id,
        email: auth_user.email,
        display_name: auth_user.display_name,
        role: auth_user.role,
    })
}
