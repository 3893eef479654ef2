//! Handlers for the `/auth` resource (signup, login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use harbor_core::error::CoreError;
use harbor_core::roles::{is_self_service_role, SELF_SERVICE_ROLES};
use harbor_db::models::user::{CreateUser, LoginRequest, SignupRequest, User, UserResponse};
use harbor_db::repositories::UserRepo;
use serde::Serialize;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::response::DataResponse;
use crate::state::AppState;

/// Successful authentication response returned by signup and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// POST /api/v1/auth/signup
///
/// Register a new account. Admin accounts cannot be self-registered.
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    if !is_self_service_role(&input.role) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Role must be one of: {}",
            SELF_SERVICE_ROLES.join(", ")
        ))));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email.trim().to_lowercase(),
            name: input.name,
            password_hash,
            role: input.role,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %user.role, "User signed up");

    let response = auth_response(&state, user)?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password and receive an access token.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, &input.email.trim().to_lowercase())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::debug!(user_id = user.id, "Rejected login with wrong password");
        return Err(invalid());
    }

    let response = auth_response(&state, user)?;
    Ok(Json(DataResponse { data: response }))
}

fn auth_response(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: user.into(),
    })
}
