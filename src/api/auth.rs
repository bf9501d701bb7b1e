//! Session API endpoints.

use axum::{extract::State, Extension, Json};

use super::{success, ApiResult};
use crate::auth::Session;
use crate::errors::AppError;
use crate::models::{LoginRequest, RegisterRequest, ResetPasswordRequest, SessionInfo, User};
use crate::store::UserDataStore;
use crate::AppState;

async fn open_session(state: &AppState, user: User) -> SessionInfo {
    let load = UserDataStore::load(
        state.repo.clone(),
        &user.id,
        state.config.seed_sample_data,
    );
    let session = state.sessions.open(user.clone(), load).await;
    SessionInfo {
        token: session.token,
        user: session.user,
    }
}

/// POST /api/auth/login - Open a session.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<SessionInfo> {
    match state
        .authenticator
        .login(&request.email, &request.password)
        .await
    {
        Some(user) => success(open_session(&state, user).await),
        None => Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        )),
    }
}

/// POST /api/auth/register - Create an account and open a session.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<SessionInfo> {
    match state
        .authenticator
        .register(&request.name, &request.email, &request.password)
        .await
    {
        Some(user) => success(open_session(&state, user).await),
        None => Err(AppError::Validation(
            "Name, email and password are required".to_string(),
        )),
    }
}

/// POST /api/auth/reset-password - Request a password reset.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> ApiResult<()> {
    if request.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }

    if state.authenticator.reset_password(&request.email).await {
        success(())
    } else {
        Err(AppError::Internal("Password reset failed".to_string()))
    }
}

/// POST /api/auth/logout - Close the session and drop its in-memory data.
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<()> {
    state.sessions.close(&session.token).await;
    success(())
}

/// GET /api/auth/me - The session's user.
pub async fn me(Extension(session): Extension<Session>) -> ApiResult<User> {
    success(session.user)
}
