//! Authentication Handlers

use std::time::Duration;

use axum::{Extension, Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

use shared::client::{LoginRequest, LoginResponse, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login
///
/// Authenticates user credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let username = req.username.trim().to_lowercase();

    let user = state
        .users()
        .find_by_username(&username)
        .await
        .map_err(|e| AppError::database(format!("Query failed: {e}")))?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent username enumeration
    let user = match user {
        Some(u) => {
            if !u.is_active {
                return Err(AppError::forbidden("Account has been disabled"));
            }

            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

            if !password_valid {
                security_log!(
                    "WARN",
                    "login_failed",
                    username = username.clone(),
                    reason = "invalid_credentials"
                );
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            security_log!(
                "WARN",
                "login_failed",
                username = username.clone(),
                reason = "user_not_found"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user.id.as_ref().map(|t| t.to_string()).unwrap_or_default();

    let token = state
        .jwt_service()
        .generate_token(&user_id, &user.username, &user.display_name, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    security_log!(
        "INFO",
        "login_success",
        user_id = user_id.clone(),
        username = user.username.clone()
    );

    Ok(Json(LoginResponse {
        token,
        user: user.to_info(),
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<UserInfo>, AppError> {
    // Fresh lookup so deactivation and role changes take effect
    // before the token expires
    let stored = state
        .users()
        .find_by_id(&user.id)
        .await
        .map_err(|e| AppError::database(format!("Query failed: {e}")))?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    if !stored.is_active {
        return Err(AppError::forbidden("Account has been disabled"));
    }

    Ok(Json(stored.to_info()))
}
