//! HTTP Request Handlers
//!
//! Axum handlers for processing HTTP requests and responses.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    models::{
        auth::{CredentialCheck, LOGIN_DENIED, REGISTRATION_SUCCESS},
        requests::*,
    },
    service::UserService,
    utils::error::{AppError, AppResult},
    VERSION,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
}

/// Standard success response wrapper
#[derive(serde::Serialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Register a new account
///
/// Field validation happens in [`UserService::register`].
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> AppResult<(StatusCode, Json<SuccessResponse<RegisterUserResponse>>)> {
    let user = state.user_service.register(request).await?;

    let response = RegisterUserResponse {
        message: REGISTRATION_SUCCESS.to_string(),
        user,
    };

    Ok((StatusCode::CREATED, Json(SuccessResponse::new(response))))
}

/// Whether an email already has an account
pub async fn check_registered(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<SuccessResponse<RegisteredResponse>>> {
    let registered = state.user_service.is_registered(&email).await?;

    Ok(Json(SuccessResponse::new(RegisteredResponse {
        email,
        registered,
    })))
}

/// First name of the account holder
pub async fn get_first_name(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<SuccessResponse<FirstNameResponse>>> {
    let first_name = state
        .user_service
        .get_first_name(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(SuccessResponse::new(FirstNameResponse {
        email,
        first_name,
    })))
}

/// Postal address of the account holder
pub async fn get_address(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<SuccessResponse<AddressResponse>>> {
    let address = state
        .user_service
        .get_address(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(SuccessResponse::new(AddressResponse { email, address })))
}

/// Check credentials and return the account on success
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<SuccessResponse<LoginResponse>>> {
    request.validate().map_err(handle_validation_error)?;

    let user = state
        .user_service
        .get_user_details(&request.email, &request.password)
        .await?
        .ok_or_else(|| AppError::Authentication(LOGIN_DENIED.to_string()))?;

    let result = CredentialCheck::Valid;
    let response = LoginResponse {
        status: result.as_status().to_string(),
        result,
        user,
    };

    Ok(Json(SuccessResponse::new(response)))
}

/// Health check endpoint
pub async fn health_check(
    State(state): State<AppState>,
) -> AppResult<Json<SuccessResponse<HealthCheckResponse>>> {
    // Check database connectivity
    state.user_service.health_check().await?;

    let response = HealthCheckResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: VERSION.to_string(),
    };

    Ok(Json(SuccessResponse::new(response)))
}

/// Handle validation errors from request parsing
pub fn handle_validation_error(err: validator::ValidationErrors) -> AppError {
    AppError::Validation(describe_validation_errors(&err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_creation() {
        let data = "test data";
        let response = SuccessResponse::new(data);
        assert!(response.success);
        assert_eq!(response.data, "test data");
    }

    #[test]
    fn test_validation_error_handling() {
        let request = LoginRequest {
            email: "".to_string(),
            password: "".to_string(),
        };

        match handle_validation_error(request.validate().unwrap_err()) {
            AppError::Validation(msg) => {
                assert!(msg.contains("email: Email cannot be empty"));
                assert!(msg.contains("password: Password cannot be empty"));
            }
            other => panic!("expected validation error, got {}", other),
        }
    }
}
