use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::utils::{error_codes, error_to_api_response};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Username already exists!")]
    UsernameTaken,
    #[error("{0}")]
    InvalidInput(String),
    #[error("Please login first")]
    Unauthorized,
    #[error("Credential storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Could not read the uploaded image: {0}")]
    InvalidImage(String),
    #[error("Classification service unreachable: {0}")]
    NetworkError(String),
    #[error("Classification service returned an unexpected payload: {0}")]
    MalformedResponse(String),
    #[error("No predictions found.")]
    NoPredictions,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::UsernameTaken => StatusCode::CONFLICT,
            AppError::InvalidInput(_) | AppError::InvalidImage(_) => StatusCode::BAD_REQUEST,
            AppError::NoPredictions => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NetworkError(_) | AppError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            AppError::InvalidCredentials => error_codes::AUTH_FAILED,
            AppError::UsernameTaken => error_codes::USER_EXISTS,
            AppError::InvalidInput(_) => error_codes::VALIDATION_ERROR,
            AppError::Unauthorized => error_codes::PERMISSION_DENIED,
            AppError::StorageUnavailable(_) => error_codes::STORAGE_ERROR,
            AppError::InvalidImage(_) => error_codes::INVALID_IMAGE,
            AppError::NetworkError(_) => error_codes::UPSTREAM_UNAVAILABLE,
            AppError::MalformedResponse(_) => error_codes::UPSTREAM_MALFORMED,
            AppError::NoPredictions => error_codes::NO_PREDICTIONS,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status(),
            error_to_api_response::<()>(self.code(), self.to_string()),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_failures_map_to_bad_gateway() {
        assert_eq!(
            AppError::NetworkError("timeout".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::MalformedResponse("no predictions".into()).code(),
            error_codes::UPSTREAM_MALFORMED
        );
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            AppError::InvalidCredentials.to_string(),
            "Invalid username or password"
        );
        assert_eq!(AppError::NoPredictions.to_string(), "No predictions found.");
    }
}
