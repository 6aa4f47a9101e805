// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use crate::auth::{AuthError, PolicyViolation};
use crate::validation::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Password policy violation: {0}")]
    Policy(#[from] PolicyViolation),

    #[error("New password must differ from the current password")]
    SamePassword,

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Member not found")]
    MemberNotFound,

    #[error("Member already exists: {0}")]
    DuplicateMember(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingCredentials | AppError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            AppError::Policy(_) | AppError::SamePassword | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            },
            AppError::MemberNotFound => StatusCode::NOT_FOUND,
            AppError::DuplicateMember(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingCredentials => "AUTH_001",
            AppError::AuthenticationFailed => "AUTH_002",
            AppError::Policy(_) => "PWD_001",
            AppError::SamePassword => "PWD_002",
            AppError::Validation(_) => "VAL_001",
            AppError::MemberNotFound => "MEM_001",
            AppError::DuplicateMember(_) => "MEM_002",
            AppError::Internal(_) => "INT_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::MissingCredentials | AppError::AuthenticationFailed => {
                "Authentication failed".to_string()
            },
            // The caller needs the specific rule to fix the password
            AppError::Policy(violation) => violation.to_string(),
            AppError::SamePassword => self.to_string(),
            AppError::Validation(e) => e.to_string(),
            AppError::MemberNotFound => "Resource not found".to_string(),
            AppError::DuplicateMember(_) => "Member already exists".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            AppError::Io(_) | AppError::Json(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => AppError::MissingCredentials,
            AuthError::AuthenticationFailed => AppError::AuthenticationFailed,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("blocking task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_app_error_display() {
        assert_eq!(
            AppError::AuthenticationFailed.to_string(),
            "Authentication failed"
        );

        let policy_error = AppError::Policy(PolicyViolation::ContainsBirthday);
        assert_eq!(
            policy_error.to_string(),
            "Password policy violation: Password must not contain the birth date"
        );

        let io_error = AppError::Io(IoError::new(ErrorKind::NotFound, "File not found"));
        assert!(io_error.to_string().contains("IO error"));
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::MissingCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::AuthenticationFailed.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Policy(PolicyViolation::TooShort { min: 8, actual: 3 }).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::SamePassword.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::MemberNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::DuplicateMember("member01".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal("test".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_app_error_error_codes() {
        assert_eq!(AppError::MissingCredentials.error_code(), "AUTH_001");
        assert_eq!(AppError::AuthenticationFailed.error_code(), "AUTH_002");
        assert_eq!(
            AppError::Policy(PolicyViolation::ContainsBirthday).error_code(),
            "PWD_001"
        );

        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        assert_eq!(AppError::Json(json_err).error_code(), "JSON_001");
    }

    #[test]
    fn test_auth_failures_share_a_sanitized_message() {
        assert_eq!(
            AppError::MissingCredentials.sanitized_message(),
            AppError::AuthenticationFailed.sanitized_message()
        );
        assert_eq!(
            AppError::Policy(PolicyViolation::ContainsBirthday).sanitized_message(),
            "Password must not contain the birth date"
        );
    }

    #[test]
    fn test_error_from_impls() {
        let app_err: AppError = AuthError::MissingCredentials.into();
        assert!(matches!(app_err, AppError::MissingCredentials));

        let app_err: AppError = AuthError::AuthenticationFailed.into();
        assert!(matches!(app_err, AppError::AuthenticationFailed));

        let app_err: AppError = PolicyViolation::ContainsBirthday.into();
        assert!(matches!(app_err, AppError::Policy(_)));

        let io_err = IoError::new(ErrorKind::PermissionDenied, "Permission denied");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));

        let app_err: AppError = anyhow::anyhow!("boom").into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_error_into_response() {
        let response = AppError::AuthenticationFailed.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Content type should be application/json
        assert!(response
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("application/json"));
    }
}
