use std::collections::BTreeMap;

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::models::form::FormErrors;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `LOGIN_REQUIRED`,
    /// `INVALID_CREDENTIALS`, `PERMISSION_DENIED`, `NOT_FOUND`, `CONFLICT`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Please correct the errors below.")]
    pub message: String,
    /// Messages per offending form field.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = json!({"name": ["This field is required."]}))]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request body or query string.
    Validation(String),
    /// Submitted form failed validation; one or more messages per field.
    Form(FormErrors),
    /// Anonymous actor hit a page that needs a login.
    LoginRequired {
        login_url: String,
        next: String,
    },
    InvalidCredentials,
    PermissionDenied,
    NotFound(String),
    /// The operation would break a reference, e.g. deleting a breed that still has dogs.
    Conflict(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                    errors: None,
                },
            ),
            AppError::Form(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: "Please correct the errors below.".into(),
                    errors: Some(errors.into_map()),
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    message: "Please enter a correct username and password.".into(),
                    errors: None,
                },
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "PERMISSION_DENIED",
                    message: "Insufficient permissions".into(),
                    errors: None,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                    errors: None,
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "CONFLICT",
                    message: msg,
                    errors: None,
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                        errors: None,
                    },
                )
            }
            AppError::LoginRequired { .. } => (
                StatusCode::FOUND,
                ErrorBody {
                    code: "LOGIN_REQUIRED",
                    message: "Authentication required".into(),
                    errors: None,
                },
            ),
        }
    }
}

/// Build the login redirect target, keeping `/` readable in `next`.
pub fn login_location(login_url: &str, next: &str) -> String {
    let next = urlencoding::encode(next).replace("%2F", "/");
    format!("{login_url}?next={next}")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let location = match &self {
            AppError::LoginRequired { login_url, next } => Some(login_location(login_url, next)),
            _ => None,
        };

        let (status, body) = self.status_and_body();

        if let Some(location) = location {
            (status, [(header::LOCATION, location)], Json(body)).into_response()
        } else {
            (status, Json(body)).into_response()
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<FormErrors> for AppError {
    fn from(errors: FormErrors) -> Self {
        AppError::Form(errors)
    }
}
